//! The tag bitmask: a client belongs to zero or more of `NUM_TAGS` user tags,
//! plus an optional scratchpad tag.
use bitflags::bitflags;

/// Number of user-assignable tags. Kept well under the 30-tag bitmask width
/// limit, and fixed at 9 to match the default keymap (one keybinding per
/// digit row).
pub const NUM_TAGS: usize = 9;

bitflags! {
    /// A bitmask over the `NUM_TAGS` user tags plus one reserved scratchpad bit.
    ///
    /// Bit `i` (for `i < NUM_TAGS`) is user tag `i + 1`; bit `NUM_TAGS` is the
    /// scratchpad tag.
    #[derive(Default)]
    pub struct TagMask: u32 {
        const TAG_1 = 1 << 0;
        const TAG_2 = 1 << 1;
        const TAG_3 = 1 << 2;
        const TAG_4 = 1 << 3;
        const TAG_5 = 1 << 4;
        const TAG_6 = 1 << 5;
        const TAG_7 = 1 << 6;
        const TAG_8 = 1 << 7;
        const TAG_9 = 1 << 8;
        const SCRATCHPAD = 1 << NUM_TAGS;
    }
}

const _: () = assert!(NUM_TAGS <= 30, "tag bitmask width must stay <= 30 user tags");

impl TagMask {
    /// The bitmask naming every user tag (not the scratchpad), used as the
    /// "all tags" view.
    pub fn all_tags() -> TagMask {
        TagMask::from_bits_truncate((1 << NUM_TAGS) - 1)
    }

    /// The single-bit mask for 1-indexed user tag `n` (`1..=NUM_TAGS`).
    pub fn nth(n: usize) -> TagMask {
        debug_assert!(n >= 1 && n <= NUM_TAGS);
        TagMask::from_bits_truncate(1 << (n - 1))
    }

    /// The index (0-based) of the first set user tag, or `None` if this mask
    /// only contains the scratchpad bit or is empty. Used by `view()` to
    /// compute the pertag "current tag".
    pub fn first_tag_index(&self) -> Option<usize> {
        (0..NUM_TAGS).find(|&i| self.contains(TagMask::nth(i + 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tags_is_every_user_bit_but_not_scratchpad() {
        let all = TagMask::all_tags();
        for n in 1..=NUM_TAGS {
            assert!(all.contains(TagMask::nth(n)));
        }
        assert!(!all.contains(TagMask::SCRATCHPAD));
    }

    #[test]
    fn first_tag_index_picks_lowest_bit() {
        let m = TagMask::nth(3) | TagMask::nth(5);
        assert_eq!(m.first_tag_index(), Some(2));
    }

    #[test]
    fn first_tag_index_none_for_empty_or_scratchpad_only() {
        assert_eq!(TagMask::empty().first_tag_index(), None);
        assert_eq!(TagMask::SCRATCHPAD.first_tag_index(), None);
    }
}
