//! Per-tag memoised monitor configuration, copied into the active monitor
//! fields by `view(mask)` on every tag switch.
use crate::layout::LayoutKind;
use crate::tagset::NUM_TAGS;

/// Index `0` is the "all tags" slot; indices `1..=NUM_TAGS` are the nine
/// user tags, addressed by `TagMask::first_tag_index() + 1`.
const SLOTS: usize = NUM_TAGS + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PertagSlot {
    pub nmaster: usize,
    pub mfact: f64,
    pub layout: LayoutKind,
    pub prev_layout: LayoutKind,
    pub showbar: bool,
}

impl Default for PertagSlot {
    fn default() -> Self {
        Self {
            nmaster: 1,
            mfact: 0.55,
            layout: LayoutKind::Tile,
            prev_layout: LayoutKind::Monocle,
            showbar: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pertag {
    /// The slot currently active on the monitor (mirrors `curtag` in
    /// `dwm.c`), used by `tagtonext`/`tagtoprev` to restore `prevtag`.
    pub cur_tag: usize,
    pub prev_tag: usize,
    slots: [PertagSlot; SLOTS],
}

impl Default for Pertag {
    fn default() -> Self {
        Self { cur_tag: 0, prev_tag: 0, slots: [PertagSlot::default(); SLOTS] }
    }
}

impl Pertag {
    pub fn slot(&self, tag_index: usize) -> &PertagSlot {
        &self.slots[tag_index]
    }

    pub fn slot_mut(&mut self, tag_index: usize) -> &mut PertagSlot {
        &mut self.slots[tag_index]
    }

    /// Record a view switch: `curtag -> prevtag`, then `curtag` becomes
    /// `new_tag_index` (spec.md §4.7 "saves `curtag -> prevtag`").
    pub fn switch_to(&mut self, new_tag_index: usize) {
        self.prev_tag = self.cur_tag;
        self.cur_tag = new_tag_index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_records_previous_tag() {
        let mut p = Pertag::default();
        p.switch_to(3);
        p.switch_to(5);
        assert_eq!(p.cur_tag, 5);
        assert_eq!(p.prev_tag, 3);
    }

    #[test]
    fn slots_are_independent() {
        let mut p = Pertag::default();
        p.slot_mut(1).mfact = 0.7;
        p.slot_mut(1).layout = LayoutKind::Monocle;
        assert_eq!(p.slot(2).mfact, 0.55);
        assert_eq!(p.slot(1).mfact, 0.7);
    }
}
