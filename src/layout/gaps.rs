//! Gap policy shared by every layout algorithm.
use crate::geometry::Rect;

/// Inner/outer, horizontal/vertical gap configuration plus the smart-gap and
/// global-disable toggles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaps {
    pub inner_h: i32,
    pub inner_v: i32,
    pub outer_h: i32,
    pub outer_v: i32,
    /// Outer gaps are suppressed when exactly this many tiled clients are
    /// visible (0 disables the smart-gap behaviour).
    pub smartgaps: usize,
    /// Global kill switch: when false, every gap below behaves as zero.
    pub enabled: bool,
}

impl Default for Gaps {
    fn default() -> Self {
        Self {
            inner_h: 0,
            inner_v: 0,
            outer_h: 0,
            outer_v: 0,
            smartgaps: 0,
            enabled: true,
        }
    }
}

/// The gap values actually in force for a layout pass over `n` tiled clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveGaps {
    pub inner_h: i32,
    pub inner_v: i32,
    pub outer_h: i32,
    pub outer_v: i32,
}

impl Gaps {
    /// Resolve outer/inner values for a pass over `n` visible tiled clients,
    /// applying `enablegaps` and `smartgaps`.
    pub fn effective(&self, n: usize) -> EffectiveGaps {
        if !self.enabled {
            return EffectiveGaps { inner_h: 0, inner_v: 0, outer_h: 0, outer_v: 0 };
        }
        let smart_kill = self.smartgaps != 0 && n == self.smartgaps;
        EffectiveGaps {
            inner_h: self.inner_h,
            inner_v: self.inner_v,
            outer_h: if smart_kill { 0 } else { self.outer_h },
            outer_v: if smart_kill { 0 } else { self.outer_v },
        }
    }

    /// A grid-like variant that always suppresses inner gaps, used by
    /// `gaplessgrid` regardless of the configured gap values.
    pub fn effective_gapless(&self, n: usize) -> EffectiveGaps {
        let mut g = self.effective(n);
        g.inner_h = 0;
        g.inner_v = 0;
        g
    }
}

/// Shrink a monitor's usable rect by the outer gap on every side.
pub fn apply_outer(area: Rect, g: EffectiveGaps) -> Rect {
    Rect::new(
        area.x + g.outer_v,
        area.y + g.outer_h,
        (area.w - 2 * g.outer_v).max(1),
        (area.h - 2 * g.outer_h).max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smartgaps_zeroes_outer_only_at_exact_count() {
        let g = Gaps { outer_h: 10, outer_v: 10, smartgaps: 1, ..Default::default() };
        assert_eq!(g.effective(1).outer_h, 0);
        assert_eq!(g.effective(2).outer_h, 10);
    }

    #[test]
    fn disabled_gaps_are_always_zero() {
        let g = Gaps { inner_h: 5, outer_h: 5, enabled: false, ..Default::default() };
        let e = g.effective(3);
        assert_eq!((e.inner_h, e.outer_h), (0, 0));
    }

    #[test]
    fn gapless_variant_zeroes_inner_even_when_enabled() {
        let g = Gaps { inner_h: 5, inner_v: 5, ..Default::default() };
        let e = g.effective_gapless(4);
        assert_eq!((e.inner_h, e.inner_v), (0, 0));
    }
}
