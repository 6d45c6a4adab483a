//! Geometry primitives and the ICCCM size-hint solver.
//!
//! Coordinates are signed: intermediate clamping arithmetic in
//! `apply_size_hints` can go negative before being pulled back in range, so
//! positions and extents here are `i32` rather than unsigned.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An x,y coordinate pair, relative to the root window.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A window or monitor position: top left corner + extent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn midpoint(&self) -> Point {
        Point::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Split this rect into `n` evenly sized rows (stacked vertically). A
    /// remainder (`h % n`) is folded into the final row so the rows always
    /// sum to exactly `self.h`.
    pub fn as_rows(&self, n: usize) -> Vec<Rect> {
        self.split(n, false)
    }

    /// Split this rect into `n` evenly sized columns (side by side).
    pub fn as_columns(&self, n: usize) -> Vec<Rect> {
        self.split(n, true)
    }

    fn split(&self, n: usize, columns: bool) -> Vec<Rect> {
        if n == 0 {
            return vec![];
        }
        if n == 1 {
            return vec![*self];
        }
        let n = n as i32;
        let (total, fixed_w) = if columns { (self.w, self.h) } else { (self.h, self.w) };
        let step = total / n;
        let mut out = Vec::with_capacity(n as usize);
        for i in 0..n {
            let extent = if i == n - 1 { total - step * (n - 1) } else { step };
            out.push(if columns {
                Rect::new(self.x + step * i, self.y, extent, fixed_w)
            } else {
                Rect::new(self.x, self.y + step * i, fixed_w, extent)
            });
        }
        out
    }

    /// Divide into two columns, the first `new_width` wide. `None` if out of range.
    pub fn split_at_width(&self, new_width: i32) -> Option<(Rect, Rect)> {
        if new_width <= 0 || new_width >= self.w {
            return None;
        }
        Some((
            Rect { w: new_width, ..*self },
            Rect { x: self.x + new_width, w: self.w - new_width, ..*self },
        ))
    }

    /// Divide into two rows, the first `new_height` tall. `None` if out of range.
    pub fn split_at_height(&self, new_height: i32) -> Option<(Rect, Rect)> {
        if new_height <= 0 || new_height >= self.h {
            return None;
        }
        Some((
            Rect { h: new_height, ..*self },
            Rect { y: self.y + new_height, h: self.h - new_height, ..*self },
        ))
    }

    /// Shrink on all four sides by `px`, floored at a 1x1 rect so gap math
    /// never produces a negative-size tile.
    pub fn shrink(&self, px: i32) -> Rect {
        let w = (self.w - 2 * px).max(1);
        let h = (self.h - 2 * px).max(1);
        Rect { x: self.x + px, y: self.y + px, w, h }
    }
}

/// ICCCM `WM_NORMAL_HINTS`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeHints {
    pub base_w: i32,
    pub base_h: i32,
    pub inc_w: i32,
    pub inc_h: i32,
    pub min_w: i32,
    pub min_h: i32,
    pub max_w: i32,
    pub max_h: i32,
    /// ICCCM `min_aspect.y / min_aspect.x`; `0.0` means unset. Compared
    /// against the *height/width* ratio of the candidate rect.
    pub min_aspect: f64,
    /// ICCCM `max_aspect.x / max_aspect.y`; `0.0` means unset. Compared
    /// against the *width/height* ratio of the candidate rect.
    pub max_aspect: f64,
}

impl Default for SizeHints {
    fn default() -> Self {
        Self {
            base_w: 0,
            base_h: 0,
            inc_w: 0,
            inc_h: 0,
            min_w: 0,
            min_h: 0,
            max_w: 0,
            max_h: 0,
            min_aspect: 0.0,
            max_aspect: 0.0,
        }
    }
}

impl SizeHints {
    /// `isfixed` iff `min == max` in both axes (and hints are set).
    pub fn is_fixed(&self) -> bool {
        self.max_w > 0 && self.max_w == self.min_w && self.max_h > 0 && self.max_h == self.min_h
    }
}

/// Inputs to `apply_size_hints` that do not live on the requested `Rect` itself.
pub struct HintContext {
    /// Border width in pixels, added to `w`/`h` to get the window's full extent.
    pub border_w: i32,
    /// The full screen rect, used when `interact` is set (mouse-driven resize/move).
    pub screen: Rect,
    /// The owning monitor's usable rect (excludes the bar), used otherwise.
    pub monitor_area: Rect,
    /// Bar height in pixels: both w and h are floored at this.
    pub bar_height: i32,
    /// `resizehints || client.floating || current layout has no arrange fn`.
    pub honor_hints: bool,
}

/// ICCCM-compliant clamping of `(x, y, w, h)` against monitor area, aspect,
/// increment and min/max. `current` is the client's presently stored
/// geometry, used only to compute the `changed` flag. `interact` selects
/// mouse-driven clamping against the full screen rather than the monitor's
/// usable rect.
pub fn apply_size_hints(
    mut r: Rect,
    current: Rect,
    hints: &SizeHints,
    ctx: &HintContext,
    interact: bool,
) -> (Rect, bool) {
    // Step 1: lower-bound width/height to 1.
    r.w = r.w.max(1);
    r.h = r.h.max(1);

    let bw2 = 2 * ctx.border_w;

    // Step 2: clamp position against the full screen (interact) or the
    // monitor's usable rect, so the window stays at least partially visible.
    if interact {
        let s = ctx.screen;
        if r.x > s.x + s.w {
            r.x = s.x + s.w - (r.w + bw2);
        }
        if r.y > s.y + s.h {
            r.y = s.y + s.h - (r.h + bw2);
        }
        if r.x + r.w + bw2 < s.x {
            r.x = s.x;
        }
        if r.y + r.h + bw2 < s.y {
            r.y = s.y;
        }
    } else {
        let m = ctx.monitor_area;
        if r.x >= m.x + m.w {
            r.x = m.x + m.w - (r.w + bw2);
        }
        if r.y >= m.y + m.h {
            r.y = m.y + m.h - (r.h + bw2);
        }
        if r.x + r.w + bw2 <= m.x {
            r.x = m.x;
        }
        if r.y + r.h + bw2 <= m.y {
            r.y = m.y;
        }
    }

    // Step 3: never let a tile shrink thinner than the bar.
    if r.h < ctx.bar_height {
        r.h = ctx.bar_height;
    }
    if r.w < ctx.bar_height {
        r.w = ctx.bar_height;
    }

    // Step 4: ICCCM base/aspect/increment/min/max, only when hints are honored.
    if ctx.honor_hints {
        let base_is_min = hints.base_w == hints.min_w && hints.base_h == hints.min_h;
        if !base_is_min {
            r.w -= hints.base_w;
            r.h -= hints.base_h;
        }

        if hints.min_aspect > 0.0 && hints.max_aspect > 0.0 {
            let aspect = r.w as f64 / r.h as f64;
            if hints.max_aspect < aspect {
                r.w = (r.h as f64 * hints.max_aspect + 0.5) as i32;
            } else if hints.min_aspect < 1.0 / aspect {
                r.h = (r.w as f64 * hints.min_aspect + 0.5) as i32;
            }
        }

        if base_is_min {
            r.w -= hints.base_w;
            r.h -= hints.base_h;
        }

        if hints.inc_w != 0 {
            r.w -= r.w % hints.inc_w;
        }
        if hints.inc_h != 0 {
            r.h -= r.h % hints.inc_h;
        }

        r.w = (r.w + hints.base_w).max(hints.min_w);
        r.h = (r.h + hints.base_h).max(hints.min_h);
        if hints.max_w > 0 {
            r.w = r.w.min(hints.max_w);
        }
        if hints.max_h > 0 {
            r.h = r.h.min(hints.max_h);
        }
    }

    let changed = r.x != current.x || r.y != current.y || r.w != current.w || r.h != current.h;
    (r, changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn ctx(honor_hints: bool) -> HintContext {
        HintContext {
            border_w: 1,
            screen: Rect::new(0, 0, 1920, 1080),
            monitor_area: Rect::new(0, 33, 1920, 1047),
            bar_height: 23,
            honor_hints,
        }
    }

    #[test]
    fn floating_point_is_clamped_into_the_monitor_not_lost() {
        let c = ctx(false);
        let (r, changed) = apply_size_hints(
            Rect::new(5000, 33, 400, 300),
            Rect::new(100, 100, 400, 300),
            &SizeHints::default(),
            &c,
            false,
        );
        assert!(changed);
        assert!(r.x + r.w + 2 < c.monitor_area.x + c.monitor_area.w);
    }

    #[test]
    fn fixed_point_is_a_noop() {
        let c = ctx(false);
        let r0 = Rect::new(100, 100, 400, 300);
        let (r, changed) = apply_size_hints(r0, r0, &SizeHints::default(), &c, false);
        assert_eq!(r, r0);
        assert!(!changed);
    }

    #[test_case(100, 100, true; "min equals max in both axes")]
    #[test_case(100, 200, false; "only width fixed")]
    #[test]
    fn is_fixed(max_w: i32, max_h: i32, expected: bool) {
        let hints = SizeHints { min_w: 100, min_h: 100, max_w, max_h, ..Default::default() };
        assert_eq!(hints.is_fixed(), expected);
    }

    #[test]
    fn increments_are_snapped_when_hints_are_honored() {
        let c = ctx(true);
        let hints = SizeHints { inc_w: 10, inc_h: 10, min_w: 20, min_h: 20, ..Default::default() };
        let (r, _) =
            apply_size_hints(Rect::new(0, 33, 407, 303), Rect::new(0, 33, 400, 300), &hints, &c, false);
        assert_eq!(r.w % hints.inc_w, 0);
        assert_eq!(r.h % hints.inc_h, 0);
    }

    #[test]
    fn as_rows_sums_to_the_original_height() {
        let r = Rect::new(10, 20, 100, 97);
        let rows = r.as_rows(3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.h).sum::<i32>(), 97);
    }

    #[test]
    fn as_columns_sums_to_the_original_width() {
        let r = Rect::new(10, 20, 97, 50);
        let cols = r.as_columns(4);
        assert_eq!(cols.len(), 4);
        assert_eq!(cols.iter().map(|r| r.w).sum::<i32>(), 97);
    }

    #[test]
    fn split_at_width_out_of_range_is_none() {
        let r = Rect::new(0, 0, 100, 100);
        assert!(r.split_at_width(0).is_none());
        assert!(r.split_at_width(100).is_none());
        assert!(r.split_at_width(200).is_none());
    }

    #[test]
    fn shrink_never_goes_negative() {
        let r = Rect::new(0, 0, 10, 10);
        let s = r.shrink(20);
        assert!(s.w >= 1 && s.h >= 1);
    }
}
