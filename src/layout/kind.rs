//! The nine tiling algorithms plus floating, modelled as a tagged variant
//! rather than trait objects or function pointers: this keeps `arrange`
//! exhaustive over a closed set and lets each variant carry its own
//! per-kind test vectors.
use crate::geometry::Rect;
use crate::layout::gaps::{apply_outer, EffectiveGaps, Gaps};

/// One of the available tiling algorithms, or plain floating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Tile,
    Monocle,
    Dwindle,
    Grid,
    NRowGrid,
    HorizGrid,
    GaplessGrid,
    CenteredMaster,
    CenteredFloatingMaster,
    Floating,
}

/// Fixed ordering used by `actions::layout_menu` to map a picker's numeric
/// choice back to a [`LayoutKind`], matching the index dwm's own
/// `layoutmenu` expects the picker's stdin list to be built from.
pub const ALL_LAYOUTS: [LayoutKind; 10] = [
    LayoutKind::Tile,
    LayoutKind::Monocle,
    LayoutKind::Dwindle,
    LayoutKind::Grid,
    LayoutKind::NRowGrid,
    LayoutKind::HorizGrid,
    LayoutKind::GaplessGrid,
    LayoutKind::CenteredMaster,
    LayoutKind::CenteredFloatingMaster,
    LayoutKind::Floating,
];

impl LayoutKind {
    /// The canonical symbol string written verbatim into the bar.
    pub fn symbol(&self, n: usize) -> String {
        match self {
            LayoutKind::Tile => "[]=".to_string(),
            LayoutKind::Monocle => format!("[{}]", n),
            LayoutKind::Dwindle => "[\\]".to_string(),
            LayoutKind::Grid => "[#]".to_string(),
            LayoutKind::NRowGrid => "###".to_string(),
            LayoutKind::HorizGrid => "---".to_string(),
            LayoutKind::GaplessGrid => ":::".to_string(),
            LayoutKind::CenteredMaster => ">M>".to_string(),
            LayoutKind::CenteredFloatingMaster => ">F<".to_string(),
            LayoutKind::Floating => "><>".to_string(),
        }
    }

    /// True iff this layout has no arrange function at all — the
    /// symbol-only "floating" layout. Size-hint clamping then always
    /// follows the honor-hints branch.
    pub fn is_floating(&self) -> bool {
        matches!(self, LayoutKind::Floating)
    }

    /// Arrange `cfacts.len()` visible tiled clients within `area`, in the
    /// same order as `cfacts`. Returns one rect per input client. Floating
    /// layouts return `None`: callers keep each client's own floating geometry.
    pub fn arrange(
        &self,
        area: Rect,
        cfacts: &[f64],
        mfact: f64,
        nmaster: usize,
        gaps: Gaps,
    ) -> Option<Vec<Rect>> {
        if self.is_floating() || cfacts.is_empty() {
            return if self.is_floating() { None } else { Some(vec![]) };
        }
        let n = cfacts.len();
        let eff = if matches!(self, LayoutKind::GaplessGrid) {
            gaps.effective_gapless(n)
        } else {
            gaps.effective(n)
        };
        let rects = match self {
            LayoutKind::Tile => tile(area, cfacts, mfact, nmaster, eff),
            LayoutKind::Monocle => monocle(area, n, eff),
            LayoutKind::Dwindle => dwindle(area, n, eff),
            LayoutKind::Grid | LayoutKind::GaplessGrid => grid(area, n, eff),
            LayoutKind::NRowGrid => nrowgrid(area, n, eff),
            LayoutKind::HorizGrid => horizgrid(area, n, nmaster, mfact, eff),
            LayoutKind::CenteredMaster => centered_master(area, cfacts, mfact, nmaster, eff),
            LayoutKind::CenteredFloatingMaster => {
                centered_floating_master(area, cfacts, mfact, nmaster, eff)
            }
            LayoutKind::Floating => unreachable!("handled above"),
        };
        Some(rects)
    }
}

/// Distribute `cfacts` proportionally down `column`'s height, folding any
/// rounding remainder into the final client so the sum always equals
/// `column.h` exactly.
fn distribute_vertical(column: Rect, cfacts: &[f64], inner_gap: i32) -> Vec<Rect> {
    let n = cfacts.len();
    if n == 0 {
        return vec![];
    }
    let total_gap = inner_gap * (n as i32 - 1).max(0);
    let usable_h = (column.h - total_gap).max(n as i32);
    let total_cfact: f64 = cfacts.iter().sum();
    let mut y = column.y;
    let mut rects = Vec::with_capacity(n);
    let mut remaining_h = usable_h;
    for (i, &cf) in cfacts.iter().enumerate() {
        let h = if i + 1 == n {
            remaining_h
        } else {
            let raw = ((usable_h as f64) * (cf / total_cfact)).round() as i32;
            raw.clamp(1, (remaining_h - (n as i32 - i as i32 - 1)).max(1))
        };
        rects.push(Rect::new(column.x, y, column.w, h.max(1)));
        y += h + inner_gap;
        remaining_h -= h;
    }
    rects
}

fn distribute_horizontal(row: Rect, cfacts: &[f64], inner_gap: i32) -> Vec<Rect> {
    let n = cfacts.len();
    if n == 0 {
        return vec![];
    }
    let total_gap = inner_gap * (n as i32 - 1).max(0);
    let usable_w = (row.w - total_gap).max(n as i32);
    let total_cfact: f64 = cfacts.iter().sum();
    let mut x = row.x;
    let mut rects = Vec::with_capacity(n);
    let mut remaining_w = usable_w;
    for (i, &cf) in cfacts.iter().enumerate() {
        let w = if i + 1 == n {
            remaining_w
        } else {
            let raw = ((usable_w as f64) * (cf / total_cfact)).round() as i32;
            raw.clamp(1, (remaining_w - (n as i32 - i as i32 - 1)).max(1))
        };
        rects.push(Rect::new(x, row.y, w.max(1), row.h));
        x += w + inner_gap;
        remaining_w -= w;
    }
    rects
}

fn tile(area: Rect, cfacts: &[f64], mfact: f64, nmaster: usize, gaps: EffectiveGaps) -> Vec<Rect> {
    let area = apply_outer(area, gaps);
    let n = cfacts.len();
    if nmaster == 0 || n <= nmaster {
        return distribute_vertical(area, cfacts, gaps.inner_h);
    }
    let mw = ((area.w as f64) * mfact) as i32;
    match area.split_at_width(mw) {
        Some((master_area, stack_area)) => {
            let master_area = Rect::new(master_area.x, master_area.y, master_area.w - gaps.inner_v / 2, master_area.h);
            let stack_area = Rect::new(
                stack_area.x + gaps.inner_v - gaps.inner_v / 2,
                stack_area.y,
                stack_area.w - (gaps.inner_v - gaps.inner_v / 2),
                stack_area.h,
            );
            let mut out = distribute_vertical(master_area, &cfacts[..nmaster], gaps.inner_h);
            out.extend(distribute_vertical(stack_area, &cfacts[nmaster..], gaps.inner_h));
            out
        }
        None => distribute_vertical(area, cfacts, gaps.inner_h),
    }
}

fn monocle(area: Rect, n: usize, gaps: EffectiveGaps) -> Vec<Rect> {
    let area = apply_outer(area, gaps);
    vec![area; n]
}

fn dwindle(area: Rect, n: usize, gaps: EffectiveGaps) -> Vec<Rect> {
    let area = apply_outer(area, gaps);
    if n == 0 {
        return vec![];
    }
    let mut rects = Vec::with_capacity(n);
    let mut remaining = area;
    let mut horizontal = true;
    for i in 0..n {
        if i + 1 == n {
            rects.push(remaining);
            break;
        }
        let split = if horizontal {
            remaining.split_at_width(remaining.w / 2)
        } else {
            remaining.split_at_height(remaining.h / 2)
        };
        match split {
            Some((a, b)) => {
                rects.push(a);
                remaining = b;
            }
            None => {
                rects.push(remaining);
                break;
            }
        }
        horizontal = !horizontal;
    }
    let pad = (gaps.inner_h.max(gaps.inner_v)) / 2;
    rects.into_iter().map(|r| r.shrink(pad)).collect()
}

/// Column-major near-square placement: the column count is ⌈√n⌉, and
/// leftover clients are spread one-per-column from the left so the total
/// always equals `n` exactly.
fn grid(area: Rect, n: usize, gaps: EffectiveGaps) -> Vec<Rect> {
    let area = apply_outer(area, gaps);
    if n == 0 {
        return vec![];
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    let base = n / cols;
    let extra = n % cols;
    let col_rects = area.as_columns(cols);
    let pad = gaps.inner_v.max(gaps.inner_h) / 2;
    let mut out = Vec::with_capacity(n);
    for (ci, col_area) in col_rects.into_iter().enumerate() {
        let count = base + usize::from(ci < extra);
        if count == 0 {
            continue;
        }
        out.extend(col_area.as_rows(count).into_iter().map(|r| r.shrink(pad)));
    }
    out
}

/// Rows packed by width; `n == 2` is special-cased to a vertical split of
/// two side-by-side columns.
fn nrowgrid(area: Rect, n: usize, gaps: EffectiveGaps) -> Vec<Rect> {
    let area = apply_outer(area, gaps);
    if n == 0 {
        return vec![];
    }
    if n == 2 {
        let pad = gaps.inner_v / 2;
        return area.as_columns(2).into_iter().map(|r| r.shrink(pad)).collect();
    }
    let rows = (n as f64).sqrt().ceil() as usize;
    let base = n / rows;
    let extra = n % rows;
    let row_rects = area.as_rows(rows);
    let pad = gaps.inner_h.max(gaps.inner_v) / 2;
    let mut out = Vec::with_capacity(n);
    for (ri, row_area) in row_rects.into_iter().enumerate() {
        let count = base + usize::from(ri < extra);
        if count == 0 {
            continue;
        }
        out.extend(row_area.as_columns(count).into_iter().map(|r| r.shrink(pad)));
    }
    out
}

/// One master row plus one stack row, or a single row when everything fits
/// in the master count.
fn horizgrid(area: Rect, n: usize, nmaster: usize, mfact: f64, gaps: EffectiveGaps) -> Vec<Rect> {
    let area = apply_outer(area, gaps);
    if n == 0 {
        return vec![];
    }
    let pad = gaps.inner_h.max(gaps.inner_v) / 2;
    if n <= nmaster || nmaster == 0 {
        return area.as_columns(n).into_iter().map(|r| r.shrink(pad)).collect();
    }
    let mh = ((area.h as f64) * mfact) as i32;
    match area.split_at_height(mh) {
        Some((master_row, stack_row)) => {
            let mut out: Vec<Rect> = master_row
                .as_columns(nmaster)
                .into_iter()
                .map(|r| r.shrink(pad))
                .collect();
            out.extend(stack_row.as_columns(n - nmaster).into_iter().map(|r| r.shrink(pad)));
            out
        }
        None => area.as_columns(n).into_iter().map(|r| r.shrink(pad)).collect(),
    }
}

/// Master column centered, with stack clients alternating left/right when
/// `n > nmaster`.
fn centered_master(area: Rect, cfacts: &[f64], mfact: f64, nmaster: usize, gaps: EffectiveGaps) -> Vec<Rect> {
    let area = apply_outer(area, gaps);
    let n = cfacts.len();
    if n <= nmaster || nmaster == 0 {
        return distribute_vertical(area, cfacts, gaps.inner_h);
    }
    let mw = ((area.w as f64) * mfact) as i32;
    let side_total = area.w - mw;
    let left_w = side_total / 2;
    let right_w = side_total - left_w;

    let master_cfacts = &cfacts[..nmaster];
    let stack_cfacts = &cfacts[nmaster..];

    let mut left_idx = Vec::new();
    let mut right_idx = Vec::new();
    for (i, cf) in stack_cfacts.iter().enumerate() {
        if i % 2 == 0 {
            left_idx.push(*cf);
        } else {
            right_idx.push(*cf);
        }
    }

    let left_area = Rect::new(area.x, area.y, left_w, area.h);
    let master_area = Rect::new(area.x + left_w, area.y, mw, area.h);
    let right_area = Rect::new(area.x + left_w + mw, area.y, right_w, area.h);

    let left_rects = distribute_vertical(left_area, &left_idx, gaps.inner_h);
    let master_rects = distribute_vertical(master_area, master_cfacts, gaps.inner_h);
    let right_rects = distribute_vertical(right_area, &right_idx, gaps.inner_h);

    // Reassemble in original order: masters first, then stack clients
    // interleaved left/right in the same order they were bucketed.
    let mut out = master_rects;
    let mut li = left_rects.into_iter();
    let mut ri = right_rects.into_iter();
    for i in 0..stack_cfacts.len() {
        if i % 2 == 0 {
            out.push(li.next().expect("left bucket sized to match"));
        } else {
            out.push(ri.next().expect("right bucket sized to match"));
        }
    }
    out
}

/// Master floats centered above a single stack row below.
fn centered_floating_master(area: Rect, cfacts: &[f64], mfact: f64, nmaster: usize, gaps: EffectiveGaps) -> Vec<Rect> {
    let area = apply_outer(area, gaps);
    let n = cfacts.len();
    if n <= nmaster || nmaster == 0 {
        return distribute_horizontal(area, cfacts, gaps.inner_v);
    }
    let mh = ((area.h as f64) * mfact) as i32;
    let mw = ((area.w as f64) * mfact) as i32;
    let master_x = area.x + (area.w - mw) / 2;
    let master_area = Rect::new(master_x, area.y, mw, mh);
    let stack_area = Rect::new(area.x, area.y + mh, area.w, area.h - mh);

    let mut out = distribute_horizontal(master_area, &cfacts[..nmaster], gaps.inner_v);
    out.extend(distribute_horizontal(stack_area, &cfacts[nmaster..], gaps.inner_v));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    const AREA: Rect = Rect { x: 0, y: 33, w: 1920, h: 1047 };

    fn all_kinds() -> Vec<LayoutKind> {
        vec![
            LayoutKind::Tile,
            LayoutKind::Monocle,
            LayoutKind::Dwindle,
            LayoutKind::Grid,
            LayoutKind::NRowGrid,
            LayoutKind::HorizGrid,
            LayoutKind::GaplessGrid,
            LayoutKind::CenteredMaster,
            LayoutKind::CenteredFloatingMaster,
        ]
    }

    #[test]
    fn single_client_tile_fills_usable_area_minus_gaps() {
        let gaps = Gaps { inner_h: 10, inner_v: 10, outer_h: 10, outer_v: 10, ..Default::default() };
        let rects = LayoutKind::Tile
            .arrange(AREA, &[1.0], 0.55, 1, gaps)
            .unwrap();
        assert_eq!(rects, vec![Rect::new(10, 43, 1900, 1027)]);
    }

    #[test]
    fn floating_layout_returns_none() {
        assert!(LayoutKind::Floating.arrange(AREA, &[1.0], 0.55, 1, Gaps::default()).is_none());
    }

    #[test]
    fn monocle_symbol_reports_client_count() {
        assert_eq!(LayoutKind::Monocle.symbol(3), "[3]");
    }

    #[quickcheck]
    fn layout_totality(n: u8, mfact_pct: u8, nmaster: u8) -> bool {
        let n = (n % 12) as usize;
        let cfacts = vec![1.0; n];
        let mfact = 0.05 + (mfact_pct as f64 % 90.0) / 100.0;
        let nmaster = (nmaster % 6) as usize;
        let gaps = Gaps { inner_h: 4, inner_v: 4, outer_h: 4, outer_v: 4, smartgaps: 0, enabled: true };

        all_kinds().into_iter().all(|kind| {
            let rects = kind.arrange(AREA, &cfacts, mfact, nmaster, gaps).unwrap_or_default();
            if rects.len() != n {
                return false;
            }
            rects.iter().all(|r| {
                r.w > 0
                    && r.h > 0
                    && r.x >= AREA.x
                    && r.y >= AREA.y
                    && r.x + r.w <= AREA.x + AREA.w
                    && r.y + r.h <= AREA.y + AREA.h
            })
        })
    }
}
