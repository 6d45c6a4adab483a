//! One logical output: geometry, tag state, layout slots, and pertag memory.
use crate::{
    core::Xid,
    geometry::Rect,
    layout::{Gaps, LayoutKind},
    pertag::Pertag,
    tagset::TagMask,
};

/// Index into `Wm::monitors`. A client stores this rather than a direct
/// back-reference, resolving through the central monitor table instead of
/// an aliasable pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorId(pub usize);

#[derive(Debug, Clone)]
pub struct Monitor {
    pub id: MonitorId,
    pub num: usize,

    /// Physical output rect.
    pub screen: Rect,
    /// Output rect minus the bar.
    pub usable: Rect,
    pub bar: Rect,
    pub show_bar: bool,
    pub top_bar: bool,

    tagsets: [TagMask; 2],
    pub seltags: usize,

    layouts: [LayoutKind; 2],
    pub sellt: usize,

    pub mfact: f64,
    pub nmaster: usize,
    pub gaps: Gaps,

    /// Tile/attach order.
    pub clients: Vec<Xid>,
    /// Focus-history order, most-recently-focused first.
    pub stack: Vec<Xid>,
    pub sel: Option<Xid>,

    pub pertag: Pertag,
}

impl Monitor {
    pub fn new(id: MonitorId, num: usize, screen: Rect, bar_height: i32, top_bar: bool) -> Self {
        let usable = if top_bar {
            Rect::new(screen.x, screen.y + bar_height, screen.w, screen.h - bar_height)
        } else {
            Rect::new(screen.x, screen.y, screen.w, screen.h - bar_height)
        };
        let bar = if top_bar {
            Rect::new(screen.x, screen.y, screen.w, bar_height)
        } else {
            Rect::new(screen.x, screen.y + screen.h - bar_height, screen.w, bar_height)
        };

        Self {
            id,
            num,
            screen,
            usable,
            bar,
            show_bar: true,
            top_bar,
            tagsets: [TagMask::nth(1), TagMask::nth(1)],
            seltags: 0,
            layouts: [LayoutKind::Tile, LayoutKind::Monocle],
            sellt: 0,
            mfact: 0.55,
            nmaster: 1,
            gaps: Gaps::default(),
            clients: Vec::new(),
            stack: Vec::new(),
            sel: None,
            pertag: Pertag::default(),
        }
    }

    /// The bitmask currently shown.
    pub fn active_tags(&self) -> TagMask {
        self.tagsets[self.seltags]
    }

    pub fn layout(&self) -> LayoutKind {
        self.layouts[self.sellt]
    }

    pub fn prev_layout(&self) -> LayoutKind {
        self.layouts[1 - self.sellt]
    }

    pub fn set_layout(&mut self, kind: LayoutKind) {
        self.layouts[self.sellt] = kind;
    }

    /// Toggle between the two remembered layout slots.
    pub fn toggle_layout(&mut self) {
        self.sellt = 1 - self.sellt;
    }

    /// `view(mask)`: swaps `seltags`, records the new mask, tracks
    /// `curtag -> prevtag`, and restores that tag's pertag memory into the
    /// monitor's active fields. Returns whether `show_bar` changed (callers
    /// toggle the bar mapping on a transition).
    pub fn view(&mut self, mask: TagMask) -> bool {
        if mask == self.active_tags() {
            return false;
        }
        self.seltags = 1 - self.seltags;
        self.tagsets[self.seltags] = mask;

        let tag_index = mask.first_tag_index().map(|i| i + 1).unwrap_or(0);
        self.pertag.switch_to(tag_index);

        let slot = *self.pertag.slot(tag_index);
        let was_shown = self.show_bar;
        self.nmaster = slot.nmaster;
        self.mfact = slot.mfact;
        self.layouts[self.sellt] = slot.layout;
        self.layouts[1 - self.sellt] = slot.prev_layout;
        self.show_bar = slot.showbar;

        was_shown != self.show_bar
    }

    /// Persist the monitor's live fields back into the active pertag slot,
    /// e.g. after `setmfact`/`incnmaster`/`setlayout` mutate them directly.
    pub fn save_pertag(&mut self) {
        let tag_index = self.pertag.cur_tag;
        let slot = self.pertag.slot_mut(tag_index);
        slot.nmaster = self.nmaster;
        slot.mfact = self.mfact;
        slot.layout = self.layouts[self.sellt];
        slot.prev_layout = self.layouts[1 - self.sellt];
        slot.showbar = self.show_bar;
    }

    pub fn toggle_bar(&mut self) {
        self.show_bar = !self.show_bar;
        self.save_pertag();
    }

    /// Distance from this monitor's midpoint to a point, used by
    /// `dirtomon`/`recttomon`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.screen.x
            && x < self.screen.x + self.screen.w
            && y >= self.screen.y
            && y < self.screen.y + self.screen.h
    }

    pub fn attach(&mut self, id: Xid) {
        self.clients.insert(0, id);
    }

    pub fn attach_bottom(&mut self, id: Xid) {
        self.clients.push(id);
    }

    pub fn detach(&mut self, id: Xid) {
        self.clients.retain(|&c| c != id);
        self.stack.retain(|&c| c != id);
        if self.sel == Some(id) {
            self.sel = self.stack.first().copied();
        }
    }

    pub fn push_stack_front(&mut self, id: Xid) {
        self.stack.retain(|&c| c != id);
        self.stack.insert(0, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mon() -> Monitor {
        Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 1920, 1080), 23, true)
    }

    #[test]
    fn usable_rect_excludes_top_bar() {
        let m = mon();
        assert_eq!(m.usable, Rect::new(0, 23, 1920, 1057));
        assert_eq!(m.bar, Rect::new(0, 0, 1920, 23));
    }

    #[test]
    fn view_round_trip_restores_pertag_state() {
        let mut m = mon();
        m.view(TagMask::nth(1));
        m.set_layout(LayoutKind::Monocle);
        m.mfact = 0.7;
        m.save_pertag();

        m.view(TagMask::nth(2));
        m.set_layout(LayoutKind::Grid);
        m.save_pertag();

        m.view(TagMask::nth(1));
        assert_eq!(m.layout(), LayoutKind::Monocle);
        assert_eq!(m.mfact, 0.7);
    }

    #[test]
    fn attach_and_detach_keep_stack_consistent() {
        let mut m = mon();
        m.attach(Xid(1));
        m.attach(Xid(2));
        m.push_stack_front(Xid(1));
        m.push_stack_front(Xid(2));
        m.sel = Some(Xid(2));

        m.detach(Xid(2));
        assert_eq!(m.clients, vec![Xid(1)]);
        assert_eq!(m.stack, vec![Xid(1)]);
        assert_eq!(m.sel, Some(Xid(1)));
    }
}
