//! Per-window client state (spec.md §3 "Client").
//!
//! Clients are stored in a central table (`core::State::clients`) and
//! addressed by `Xid`; tile order and focus-history order live in each
//! `Monitor`'s `clients`/`stack` index vectors (spec.md §9 design note:
//! "arena of clients addressed by index with per-monitor index vectors"),
//! rather than as intrusive `next`/`snext` links on the client itself.
use crate::{
    core::Xid,
    geometry::{Rect, SizeHints},
    monitor::MonitorId,
    tagset::TagMask,
};

/// A client's pre-fullscreen floating state, restored on fullscreen exit
/// (spec.md §3 "old-state (pre-fullscreen floating state)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OldState {
    pub was_floating: bool,
}

/// One managed top-level window.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: Xid,
    pub monitor: MonitorId,

    pub class: String,
    pub instance: String,
    pub title: String,
    /// Pre-multiplied ARGB icon pixels, row-major, if `_NET_WM_ICON` was set.
    pub icon: Option<Vec<u32>>,
    pub icon_w: u32,
    pub icon_h: u32,

    pub rect: Rect,
    pub border_w: i32,
    pub old_border_w: i32,
    /// Saved geometry from the last float→tile transition (`sfx,sfy,sfw,sfh`).
    pub saved_float_rect: Rect,
    /// Geometry to restore when leaving real fullscreen.
    pub old_rect: Rect,

    pub hints: SizeHints,

    pub tags: TagMask,

    pub is_floating: bool,
    pub is_urgent: bool,
    pub never_focus: bool,
    pub is_fullscreen: bool,
    pub is_fake_fullscreen: bool,
    /// Suppresses client-requested x/y on configure for a known-buggy class.
    pub is_steam: bool,
    pub old_state: Option<OldState>,

    /// Per-client weight within its layout area, in `[0.25, 4.0]`.
    pub cfact: f64,

    /// The client this one swallows, if it is the head of an active swallow
    /// (spec.md §3 "swallowedby"). `None` for a plain client or for a
    /// swallower shell (which is never attached to a monitor at all).
    pub swallowed_by: Option<Xid>,

    pub supports_delete: bool,
    pub wants_take_focus: bool,
}

pub const CFACT_MIN: f64 = 0.25;
pub const CFACT_MAX: f64 = 4.0;

impl Client {
    pub fn new(id: Xid, monitor: MonitorId, rect: Rect, border_w: i32) -> Self {
        Self {
            id,
            monitor,
            class: String::new(),
            instance: String::new(),
            title: String::new(),
            icon: None,
            icon_w: 0,
            icon_h: 0,
            rect,
            border_w,
            old_border_w: border_w,
            saved_float_rect: rect,
            old_rect: rect,
            hints: SizeHints::default(),
            tags: TagMask::empty(),
            is_floating: false,
            is_urgent: false,
            never_focus: false,
            is_fullscreen: false,
            is_fake_fullscreen: false,
            is_steam: false,
            old_state: None,
            cfact: 1.0,
            swallowed_by: None,
            supports_delete: false,
            wants_take_focus: false,
        }
    }

    /// True iff `hints` pin this client to a single size (spec.md §3 "isfixed").
    pub fn is_fixed_size(&self) -> bool {
        self.hints.is_fixed()
    }

    /// True iff this client is a swallow chain parent (never mapped or
    /// attached directly; spec.md §3 swallow-engine invariant).
    pub fn is_swallower_of(&self, other: &Client) -> bool {
        other.swallowed_by == Some(self.id)
    }

    /// Clamp a requested `cfact` delta into `[CFACT_MIN, CFACT_MAX]`.
    pub fn adjust_cfact(&mut self, delta: f64) {
        self.cfact = (self.cfact + delta).clamp(CFACT_MIN, CFACT_MAX);
    }

    /// Visible iff tagged onto the monitor's active view (spec.md §3
    /// invariants; `examples/original_source/dwm.c`'s `ISVISIBLE` macro is
    /// exactly `tags & tagset[seltags]`, with no scratchpad special case —
    /// a hidden scratchpad client simply never intersects the active view
    /// because `active` never carries the scratchpad bit, and `scratchpad_show`
    /// makes one visible again by retagging it onto the current view rather
    /// than by a visibility override here).
    pub fn is_visible_on(&self, active: TagMask) -> bool {
        self.tags.intersects(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new(Xid(1), MonitorId(0), Rect::new(0, 0, 100, 100), 1)
    }

    #[test]
    fn cfact_delta_clamps_to_bounds() {
        let mut c = client();
        c.adjust_cfact(-10.0);
        assert_eq!(c.cfact, CFACT_MIN);
        c.adjust_cfact(10.0);
        assert_eq!(c.cfact, CFACT_MAX);
    }

    #[test]
    fn hidden_scratchpad_client_is_invisible_on_every_user_tag() {
        let mut c = client();
        c.tags = TagMask::SCRATCHPAD;
        assert!(!c.is_visible_on(TagMask::nth(1)));
        assert!(!c.is_visible_on(TagMask::all_tags()));
    }

    #[test]
    fn visibility_follows_plain_tag_intersection() {
        let mut c = client();
        c.tags = TagMask::nth(2);
        assert!(!c.is_visible_on(TagMask::nth(1)));
        assert!(c.is_visible_on(TagMask::nth(2)));
    }

    #[test]
    fn swallower_relationship_is_directional() {
        let mut swee = client();
        swee.id = Xid(2);
        let swer = client();
        swee.swallowed_by = Some(swer.id);
        assert!(swer.is_swallower_of(&swee));
        assert!(!swee.is_swallower_of(&swer));
    }
}
