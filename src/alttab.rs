//! The alt-tab overlay (spec.md §4.8). Grounded on the teacher's
//! `core::manager` focus-stack walking style, adapted into a standalone
//! state machine: everything here is pure client-id bookkeeping, the
//! overlay window itself is created via `x::WinType::Normal` and the
//! repeated keyboard grab retry loop is driven by `core::handle` once it
//! holds the `XConn`.
use crate::core::Xid;
use crate::monitor::Monitor;

/// How many times to retry `XGrabKeyboard` before giving up (spec.md §4.8:
/// "retries the keyboard grab a bounded number of times before giving up").
pub const GRAB_RETRIES: u32 = 1000;

/// Live state of an in-progress cycle, from the first `Tab` press until the
/// modifier is released.
#[derive(Debug, Clone, PartialEq)]
pub struct AltTabState {
    /// Focus-history order at the moment cycling started; index `0` is the
    /// client that was focused when the overlay opened.
    snapshot: Vec<Xid>,
    /// Offset from the snapshot's head currently highlighted.
    offset: usize,
}

impl AltTabState {
    /// `alttab` init: snapshot the monitor's current focus-history order.
    /// Returns `None` if there is nothing to cycle between.
    pub fn start(mon: &Monitor) -> Option<Self> {
        if mon.stack.len() < 2 {
            return None;
        }
        Some(Self { snapshot: mon.stack.clone(), offset: 0 })
    }

    /// Advance the highlighted client by `dir` (`+1` forward, `-1` with
    /// Shift held, per spec.md §4.8), wrapping.
    pub fn cycle(&mut self, dir: i32) -> Xid {
        let n = self.snapshot.len() as i32;
        self.offset = ((self.offset as i32 + dir).rem_euclid(n)) as usize;
        self.snapshot[self.offset]
    }

    pub fn selected(&self) -> Xid {
        self.snapshot[self.offset]
    }

    pub fn snapshot(&self) -> &[Xid] {
        &self.snapshot
    }

    /// Finalize the cycle: refocus the snapshot bottom-to-top so the
    /// selected client ends on top of `mon.stack` while every other
    /// client's relative recency is preserved beneath it (spec.md §4.8
    /// "rotates the snapshot so the selected client leads, then refocuses
    /// bottom-to-top to rebuild stacking order").
    pub fn finalize(self, mon: &mut Monitor) {
        let selected = self.selected();
        let mut rotated = self.snapshot;
        rotated.rotate_left(self.offset);
        rotated.reverse();
        for id in rotated {
            mon.push_stack_front(id);
        }
        mon.sel = Some(selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::monitor::MonitorId;

    fn mon_with_stack(ids: &[u32]) -> Monitor {
        let mut m = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 1920, 1080), 23, true);
        for &id in ids {
            m.push_stack_front(Xid(id));
        }
        m
    }

    #[test]
    fn start_returns_none_with_fewer_than_two_clients() {
        let m = mon_with_stack(&[1]);
        assert!(AltTabState::start(&m).is_none());
    }

    #[test]
    fn cycle_wraps_forward_and_backward() {
        let m = mon_with_stack(&[1, 2, 3]);
        // push_stack_front pushes in order so final stack is [3, 2, 1].
        let mut tab = AltTabState::start(&m).unwrap();
        assert_eq!(tab.cycle(1), Xid(2));
        assert_eq!(tab.cycle(1), Xid(1));
        assert_eq!(tab.cycle(1), Xid(3));
        assert_eq!(tab.cycle(-1), Xid(1));
    }

    #[test]
    fn finalize_moves_selected_to_top_and_preserves_relative_order() {
        let mut m = mon_with_stack(&[1, 2, 3]); // stack: [3, 2, 1]
        let mut tab = AltTabState::start(&m).unwrap();
        tab.cycle(1); // selects Xid(2)
        tab.finalize(&mut m);
        assert_eq!(m.sel, Some(Xid(2)));
        assert_eq!(m.stack[0], Xid(2));
    }
}
