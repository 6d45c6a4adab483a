//! Focus and stacking discipline, plus the cross-monitor and mark operations
//! (`swapclient`, `tagtonext`/`tagtoprev`, `dirtomon`, `focusmon`, `tagmon`,
//! `sendmon`).
//!
//! These operate purely on the client/monitor graph; the X-side effects
//! (`SetInputFocus`, `WM_TAKE_FOCUS`, border recolouring) are issued by the
//! caller (`core::handle`) once it has the `XConn` in hand, using the
//! selection this module computes.
use crate::{client::Client, core::Xid, monitor::Monitor, tagset::TagMask};
use std::collections::HashMap;

/// `focus(c)`: validate `target` against visibility, falling back to the
/// topmost visible client in `mon.stack`. On a real change, moves the new
/// selection to the head of the stack. Returns `(previous, new)`.
pub fn focus(mon: &mut Monitor, clients: &HashMap<Xid, Client>, target: Option<Xid>) -> (Option<Xid>, Option<Xid>) {
    let active = mon.active_tags();
    let visible = |id: &Xid| clients.get(id).map(|c| c.is_visible_on(active)).unwrap_or(false);

    let resolved = match target {
        Some(id) if visible(&id) => Some(id),
        _ => mon.stack.iter().find(|id| visible(id)).copied(),
    };

    let previous = mon.sel;
    if resolved == previous {
        return (previous, previous);
    }

    if let Some(id) = resolved {
        mon.push_stack_front(id);
    }
    mon.sel = resolved;

    (previous, resolved)
}

/// `focusstack(±1)`: advance through `mon.clients` in tile order, skipping
/// non-visible clients and wrapping. Motion is refused while the selection
/// is really fullscreen and `lock_fullscreen` holds.
pub fn focus_stack(
    mon: &Monitor,
    clients: &HashMap<Xid, Client>,
    dir: i32,
    lock_fullscreen: bool,
) -> Option<Xid> {
    let sel = mon.sel?;
    if lock_fullscreen {
        if let Some(c) = clients.get(&sel) {
            if c.is_fullscreen && !c.is_fake_fullscreen {
                return Some(sel);
            }
        }
    }

    let active = mon.active_tags();
    let visible: Vec<Xid> = mon
        .clients
        .iter()
        .filter(|id| clients.get(id).map(|c| c.is_visible_on(active)).unwrap_or(false))
        .copied()
        .collect();
    if visible.is_empty() {
        return None;
    }
    let pos = visible.iter().position(|&id| id == sel)?;
    let n = visible.len() as i32;
    let next = ((pos as i32 + dir).rem_euclid(n)) as usize;
    Some(visible[next])
}

/// `swapfocus`: toggle selection between the current client and `mark`.
/// Returns the monitor the mark lives on if it differs from `mon`, so the
/// caller can switch view there first if the mark is on another monitor
/// or tag.
pub fn swap_focus(mon: &Monitor, mark: Option<Xid>) -> Option<Xid> {
    match (mon.sel, mark) {
        (Some(sel), Some(m)) if sel != m => Some(m),
        (None, Some(m)) => Some(m),
        _ => None,
    }
}

/// `swapclient` (distinct from `swapfocus`): swap the *positions* of the
/// selected client and the mark in both `clients` and `stack`, without
/// touching `mon.sel`.
pub fn swap_client(mon: &mut Monitor, mark: Xid) {
    let sel = match mon.sel {
        Some(s) if s != mark => s,
        _ => return,
    };

    let swap_in = |v: &mut Vec<Xid>| {
        let a = v.iter().position(|&x| x == sel);
        let b = v.iter().position(|&x| x == mark);
        if let (Some(a), Some(b)) = (a, b) {
            v.swap(a, b);
        }
    };
    swap_in(&mut mon.clients);
    swap_in(&mut mon.stack);
}

/// `setfullscreen(c, true)`: save the prior floating state, switch to a real
/// (non-fake) fullscreen geometry covering the whole screen rect, and raise
/// it. Fake fullscreen only flips the flag (spec.md §4.4).
pub fn set_fullscreen(client: &mut Client, screen: crate::geometry::Rect, fullscreen: bool, fake: bool) {
    if fullscreen == client.is_fullscreen && fake == client.is_fake_fullscreen {
        return;
    }

    if fullscreen && !fake {
        client.old_rect = client.rect;
        client.old_border_w = client.border_w;
        client.old_state = Some(crate::client::OldState { was_floating: client.is_floating });
        client.is_floating = true;
        client.border_w = 0;
        client.rect = screen;
    } else if !fullscreen && client.is_fullscreen && !client.is_fake_fullscreen {
        client.rect = client.old_rect;
        client.border_w = client.old_border_w;
        if let Some(old) = client.old_state.take() {
            client.is_floating = old.was_floating;
        }
    }

    client.is_fullscreen = fullscreen;
    client.is_fake_fullscreen = fake;
}

/// `tagtonext`/`tagtoprev` (spec.md §C): move the selected client to the
/// adjacent user tag and follow it with a view switch. `dir` is `+1` or `-1`.
pub fn tag_to_adjacent(mon: &mut Monitor, client: &mut Client, dir: i32) {
    let cur = client.tags.first_tag_index().unwrap_or(0) as i32;
    let n = crate::tagset::NUM_TAGS as i32;
    let next = (cur + dir).rem_euclid(n);
    let mask = TagMask::nth(next as usize + 1);
    client.tags = mask;
    mon.view(mask);
}

/// `dirtomon` (spec.md §C): the monitor index reached by stepping `dir`
/// (`+1`/`-1`) through `monitors`, wrapping, from `from`.
pub fn dir_to_mon(monitors: &[Monitor], from: usize, dir: i32) -> usize {
    let n = monitors.len() as i32;
    if n == 0 {
        return from;
    }
    ((from as i32 + dir).rem_euclid(n)) as usize
}

/// `sendmon` (spec.md §C): move `client` to `dest`'s active tag set,
/// detaching it from `src` in the process. Caller re-attaches it to
/// `dest.clients`/`dest.stack` using the configured attach policy.
pub fn send_to_mon(src: &mut Monitor, dest: &Monitor, client: &mut Client) {
    src.detach(client.id);
    client.monitor = dest.id;
    client.tags = dest.active_tags();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Rect, monitor::MonitorId};

    fn mon_with(ids: &[u32]) -> (Monitor, HashMap<Xid, Client>) {
        let mut m = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 1920, 1080), 23, true);
        let mut clients = HashMap::new();
        for &id in ids {
            let mut c = Client::new(Xid(id), m.id, Rect::new(0, 0, 10, 10), 1);
            c.tags = TagMask::nth(1);
            clients.insert(Xid(id), c);
            m.attach(Xid(id));
            m.push_stack_front(Xid(id));
        }
        m.sel = ids.last().map(|&id| Xid(id));
        (m, clients)
    }

    #[test]
    fn focus_falls_back_to_topmost_visible_when_target_is_hidden() {
        let (mut m, mut clients) = mon_with(&[1, 2]);
        clients.get_mut(&Xid(2)).unwrap().tags = TagMask::nth(2);
        let (prev, new) = focus(&mut m, &clients, Some(Xid(2)));
        assert_eq!(prev, Some(Xid(2)));
        assert_eq!(new, Some(Xid(1)));
    }

    #[test]
    fn focusstack_wraps_and_skips_hidden_clients() {
        let (m, mut clients) = mon_with(&[1, 2, 3]);
        clients.get_mut(&Xid(2)).unwrap().tags = TagMask::nth(5);
        let next = focus_stack(&m, &clients, 1, false);
        assert_eq!(next, Some(Xid(1)));
    }

    #[test]
    fn focusstack_refuses_to_move_off_a_real_fullscreen_client_seed_scenario_three() {
        let (mut m, mut clients) = mon_with(&[1, 2]);
        m.sel = Some(Xid(1));
        clients.get_mut(&Xid(1)).unwrap().is_fullscreen = true;
        let next = focus_stack(&m, &clients, 1, true);
        assert_eq!(next, Some(Xid(1)));
    }

    #[test]
    fn fullscreen_round_trip_restores_floating_state() {
        let mut c = Client::new(Xid(1), MonitorId(0), Rect::new(10, 10, 200, 200), 2);
        let screen = Rect::new(0, 0, 1920, 1080);
        set_fullscreen(&mut c, screen, true, false);
        assert_eq!(c.rect, screen);
        assert!(c.is_floating);

        set_fullscreen(&mut c, screen, false, false);
        assert_eq!(c.rect, Rect::new(10, 10, 200, 200));
        assert!(!c.is_floating);
    }

    #[test]
    fn fake_fullscreen_does_not_move_the_window() {
        let mut c = Client::new(Xid(1), MonitorId(0), Rect::new(10, 10, 200, 200), 2);
        set_fullscreen(&mut c, Rect::new(0, 0, 1920, 1080), true, true);
        assert_eq!(c.rect, Rect::new(10, 10, 200, 200));
        assert!(c.is_fullscreen);
        assert!(c.is_fake_fullscreen);
    }

    #[test]
    fn swap_client_exchanges_positions_without_changing_selection() {
        let (mut m, _clients) = mon_with(&[1, 2, 3]);
        m.sel = Some(Xid(3));
        swap_client(&mut m, Xid(1));
        assert_eq!(m.clients, vec![Xid(1), Xid(2), Xid(3)]);
        assert_eq!(m.sel, Some(Xid(3)));
    }
}
