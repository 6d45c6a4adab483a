//! The swallow engine: when a terminal spawns a GUI app and the app's window
//! maps, the app swallows the terminal's slot and the terminal is hidden
//! behind it until the app exits. Swallowers are ordinary entries in the
//! central client table, chained through `Client::swallowed_by` and addressed
//! by `Xid` rather than boxed pointers, so a chain several levels deep is
//! just a walk through the table.
use crate::{client::Client, core::Xid, monitor::Monitor, tagset::TagMask};
use std::collections::HashMap;

pub const DEFAULT_DECAY: i32 = 3;

/// A registered swallow filter. Created by `swalreg`; consumed by a matching
/// `MapRequest` via `swal`.
#[derive(Debug, Clone)]
pub struct SwallowEntry {
    pub target: Xid,
    pub class: String,
    pub instance: String,
    pub title: String,
    pub decay: i32,
}

impl SwallowEntry {
    /// An entry matches iff each non-empty filter is a substring of the
    /// corresponding property; an empty filter matches anything.
    pub fn matches(&self, class: &str, instance: &str, title: &str) -> bool {
        (self.class.is_empty() || class.contains(&self.class))
            && (self.instance.is_empty() || instance.contains(&self.instance))
            && (self.title.is_empty() || title.contains(&self.title))
    }
}

/// The registration table. At most one entry per target client, enforced
/// by keying on `target`.
#[derive(Debug, Clone, Default)]
pub struct SwallowTable {
    entries: HashMap<Xid, SwallowEntry>,
}

impl SwallowTable {
    /// `swalreg`: (re-)register a filter for `target`, resetting its decay
    /// to `initial_decay`.
    pub fn register(&mut self, target: Xid, class: String, instance: String, title: String, initial_decay: i32) {
        self.entries.insert(
            target,
            SwallowEntry { target, class, instance, title, decay: initial_decay },
        );
    }

    pub fn unregister(&mut self, target: Xid) -> Option<SwallowEntry> {
        self.entries.remove(&target)
    }

    /// `swalmatch`: first entry whose filters match the given properties.
    pub fn find_match(&self, class: &str, instance: &str, title: &str) -> Option<Xid> {
        self.entries
            .values()
            .find(|e| e.matches(class, instance, title))
            .map(|e| e.target)
    }

    /// `swaldecayby(k)`: decrement every entry's decay; drop those `< 0`.
    /// Called once per `MapRequest` so entries expire if they fail to match
    /// within `k` subsequent maps: an entry of initial decay `k` survives
    /// exactly `k` decrements (reaching zero) and is dropped on the `k+1`th,
    /// i.e. after `k+1` MapRequests with no match the entry is gone.
    pub fn decay_by(&mut self, k: i32) {
        self.entries.retain(|_, e| {
            e.decay -= k;
            e.decay >= 0
        });
    }

    pub fn entry(&self, target: Xid) -> Option<&SwallowEntry> {
        self.entries.get(&target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `swal(swer, swee, ...)`: splice the swallowee into the swallower's
/// position in `clients`/`stack`, transfer tags and floating state, and
/// chain the swallower onto the swallowee's tail.
///
/// Returns the swallower's prior geometry so the caller can resize `swee`
/// to it and unmap `swer` (both require the `XConn` boundary).
pub fn swal(clients: &mut HashMap<Xid, Client>, mon: &mut Monitor, swer: Xid, swee: Xid) -> crate::geometry::Rect {
    let (swer_rect, swer_tags, swer_floating, swer_idx_clients, swer_idx_stack) = {
        let swer_c = clients.get(&swer).expect("swer must be managed before swal");
        let idx_clients = mon.clients.iter().position(|&c| c == swer);
        let idx_stack = mon.stack.iter().position(|&c| c == swer);
        (swer_c.rect, swer_c.tags, swer_c.is_floating, idx_clients, idx_stack)
    };

    if let Some(swee_c) = clients.get_mut(&swee) {
        swee_c.is_fullscreen = false;
        swee_c.tags = swer_tags;
        swee_c.is_floating = swer_floating;
    }
    if let Some(swer_c) = clients.get_mut(&swer) {
        swer_c.is_fullscreen = false;
    }

    if let Some(i) = swer_idx_clients {
        mon.clients[i] = swee;
    } else if !mon.clients.contains(&swee) {
        mon.clients.push(swee);
    }
    if let Some(i) = swer_idx_stack {
        mon.stack[i] = swee;
    } else if !mon.stack.contains(&swee) {
        mon.stack.insert(0, swee);
    }
    if mon.sel == Some(swer) {
        mon.sel = Some(swee);
    }

    // Append swer to the tail of swee's existing chain.
    let mut tail = swee;
    while let Some(next) = clients.get(&tail).and_then(|c| c.swallowed_by) {
        tail = next;
    }
    if let Some(tail_c) = clients.get_mut(&tail) {
        tail_c.swallowed_by = Some(swer);
    }

    swer_rect
}

/// `swalstop(swee)`: reverse one link in the chain, re-attaching the direct
/// parent swallower in place of `swee` and handing the chain tail back to
/// `swee`.
///
/// Returns the re-attached swallower's id, if any, for the caller to remap.
pub fn swal_stop(clients: &mut HashMap<Xid, Client>, mon: &mut Monitor, swee: Xid) -> Option<Xid> {
    let swer = clients.get(&swee)?.swallowed_by?;

    let (swee_tags, swee_idx_clients, swee_idx_stack) = {
        let swee_c = clients.get(&swee).unwrap();
        let idx_clients = mon.clients.iter().position(|&c| c == swee);
        let idx_stack = mon.stack.iter().position(|&c| c == swee);
        (swee_c.tags, idx_clients, idx_stack)
    };

    if let Some(swer_c) = clients.get_mut(&swer) {
        swer_c.tags = swee_tags;
        swer_c.swallowed_by = None;
    }
    if let Some(swee_c) = clients.get_mut(&swee) {
        swee_c.swallowed_by = None;
    }

    if let Some(i) = swee_idx_clients {
        mon.clients[i] = swer;
    }
    if let Some(i) = swee_idx_stack {
        mon.stack[i] = swer;
    }
    if mon.sel == Some(swee) {
        mon.sel = Some(swer);
    }

    Some(swer)
}

/// Chain surgery for `destroynotify` on a swallower that is not the direct
/// parent of a live swallowee: cut it out of the chain, freeing its shell
/// only.
///
/// `dying` must currently be referenced by exactly one other client's
/// `swallowed_by`. Re-links that client onto whatever `dying` itself was
/// swallowing (or clears the link if `dying` was chain root).
pub fn cut_from_chain(clients: &mut HashMap<Xid, Client>, dying: Xid) {
    let grandparent = clients.get(&dying).and_then(|c| c.swallowed_by);
    let child = clients
        .iter()
        .find(|(_, c)| c.swallowed_by == Some(dying))
        .map(|(id, _)| *id);

    if let Some(child_id) = child {
        if let Some(child_c) = clients.get_mut(&child_id) {
            child_c.swallowed_by = grandparent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Rect, monitor::MonitorId};

    fn mon() -> Monitor {
        Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 1920, 1080), 23, true)
    }

    #[test]
    fn filters_match_as_substrings_and_empty_matches_anything() {
        let e = SwallowEntry {
            target: Xid(1),
            class: "Term".into(),
            instance: String::new(),
            title: String::new(),
            decay: DEFAULT_DECAY,
        };
        assert!(e.matches("XTerm-Term", "anything", "anything"));
        assert!(!e.matches("Firefox", "anything", "anything"));
    }

    #[test]
    fn decay_expires_after_k_plus_one_rounds() {
        let mut t = SwallowTable::default();
        t.register(Xid(1), String::new(), String::new(), "Never".into(), DEFAULT_DECAY);
        for _ in 0..3 {
            t.decay_by(1);
        }
        assert!(t.entry(Xid(1)).is_some());
        t.decay_by(1);
        assert!(t.entry(Xid(1)).is_none());
    }

    #[test]
    fn swal_splices_swee_into_swers_slot_and_chains_it() {
        let mut clients = HashMap::new();
        let mut m = mon();
        let mut swer = Client::new(Xid(1), m.id, Rect::new(10, 10, 100, 100), 1);
        swer.tags = TagMask::nth(1);
        clients.insert(Xid(1), swer);
        clients.insert(Xid(2), Client::new(Xid(2), m.id, Rect::new(0, 0, 10, 10), 1));
        m.attach(Xid(1));
        m.push_stack_front(Xid(1));
        m.sel = Some(Xid(1));

        let swer_rect = swal(&mut clients, &mut m, Xid(1), Xid(2));

        assert_eq!(swer_rect, Rect::new(10, 10, 100, 100));
        assert_eq!(m.clients, vec![Xid(2)]);
        assert_eq!(m.sel, Some(Xid(2)));
        assert_eq!(clients[&Xid(2)].swallowed_by, Some(Xid(1)));
        assert_eq!(clients[&Xid(2)].tags, TagMask::nth(1));
    }

    #[test]
    fn swal_stop_round_trips() {
        let mut clients = HashMap::new();
        let mut m = mon();
        let mut swer = Client::new(Xid(1), m.id, Rect::new(10, 10, 100, 100), 1);
        swer.tags = TagMask::nth(3);
        clients.insert(Xid(1), swer);
        clients.insert(Xid(2), Client::new(Xid(2), m.id, Rect::new(0, 0, 10, 10), 1));
        m.attach(Xid(1));
        m.push_stack_front(Xid(1));
        m.sel = Some(Xid(1));

        swal(&mut clients, &mut m, Xid(1), Xid(2));
        let restored = swal_stop(&mut clients, &mut m, Xid(2)).unwrap();

        assert_eq!(restored, Xid(1));
        assert_eq!(m.clients, vec![Xid(1)]);
        assert_eq!(clients[&Xid(1)].tags, TagMask::nth(3));
        assert_eq!(clients[&Xid(1)].swallowed_by, None);
        assert_eq!(clients[&Xid(2)].swallowed_by, None);
    }

    #[test]
    fn cutting_mid_chain_swallower_preserves_the_rest_of_the_chain() {
        let mut clients = HashMap::new();
        clients.insert(Xid(1), Client::new(Xid(1), MonitorId(0), Rect::new(0, 0, 1, 1), 1));
        let mut mid = Client::new(Xid(2), MonitorId(0), Rect::new(0, 0, 1, 1), 1);
        mid.swallowed_by = Some(Xid(1));
        clients.insert(Xid(2), mid);
        let mut swee = Client::new(Xid(3), MonitorId(0), Rect::new(0, 0, 1, 1), 1);
        swee.swallowed_by = Some(Xid(2));
        clients.insert(Xid(3), swee);

        cut_from_chain(&mut clients, Xid(2));

        assert_eq!(clients[&Xid(3)].swallowed_by, Some(Xid(1)));
    }
}
