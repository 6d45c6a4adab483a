//! The scratchpad: a reserved hidden tag used to stash a drop-down window
//! (spec.md §4.11, §3 "Scratchpad").
use crate::{client::Client, core::Xid, monitor::Monitor, tagset::TagMask};
use std::collections::HashMap;

/// Tracks "last shown" scratchpad client. spec.md §3: "exactly one client at
/// a time is tracked as 'last shown'."
#[derive(Debug, Clone, Copy, Default)]
pub struct ScratchpadState {
    tracked: Option<Xid>,
}

impl ScratchpadState {
    pub fn tracked(&self) -> Option<Xid> {
        self.tracked
    }

    /// `scratchpad_show`: promote the first scratchpad client to the current
    /// tag if there is no live tracked client, otherwise cycle to the next
    /// scratchpad client in `mon.clients` order (spec.md §4.11).
    pub fn show(&mut self, mon: &Monitor, clients: &mut HashMap<Xid, Client>) -> Option<Xid> {
        let on_scratchpad: Vec<Xid> = mon
            .clients
            .iter()
            .filter(|id| clients.get(id).map(|c| c.tags.contains(TagMask::SCRATCHPAD)).unwrap_or(false))
            .copied()
            .collect();
        if on_scratchpad.is_empty() {
            self.tracked = None;
            return None;
        }

        let alive = self.tracked.map(|t| on_scratchpad.contains(&t)).unwrap_or(false);
        let next = if !alive {
            on_scratchpad[0]
        } else {
            let pos = on_scratchpad.iter().position(|&id| Some(id) == self.tracked).unwrap();
            on_scratchpad[(pos + 1) % on_scratchpad.len()]
        };

        if let Some(c) = clients.get_mut(&next) {
            c.tags = mon.active_tags();
        }
        self.tracked = Some(next);
        Some(next)
    }

    /// `scratchpad_hide`: retag `client` to the scratchpad tag and float it.
    pub fn hide(&mut self, client: &mut Client) {
        client.tags = TagMask::SCRATCHPAD;
        client.is_floating = true;
        self.tracked = Some(client.id);
    }

    /// `scratchpad_remove`: forget the tracker (e.g. on destroy of the
    /// tracked client).
    pub fn remove(&mut self, client: Xid) {
        if self.tracked == Some(client) {
            self.tracked = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::Rect, monitor::MonitorId};

    fn mon_with_scratchpad(ids: &[u32]) -> (Monitor, HashMap<Xid, Client>) {
        let mut m = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 1920, 1080), 23, true);
        let mut clients = HashMap::new();
        for &id in ids {
            let mut c = Client::new(Xid(id), m.id, Rect::new(0, 0, 10, 10), 1);
            c.tags = TagMask::SCRATCHPAD;
            clients.insert(Xid(id), c);
            m.attach_bottom(Xid(id));
        }
        (m, clients)
    }

    #[test]
    fn show_promotes_first_client_when_nothing_tracked() {
        let (m, mut clients) = mon_with_scratchpad(&[1, 2]);
        let mut sp = ScratchpadState::default();
        let shown = sp.show(&m, &mut clients);
        assert_eq!(shown, Some(Xid(1)));
        assert_eq!(clients[&Xid(1)].tags, m.active_tags());
    }

    #[test]
    fn show_cycles_to_next_client_when_tracked_is_alive() {
        let (m, mut clients) = mon_with_scratchpad(&[1, 2, 3]);
        let mut sp = ScratchpadState::default();
        sp.show(&m, &mut clients);
        let second = sp.show(&m, &mut clients);
        assert_eq!(second, Some(Xid(2)));
    }

    #[test]
    fn hide_retags_to_scratchpad_and_floats() {
        let mut c = Client::new(Xid(1), MonitorId(0), Rect::new(0, 0, 10, 10), 1);
        c.tags = TagMask::nth(1);
        let mut sp = ScratchpadState::default();
        sp.hide(&mut c);
        assert_eq!(c.tags, TagMask::SCRATCHPAD);
        assert!(c.is_floating);
        assert_eq!(sp.tracked(), Some(Xid(1)));
    }
}
