//! The `Wm` context and its arrange/restack/focus primitives: a single
//! struct owning every piece of mutable state (clients, monitors, swallow
//! table, scratchpad, mark) and threaded explicitly through every handler,
//! rather than split across global singletons.
use crate::{
    alttab::AltTabState,
    client::Client,
    core::bindings::{KeyBindings, MouseBindings},
    core::config::Config,
    monitor::{Monitor, MonitorId},
    scratchpad::ScratchpadState,
    swallow::SwallowTable,
    tagset::TagMask,
    x::{PropCache, XConn, XEvent},
    Result,
};
use nix::sys::signal::{signal, SigHandler, Signal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Deref;
use tracing::{error, span, trace, Level};

pub mod bindings;
pub mod config;
pub mod handle;

/// An X11 resource id.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Xid(pub(crate) u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<Xid> for u32 {
    fn from(id: Xid) -> Self {
        id.0
    }
}

/// All mutable window-manager state, owned in one place and passed
/// explicitly to every handler.
pub struct Wm<X>
where
    X: XConn,
{
    pub x: X,
    pub config: Config<X>,

    pub clients: HashMap<Xid, Client>,
    pub monitors: Vec<Monitor>,
    pub sel_mon: usize,

    pub swallows: SwallowTable,
    pub scratchpad: ScratchpadState,
    /// The `setmark`/`swapfocus`/`swapclient`/`sendmon` target.
    pub mark: Option<Xid>,

    pub prop_cache: PropCache,
    /// The detected NumLock modifier bit, stripped from key matches
    /// alongside `LockMask`. Populated by `grab()`.
    pub numlock_mask: bindings::KeyCodeMask,

    pub alttab: Option<AltTabState>,
    pub running: bool,
    /// Set by the `quit` action to request re-exec with the session file
    /// written.
    pub restarting: bool,
    /// Tags restored from the session file, applied the first time each
    /// window reappears in a `MapRequest` after a restart. Stale ids with no
    /// matching window are silently skipped.
    pub pending_session: HashMap<Xid, TagMask>,

    key_bindings: KeyBindings<X>,
    mouse_bindings: MouseBindings<X>,
}

impl<X> Wm<X>
where
    X: XConn,
{
    pub fn new(config: Config<X>, key_bindings: KeyBindings<X>, mouse_bindings: MouseBindings<X>, x: X) -> Result<Self> {
        let rects = x.screen_rects()?;
        if rects.is_empty() {
            return Err(crate::Error::NoScreens);
        }

        let monitors = rects
            .into_iter()
            .enumerate()
            .map(|(i, screen)| {
                let mut m = Monitor::new(MonitorId(i), i, screen, config.bar_height, config.top_bar);
                m.show_bar = config.show_bar_by_default;
                m.mfact = config.mfact;
                m.nmaster = config.nmaster;
                m.gaps = config.gaps;
                for slot_idx in 0..=crate::tagset::NUM_TAGS {
                    let slot = m.pertag.slot_mut(slot_idx);
                    slot.nmaster = config.nmaster;
                    slot.mfact = config.mfact;
                    slot.showbar = config.show_bar_by_default;
                    crate::rules::apply_monitor_rules(&config.monitor_rules, i, slot_idx, slot);
                }
                m
            })
            .collect();

        Ok(Self {
            x,
            config,
            clients: HashMap::new(),
            monitors,
            sel_mon: 0,
            swallows: SwallowTable::default(),
            scratchpad: ScratchpadState::default(),
            mark: None,
            prop_cache: PropCache::default(),
            numlock_mask: 0,
            alttab: None,
            running: true,
            restarting: false,
            pending_session: HashMap::new(),
            key_bindings,
            mouse_bindings,
        })
    }

    pub fn selected_monitor(&self) -> &Monitor {
        &self.monitors[self.sel_mon]
    }

    pub fn selected_monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.sel_mon]
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.selected_monitor().sel.and_then(|id| self.clients.get(&id))
    }

    /// Recompute every visible client's geometry on `mon` from its layout
    /// and push the results through the `XConn`.
    pub fn arrange(&mut self, mon_id: MonitorId) -> Result<()> {
        let mi = mon_id.0;
        let active = self.monitors[mi].active_tags();
        let kind = self.monitors[mi].layout();
        let mfact = self.monitors[mi].mfact;
        let nmaster = self.monitors[mi].nmaster;
        let gaps = self.monitors[mi].gaps;
        let area = self.monitors[mi].usable;

        let tiled: Vec<Xid> = self.monitors[mi]
            .clients
            .iter()
            .copied()
            .filter(|id| {
                self.clients
                    .get(id)
                    .map(|c| c.is_visible_on(active) && !c.is_floating && !c.is_fullscreen)
                    .unwrap_or(false)
            })
            .collect();

        let cfacts: Vec<f64> = tiled.iter().map(|id| self.clients[id].cfact).collect();
        let honor_hints = self.config.resize_hints || kind.is_floating();

        if let Some(rects) = kind.arrange(area, &cfacts, mfact, nmaster, gaps) {
            for (id, rect) in tiled.iter().zip(rects) {
                self.resize_client(*id, rect, honor_hints, false)?;
            }
        }

        self.restack(mon_id)
    }

    /// Clamp `rect` against size hints (unless the client waives them) and
    /// push it to the server only if it actually changed.
    pub fn resize_client(&mut self, id: Xid, rect: crate::geometry::Rect, honor_hints: bool, interact: bool) -> Result<()> {
        let Some(client) = self.clients.get(&id) else { return Ok(()) };
        let mon = &self.monitors[client.monitor.0];

        let ctx = crate::geometry::HintContext {
            border_w: client.border_w,
            screen: mon.screen,
            monitor_area: mon.usable,
            bar_height: mon.bar.h,
            honor_hints: honor_hints || client.is_floating || client.is_fixed_size(),
        };

        let (resolved, changed) = crate::geometry::apply_size_hints(rect, client.rect, &client.hints, &ctx, interact);

        let client = self.clients.get_mut(&id).unwrap();
        client.rect = resolved;
        if changed {
            self.x.configure_window(id, resolved, client.border_w)?;
        }
        Ok(())
    }

    /// Rebuild the X stacking order for one monitor: floating/fullscreen
    /// clients above tiled ones, in `stack` (focus-history) order within
    /// each group.
    pub fn restack(&mut self, mon_id: MonitorId) -> Result<()> {
        let mon = &self.monitors[mon_id.0];
        let active = mon.active_tags();

        let mut floating = Vec::new();
        let mut tiled = Vec::new();
        for &id in &mon.stack {
            let Some(c) = self.clients.get(&id) else { continue };
            if !c.is_visible_on(active) {
                continue;
            }
            if c.is_floating || c.is_fullscreen {
                floating.push(id);
            } else {
                tiled.push(id);
            }
        }

        let mut order = floating;
        order.extend(tiled);
        if order.is_empty() {
            return Ok(());
        }
        self.x.restack(&order)
    }

    /// `focus(c)`: resolve and apply the new selection on the selected
    /// monitor, issuing `SetInputFocus`/`WM_TAKE_FOCUS` and border recolour.
    pub fn focus(&mut self, target: Option<Xid>) -> Result<()> {
        let mi = self.sel_mon;
        let (prev, new) = {
            let mon = &mut self.monitors[mi];
            crate::focus::focus(mon, &self.clients, target)
        };

        if prev == new {
            return Ok(());
        }

        if let Some(id) = prev {
            if self.clients.contains_key(&id) {
                self.x.set_border_color(id, self.border_color_for(id, false))?;
            }
        }

        if let Some(id) = new {
            self.x.set_border_color(id, self.border_color_for(id, true))?;
            self.x.set_input_focus(id)?;
            let wants_take_focus = self.clients.get(&id).map(|c| c.wants_take_focus).unwrap_or(false);
            if wants_take_focus {
                self.x.send_protocol_message(id, crate::x::Atom::WmTakeFocus)?;
            }
        } else {
            self.x.set_input_focus(self.x.root())?;
        }

        self.restack(MonitorId(mi))
    }

    /// The border color `id` should carry given whether it is the newly
    /// selected client: four schemes in total (normal, selected, marked,
    /// selected+marked) — the global mark gets its own color, brightened
    /// when it is also the focused client.
    fn border_color_for(&self, id: Xid, selected: bool) -> crate::Color {
        let marked = self.mark == Some(id);
        match (selected, marked) {
            (true, true) => self.config.selected_marked_border,
            (true, false) => self.config.focused_border,
            (false, true) => self.config.marked_border,
            (false, false) => self.config.normal_border,
        }
    }

    /// Set or clear the global mark, recoloring both the old and new marked
    /// client's border in place.
    pub fn set_mark(&mut self, target: Option<Xid>) -> Result<()> {
        let prev = self.mark;
        if prev == target {
            return Ok(());
        }
        self.mark = target;

        if let Some(id) = prev {
            if self.clients.contains_key(&id) {
                let selected = self.selected_client().map(|c| c.id) == Some(id);
                self.x.set_border_color(id, self.border_color_for(id, selected))?;
            }
        }
        if let Some(id) = target {
            if self.clients.contains_key(&id) {
                let selected = self.selected_client().map(|c| c.id) == Some(id);
                self.x.set_border_color(id, self.border_color_for(id, selected))?;
            }
        }
        Ok(())
    }

    /// Toggle the mark on `id`: clear it if already marked, else set it.
    pub fn toggle_mark(&mut self, id: Xid) -> Result<()> {
        if self.mark == Some(id) {
            self.set_mark(None)
        } else {
            self.set_mark(Some(id))
        }
    }

    /// Switch the selected monitor's active tag view, toggling bar mapping
    /// on a showbar transition.
    pub fn view(&mut self, mask: TagMask) -> Result<()> {
        let mi = self.sel_mon;
        // The bar's own window is owned and (un)mapped by an external
        // drawable capability; this just flips the flag it polls.
        let _bar_changed = self.monitors[mi].view(mask);
        let sel = self.monitors[mi].sel;
        self.focus(sel)?;
        self.arrange(MonitorId(mi))
    }

    /// Stop the event loop, writing every managed client's tags to the
    /// session file first when restarting.
    pub fn quit(&mut self, restart: bool) {
        if restart {
            if let Some(path) = self.config.session_file.clone() {
                let entries: Vec<_> = self
                    .clients
                    .values()
                    .map(|c| crate::session::SessionEntry { id: c.id, tags: c.tags })
                    .collect();
                if let Err(e) = crate::session::save(&path, &entries) {
                    error!(%e, "failed to write session file");
                }
            }
        }
        self.restarting = restart;
        self.running = false;
    }

    fn grab(&mut self) -> Result<()> {
        trace!("grabbing key and mouse bindings");
        let key_codes: Vec<_> = self.key_bindings.keys().copied().collect();
        let mouse_states: Vec<_> = self.mouse_bindings.keys().map(|(_, state)| state.clone()).collect();
        self.x.grab_keys(&key_codes)?;
        self.x.grab_buttons(&mouse_states)
    }

    /// Start the window manager and run until [`Wm::quit`] is called.
    pub fn run(mut self) -> Result<()> {
        trace!("registering SIGCHLD signal handler");
        if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) } {
            panic!("unable to set signal handler: {e}");
        }

        self.x.try_become_wm()?;
        self.grab()?;

        if let Some(path) = self.config.session_file.clone() {
            if path.exists() {
                match crate::session::load(&path) {
                    Ok(entries) => {
                        self.pending_session = entries.into_iter().map(|e| (e.id, e.tags)).collect();
                    }
                    Err(e) => error!(%e, "failed to load session file"),
                }
                if let Err(e) = crate::session::delete(&path) {
                    error!(%e, "failed to delete session file after restore");
                }
            }
        }

        crate::rules::run_autostart(&self.config.autostart);

        if let Some(mut hook) = self.config.startup_hook.take() {
            trace!("running user startup hook");
            if let Err(e) = hook(&mut self) {
                error!(%e, "error returned from user startup hook");
            }
            self.config.startup_hook = Some(hook);
        }

        for mon_id in (0..self.monitors.len()).map(MonitorId) {
            self.arrange(mon_id)?;
        }

        while self.running {
            match self.x.next_event() {
                Ok(event) => {
                    let span = span!(target: "dynwm", Level::DEBUG, "XEvent", %event);
                    let _enter = span.enter();
                    trace!(details = ?event, "event details");

                    if let Err(e) = self.handle_xevent(event) {
                        error!(%e, "error handling event");
                    }
                    self.x.flush();
                }
                Err(e) => error!(%e, "error pulling next X event"),
            }
        }

        Ok(())
    }

    fn handle_xevent(&mut self, event: XEvent) -> Result<()> {
        use XEvent::*;

        match event {
            ClientMessage { id, data_type, data } => handle::client_message(self, id, &data_type, &data)?,
            ConfigureNotify { is_root, .. } if is_root => handle::detect_screens(self)?,
            ConfigureNotify { .. } => {}
            ConfigureRequest { id, rect, border_w } => handle::configure_request(self, id, rect, border_w)?,
            Enter { id, abs } => handle::enter(self, id, abs)?,
            Expose { .. } => {}
            FocusIn(id) => handle::focus_in(self, id)?,
            Destroy(id) => handle::unmanage(self, id, true)?,
            KeyPress(code) => handle::key_press(self, code)?,
            KeyRelease(code) => handle::key_release(self, code)?,
            Leave { .. } => {}
            MappingNotify => {}
            MapRequest(id) => handle::map_request(self, id)?,
            MouseEvent(e) => handle::mouse_event(self, e)?,
            PropertyNotify { id, atom } => handle::property_notify(self, id, &atom)?,
            RandrNotify => handle::detect_screens(self)?,
            ScreenChange => handle::detect_screens(self)?,
            UnmapNotify { id, send_event } => handle::unmap_notify(self, id, send_event)?,
        }

        Ok(())
    }
}
