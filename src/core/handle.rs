//! The event dispatcher's per-event-type bodies: one free function per
//! `XEvent` variant, taking `&mut Wm<X>`. Being a child module of `core`,
//! these can reach `Wm`'s private fields directly.
use crate::{
    client::Client,
    core::{
        bindings::{resolve_key_binding, KeyCode, MouseEvent},
        Wm, Xid,
    },
    monitor::MonitorId,
    rules::{apply_rules, resolve_tags},
    signals::{parse_root_name, RootCommand},
    swallow,
    x::{Atom, WindowAttributes, XConn, XConnExt},
    Result,
};
use tracing::{debug, warn};

/// `manage(w)`: classify and attach a newly mapped window.
pub fn map_request<X: XConn>(wm: &mut Wm<X>, id: Xid) -> Result<()> {
    if wm.clients.contains_key(&id) {
        return Ok(());
    }

    wm.swallows.decay_by(1);

    let attrs: WindowAttributes = wm.x.window_attributes(id)?;
    if attrs.override_redirect {
        return Ok(());
    }

    let (class, instance, title) = wm.x.class_instance_title(id)?;
    let window_types = wm.x.get_window_type(id).unwrap_or_default();

    let mut mon_id = MonitorId(wm.sel_mon);
    let mut client = Client::new(id, mon_id, attrs.rect, wm.config.border_width);
    client.class = class.clone();
    client.instance = instance.clone();
    client.title = title.clone();
    client.hints = wm.x.get_size_hints(id).unwrap_or_default();
    let wm_hints = wm.x.get_wm_hints(id).unwrap_or_default();
    client.is_urgent = wm_hints.urgent;
    client.never_focus = wm_hints.never_focus;

    if let Ok(Some(parent)) = wm.x.get_transient_for(id) {
        if let Some(parent_c) = wm.clients.get(&parent) {
            client.is_floating = true;
            client.tags = parent_c.tags;
            client.monitor = parent_c.monitor;
            mon_id = parent_c.monitor;
        }
    }

    if window_types.iter().any(|t| crate::x::atom::AUTO_FLOAT_WINDOW_TYPES.contains(t)) {
        client.is_floating = true;
    }

    let protocols_supported = |atom: Atom| wm.x.supports_protocol(id, atom).unwrap_or(false);
    client.supports_delete = protocols_supported(Atom::WmDeleteWindow);
    client.wants_take_focus = protocols_supported(Atom::WmTakeFocus);

    let rule_match = apply_rules(&wm.config.rules, &class, &instance, &title);
    if let Some(m) = rule_match.monitor {
        mon_id = MonitorId(m);
    }
    client.monitor = mon_id;
    client.is_floating = client.is_floating || rule_match.floating;
    client.is_fake_fullscreen = rule_match.fake_fullscreen;
    if let Some(r) = rule_match.float_rect {
        client.rect = r;
        client.saved_float_rect = r;
    }

    let current_view = wm.monitors[mon_id.0].active_tags();
    client.tags = resolve_tags(rule_match.tags, current_view);

    // Swallow: does a registered filter match this new window?
    if let Some(swer) = wm.swallows.find_match(&class, &instance, &title) {
        wm.swallows.unregister(swer);
        wm.clients.insert(id, client);
        let mon = &mut wm.monitors[mon_id.0];
        let swer_rect = swallow::swal(&mut wm.clients, mon, swer, id);
        wm.x.configure_window(id, swer_rect, wm.config.border_width)?;
        wm.x.unmap_window(swer)?;
        wm.x.map_window(id)?;
        wm.focus(Some(id))?;
        return wm.arrange(mon_id);
    }

    if wm.config.attach_bottom {
        wm.monitors[mon_id.0].attach_bottom(id);
    } else {
        wm.monitors[mon_id.0].attach(id);
    }
    wm.monitors[mon_id.0].push_stack_front(id);
    wm.clients.insert(id, client);

    wm.x.configure_window(id, wm.clients[&id].rect, wm.config.border_width)?;
    wm.x.set_border_color(id, wm.config.normal_border)?;
    wm.x.map_window(id)?;

    if let Some(tags) = wm.pending_session.remove(&id) {
        wm.clients.get_mut(&id).unwrap().tags = tags;
    }

    wm.focus(Some(id))?;
    wm.arrange(mon_id)
}

/// `unmanage(c)`: detach and drop a client, resolving any swallow chain it
/// is party to.
pub fn unmanage<X: XConn>(wm: &mut Wm<X>, id: Xid, destroyed: bool) -> Result<()> {
    let Some(client) = wm.clients.get(&id).cloned() else { return Ok(()) };
    let mon_id = client.monitor;

    wm.scratchpad.remove(id);

    // If this client swallows another, splice the parent back in and remap
    // it — unconditionally, since `destroyed` only governs whether *this*
    // client's own withdrawal is graceful, not whether the swallower
    // reappears.
    if let Some(reattached) = swallow::swal_stop(&mut wm.clients, &mut wm.monitors[mon_id.0], id) {
        wm.x.map_window(reattached)?;
    } else {
        wm.monitors[mon_id.0].detach(id);
    }
    swallow::cut_from_chain(&mut wm.clients, id);
    wm.clients.remove(&id);

    if wm.mark == Some(id) {
        wm.mark = None;
    }
    wm.prop_cache.invalidate(id);

    let sel = wm.monitors[mon_id.0].sel;
    wm.focus(sel)?;
    wm.arrange(mon_id)
}

pub fn unmap_notify<X: XConn>(wm: &mut Wm<X>, id: Xid, send_event: bool) -> Result<()> {
    if !send_event && !wm.clients.contains_key(&id) {
        return Ok(());
    }
    unmanage(wm, id, false)
}

/// `configurerequest`: honour a client's requested geometry unless it is
/// tiled and the layout has an arrange function; a tiled client only gets a
/// synthetic acknowledgement instead.
pub fn configure_request<X: XConn>(wm: &mut Wm<X>, id: Xid, rect: crate::geometry::Rect, border_w: i32) -> Result<()> {
    let Some(client) = wm.clients.get(&id) else {
        return wm.x.configure_window(id, rect, border_w);
    };

    // A swallower shell is never resized by the real client it has hidden.
    if wm.clients.values().any(|c| c.swallowed_by == Some(id)) {
        return wm.x.configure_window(id, client.rect, client.border_w);
    }

    let layout_arranges = !wm.monitors[client.monitor.0].layout().is_floating();
    if client.is_floating || !layout_arranges {
        wm.resize_client(id, rect, true, false)?;
    } else {
        wm.x.configure_window(id, client.rect, client.border_w)?;
    }
    Ok(())
}

pub fn detect_screens<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let rects = wm.x.screen_rects()?;
    for (i, rect) in rects.iter().enumerate() {
        if let Some(mon) = wm.monitors.get_mut(i) {
            mon.screen = *rect;
        }
    }
    for mon_id in (0..wm.monitors.len()).map(MonitorId) {
        wm.arrange(mon_id)?;
    }
    Ok(())
}

pub fn client_message<X: XConn>(wm: &mut Wm<X>, id: Xid, data_type: &str, data: &[u32]) -> Result<()> {
    if data_type == "_NET_WM_STATE" && wm.clients.contains_key(&id) {
        let fullscreen_requested = data.get(1).copied() == Some(1) || data.get(2).copied() == Some(1);
        let add = data.first().copied() == Some(1);
        let toggle = data.first().copied() == Some(2);
        if fullscreen_requested {
            let mon_id = wm.clients[&id].monitor;
            let sel = wm.monitors[mon_id.0].sel;
            if !wm.config.lock_fullscreen || sel == Some(id) {
                let want = if toggle { !wm.clients[&id].is_fullscreen } else { add };
                let screen = wm.monitors[mon_id.0].screen;
                let fake = wm.clients[&id].is_fake_fullscreen;
                let c = wm.clients.get_mut(&id).unwrap();
                crate::focus::set_fullscreen(c, screen, want, fake);
                wm.arrange(mon_id)?;
            }
        }
    }

    Ok(())
}

/// Parse a `strtoul`-style window id argument (decimal, or `0x`-prefixed
/// hex as dwm's `fakesignal` accepts via `strtoul(s, NULL, 0)`).
fn parse_xid(s: &str) -> Option<Xid> {
    let s = s.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    u32::from_str_radix(digits, radix).ok().map(Xid)
}

/// Dispatch a decoded root-name command. `fsignal:<n>` looks up the user's
/// `config.signals` table; the named `#!cmd###args` form takes window-id
/// arguments addressing specific clients, the same way dwm's `fakesignal`
/// does (`swalreg`: windowid,[class],[instance],[title]; `swal`: swallower's
/// windowid, swallowee's windowid; `swalunreg`: swallower's windowid;
/// `swalstop`: swallowee's windowid).
fn run_root_command<X: XConn>(wm: &mut Wm<X>, cmd: RootCommand) -> Result<()> {
    match cmd {
        RootCommand::Signal(n) => {
            debug!(signal = n, "received fsignal command");
            let mut signals = std::mem::take(&mut wm.config.signals);
            if let Some(handler) = signals.get_mut(&n) {
                if let Err(e) = handler(wm) {
                    warn!(%e, signal = n, "fsignal handler returned an error");
                }
            }
            wm.config.signals = signals;
        }
        RootCommand::Named { cmd, args } => {
            debug!(cmd = %cmd, ?args, "received named root command");
            match cmd.as_str() {
                "swalreg" => {
                    if let Some(target) = args.first().and_then(|a| parse_xid(a)) {
                        if wm.clients.contains_key(&target) {
                            let class = args.get(1).cloned().unwrap_or_default();
                            let instance = args.get(2).cloned().unwrap_or_default();
                            let title = args.get(3).cloned().unwrap_or_default();
                            wm.swallows.register(target, class, instance, title, wm.config.swallow_decay);
                        }
                    }
                }
                "swal" => {
                    let swer = args.first().and_then(|a| parse_xid(a));
                    let swee = args.get(1).and_then(|a| parse_xid(a));
                    if let (Some(swer), Some(swee)) = (swer, swee) {
                        if swer != swee && wm.clients.contains_key(&swer) && wm.clients.contains_key(&swee) {
                            wm.swallows.unregister(swer);
                            let mon_id = wm.clients[&swer].monitor;
                            let swee_mon = wm.clients[&swee].monitor;
                            if swee_mon != mon_id {
                                wm.monitors[swee_mon.0].detach(swee);
                                wm.clients.get_mut(&swee).unwrap().monitor = mon_id;
                            }
                            wm.monitors[mon_id.0].detach(swee);
                            let mon = &mut wm.monitors[mon_id.0];
                            let swer_rect = swallow::swal(&mut wm.clients, mon, swer, swee);
                            wm.x.configure_window(swee, swer_rect, wm.config.border_width)?;
                            wm.x.unmap_window(swer)?;
                            let sel = wm.monitors[mon_id.0].sel;
                            wm.focus(sel)?;
                            wm.arrange(mon_id)?;
                        }
                    }
                }
                "swalunreg" => {
                    if let Some(target) = args.first().and_then(|a| parse_xid(a)) {
                        wm.swallows.unregister(target);
                    }
                }
                "swalstop" => {
                    if let Some(swee) = args.first().and_then(|a| parse_xid(a)) {
                        if let Some(mon_id) = wm.clients.get(&swee).map(|c| c.monitor) {
                            if let Some(reattached) = swallow::swal_stop(&mut wm.clients, &mut wm.monitors[mon_id.0], swee) {
                                wm.x.map_window(reattached)?;
                            }
                            wm.arrange(mon_id)?;
                        }
                    }
                }
                other => warn!(cmd = other, "unrecognised named root command"),
            }
        }
    }
    Ok(())
}

pub fn key_press<X: XConn>(wm: &mut Wm<X>, code: KeyCode) -> Result<()> {
    let numlock_mask = wm.numlock_mask;
    let mut bindings = std::mem::take(&mut wm.key_bindings);
    if let Some(handler) = resolve_key_binding(&mut bindings, code, numlock_mask) {
        if let Err(e) = handler(wm) {
            warn!(%e, "key binding handler returned an error");
        }
    }
    wm.key_bindings = bindings;
    Ok(())
}

/// A key release while an alt-tab cycle is active ends it: ungrab the
/// keyboard, rotate the snapshot so the highlighted client leads, and
/// refocus. Releases seen outside a cycle (`wm.alttab` is `None`) are
/// ignored, since only the grabbed keyboard delivers them in the first
/// place.
pub fn key_release<X: XConn>(wm: &mut Wm<X>, _code: KeyCode) -> Result<()> {
    let Some(state) = wm.alttab.take() else { return Ok(()) };
    wm.x.ungrab_keyboard()?;
    let mi = wm.sel_mon;
    state.finalize(&mut wm.monitors[mi]);
    let sel = wm.monitors[mi].sel;
    wm.focus(sel)
}

pub fn mouse_event<X: XConn>(wm: &mut Wm<X>, ev: MouseEvent) -> Result<()> {
    let key = (ev.kind, ev.state.clone());
    let mut bindings = std::mem::take(&mut wm.mouse_bindings);
    if let Some(handler) = bindings.get_mut(&key) {
        if let Err(e) = handler(wm, &ev) {
            warn!(%e, "mouse binding handler returned an error");
        }
    }
    wm.mouse_bindings = bindings;
    Ok(())
}

pub fn enter<X: XConn>(wm: &mut Wm<X>, id: Xid, _abs: crate::geometry::Point) -> Result<()> {
    if !wm.config.focus_follow_mouse {
        return Ok(());
    }
    if let Some(c) = wm.clients.get(&id) {
        wm.sel_mon = c.monitor.0;
    }
    wm.focus(Some(id))
}

pub fn focus_in<X: XConn>(wm: &mut Wm<X>, id: Xid) -> Result<()> {
    // Re-assert input focus if some other window stole it without our
    // involvement.
    let sel = wm.selected_monitor().sel;
    if sel != Some(id) {
        if let Some(sel_id) = sel {
            wm.x.set_input_focus(sel_id)?;
        }
    }
    Ok(())
}

/// `PropertyNotify` on `WM_HINTS`/`WM_NAME`/`_NET_WM_NAME`: refresh cached
/// properties and retry swallow matching retroactively if the config
/// enables it. A `WM_NAME`/`_NET_WM_NAME` change on the root window itself
/// is the fake-signal/`#!` control-plane channel (spec.md §4.5/§6) rather
/// than a title update for some client. The server delivers a root rename
/// as a `PropertyNotify`, never a `ClientMessage`, so it is decoded here,
/// ahead of the client-only early return below.
pub fn property_notify<X: XConn>(wm: &mut Wm<X>, id: Xid, atom: &str) -> Result<()> {
    if id == wm.x.root() && matches!(atom, "WM_NAME" | "_NET_WM_NAME") {
        let name = wm.x.get_root_name().unwrap_or_default();
        return match parse_root_name(&name) {
            Some(cmd) => run_root_command(wm, cmd),
            None => Ok(()),
        };
    }

    wm.prop_cache.invalidate(id);
    if !wm.clients.contains_key(&id) {
        return Ok(());
    }

    match atom {
        "WM_NAME" | "_NET_WM_NAME" => {
            if let Ok(title) = wm.x.get_window_title(id) {
                wm.clients.get_mut(&id).unwrap().title = title;
            }
        }
        "WM_HINTS" => {
            if let Ok(hints) = wm.x.get_wm_hints(id) {
                let c = wm.clients.get_mut(&id).unwrap();
                c.is_urgent = hints.urgent;
                c.never_focus = hints.never_focus;
            }
        }
        _ => return Ok(()),
    }

    if wm.config.retroactive_swallow {
        let (class, instance, title) = {
            let c = &wm.clients[&id];
            (c.class.clone(), c.instance.clone(), c.title.clone())
        };
        if let Some(swer) = wm.swallows.find_match(&class, &instance, &title) {
            wm.swallows.unregister(swer);
            let mon_id = wm.clients[&id].monitor;
            let mon = &mut wm.monitors[mon_id.0];
            let swer_rect = swallow::swal(&mut wm.clients, mon, swer, id);
            wm.x.configure_window(id, swer_rect, wm.config.border_width)?;
            wm.x.unmap_window(swer)?;
        }
    }

    Ok(())
}
