//! Bindable operations: free functions taking `&mut Wm<X>` that the default
//! keymap binds directly, rather than methods on the manager itself, so a
//! user's own config can mix these with its own closures in the same table.
use crate::{
    core::{
        bindings::{MouseEvent, MouseEventKind},
        Wm,
    },
    monitor::MonitorId,
    tagset::TagMask,
    x::XConn,
    Result, Xid,
};

/// `spawn(cmd, args)`: launch a program without blocking the event loop.
pub fn spawn<X: XConn>(_wm: &mut Wm<X>, program: &str, args: &[String]) -> Result<()> {
    crate::rules::spawn(program, args)
}

/// `killclient`: request ICCCM deletion if supported, else force-destroy.
pub fn kill_client<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let Some(c) = wm.selected_client() else { return Ok(()) };
    let id = c.id;
    if c.supports_delete {
        wm.x.send_protocol_message(id, crate::x::Atom::WmDeleteWindow)
    } else {
        wm.x.kill_window(id)
    }
}

/// `togglefloating`: flip the selected client's floating flag and rearrange.
/// Refuses on a real (non-fake) fullscreen client, matching dwm.
pub fn toggle_floating<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let mi = wm.sel_mon;
    let Some(id) = wm.selected_client().map(|c| c.id) else { return Ok(()) };
    let c = wm.clients.get_mut(&id).unwrap();
    if c.is_fullscreen && !c.is_fake_fullscreen {
        return Ok(());
    }
    c.is_floating = !c.is_floating;
    if c.is_floating {
        c.rect = c.saved_float_rect;
    } else {
        c.saved_float_rect = c.rect;
    }
    wm.arrange(MonitorId(mi))
}

/// `togglefullscreen`: toggle real fullscreen on the selected client.
pub fn toggle_fullscreen<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let mi = wm.sel_mon;
    let Some(id) = wm.selected_client().map(|c| c.id) else { return Ok(()) };
    let screen = wm.monitors[mi].screen;
    let fake = wm.clients[&id].is_fake_fullscreen;
    let want = !wm.clients[&id].is_fullscreen;
    let c = wm.clients.get_mut(&id).unwrap();
    crate::focus::set_fullscreen(c, screen, want, fake);
    wm.arrange(MonitorId(mi))
}

/// `focusstack(dir)`: move the selection by `dir` through tile order.
pub fn focus_stack<X: XConn>(wm: &mut Wm<X>, dir: i32) -> Result<()> {
    let mi = wm.sel_mon;
    let next = crate::focus::focus_stack(&wm.monitors[mi], &wm.clients, dir, wm.config.lock_fullscreen);
    wm.focus(next)
}

/// `view(mask)`: switch the selected monitor's visible tag set.
pub fn view<X: XConn>(wm: &mut Wm<X>, mask: TagMask) -> Result<()> {
    wm.view(mask)
}

/// `toggleview(mask)`: XOR `mask` into the active view, falling back to tag
/// 1 if the result would be empty, so a monitor is never left with nothing
/// shown.
pub fn toggle_view<X: XConn>(wm: &mut Wm<X>, mask: TagMask) -> Result<()> {
    let mi = wm.sel_mon;
    let toggled = wm.monitors[mi].active_tags() ^ mask;
    let next = if toggled.is_empty() { TagMask::nth(1) } else { toggled };
    wm.view(next)
}

/// `tag(mask)`: move the selected client onto `mask` and rearrange.
pub fn tag<X: XConn>(wm: &mut Wm<X>, mask: TagMask) -> Result<()> {
    let mi = wm.sel_mon;
    let Some(id) = wm.selected_client().map(|c| c.id) else { return Ok(()) };
    wm.clients.get_mut(&id).unwrap().tags = mask;
    wm.focus(None)?;
    wm.arrange(MonitorId(mi))
}

/// `toggletag(mask)`: XOR `mask` into the selected client's tags, refusing
/// to leave it with no tags at all.
pub fn toggle_tag<X: XConn>(wm: &mut Wm<X>, mask: TagMask) -> Result<()> {
    let mi = wm.sel_mon;
    let Some(id) = wm.selected_client().map(|c| c.id) else { return Ok(()) };
    let c = wm.clients.get_mut(&id).unwrap();
    let toggled = c.tags ^ mask;
    if toggled.is_empty() {
        return Ok(());
    }
    c.tags = toggled;
    wm.focus(None)?;
    wm.arrange(MonitorId(mi))
}

/// `setmfact(delta)`: adjust the master-area fraction, clamped to
/// `[0.05, 0.95]` as in dwm, and persist it to the active pertag slot.
pub fn set_mfact<X: XConn>(wm: &mut Wm<X>, delta: f64) -> Result<()> {
    let mi = wm.sel_mon;
    let mon = &mut wm.monitors[mi];
    mon.mfact = (mon.mfact + delta).clamp(0.05, 0.95);
    mon.save_pertag();
    wm.arrange(MonitorId(mi))
}

/// `incnmaster(delta)`: grow or shrink the master-area client count, never
/// below zero.
pub fn inc_nmaster<X: XConn>(wm: &mut Wm<X>, delta: i32) -> Result<()> {
    let mi = wm.sel_mon;
    let mon = &mut wm.monitors[mi];
    mon.nmaster = (mon.nmaster as i32 + delta).max(0) as usize;
    mon.save_pertag();
    wm.arrange(MonitorId(mi))
}

/// `setlayout(kind)`: install `kind` in the active layout slot.
pub fn set_layout<X: XConn>(wm: &mut Wm<X>, kind: crate::layout::LayoutKind) -> Result<()> {
    let mi = wm.sel_mon;
    wm.monitors[mi].set_layout(kind);
    wm.monitors[mi].save_pertag();
    wm.arrange(MonitorId(mi))
}

/// `layoutmenu`: run an external picker and apply whatever layout it prints
/// by index, in the order [`ALL_LAYOUTS`] lists.
/// Blocks on the picker's output the same way `move_mouse`/`resize_mouse`
/// block on their own event pump — there is no other client to service while
/// the user is choosing.
pub fn layout_menu<X: XConn>(wm: &mut Wm<X>, program: &str, args: &[String]) -> Result<()> {
    use crate::layout::kind::ALL_LAYOUTS;
    use std::process::{Command, Stdio};

    let output = Command::new(program).args(args).stdout(Stdio::piped()).output();
    let Ok(output) = output else { return Ok(()) };
    let Ok(choice) = String::from_utf8_lossy(&output.stdout).trim().parse::<usize>() else {
        return Ok(());
    };
    let Some(kind) = ALL_LAYOUTS.get(choice).copied() else {
        return Ok(());
    };
    set_layout(wm, kind)
}

/// `toggle_layout`: swap between the two remembered layout slots.
pub fn toggle_layout<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let mi = wm.sel_mon;
    wm.monitors[mi].toggle_layout();
    wm.monitors[mi].save_pertag();
    wm.arrange(MonitorId(mi))
}

/// `setcfact(delta)`: adjust the selected client's per-client weight.
pub fn adjust_cfact<X: XConn>(wm: &mut Wm<X>, delta: f64) -> Result<()> {
    let mi = wm.sel_mon;
    let Some(id) = wm.selected_client().map(|c| c.id) else { return Ok(()) };
    wm.clients.get_mut(&id).unwrap().adjust_cfact(delta);
    wm.arrange(MonitorId(mi))
}

/// `zoom`: promote the selected client to the master slot (or, if it
/// already is the master, swap it with the next tiled client), matching
/// dwm's single-binding "zoom" behaviour.
pub fn zoom<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let mi = wm.sel_mon;
    let Some(sel) = wm.monitors[mi].sel else { return Ok(()) };
    if wm.clients.get(&sel).map(|c| c.is_floating).unwrap_or(true) {
        return Ok(());
    }

    let mon = &mut wm.monitors[mi];
    let active = mon.active_tags();
    let tiled: Vec<Xid> = mon
        .clients
        .iter()
        .copied()
        .filter(|id| wm.clients.get(id).map(|c| c.is_visible_on(active) && !c.is_floating).unwrap_or(false))
        .collect();
    if tiled.len() < 2 || tiled[0] == sel {
        // Already master (or nothing to zoom): cycle to the next tiled client.
        if let Some(next) = tiled.get(1).copied() {
            let pos = mon.clients.iter().position(|&c| c == sel).unwrap();
            let next_pos = mon.clients.iter().position(|&c| c == next).unwrap();
            mon.clients.swap(pos, next_pos);
        }
    } else {
        let pos = mon.clients.iter().position(|&c| c == sel).unwrap();
        let head_pos = mon.clients.iter().position(|&c| c == tiled[0]).unwrap();
        mon.clients.swap(pos, head_pos);
    }
    wm.arrange(MonitorId(mi))
}

/// `swapfocus`: toggle selection between the current client and the mark.
pub fn swap_focus<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let mi = wm.sel_mon;
    let next = crate::focus::swap_focus(&wm.monitors[mi], wm.mark);
    wm.focus(next)
}

/// `swapclient`: swap the tile positions of the selected client and the
/// mark without moving the selection.
pub fn swap_client<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let Some(mark) = wm.mark else { return Ok(()) };
    let mi = wm.sel_mon;
    crate::focus::swap_client(&mut wm.monitors[mi], mark);
    wm.arrange(MonitorId(mi))
}

/// `setmark`: mark (or re-mark) the selected client.
pub fn set_mark<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let target = wm.selected_client().map(|c| c.id);
    wm.set_mark(target)
}

/// `togglemark`: clear the mark if it is the selected client, else set it.
pub fn toggle_mark<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let Some(id) = wm.selected_client().map(|c| c.id) else { return Ok(()) };
    wm.toggle_mark(id)
}

/// `togglescratch`: show/cycle the scratchpad client onto the active view.
pub fn scratchpad_show<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let mi = wm.sel_mon;
    let mon = &wm.monitors[mi];
    let shown = wm.scratchpad.show(mon, &mut wm.clients);
    wm.focus(shown)?;
    wm.arrange(MonitorId(mi))
}

/// `hidescratch`: retag the selected client onto the scratchpad and float it.
pub fn scratchpad_hide<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    let mi = wm.sel_mon;
    let Some(id) = wm.selected_client().map(|c| c.id) else { return Ok(()) };
    wm.scratchpad.hide(wm.clients.get_mut(&id).unwrap());
    wm.focus(None)?;
    wm.arrange(MonitorId(mi))
}

/// `dirtomon(dir)`: the monitor index reached by stepping `dir` from the
/// selected monitor.
pub fn dir_to_mon<X: XConn>(wm: &Wm<X>, dir: i32) -> usize {
    crate::focus::dir_to_mon(&wm.monitors, wm.sel_mon, dir)
}

/// `focusmon(dir)`: switch the selected monitor.
pub fn focus_mon<X: XConn>(wm: &mut Wm<X>, dir: i32) -> Result<()> {
    let dest = dir_to_mon(wm, dir);
    if dest == wm.sel_mon {
        return Ok(());
    }
    wm.sel_mon = dest;
    let sel = wm.monitors[dest].sel;
    wm.focus(sel)
}

/// `tagmon(dir)`: move the selected client to the adjacent monitor's active
/// tag set, attaching it per the configured attach policy.
pub fn tag_mon<X: XConn>(wm: &mut Wm<X>, dir: i32) -> Result<()> {
    let src_mi = wm.sel_mon;
    let dest_mi = dir_to_mon(wm, dir);
    if dest_mi == src_mi {
        return Ok(());
    }
    let Some(id) = wm.selected_client().map(|c| c.id) else { return Ok(()) };

    let dest_tags = {
        let lo = src_mi.min(dest_mi);
        let hi = src_mi.max(dest_mi);
        let (left, right) = wm.monitors.split_at_mut(hi);
        let (src, dest) = if src_mi < dest_mi { (&mut left[lo], &mut right[0]) } else { (&mut right[0], &mut left[lo]) };

        src.detach(id);
        if wm.config.attach_bottom {
            dest.attach_bottom(id);
        } else {
            dest.attach(id);
        }
        dest.push_stack_front(id);
        dest.active_tags()
    };

    let c = wm.clients.get_mut(&id).unwrap();
    c.monitor = MonitorId(dest_mi);
    c.tags = dest_tags;

    wm.focus(None)?;
    wm.arrange(MonitorId(src_mi))?;
    wm.arrange(MonitorId(dest_mi))
}

/// `alttab` (press): snapshot the focus-history order and grab the keyboard
/// so subsequent presses cycle without releasing the modifier. A grab
/// failure after [`crate::alttab::GRAB_RETRIES`] retries drops the cycle
/// before it starts.
pub fn alttab_start<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    if wm.alttab.is_some() {
        return alttab_cycle(wm, 1);
    }
    let mi = wm.sel_mon;
    let Some(state) = crate::alttab::AltTabState::start(&wm.monitors[mi]) else { return Ok(()) };

    let mut grabbed = false;
    for _ in 0..crate::alttab::GRAB_RETRIES {
        if wm.x.grab_keyboard()? {
            grabbed = true;
            break;
        }
    }
    if !grabbed {
        return Ok(());
    }

    wm.alttab = Some(state);
    alttab_cycle(wm, 0)
}

/// `alttab` (repeat press, or Shift+Tab for `dir = -1`): advance the
/// highlighted client and refocus it without finalizing the cycle.
pub fn alttab_cycle<X: XConn>(wm: &mut Wm<X>, dir: i32) -> Result<()> {
    let Some(mut state) = wm.alttab.take() else { return Ok(()) };
    let next = if dir == 0 { state.selected() } else { state.cycle(dir) };
    wm.alttab = Some(state);
    wm.x.raise_window(next)?;
    wm.x.set_input_focus(next)
}

/// `quit`/`restart`: stop the event loop, optionally writing the session
/// file first.
pub fn quit<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    wm.quit(false);
    Ok(())
}

pub fn restart<X: XConn>(wm: &mut Wm<X>) -> Result<()> {
    wm.quit(true);
    Ok(())
}

/// `movemouse`: drive an interactive move from a button press, pumping the
/// event loop directly for motion/release the way dwm's `movemouse` runs
/// its own inner `XMaskEvent` loop instead of returning to the dispatcher.
pub fn move_mouse<X: XConn>(wm: &mut Wm<X>, ev: &MouseEvent) -> Result<()> {
    let Some(id) = wm.clients.get(&ev.id).map(|c| c.id) else { return Ok(()) };
    if wm.clients[&id].is_fullscreen && !wm.clients[&id].is_fake_fullscreen {
        return Ok(());
    }
    if !wm.x.grab_pointer()? {
        return Ok(());
    }

    let start = wm.x.query_pointer()?;
    let orig = wm.clients[&id].rect;
    let border_w = wm.clients[&id].border_w;
    let snap = wm.config.snap;

    loop {
        let event = wm.x.next_event()?;
        match event {
            crate::x::XEvent::MouseEvent(m) if m.kind == MouseEventKind::Release => break,
            crate::x::XEvent::MouseEvent(m) if m.kind == MouseEventKind::Motion => {
                let mon_id = wm.clients[&id].monitor;
                let usable = wm.monitors[mon_id.0].usable;
                let mut nx = orig.x + (m.rpt.x - start.x);
                let mut ny = orig.y + (m.rpt.y - start.y);

                // Snap to the usable-area edges within `snap` pixels.
                if (usable.x - nx).abs() < snap {
                    nx = usable.x;
                } else if ((usable.x + usable.w) - (nx + orig.w)).abs() < snap {
                    nx = usable.x + usable.w - orig.w;
                }
                if (usable.y - ny).abs() < snap {
                    ny = usable.y;
                } else if ((usable.y + usable.h) - (ny + orig.h)).abs() < snap {
                    ny = usable.y + usable.h - orig.h;
                }

                let arranges = !wm.monitors[mon_id.0].layout().is_floating();
                let moved_past_snap = (nx - wm.clients[&id].rect.x).abs() > snap || (ny - wm.clients[&id].rect.y).abs() > snap;
                if !wm.clients[&id].is_floating && arranges && moved_past_snap {
                    toggle_floating_if_tiled(wm, id)?;
                }

                if !arranges || wm.clients[&id].is_floating {
                    let rect = crate::geometry::Rect::new(nx, ny, orig.w, orig.h);
                    wm.x.configure_window(id, rect, border_w)?;
                    let c = wm.clients.get_mut(&id).unwrap();
                    c.rect = rect;
                    c.saved_float_rect = rect;
                }
            }
            // The pointer grab captures button/motion events only; anything
            // else arriving here (e.g. a synthetic ConfigureNotify) is
            // irrelevant to the drag and dropped.
            _ => {}
        }
    }

    wm.x.ungrab_pointer()?;
    let mon_id = wm.clients[&id].monitor;
    wm.arrange(mon_id)
}

/// `resizemouse`: as [`move_mouse`], but drags the bottom-right corner.
pub fn resize_mouse<X: XConn>(wm: &mut Wm<X>, ev: &MouseEvent) -> Result<()> {
    let Some(id) = wm.clients.get(&ev.id).map(|c| c.id) else { return Ok(()) };
    if wm.clients[&id].is_fullscreen && !wm.clients[&id].is_fake_fullscreen {
        return Ok(());
    }
    if !wm.x.grab_pointer()? {
        return Ok(());
    }

    let start = wm.x.query_pointer()?;
    let orig = wm.clients[&id].rect;
    let honor_hints = wm.config.resize_hints;
    let snap = wm.config.snap;

    loop {
        let event = wm.x.next_event()?;
        match event {
            crate::x::XEvent::MouseEvent(m) if m.kind == MouseEventKind::Release => break,
            crate::x::XEvent::MouseEvent(m) if m.kind == MouseEventKind::Motion => {
                let dw = (m.rpt.x - start.x).max(1 - orig.w);
                let dh = (m.rpt.y - start.y).max(1 - orig.h);
                let nw = orig.w + dw;
                let nh = orig.h + dh;

                let mon_id = wm.clients[&id].monitor;
                let arranges = !wm.monitors[mon_id.0].layout().is_floating();
                let moved_past_snap = (nw - wm.clients[&id].rect.w).abs() > snap || (nh - wm.clients[&id].rect.h).abs() > snap;
                if !wm.clients[&id].is_floating && arranges && moved_past_snap {
                    toggle_floating_if_tiled(wm, id)?;
                }

                if !arranges || wm.clients[&id].is_floating {
                    let rect = crate::geometry::Rect::new(orig.x, orig.y, nw, nh);
                    wm.resize_client(id, rect, honor_hints, true)?;
                    let r = wm.clients[&id].rect;
                    wm.clients.get_mut(&id).unwrap().saved_float_rect = r;
                }
            }
            _ => {}
        }
    }

    wm.x.ungrab_pointer()?;
    let mon_id = wm.clients[&id].monitor;
    wm.arrange(mon_id)
}

fn toggle_floating_if_tiled<X: XConn>(wm: &mut Wm<X>, id: Xid) -> Result<()> {
    if let Some(c) = wm.clients.get_mut(&id) {
        if !c.is_floating {
            c.is_floating = true;
            c.saved_float_rect = c.rect;
        }
    }
    Ok(())
}
