//! `dynwm`: a dynamic tiling window manager for X11, in the style of dwm.
//!
//! Wires the default configuration, keymap, and mouse bindings to the
//! `x11rb` backend. `-v` prints a version line and exits; otherwise this
//! binary takes zero arguments. The keymap is resolved to a keycode table
//! at connect time via [`X11rbConn::keysym_to_keycode`], rather than
//! re-resolving symbols on every grab.
use std::{env, process};

use dynwm::core::bindings::{KeyBindings, KeyCode, ModifierKey, MouseBindings, MouseButton, MouseEvent, MouseEventKind, MouseState};
use dynwm::core::config::Config;
use dynwm::layout::LayoutKind;
use dynwm::rules::Rule;
use dynwm::tagset::TagMask;
use dynwm::x11rb::{connect, X11rbConn};
use dynwm::{actions, Result, Wm};
use dynwm_keysyms::XKeySym;
use x11rb::rust_connection::RustConnection;

/// This binary only ever drives the real `x11rb` backend; every default
/// binding below is resolved against this concrete connection type.
type Conn = X11rbConn<RustConnection>;

const MOD: ModifierKey = ModifierKey::Meta;
const TERMINAL: &str = "st";
const LAUNCHER: &str = "dmenu_run";

fn modmask(mods: &[ModifierKey]) -> u16 {
    mods.iter().fold(0u16, |acc, m| acc | u16::from(*m))
}

/// Resolve `sym` to its currently-mapped keycode and insert the binding,
/// warning (rather than aborting startup) if the server has no keycode for
/// it right now.
fn bind_key<F>(conn: &Conn, bindings: &mut KeyBindings<Conn>, mods: &[ModifierKey], sym: XKeySym, action: F)
where
    F: FnMut(&mut Wm<Conn>) -> Result<()> + 'static,
{
    match conn.keysym_to_keycode(sym.keysym_value()) {
        Ok(Some(code)) => {
            bindings.insert(KeyCode { mask: modmask(mods), code }, Box::new(action));
        }
        Ok(None) => tracing::warn!(?sym, "default keymap: no keycode is currently mapped to this keysym"),
        Err(e) => tracing::warn!(%e, "default keymap: failed to query the server's keyboard mapping"),
    }
}

/// The default keymap: launcher/terminal spawns, focus/zoom/kill,
/// per-layout shortcuts, mfact/nmaster steps, view/tag/toggleview/toggletag
/// over the nine digit keys, monitor stepping, mark/scratchpad/alt-tab
/// bindings, and quit/restart.
fn default_key_bindings(conn: &Conn) -> KeyBindings<Conn> {
    use ModifierKey::{Ctrl, Shift};
    use XKeySym::*;

    let mut b = KeyBindings::new();

    bind_key(conn, &mut b, &[MOD], XK_Return, |wm| actions::spawn(wm, TERMINAL, &[]));
    bind_key(conn, &mut b, &[MOD], XK_p, |wm| actions::spawn(wm, LAUNCHER, &[]));
    bind_key(conn, &mut b, &[MOD, Shift], XK_Return, actions::zoom);

    bind_key(conn, &mut b, &[MOD], XK_j, |wm| actions::focus_stack(wm, 1));
    bind_key(conn, &mut b, &[MOD], XK_k, |wm| actions::focus_stack(wm, -1));

    bind_key(conn, &mut b, &[MOD], XK_i, |wm| actions::inc_nmaster(wm, 1));
    bind_key(conn, &mut b, &[MOD], XK_d, |wm| actions::inc_nmaster(wm, -1));
    bind_key(conn, &mut b, &[MOD], XK_h, |wm| actions::set_mfact(wm, -0.05));
    bind_key(conn, &mut b, &[MOD], XK_l, |wm| actions::set_mfact(wm, 0.05));
    bind_key(conn, &mut b, &[MOD, Shift], XK_h, |wm| actions::adjust_cfact(wm, -0.25));
    bind_key(conn, &mut b, &[MOD, Shift], XK_l, |wm| actions::adjust_cfact(wm, 0.25));

    bind_key(conn, &mut b, &[MOD], XK_t, |wm| actions::set_layout(wm, LayoutKind::Tile));
    bind_key(conn, &mut b, &[MOD], XK_m, |wm| actions::set_layout(wm, LayoutKind::Monocle));
    bind_key(conn, &mut b, &[MOD, Shift], XK_t, |wm| actions::set_layout(wm, LayoutKind::CenteredMaster));
    bind_key(conn, &mut b, &[MOD], XK_space, actions::toggle_layout);
    bind_key(conn, &mut b, &[MOD, Shift], XK_space, actions::toggle_floating);

    bind_key(conn, &mut b, &[MOD], XK_f, actions::toggle_fullscreen);
    bind_key(conn, &mut b, &[MOD, Shift], XK_c, actions::kill_client);
    bind_key(conn, &mut b, &[MOD], XK_b, |wm| {
        let mi = wm.sel_mon;
        wm.monitors[mi].toggle_bar();
        wm.arrange(dynwm::monitor::MonitorId(mi))
    });

    bind_key(conn, &mut b, &[MOD], XK_comma, |wm| actions::focus_mon(wm, -1));
    bind_key(conn, &mut b, &[MOD], XK_period, |wm| actions::focus_mon(wm, 1));
    bind_key(conn, &mut b, &[MOD, Shift], XK_comma, |wm| actions::tag_mon(wm, -1));
    bind_key(conn, &mut b, &[MOD, Shift], XK_period, |wm| actions::tag_mon(wm, 1));

    bind_key(conn, &mut b, &[MOD], XK_0, |wm| actions::view(wm, TagMask::all_tags()));
    bind_key(conn, &mut b, &[MOD, Shift], XK_0, |wm| actions::tag(wm, TagMask::all_tags()));

    bind_key(conn, &mut b, &[MOD], XK_grave, actions::scratchpad_show);
    bind_key(conn, &mut b, &[MOD, Shift], XK_grave, actions::scratchpad_hide);
    bind_key(conn, &mut b, &[MOD], XK_y, actions::swap_focus);
    bind_key(conn, &mut b, &[MOD, Shift], XK_y, actions::swap_client);
    bind_key(conn, &mut b, &[MOD, Shift], XK_m, actions::toggle_mark);

    bind_key(conn, &mut b, &[MOD], XK_Tab, actions::alttab_start);
    bind_key(conn, &mut b, &[MOD, Shift], XK_Tab, |wm| actions::alttab_cycle(wm, -1));

    bind_key(conn, &mut b, &[MOD, Shift], XK_q, actions::quit);
    bind_key(conn, &mut b, &[MOD, Ctrl, Shift], XK_q, actions::restart);

    const TAG_KEYS: [XKeySym; 9] = [XK_1, XK_2, XK_3, XK_4, XK_5, XK_6, XK_7, XK_8, XK_9];
    for (i, sym) in TAG_KEYS.into_iter().enumerate() {
        let mask = TagMask::nth(i + 1);
        bind_key(conn, &mut b, &[MOD], sym, move |wm| actions::view(wm, mask));
        bind_key(conn, &mut b, &[MOD, Ctrl], sym, move |wm| actions::toggle_view(wm, mask));
        bind_key(conn, &mut b, &[MOD, Shift], sym, move |wm| actions::tag(wm, mask));
        bind_key(conn, &mut b, &[MOD, Ctrl, Shift], sym, move |wm| actions::toggle_tag(wm, mask));
    }

    b
}

/// Drag-to-move/resize on `MOD`+drag, middle-click-to-float.
fn default_mouse_bindings() -> MouseBindings<Conn> {
    let mut b: MouseBindings<Conn> = MouseBindings::new();

    let on_press = |button, mods: &[ModifierKey]| (MouseEventKind::Press, MouseState::new(button, mods.to_vec()));

    b.insert(
        on_press(MouseButton::Left, &[MOD]),
        Box::new(|wm: &mut Wm<Conn>, ev: &MouseEvent| actions::move_mouse(wm, ev)),
    );
    b.insert(
        on_press(MouseButton::Right, &[MOD]),
        Box::new(|wm: &mut Wm<Conn>, ev: &MouseEvent| actions::resize_mouse(wm, ev)),
    );
    b.insert(
        on_press(MouseButton::Middle, &[MOD]),
        Box::new(|wm: &mut Wm<Conn>, _ev: &MouseEvent| actions::toggle_floating(wm)),
    );

    b
}

/// A small, commonly-floated set of classes: dmenu/launcher popups and
/// GIMP's toolbox dialogs.
fn default_rules() -> Vec<Rule> {
    vec![
        Rule { class: "dmenu".into(), floating: true, ..Default::default() },
        Rule { class: "Gimp".into(), floating: true, ..Default::default() },
        Rule { title: "scratchpad".into(), tags: TagMask::SCRATCHPAD, floating: true, ..Default::default() },
    ]
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().collect();
    if args.len() == 2 && args[1] == "-v" {
        println!("dynwm-{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    } else if args.len() > 1 {
        eprintln!("usage: dynwm [-v]");
        process::exit(1);
    }

    let conn = match connect() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("dynwm: {e}");
            process::exit(1);
        }
    };

    let key_bindings = default_key_bindings(&conn);
    let mouse_bindings = default_mouse_bindings();

    let mut config: Config<Conn> = Config::default();
    config.rules = default_rules();

    let wm = match Wm::new(config, key_bindings, mouse_bindings, conn) {
        Ok(wm) => wm,
        Err(e) => {
            eprintln!("dynwm: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = wm.run() {
        eprintln!("dynwm: fatal: {e}");
        process::exit(1);
    }
}
