//! The `x11rb`-backed [`XConn`] implementation. Grounded throughout on the
//! teacher's `x11rb::xconn::X11rbConnection` (the `wait_for_event` match,
//! the `known_atom`/`str_prop`/`atom_prop` property helpers, the
//! `grab_keys`/`grab_buttons` modifier-combination loop) and on dwm's C
//! originals (`grabkeys`, `grabbuttons`, `updatenumlockmask`, `movemouse`'s
//! `XGrabPointer` mask) for the exact protocol-level behaviour the teacher's
//! own `penrose::Config`-shaped trait didn't need to expose.
use crate::{
    core::bindings::{KeyCode, KeyCodeValue, MouseEvent, MouseEventKind, MouseState},
    error::Error,
    geometry::{Point, Rect, SizeHints},
    x::{Atom, Prop, WinType, WindowAttributes, WmHints, XConn, XEvent},
    x11rb::{atom::AtomCache, conversions},
    Color, Result, Xid,
};

use x11rb::{
    connection::Connection,
    protocol::{
        randr::{self, ConnectionExt as _},
        xproto::{
            AtomEnum, ChangeWindowAttributesAux, ClientMessageEvent, ConfigureWindowAux,
            ConnectionExt as _, CreateWindowAux, EventMask, GrabMode, InputFocus,
            ModMask, PropMode, StackMode, WindowClass, CLIENT_MESSAGE_EVENT,
        },
        Event,
    },
    properties::{WmClass, WmHints as X11WmHints, WmSizeHints},
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
    CURRENT_TIME, NONE,
};

use tracing::warn;

/// Grab mask used while dragging a client with the mouse (dwm's `MOUSEMASK`).
const MOUSE_GRAB_MASK: u32 = EventMask::BUTTON_PRESS.bits()
    | EventMask::BUTTON_RELEASE.bits()
    | EventMask::POINTER_MOTION.bits();

/// Event mask registered on every managed client (spec.md §4.3 "mark_new_window").
const CLIENT_EVENT_MASK: u32 = EventMask::ENTER_WINDOW.bits()
    | EventMask::LEAVE_WINDOW.bits()
    | EventMask::PROPERTY_CHANGE.bits()
    | EventMask::STRUCTURE_NOTIFY.bits();

/// Handles communication with an X server via the `x11rb` crate.
pub struct X11rbConn<C: Connection> {
    conn: C,
    root: Xid,
    check_win: Xid,
    atoms: AtomCache,
    numlock_mask: u16,
}

/// Connect to the display named by `$DISPLAY` and build the real backend
/// (spec.md §5 "strict startup handler").
pub fn connect() -> Result<X11rbConn<RustConnection>> {
    let (conn, screen_num) = x11rb::connect(None)?;
    X11rbConn::new(conn, screen_num)
}

impl<C: Connection> X11rbConn<C> {
    pub fn new(conn: C, screen_num: usize) -> Result<Self> {
        let root = conn.setup().roots[screen_num].root;
        let atoms = AtomCache::intern_all(&conn)?;
        let numlock_mask = conversions::find_numlock_mask(&conn)?;

        if conn.extension_information(randr::X11_EXTENSION_NAME)?.is_none() {
            warn!("server does not advertise the RandR extension; screen_rects will report a single root-sized output");
        } else {
            use randr::NotifyMask;
            let mask = NotifyMask::OUTPUT_CHANGE | NotifyMask::CRTC_CHANGE | NotifyMask::SCREEN_CHANGE;
            conn.randr_select_input(root, mask)?;
        }

        let check_win = conn.generate_id()?;
        let aux = CreateWindowAux::new().override_redirect(1);
        conn.create_window(0, check_win, root, 0, 0, 1, 1, 0, WindowClass::INPUT_OUTPUT, 0, &aux)?;
        conn.flush()?;

        Ok(Self { conn, root: Xid(root), check_win: Xid(check_win), atoms, numlock_mask })
    }

    /// Resolve a numeric X11 keysym (spec.md §6 "plus keymap") to a keycode
    /// the server currently has it mapped to, via `GetKeyboardMapping`. Used
    /// by the binary to translate a user-facing default keymap (bound by
    /// [`dynwm_keysyms::XKeySym`]) into the raw [`KeyCode`] this crate's
    /// `KeyBindings` table is keyed by; unrelated to `XConn::grab_keys`,
    /// which only grabs keycodes already resolved this way.
    pub fn keysym_to_keycode(&self, keysym: u32) -> Result<Option<KeyCodeValue>> {
        let setup = self.conn.setup();
        let min_kc = setup.min_keycode;
        let max_kc = setup.max_keycode;
        let count = max_kc - min_kc + 1;
        let reply = self.conn.get_keyboard_mapping(min_kc, count)?.reply()?;
        let per_keycode = reply.keysyms_per_keycode.max(1) as usize;
        for (i, chunk) in reply.keysyms.chunks(per_keycode).enumerate() {
            if chunk.iter().any(|&k| k == keysym) {
                return Ok(Some(min_kc + i as u8));
            }
        }
        Ok(None)
    }

    fn known_atom(&self, atom: Atom) -> u32 {
        self.atoms.id(atom)
    }

    fn resolve_atom(&self, name: &str) -> Result<u32> {
        if let Ok(known) = name.parse::<Atom>() {
            return Ok(self.known_atom(known));
        }
        Ok(self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom)
    }

    fn get_raw_property(&self, id: Xid, atom: u32) -> Result<Option<x11rb::protocol::xproto::GetPropertyReply>> {
        let reply = self
            .conn
            .get_property(false, id.0, atom, AtomEnum::ANY, 0, 4096)?
            .reply()?;
        if reply.type_ == 0 {
            Ok(None)
        } else {
            Ok(Some(reply))
        }
    }
}

impl<C: Connection> XConn for X11rbConn<C> {
    fn next_event(&self) -> Result<XEvent> {
        loop {
            match self.conn.wait_for_event()? {
                Event::ButtonPress(ev) => {
                    if let Some(state) = conversions::mouse_state(ev.detail, ev.state) {
                        return Ok(XEvent::MouseEvent(MouseEvent::new(
                            Xid(ev.event), ev.root_x.into(), ev.root_y.into(), ev.event_x.into(), ev.event_y.into(),
                            state, MouseEventKind::Press,
                        )));
                    }
                }
                Event::ButtonRelease(ev) => {
                    if let Some(state) = conversions::mouse_state(ev.detail, ev.state) {
                        return Ok(XEvent::MouseEvent(MouseEvent::new(
                            Xid(ev.event), ev.root_x.into(), ev.root_y.into(), ev.event_x.into(), ev.event_y.into(),
                            state, MouseEventKind::Release,
                        )));
                    }
                }
                Event::MotionNotify(ev) => {
                    // A motion event carries no button in `detail`; attribute it
                    // to the left button so a drag in progress still matches.
                    let modifiers = conversions::modifiers_from_mask(ev.state);
                    let state = MouseState::new(crate::core::bindings::MouseButton::Left, modifiers);
                    return Ok(XEvent::MouseEvent(MouseEvent::new(
                        Xid(ev.event), ev.root_x.into(), ev.root_y.into(), ev.event_x.into(), ev.event_y.into(),
                        state, MouseEventKind::Motion,
                    )));
                }
                Event::KeyPress(ev) => {
                    let code = conversions::key_code(ev.detail, ev.state).ignoring_modifier(self.numlock_mask);
                    return Ok(XEvent::KeyPress(code));
                }
                Event::KeyRelease(ev) => {
                    let code = conversions::key_code(ev.detail, ev.state).ignoring_modifier(self.numlock_mask);
                    return Ok(XEvent::KeyRelease(code));
                }
                Event::MapRequest(ev) => return Ok(XEvent::MapRequest(Xid(ev.window))),
                Event::EnterNotify(ev) => {
                    return Ok(XEvent::Enter { id: Xid(ev.event), abs: Point::new(ev.root_x.into(), ev.root_y.into()) });
                }
                Event::LeaveNotify(ev) => {
                    return Ok(XEvent::Leave { id: Xid(ev.event), abs: Point::new(ev.root_x.into(), ev.root_y.into()) });
                }
                Event::DestroyNotify(ev) => return Ok(XEvent::Destroy(Xid(ev.window))),
                Event::UnmapNotify(ev) => {
                    return Ok(XEvent::UnmapNotify { id: Xid(ev.window), send_event: ev.response_type & 0x80 != 0 });
                }
                Event::ConfigureRequest(ev) => {
                    return Ok(XEvent::ConfigureRequest {
                        id: Xid(ev.window),
                        rect: Rect::new(ev.x.into(), ev.y.into(), ev.width.into(), ev.height.into()),
                        border_w: ev.border_width.into(),
                    });
                }
                Event::ConfigureNotify(ev) => {
                    return Ok(XEvent::ConfigureNotify {
                        id: Xid(ev.window),
                        is_root: ev.window == self.root.0,
                        rect: Rect::new(ev.x.into(), ev.y.into(), ev.width.into(), ev.height.into()),
                    });
                }
                Event::FocusIn(ev) => return Ok(XEvent::FocusIn(Xid(ev.event))),
                Event::Expose(ev) if ev.count == 0 => return Ok(XEvent::Expose { id: Xid(ev.window) }),
                Event::MappingNotify(_) => return Ok(XEvent::MappingNotify),
                Event::RandrScreenChangeNotify(_) => return Ok(XEvent::ScreenChange),
                Event::RandrNotify(_) => return Ok(XEvent::RandrNotify),
                Event::ClientMessage(ev) => {
                    let data_type = self.atoms.name(ev.type_).map(|a| a.as_ref().to_string());
                    let data_type = match data_type {
                        Some(name) => name,
                        None => match self.conn.get_atom_name(ev.type_).ok().and_then(|c| c.reply().ok()) {
                            Some(reply) => String::from_utf8_lossy(&reply.name).into_owned(),
                            None => continue,
                        },
                    };
                    let data = match ev.format {
                        8 => ev.data.as_data8().iter().map(|&d| d as u32).collect(),
                        16 => ev.data.as_data16().iter().map(|&d| d as u32).collect(),
                        32 => ev.data.as_data32().to_vec(),
                        _ => Vec::new(),
                    };
                    return Ok(XEvent::ClientMessage { id: Xid(ev.window), data_type, data });
                }
                Event::PropertyNotify(ev) => {
                    if let Some(atom) = self.atoms.name(ev.atom) {
                        return Ok(XEvent::PropertyNotify { id: Xid(ev.window), atom: atom.as_ref().to_string() });
                    } else if let Some(name) = self.conn.get_atom_name(ev.atom).ok().and_then(|c| c.reply().ok()) {
                        return Ok(XEvent::PropertyNotify {
                            id: Xid(ev.window),
                            atom: String::from_utf8_lossy(&name.name).into_owned(),
                        });
                    }
                }
                // Other event types (GraphicsExposure, NoExposure, ...) carry no
                // WM-relevant state.
                _ => {}
            }
        }
    }

    fn flush(&self) {
        if let Err(e) = self.conn.flush() {
            warn!(%e, "flush failed");
        }
    }

    fn root(&self) -> Xid {
        self.root
    }

    fn screen_rects(&self) -> Result<Vec<Rect>> {
        if self.conn.extension_information(randr::X11_EXTENSION_NAME)?.is_none() {
            let geo = self.conn.get_geometry(self.root.0)?.reply()?;
            return Ok(vec![Rect::new(0, 0, geo.width.into(), geo.height.into())]);
        }

        let resources = self.conn.randr_get_screen_resources(self.root.0)?.reply()?;
        let crtcs = resources
            .crtcs
            .iter()
            .map(|c| self.conn.randr_get_crtc_info(*c, 0))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut rects: Vec<Rect> = crtcs
            .into_iter()
            .filter_map(|cookie| cookie.reply().ok())
            .filter(|reply| reply.width > 0 && reply.height > 0)
            .map(|reply| Rect::new(reply.x.into(), reply.y.into(), reply.width.into(), reply.height.into()))
            .collect();

        if rects.is_empty() {
            let geo = self.conn.get_geometry(self.root.0)?.reply()?;
            rects.push(Rect::new(0, 0, geo.width.into(), geo.height.into()));
        }
        Ok(rects)
    }

    fn window_attributes(&self, id: Xid) -> Result<WindowAttributes> {
        let geo = self.conn.get_geometry(id.0)?.reply()?;
        let attr = self.conn.get_window_attributes(id.0)?.reply()?;
        Ok(WindowAttributes {
            rect: Rect::new(geo.x.into(), geo.y.into(), geo.width.into(), geo.height.into()),
            border_w: geo.border_width.into(),
            override_redirect: attr.override_redirect,
        })
    }

    fn map_window(&self, id: Xid) -> Result<()> {
        // Subscribe to the events `manage` (spec.md §4.3) needs to track this
        // client before mapping it, so nothing slips through between the two.
        let aux = ChangeWindowAttributesAux::new().event_mask(EventMask::from(CLIENT_EVENT_MASK));
        self.conn.change_window_attributes(id.0, &aux)?.check()?;
        Ok(self.conn.map_window(id.0)?.check()?)
    }

    fn unmap_window(&self, id: Xid) -> Result<()> {
        Ok(self.conn.unmap_window(id.0)?.check()?)
    }

    fn configure_window(&self, id: Xid, rect: Rect, border_w: i32) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(rect.x)
            .y(rect.y)
            .width(rect.w as u32)
            .height(rect.h as u32)
            .border_width(border_w as u32);
        Ok(self.conn.configure_window(id.0, &aux)?.check()?)
    }

    fn raise_window(&self, id: Xid) -> Result<()> {
        let aux = ConfigureWindowAux::new().stack_mode(StackMode::ABOVE);
        Ok(self.conn.configure_window(id.0, &aux)?.check()?)
    }

    fn restack(&self, ids: &[Xid]) -> Result<()> {
        // Each window is raised above the previous one in turn, giving the
        // full slice front-to-back stacking order (spec.md §4.1 "restack").
        let mut sibling: Option<Xid> = None;
        for &id in ids {
            let aux = match sibling {
                Some(s) => ConfigureWindowAux::new().sibling(s.0).stack_mode(StackMode::BELOW),
                None => ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
            };
            self.conn.configure_window(id.0, &aux)?.check()?;
            sibling = Some(id);
        }
        Ok(())
    }

    fn kill_window(&self, id: Xid) -> Result<()> {
        Ok(self.conn.kill_client(id.0)?.check()?)
    }

    fn destroy_window(&self, id: Xid) -> Result<()> {
        Ok(self.conn.destroy_window(id.0)?.check()?)
    }

    fn new_window(&self, ty: WinType, rect: Rect, managed: bool) -> Result<Xid> {
        let id = self.conn.generate_id()?;
        let class = match ty {
            WinType::InputOnly => WindowClass::INPUT_ONLY,
            _ => WindowClass::INPUT_OUTPUT,
        };
        let mut aux = CreateWindowAux::new();
        if !managed {
            aux = aux.override_redirect(1);
        }
        self.conn.create_window(
            0, id, self.root.0, rect.x as i16, rect.y as i16, rect.w as u16, rect.h as u16, 0, class, 0, &aux,
        )?.check()?;

        if let WinType::Normal(atom) = ty {
            let ty_atom = self.known_atom(Atom::NetWmWindowType);
            let value = [self.known_atom(atom)];
            self.conn.change_property32(PropMode::REPLACE, id, ty_atom, AtomEnum::ATOM, &value)?.check()?;
        }

        Ok(Xid(id))
    }

    fn set_border_width(&self, id: Xid, width: i32) -> Result<()> {
        let aux = ConfigureWindowAux::new().border_width(width as u32);
        Ok(self.conn.configure_window(id.0, &aux)?.check()?)
    }

    fn set_border_color(&self, id: Xid, color: Color) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().border_pixel(color.rgb_u32());
        Ok(self.conn.change_window_attributes(id.0, &aux)?.check()?)
    }

    fn set_input_focus(&self, id: Xid) -> Result<()> {
        Ok(self.conn.set_input_focus(InputFocus::POINTER_ROOT, id.0, CURRENT_TIME)?.check()?)
    }

    fn send_protocol_message(&self, id: Xid, atom: Atom) -> Result<()> {
        let event = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window: id.0,
            type_: self.known_atom(Atom::WmProtocols),
            data: [self.known_atom(atom), CURRENT_TIME, 0, 0, 0].into(),
        };
        Ok(self.conn.send_event(false, id.0, EventMask::NO_EVENT, &event)?.check()?)
    }

    fn supports_protocol(&self, id: Xid, atom: Atom) -> Result<bool> {
        let protocols = self.known_atom(Atom::WmProtocols);
        match self.get_raw_property(id, protocols)? {
            Some(reply) => {
                let target = self.known_atom(atom);
                Ok(reply.value32().map(|mut it| it.any(|a| a == target)).unwrap_or(false))
            }
            None => Ok(false),
        }
    }

    fn get_prop(&self, id: Xid, name: &str) -> Result<Option<Prop>> {
        let atom = self.resolve_atom(name)?;
        let reply = match self.get_raw_property(id, atom)? {
            Some(r) => r,
            None => return Ok(None),
        };

        let utf8 = self.known_atom(Atom::UTF8String);
        let prop = if reply.type_ == utf8 || reply.type_ == u32::from(AtomEnum::STRING) {
            let text = String::from_utf8_lossy(&reply.value).into_owned();
            Prop::UTF8String(text.split('\0').filter(|s| !s.is_empty()).map(str::to_string).collect())
        } else if reply.type_ == u32::from(AtomEnum::CARDINAL) {
            Prop::Cardinal(reply.value32().map(|it| it.collect()).unwrap_or_default())
        } else if reply.type_ == u32::from(AtomEnum::WINDOW) {
            Prop::Window(reply.value32().map(|it| it.map(Xid).collect()).unwrap_or_default())
        } else if reply.type_ == u32::from(AtomEnum::ATOM) {
            let names = reply
                .value32()
                .map(|it| it.filter_map(|a| self.atoms.name(a).map(|atom| atom.as_ref().to_string())).collect())
                .unwrap_or_default();
            Prop::Atom(names)
        } else {
            let text = String::from_utf8_lossy(&reply.value).into_owned();
            Prop::UTF8String(vec![text])
        };
        Ok(Some(prop))
    }

    fn change_prop(&self, id: Xid, name: &str, value: Prop) -> Result<()> {
        let atom = self.resolve_atom(name)?;
        match value {
            Prop::UTF8String(strings) => {
                let joined = strings.join("\0");
                let ty = self.known_atom(Atom::UTF8String);
                self.conn.change_property8(PropMode::REPLACE, id.0, atom, ty, joined.as_bytes())?.check()?;
            }
            Prop::Cardinal(values) => {
                self.conn.change_property32(PropMode::REPLACE, id.0, atom, AtomEnum::CARDINAL, &values)?.check()?;
            }
            Prop::Window(ids) => {
                let raw: Vec<u32> = ids.iter().map(|id| id.0).collect();
                self.conn.change_property32(PropMode::REPLACE, id.0, atom, AtomEnum::WINDOW, &raw)?.check()?;
            }
            Prop::Atom(names) => {
                let ids = names.iter().map(|n| self.resolve_atom(n)).collect::<Result<Vec<_>>>()?;
                self.conn.change_property32(PropMode::REPLACE, id.0, atom, AtomEnum::ATOM, &ids)?.check()?;
            }
        }
        Ok(())
    }

    fn delete_prop(&self, id: Xid, name: &str) -> Result<()> {
        let atom = self.resolve_atom(name)?;
        Ok(self.conn.delete_property(id.0, atom)?.check()?)
    }

    fn get_transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        let atom = u32::from(AtomEnum::WM_TRANSIENT_FOR);
        let reply = self.conn.get_property(false, id.0, atom, AtomEnum::WINDOW, 0, 1)?.reply()?;
        Ok(reply.value32().and_then(|mut it| it.next()).filter(|&w| w != 0).map(Xid))
    }

    fn get_size_hints(&self, id: Xid) -> Result<SizeHints> {
        let mut hints = SizeHints::default();
        let reply = match WmSizeHints::get_normal_hints(&self.conn, id.0)?.reply()? {
            Some(r) => r,
            None => return Ok(hints),
        };
        if let Some((w, h)) = reply.base_size {
            hints.base_w = w;
            hints.base_h = h;
        }
        if let Some((w, h)) = reply.size_increment {
            hints.inc_w = w;
            hints.inc_h = h;
        }
        if let Some((w, h)) = reply.min_size {
            hints.min_w = w;
            hints.min_h = h;
        }
        if let Some((w, h)) = reply.max_size {
            hints.max_w = w;
            hints.max_h = h;
        }
        if let Some((min, max)) = reply.aspect {
            if min.denominator != 0 {
                hints.min_aspect = min.numerator as f64 / min.denominator as f64;
            }
            if max.denominator != 0 {
                hints.max_aspect = max.numerator as f64 / max.denominator as f64;
            }
        }
        Ok(hints)
    }

    fn get_wm_hints(&self, id: Xid) -> Result<WmHints> {
        match X11WmHints::get(&self.conn, id.0)?.reply() {
            Ok(hints) => Ok(WmHints { urgent: hints.urgent, never_focus: hints.input == Some(false) }),
            Err(_) => Ok(WmHints::default()),
        }
    }

    fn get_window_class(&self, id: Xid) -> Result<(String, String)> {
        match WmClass::get(&self.conn, id.0)?.reply_unchecked() {
            Ok(Some(class)) => {
                let class_name = String::from_utf8_lossy(class.class()).into_owned();
                let instance = String::from_utf8_lossy(class.instance()).into_owned();
                Ok((class_name, instance))
            }
            _ => Ok((String::new(), String::new())),
        }
    }

    fn get_window_title(&self, id: Xid) -> Result<String> {
        if let Some(Prop::UTF8String(mut names)) = self.get_prop(id, Atom::NetWmName.as_ref())? {
            if let Some(name) = names.pop() {
                return Ok(name);
            }
        }
        match self.get_prop(id, "WM_NAME")? {
            Some(Prop::UTF8String(mut names)) => Ok(names.pop().unwrap_or_default()),
            _ => Ok(String::new()),
        }
    }

    fn get_window_type(&self, id: Xid) -> Result<Vec<Atom>> {
        let atom = self.known_atom(Atom::NetWmWindowType);
        match self.get_raw_property(id, atom)? {
            Some(reply) => Ok(reply
                .value32()
                .map(|it| it.filter_map(|a| self.atoms.name(a)).collect())
                .unwrap_or_default()),
            None => Ok(Vec::new()),
        }
    }

    fn grab_keys(&self, keys: &[KeyCode]) -> Result<()> {
        use x11rb::protocol::xproto::Grab;
        self.conn.ungrab_key(Grab::ANY, self.root.0, ModMask::ANY)?.check()?;
        let combos = [0u16, ModMask::LOCK.into(), self.numlock_mask, self.numlock_mask | u16::from(ModMask::LOCK)];
        for key in keys {
            for extra in combos {
                self.conn
                    .grab_key(
                        false,
                        self.root.0,
                        ModMask::from(key.mask | extra),
                        key.code,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )?
                    .check()?;
            }
        }
        Ok(self.conn.flush()?)
    }

    fn grab_buttons(&self, states: &[MouseState]) -> Result<()> {
        use x11rb::protocol::xproto::ButtonIndex;
        self.conn.ungrab_button(ButtonIndex::ANY, self.root.0, ModMask::ANY)?.check()?;
        let event_mask = EventMask::from(MOUSE_GRAB_MASK);
        let combos = [0u16, ModMask::LOCK.into(), self.numlock_mask, self.numlock_mask | u16::from(ModMask::LOCK)];
        for state in states {
            let button_mask: u16 = state.modifiers.iter().fold(0, |acc, m| acc | u16::from(*m));
            let button = ButtonIndex::from(u8::from(state.button));
            for extra in combos {
                self.conn
                    .grab_button(
                        false,
                        self.root.0,
                        event_mask,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                        NONE,
                        NONE,
                        button,
                        ModMask::from(button_mask | extra),
                    )?
                    .check()?;
            }
        }
        Ok(self.conn.flush()?)
    }

    fn grab_keyboard(&self) -> Result<bool> {
        let reply = self
            .conn
            .grab_keyboard(true, self.root.0, CURRENT_TIME, GrabMode::ASYNC, GrabMode::ASYNC)?
            .reply()?;
        Ok(reply.status == x11rb::protocol::xproto::GrabStatus::SUCCESS)
    }

    fn ungrab_keyboard(&self) -> Result<()> {
        Ok(self.conn.ungrab_keyboard(CURRENT_TIME)?.check()?)
    }

    fn grab_pointer(&self) -> Result<bool> {
        let event_mask = EventMask::from(MOUSE_GRAB_MASK);
        let reply = self
            .conn
            .grab_pointer(false, self.root.0, event_mask, GrabMode::ASYNC, GrabMode::ASYNC, NONE, NONE, CURRENT_TIME)?
            .reply()?;
        Ok(reply.status == x11rb::protocol::xproto::GrabStatus::SUCCESS)
    }

    fn ungrab_pointer(&self) -> Result<()> {
        Ok(self.conn.ungrab_pointer(CURRENT_TIME)?.check()?)
    }

    fn query_pointer(&self) -> Result<Point> {
        let reply = self.conn.query_pointer(self.root.0)?.reply()?;
        Ok(Point::new(reply.root_x.into(), reply.root_y.into()))
    }

    fn warp_pointer(&self, id: Xid, p: Point) -> Result<()> {
        Ok(self.conn.warp_pointer(NONE, id.0, 0, 0, 0, 0, p.x as i16, p.y as i16)?.check()?)
    }

    fn get_root_name(&self) -> Result<String> {
        match self.get_prop(self.root, "WM_NAME")? {
            Some(Prop::UTF8String(mut names)) => Ok(names.pop().unwrap_or_default()),
            _ => Ok(String::new()),
        }
    }

    fn set_root_name(&self, name: &str) -> Result<()> {
        self.conn.change_property8(PropMode::REPLACE, self.root.0, AtomEnum::WM_NAME, AtomEnum::STRING, name.as_bytes())?.check()?;
        Ok(self.conn.flush()?)
    }

    fn try_become_wm(&self) -> Result<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY | EventMask::PROPERTY_CHANGE;
        let aux = ChangeWindowAttributesAux::new().event_mask(mask);
        match self.conn.change_window_attributes(self.root.0, &aux)?.check() {
            Ok(()) => Ok(()),
            Err(x11rb::errors::ReplyError::X11Error(_)) => Err(Error::OtherWmRunning),
            Err(e) => Err(e.into()),
        }
    }
}

impl<C: Connection> Drop for X11rbConn<C> {
    fn drop(&mut self) {
        let result: Result<()> = (|| {
            self.conn.destroy_window(self.check_win.0)?.check()?;
            Ok(())
        })();
        if let Err(e) = result {
            warn!(%e, "failed to destroy supporting-wm-check window on shutdown");
        }
    }
}
