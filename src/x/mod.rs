//! The capability boundary onto the X11 protocol transport (spec.md §1:
//! "treated as an asynchronous event source plus a set of window/geometry/
//! property operations"). Everything above this trait is pure; everything
//! below it is a concrete backend (`crate::x11rb`) or a test double
//! (`crate::x::mock`).
use crate::{
    core::bindings::{KeyCode, MouseEvent, MouseState},
    geometry::{Point, Rect},
    Color, Result, Xid,
};
use std::collections::HashMap;

pub mod atom;
pub mod mock;

pub use atom::Atom;
pub use mock::MockXConn;

/// A window type to request when creating a new, WM-owned window (overlay,
/// bar, systray host) rather than managing a client's own window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinType {
    /// A hidden stub window used only to hold properties (`_NET_SUPPORTING_WM_CHECK`).
    CheckWin,
    /// An override-redirect, input-only window (alt-tab keyboard grab target).
    InputOnly,
    /// A normal override-redirect output window, e.g. the bar or the
    /// alt-tab overlay, advertising the given `_NET_WM_WINDOW_TYPE`.
    Normal(Atom),
}

/// A decoded X property value (spec.md §6 "X11 properties consumed").
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    UTF8String(Vec<String>),
    Cardinal(Vec<u32>),
    Atom(Vec<String>),
    Window(Vec<Xid>),
}

/// The subset of `XGetWindowAttributes`/ICCCM properties `manage` (spec.md
/// §4.3) needs to classify a newly mapped window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAttributes {
    pub rect: Rect,
    pub border_w: i32,
    pub override_redirect: bool,
}

/// Event sum type delivered by [`XConn::next_event`] (spec.md §4.5 "A table
/// indexed by event type selects a handler" — realised here as a `match`
/// per spec.md §9's design note preferring a sum type over a handler table).
#[derive(Debug, Clone, PartialEq)]
pub enum XEvent {
    ClientMessage { id: Xid, data_type: String, data: Vec<u32> },
    ConfigureNotify { id: Xid, is_root: bool, rect: Rect },
    ConfigureRequest { id: Xid, rect: Rect, border_w: i32 },
    Enter { id: Xid, abs: Point },
    Expose { id: Xid },
    FocusIn(Xid),
    Destroy(Xid),
    KeyPress(KeyCode),
    /// A modifier-bearing key release, delivered only while an alt-tab grab
    /// is active (spec.md §4.8 "releasing the modifier ends the cycle").
    KeyRelease(KeyCode),
    Leave { id: Xid, abs: Point },
    MappingNotify,
    MapRequest(Xid),
    MouseEvent(MouseEvent),
    PropertyNotify { id: Xid, atom: String },
    RandrNotify,
    ScreenChange,
    UnmapNotify { id: Xid, send_event: bool },
}

impl std::fmt::Display for XEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use XEvent::*;
        let name = match self {
            ClientMessage { .. } => "ClientMessage",
            ConfigureNotify { .. } => "ConfigureNotify",
            ConfigureRequest { .. } => "ConfigureRequest",
            Enter { .. } => "Enter",
            Expose { .. } => "Expose",
            FocusIn(_) => "FocusIn",
            Destroy(_) => "Destroy",
            KeyPress(_) => "KeyPress",
            KeyRelease(_) => "KeyRelease",
            Leave { .. } => "Leave",
            MappingNotify => "MappingNotify",
            MapRequest(_) => "MapRequest",
            MouseEvent(_) => "MouseEvent",
            PropertyNotify { .. } => "PropertyNotify",
            RandrNotify => "RandrNotify",
            ScreenChange => "ScreenChange",
            UnmapNotify { .. } => "UnmapNotify",
        };
        write!(f, "{name}")
    }
}

/// A query run against a managed window's properties, used by swallow
/// matching and by rule/scratchpad lookups (spec.md §4.6, §4.10).
pub trait Query<X: XConn> {
    fn run(&self, id: Xid, x: &X) -> Result<bool>;
}

/// ICCCM `WM_HINTS` fields the core cares about (spec.md §3 "urgent",
/// "never-focus").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WmHints {
    pub urgent: bool,
    pub never_focus: bool,
}

/// The capability surface every backend must provide. Handlers in
/// `core::handle` take `&mut X` alongside the pure client/monitor graph;
/// nothing below this trait is exercised by unit tests, which instead use
/// [`MockXConn`].
pub trait XConn {
    /// Block for the next event from the server.
    fn next_event(&self) -> Result<XEvent>;
    /// Force queued requests out to the server (spec.md §5: "every
    /// geometry-changing operation issues `XSync` before returning").
    fn flush(&self);
    fn root(&self) -> Xid;

    /// One rect per physical output (spec.md §4.7; the Xinerama/RandR query
    /// itself is out of scope, this just reports the resolved geometries).
    fn screen_rects(&self) -> Result<Vec<Rect>>;

    fn window_attributes(&self, id: Xid) -> Result<WindowAttributes>;
    fn map_window(&self, id: Xid) -> Result<()>;
    fn unmap_window(&self, id: Xid) -> Result<()>;
    fn configure_window(&self, id: Xid, rect: Rect, border_w: i32) -> Result<()>;
    fn raise_window(&self, id: Xid) -> Result<()>;
    fn restack(&self, ids: &[Xid]) -> Result<()>;
    fn kill_window(&self, id: Xid) -> Result<()>;
    fn destroy_window(&self, id: Xid) -> Result<()>;
    fn new_window(&self, ty: WinType, rect: Rect, managed: bool) -> Result<Xid>;

    fn set_border_width(&self, id: Xid, width: i32) -> Result<()>;
    fn set_border_color(&self, id: Xid, color: Color) -> Result<()>;

    fn set_input_focus(&self, id: Xid) -> Result<()>;
    fn send_protocol_message(&self, id: Xid, atom: Atom) -> Result<()>;
    fn supports_protocol(&self, id: Xid, atom: Atom) -> Result<bool>;

    fn get_prop(&self, id: Xid, name: &str) -> Result<Option<Prop>>;
    fn change_prop(&self, id: Xid, name: &str, value: Prop) -> Result<()>;
    fn delete_prop(&self, id: Xid, name: &str) -> Result<()>;

    fn get_transient_for(&self, id: Xid) -> Result<Option<Xid>>;
    fn get_size_hints(&self, id: Xid) -> Result<crate::geometry::SizeHints>;
    fn get_wm_hints(&self, id: Xid) -> Result<WmHints>;
    fn get_window_class(&self, id: Xid) -> Result<(String, String)>;
    fn get_window_title(&self, id: Xid) -> Result<String>;
    fn get_window_type(&self, id: Xid) -> Result<Vec<Atom>>;

    fn grab_keys(&self, keys: &[KeyCode]) -> Result<()>;
    fn grab_buttons(&self, states: &[MouseState]) -> Result<()>;
    fn grab_keyboard(&self) -> Result<bool>;
    fn ungrab_keyboard(&self) -> Result<()>;
    fn grab_pointer(&self) -> Result<bool>;
    fn ungrab_pointer(&self) -> Result<()>;
    fn query_pointer(&self) -> Result<Point>;
    fn warp_pointer(&self, id: Xid, p: Point) -> Result<()>;

    fn get_root_name(&self) -> Result<String>;
    fn set_root_name(&self, name: &str) -> Result<()>;

    /// Fails if another process already holds substructure redirect on the
    /// root (spec.md §5: "strict startup handler that fails fast if another
    /// window manager is present").
    fn try_become_wm(&self) -> Result<()>;
}

/// Convenience helpers layered on [`XConn`] rather than required of every
/// backend.
pub trait XConnExt: XConn {
    fn class_instance_title(&self, id: Xid) -> Result<(String, String, String)> {
        let (class, instance) = self.get_window_class(id)?;
        let title = self.get_window_title(id)?;
        Ok((class, instance, title))
    }
}

impl<X: XConn> XConnExt for X {}

/// A cache of `id -> (class, instance, title)` refreshed lazily, so repeated
/// swallow/rule matching within one event pass does not round-trip to the
/// server per lookup.
#[derive(Debug, Default)]
pub struct PropCache {
    entries: HashMap<Xid, (String, String, String)>,
}

impl PropCache {
    pub fn get_or_fetch<X: XConn>(&mut self, id: Xid, x: &X) -> Result<&(String, String, String)> {
        if !self.entries.contains_key(&id) {
            let triple = x.class_instance_title(id)?;
            self.entries.insert(id, triple);
        }
        Ok(self.entries.get(&id).unwrap())
    }

    pub fn invalidate(&mut self, id: Xid) {
        self.entries.remove(&id);
    }
}
