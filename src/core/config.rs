//! Compiled-in configuration: borders, gaps, bar geometry, color schemes,
//! layout defaults, swallow/rule tables, and a single optional startup
//! closure, parameterised over the `XConn` backend so a signal handler or
//! startup hook can reach back into `Wm<X>`.
use crate::{
    core::Wm,
    layout::Gaps,
    rules::{MonitorRule, Rule},
    x::XConn,
    Color, Result,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// A one-shot action run after grabbing keys/mouse and before entering the
/// event loop.
pub type StartupHook<X> = Box<dyn FnMut(&mut Wm<X>) -> Result<()>>;

/// A `fsignal:<n>` handler, looked up from the signal table.
pub type SignalHandler<X> = Box<dyn FnMut(&mut Wm<X>) -> Result<()>>;

pub struct Config<X>
where
    X: XConn,
{
    pub border_width: i32,
    pub snap: i32,
    pub gaps: Gaps,

    pub bar_height: i32,
    pub top_bar: bool,
    pub show_bar_by_default: bool,

    pub normal_border: Color,
    pub focused_border: Color,
    /// Border color for the marked client when it is not also selected.
    pub marked_border: Color,
    /// Border color for the marked client when it is also selected.
    pub selected_marked_border: Color,
    pub normal_bg: Color,
    pub normal_fg: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub fonts: Vec<String>,

    pub systray_pinned_monitor: Option<usize>,
    pub systray_spacing: i32,
    pub show_systray: bool,

    pub mfact: f64,
    pub nmaster: usize,
    pub resize_hints: bool,
    pub lock_fullscreen: bool,
    pub focus_follow_mouse: bool,
    /// Attach new clients at the tail of `clients` rather than the head.
    pub attach_bottom: bool,

    pub swallow_decay: i32,
    pub retroactive_swallow: bool,

    pub rules: Vec<Rule>,
    pub monitor_rules: Vec<MonitorRule>,
    pub autostart: Vec<(String, Vec<String>)>,

    /// `fsignal:<n>` dispatch table.
    pub signals: HashMap<i32, SignalHandler<X>>,

    /// Where `quit(restart=1)` writes `<winid> <tagmask>` lines, and where
    /// startup restores them from, if the file exists.
    pub session_file: Option<PathBuf>,

    pub startup_hook: Option<StartupHook<X>>,
}

impl<X> std::fmt::Debug for Config<X>
where
    X: XConn,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("border_width", &self.border_width)
            .field("snap", &self.snap)
            .field("gaps", &self.gaps)
            .field("bar_height", &self.bar_height)
            .field("mfact", &self.mfact)
            .field("nmaster", &self.nmaster)
            .field("rules", &self.rules.len())
            .field("monitor_rules", &self.monitor_rules.len())
            .finish()
    }
}

impl<X> Default for Config<X>
where
    X: XConn,
{
    fn default() -> Self {
        Config {
            border_width: 1,
            snap: 32,
            gaps: Gaps::default(),
            bar_height: 23,
            top_bar: true,
            show_bar_by_default: true,
            normal_border: "#444444ff".try_into().expect("valid hex code"),
            focused_border: "#cc241dff".try_into().expect("valid hex code"),
            marked_border: "#458588ff".try_into().expect("valid hex code"),
            selected_marked_border: "#d79921ff".try_into().expect("valid hex code"),
            normal_bg: "#222222ff".try_into().expect("valid hex code"),
            normal_fg: "#bbbbbbff".try_into().expect("valid hex code"),
            selected_bg: "#005577ff".try_into().expect("valid hex code"),
            selected_fg: "#eeeeeeff".try_into().expect("valid hex code"),
            fonts: vec!["monospace:size=10".to_string()],
            systray_pinned_monitor: Some(0),
            systray_spacing: 2,
            show_systray: true,
            mfact: 0.55,
            nmaster: 1,
            resize_hints: false,
            lock_fullscreen: true,
            focus_follow_mouse: true,
            attach_bottom: false,
            swallow_decay: crate::swallow::DEFAULT_DECAY,
            retroactive_swallow: false,
            rules: Vec::new(),
            monitor_rules: Vec::new(),
            autostart: Vec::new(),
            signals: HashMap::new(),
            session_file: None,
            startup_hook: None,
        }
    }
}

impl<X> Config<X>
where
    X: XConn,
{
    pub fn set_startup_hook<H>(&mut self, hook: H)
    where
        H: FnMut(&mut Wm<X>) -> Result<()> + 'static,
    {
        self.startup_hook = Some(Box::new(hook));
    }
}
