//! `dynwm`: a dynamic tiling window manager for X11, in the style of dwm.
//!
//! The crate is split into a pure client/monitor/layout graph (testable
//! without an X connection) and the [`x`] capability boundary that drives a
//! real server. [`core::Wm`] ties the two together and owns the event loop.
pub mod actions;
pub mod alttab;
pub mod bar;
pub mod client;
pub mod color;
pub mod core;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod layout;
pub mod monitor;
pub mod pertag;
pub mod rules;
pub mod scratchpad;
pub mod session;
pub mod signals;
pub mod swallow;
pub mod tagset;
pub mod x;

#[cfg(feature = "x11rb")]
pub mod x11rb;

pub use color::Color;
pub use core::{Wm, Xid};
pub use error::{Error, Result};
