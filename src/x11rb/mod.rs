//! The real X11 backend, built on the `x11rb` crate (spec.md §1: "a
//! concrete backend drives a real server behind the `XConn` capability
//! boundary"). Grounded on the teacher's `x11rb` module, which took the same
//! approach (connect, intern atoms, implement the trait against a generic
//! `Connection`); the drawing/font code that used to live alongside it has
//! no counterpart here because [`crate::x::XConn`] has no rendering methods
//! of its own, that responsibility belongs entirely to `dynwm_ui`.
mod atom;
mod conversions;
mod xconn;

pub use xconn::{connect, X11rbConn};
