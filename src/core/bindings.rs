//! Key/mouse binding tables and the chord-matching rules: key and button
//! matching masks out `LockMask` and the detected NumLock modifier bit
//! before comparison.
use crate::{core::Wm, error::Error, geometry::Point, x::XConn, Result, Xid};
use std::collections::HashMap;
use std::convert::TryFrom;
use strum::EnumIter;

/// An action bound to a key combination. Boxed so heterogeneous closures can
/// share one table.
pub type KeyEventHandler<X> = Box<dyn FnMut(&mut Wm<X>) -> Result<()>>;

/// An action bound to a mouse button + modifier combination.
pub type MouseEventHandler<X> = Box<dyn FnMut(&mut Wm<X>, &MouseEvent) -> Result<()>>;

pub type KeyBindings<X> = HashMap<KeyCode, KeyEventHandler<X>>;
pub type MouseBindings<X> = HashMap<(MouseEventKind, MouseState), MouseEventHandler<X>>;

pub type KeyCodeMask = u16;
pub type KeyCodeValue = u8;

/// A key press and held modifiers, as delivered by the X server.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyCode {
    pub mask: KeyCodeMask,
    pub code: KeyCodeValue,
}

impl KeyCode {
    /// Strip `mask` (`LockMask` and the detected NumLock bit) before
    /// comparing against the bound keymap.
    pub fn ignoring_modifier(&self, mask: KeyCodeMask) -> KeyCode {
        KeyCode { mask: self.mask & !mask, code: self.code }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
}

impl From<MouseButton> for u8 {
    fn from(b: MouseButton) -> u8 {
        match b {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
        }
    }
}

#[derive(Debug, EnumIter, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKey {
    Ctrl,
    Alt,
    Shift,
    Meta,
}

/// The X11 `KeyButMask`/`ModMask` bit for each modifier, used by backends to
/// build and decode grab masks.
impl From<ModifierKey> for u16 {
    fn from(m: ModifierKey) -> u16 {
        match m {
            ModifierKey::Shift => 1 << 0,
            ModifierKey::Ctrl => 1 << 2,
            ModifierKey::Alt => 1 << 3,
            ModifierKey::Meta => 1 << 6,
        }
    }
}

impl TryFrom<&str> for ModifierKey {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        match s {
            "C" => Ok(Self::Ctrl),
            "A" => Ok(Self::Alt),
            "S" => Ok(Self::Shift),
            "M" => Ok(Self::Meta),
            _ => Err(Error::InvalidConfig("modifier".into(), s.into())),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MouseState {
    pub button: MouseButton,
    pub modifiers: Vec<ModifierKey>,
}

impl MouseState {
    pub fn new(button: MouseButton, mut modifiers: Vec<ModifierKey>) -> Self {
        modifiers.sort();
        Self { button, modifiers }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseEventKind {
    Press,
    Release,
    Motion,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MouseEvent {
    pub id: Xid,
    /// Coordinate relative to the root window.
    pub rpt: Point,
    /// Coordinate relative to the top-left of `id`.
    pub wpt: Point,
    pub state: MouseState,
    pub kind: MouseEventKind,
}

impl MouseEvent {
    pub fn new(id: Xid, rx: i32, ry: i32, ex: i32, ey: i32, state: MouseState, kind: MouseEventKind) -> Self {
        Self { id, rpt: Point::new(rx, ry), wpt: Point::new(ex, ey), state, kind }
    }
}

/// A key press keyed into the keymap after the NumLock/Lock bits are
/// stripped.
pub fn resolve_key_binding<'a, X: XConn>(
    bindings: &'a mut KeyBindings<X>,
    code: KeyCode,
    numlock_mask: KeyCodeMask,
) -> Option<&'a mut KeyEventHandler<X>> {
    let stripped = code.ignoring_modifier(numlock_mask);
    bindings.get_mut(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignoring_modifier_clears_only_the_requested_bits() {
        let code = KeyCode { mask: 0b1011, code: 38 };
        let stripped = code.ignoring_modifier(0b0001);
        assert_eq!(stripped.mask, 0b1010);
    }

    #[test]
    fn mouse_state_sorts_modifiers_for_stable_hashing() {
        let a = MouseState::new(MouseButton::Left, vec![ModifierKey::Shift, ModifierKey::Ctrl]);
        let b = MouseState::new(MouseButton::Left, vec![ModifierKey::Ctrl, ModifierKey::Shift]);
        assert_eq!(a, b);
    }
}
