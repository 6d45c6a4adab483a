//! Mouse/key wire-format conversions. Grounded on the teacher's
//! `x11rb::xconn::to_mouse_state` (detail/state -> `MouseState`) and dwm's
//! `CLEANMASK`/`updatenumlockmask` (locate the NumLock modifier bit by
//! scanning `XGetModifierMapping` for the keycode `XKeysymToKeycode` maps
//! `XK_Num_Lock` to).
use crate::core::bindings::{KeyCode, ModifierKey, MouseButton, MouseState};
use crate::Result;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::ConnectionExt as _;

/// The X11 keysym for `Num_Lock`, from `<X11/keysymdef.h>`.
const XK_NUM_LOCK: u32 = 0xff7f;

pub fn mouse_button(detail: u8) -> Option<MouseButton> {
    match detail {
        1 => Some(MouseButton::Left),
        2 => Some(MouseButton::Middle),
        3 => Some(MouseButton::Right),
        4 => Some(MouseButton::ScrollUp),
        5 => Some(MouseButton::ScrollDown),
        _ => None,
    }
}

/// Decode the held modifiers out of a raw `KeyButMask`/`ModMask` state. The
/// bit layout in [`ModifierKey`]'s `From<ModifierKey> for u16` impl already
/// matches the X11 protocol's `ShiftMask`/`ControlMask`/`Mod1Mask`/`Mod4Mask`
/// positions, so no further translation table is needed here.
pub fn modifiers_from_mask(mask: u16) -> Vec<ModifierKey> {
    use strum::IntoEnumIterator;
    ModifierKey::iter().filter(|m| mask & u16::from(*m) != 0).collect()
}

pub fn mouse_state(detail: u8, mask: u16) -> Option<MouseState> {
    let button = mouse_button(detail)?;
    Some(MouseState::new(button, modifiers_from_mask(mask)))
}

pub fn key_code(code: u8, mask: u16) -> KeyCode {
    KeyCode { mask, code }
}

/// Scan the eight modifier groups reported by `GetModifierMapping` for the
/// keycode `Num_Lock` is bound to, returning the `1 << group` mask dwm calls
/// `numlockmask`. `0` if the keyboard has no `Num_Lock` binding.
pub fn find_numlock_mask<C: Connection>(conn: &C) -> Result<u16> {
    let keysyms = conn.get_keyboard_mapping(conn.setup().min_keycode, conn.setup().max_keycode - conn.setup().min_keycode + 1)?.reply()?;
    let modmap = conn.get_modifier_mapping()?.reply()?;

    let num_lock_keycodes: Vec<u8> = (conn.setup().min_keycode..=conn.setup().max_keycode)
        .filter(|&code| {
            let idx = (code - conn.setup().min_keycode) as usize * keysyms.keysyms_per_keycode as usize;
            keysyms.keysyms[idx..idx + keysyms.keysyms_per_keycode as usize]
                .iter()
                .any(|&ks| ks == XK_NUM_LOCK)
        })
        .collect();

    if num_lock_keycodes.is_empty() {
        return Ok(0);
    }

    let per_mod = modmap.keycodes_per_modifier() as usize;
    for group in 0..8 {
        for j in 0..per_mod {
            let code = modmap.keycodes[group * per_mod + j];
            if num_lock_keycodes.contains(&code) {
                return Ok(1 << group);
            }
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_button_maps_known_details() {
        assert_eq!(mouse_button(1), Some(MouseButton::Left));
        assert_eq!(mouse_button(2), Some(MouseButton::Middle));
        assert_eq!(mouse_button(3), Some(MouseButton::Right));
        assert_eq!(mouse_button(4), Some(MouseButton::ScrollUp));
        assert_eq!(mouse_button(5), Some(MouseButton::ScrollDown));
        assert_eq!(mouse_button(9), None);
    }

    #[test]
    fn modifiers_from_mask_decodes_bits() {
        let mask = u16::from(ModifierKey::Ctrl) | u16::from(ModifierKey::Meta);
        let mods = modifiers_from_mask(mask);
        assert!(mods.contains(&ModifierKey::Ctrl));
        assert!(mods.contains(&ModifierKey::Meta));
        assert!(!mods.contains(&ModifierKey::Shift));
        assert!(!mods.contains(&ModifierKey::Alt));
    }

    #[test]
    fn mouse_state_combines_button_and_modifiers() {
        let mask = u16::from(ModifierKey::Meta);
        let state = mouse_state(1, mask).expect("left click is a known button");
        assert_eq!(state.button, MouseButton::Left);
        assert!(state.modifiers.contains(&ModifierKey::Meta));
    }

    #[test]
    fn mouse_state_rejects_unknown_button() {
        assert!(mouse_state(0, 0).is_none());
    }

    #[test]
    fn key_code_carries_mask_and_code_through() {
        let kc = key_code(38, 0x0008);
        assert_eq!(kc.code, 38);
        assert_eq!(kc.mask, 0x0008);
    }
}
