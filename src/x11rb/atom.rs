//! Atom interning against the live server (spec.md §6 "X11 properties
//! consumed"). Grounded on the teacher's `x11rb::common::Atoms` (intern every
//! known atom up front, in two passes so the `InternAtom` requests are all in
//! flight before any reply is awaited), retargeted at [`crate::x::Atom`].
use crate::x::Atom;
use crate::Result;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::ConnectionExt as _;

/// Forward (`Atom` -> interned id) and reverse (id -> `Atom`) lookup tables,
/// built once at connection time.
#[derive(Debug, Default)]
pub struct AtomCache {
    forward: HashMap<Atom, u32>,
    reverse: HashMap<u32, Atom>,
}

impl AtomCache {
    pub fn intern_all<C: Connection>(conn: &C) -> Result<Self> {
        let cookies = Atom::iter()
            .map(|atom| Ok((atom, conn.intern_atom(false, atom.as_ref().as_bytes())?)))
            .collect::<Result<Vec<_>>>()?;

        let mut forward = HashMap::with_capacity(cookies.len());
        let mut reverse = HashMap::with_capacity(cookies.len());
        for (atom, cookie) in cookies {
            let id = cookie.reply()?.atom;
            forward.insert(atom, id);
            reverse.insert(id, atom);
        }
        Ok(Self { forward, reverse })
    }

    /// Panics if `atom` was somehow missed by `intern_all`: every variant of
    /// [`crate::x::Atom`] is interned unconditionally at startup.
    pub fn id(&self, atom: Atom) -> u32 {
        *self.forward.get(&atom).expect("all Atom variants are interned at startup")
    }

    pub fn name(&self, id: u32) -> Option<Atom> {
        self.reverse.get(&id).copied()
    }
}
