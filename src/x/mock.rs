//! A test double for [`XConn`], used by the client/monitor/layout unit tests
//! instead of a real X11 connection. Grounded on the teacher's `x::mock`
//! (the `mock_$method` forwarding-trait pattern), retargeted at the new
//! trait surface and widened to cover the extra property/hints queries
//! `manage` (spec.md §4.3) needs.
use crate::{
    core::bindings::{KeyCode, MouseState},
    error::Error,
    geometry::{Point, Rect, SizeHints},
    x::{Atom, Prop, WinType, WindowAttributes, WmHints, XConn, XEvent},
    Color, Result, Xid,
};

/// Every method defaults to `Err(Error::UnimplementedMock)` (or a harmless
/// no-op for `flush`/`root`). A test implements only the methods its
/// scenario actually exercises; any implementor of this trait automatically
/// implements [`XConn`] via the blanket impl below.
#[allow(unused_variables)]
pub trait MockXConn {
    fn mock_next_event(&self) -> Result<XEvent> {
        Err(Error::UnimplementedMock)
    }

    fn mock_flush(&self) {}

    fn mock_root(&self) -> Xid {
        Xid(0)
    }

    fn mock_screen_rects(&self) -> Result<Vec<Rect>> {
        Err(Error::UnimplementedMock)
    }

    fn mock_window_attributes(&self, id: Xid) -> Result<WindowAttributes> {
        Err(Error::UnimplementedMock)
    }

    fn mock_map_window(&self, id: Xid) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_unmap_window(&self, id: Xid) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_configure_window(&self, id: Xid, rect: Rect, border_w: i32) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_raise_window(&self, id: Xid) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_restack(&self, ids: &[Xid]) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_kill_window(&self, id: Xid) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_destroy_window(&self, id: Xid) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_new_window(&self, ty: WinType, rect: Rect, managed: bool) -> Result<Xid> {
        Err(Error::UnimplementedMock)
    }

    fn mock_set_border_width(&self, id: Xid, width: i32) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_set_border_color(&self, id: Xid, color: Color) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_set_input_focus(&self, id: Xid) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_send_protocol_message(&self, id: Xid, atom: Atom) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_supports_protocol(&self, id: Xid, atom: Atom) -> Result<bool> {
        Err(Error::UnimplementedMock)
    }

    fn mock_get_prop(&self, id: Xid, name: &str) -> Result<Option<Prop>> {
        Err(Error::UnimplementedMock)
    }

    fn mock_change_prop(&self, id: Xid, name: &str, value: Prop) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_delete_prop(&self, id: Xid, name: &str) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_get_transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        Err(Error::UnimplementedMock)
    }

    fn mock_get_size_hints(&self, id: Xid) -> Result<SizeHints> {
        Err(Error::UnimplementedMock)
    }

    fn mock_get_wm_hints(&self, id: Xid) -> Result<WmHints> {
        Err(Error::UnimplementedMock)
    }

    fn mock_get_window_class(&self, id: Xid) -> Result<(String, String)> {
        Err(Error::UnimplementedMock)
    }

    fn mock_get_window_title(&self, id: Xid) -> Result<String> {
        Err(Error::UnimplementedMock)
    }

    fn mock_get_window_type(&self, id: Xid) -> Result<Vec<Atom>> {
        Err(Error::UnimplementedMock)
    }

    fn mock_grab_keys(&self, keys: &[KeyCode]) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_grab_buttons(&self, states: &[MouseState]) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_grab_keyboard(&self) -> Result<bool> {
        Err(Error::UnimplementedMock)
    }

    fn mock_ungrab_keyboard(&self) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_grab_pointer(&self) -> Result<bool> {
        Err(Error::UnimplementedMock)
    }

    fn mock_ungrab_pointer(&self) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_query_pointer(&self) -> Result<Point> {
        Err(Error::UnimplementedMock)
    }

    fn mock_warp_pointer(&self, id: Xid, p: Point) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_get_root_name(&self) -> Result<String> {
        Err(Error::UnimplementedMock)
    }

    fn mock_set_root_name(&self, name: &str) -> Result<()> {
        Err(Error::UnimplementedMock)
    }

    fn mock_try_become_wm(&self) -> Result<()> {
        Err(Error::UnimplementedMock)
    }
}

impl<T> XConn for T
where
    T: MockXConn,
{
    fn next_event(&self) -> Result<XEvent> {
        self.mock_next_event()
    }

    fn flush(&self) {
        self.mock_flush()
    }

    fn root(&self) -> Xid {
        self.mock_root()
    }

    fn screen_rects(&self) -> Result<Vec<Rect>> {
        self.mock_screen_rects()
    }

    fn window_attributes(&self, id: Xid) -> Result<WindowAttributes> {
        self.mock_window_attributes(id)
    }

    fn map_window(&self, id: Xid) -> Result<()> {
        self.mock_map_window(id)
    }

    fn unmap_window(&self, id: Xid) -> Result<()> {
        self.mock_unmap_window(id)
    }

    fn configure_window(&self, id: Xid, rect: Rect, border_w: i32) -> Result<()> {
        self.mock_configure_window(id, rect, border_w)
    }

    fn raise_window(&self, id: Xid) -> Result<()> {
        self.mock_raise_window(id)
    }

    fn restack(&self, ids: &[Xid]) -> Result<()> {
        self.mock_restack(ids)
    }

    fn kill_window(&self, id: Xid) -> Result<()> {
        self.mock_kill_window(id)
    }

    fn destroy_window(&self, id: Xid) -> Result<()> {
        self.mock_destroy_window(id)
    }

    fn new_window(&self, ty: WinType, rect: Rect, managed: bool) -> Result<Xid> {
        self.mock_new_window(ty, rect, managed)
    }

    fn set_border_width(&self, id: Xid, width: i32) -> Result<()> {
        self.mock_set_border_width(id, width)
    }

    fn set_border_color(&self, id: Xid, color: Color) -> Result<()> {
        self.mock_set_border_color(id, color)
    }

    fn set_input_focus(&self, id: Xid) -> Result<()> {
        self.mock_set_input_focus(id)
    }

    fn send_protocol_message(&self, id: Xid, atom: Atom) -> Result<()> {
        self.mock_send_protocol_message(id, atom)
    }

    fn supports_protocol(&self, id: Xid, atom: Atom) -> Result<bool> {
        self.mock_supports_protocol(id, atom)
    }

    fn get_prop(&self, id: Xid, name: &str) -> Result<Option<Prop>> {
        self.mock_get_prop(id, name)
    }

    fn change_prop(&self, id: Xid, name: &str, value: Prop) -> Result<()> {
        self.mock_change_prop(id, name, value)
    }

    fn delete_prop(&self, id: Xid, name: &str) -> Result<()> {
        self.mock_delete_prop(id, name)
    }

    fn get_transient_for(&self, id: Xid) -> Result<Option<Xid>> {
        self.mock_get_transient_for(id)
    }

    fn get_size_hints(&self, id: Xid) -> Result<SizeHints> {
        self.mock_get_size_hints(id)
    }

    fn get_wm_hints(&self, id: Xid) -> Result<WmHints> {
        self.mock_get_wm_hints(id)
    }

    fn get_window_class(&self, id: Xid) -> Result<(String, String)> {
        self.mock_get_window_class(id)
    }

    fn get_window_title(&self, id: Xid) -> Result<String> {
        self.mock_get_window_title(id)
    }

    fn get_window_type(&self, id: Xid) -> Result<Vec<Atom>> {
        self.mock_get_window_type(id)
    }

    fn grab_keys(&self, keys: &[KeyCode]) -> Result<()> {
        self.mock_grab_keys(keys)
    }

    fn grab_buttons(&self, states: &[MouseState]) -> Result<()> {
        self.mock_grab_buttons(states)
    }

    fn grab_keyboard(&self) -> Result<bool> {
        self.mock_grab_keyboard()
    }

    fn ungrab_keyboard(&self) -> Result<()> {
        self.mock_ungrab_keyboard()
    }

    fn grab_pointer(&self) -> Result<bool> {
        self.mock_grab_pointer()
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.mock_ungrab_pointer()
    }

    fn query_pointer(&self) -> Result<Point> {
        self.mock_query_pointer()
    }

    fn warp_pointer(&self, id: Xid, p: Point) -> Result<()> {
        self.mock_warp_pointer(id, p)
    }

    fn get_root_name(&self) -> Result<String> {
        self.mock_get_root_name()
    }

    fn set_root_name(&self, name: &str) -> Result<()> {
        self.mock_set_root_name(name)
    }

    fn try_become_wm(&self) -> Result<()> {
        self.mock_try_become_wm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysEmptyScreens;
    impl MockXConn for AlwaysEmptyScreens {
        fn mock_screen_rects(&self) -> Result<Vec<Rect>> {
            Ok(vec![Rect::new(0, 0, 1920, 1080)])
        }
    }

    #[test]
    fn unimplemented_methods_error_by_default() {
        let x = AlwaysEmptyScreens;
        assert!(matches!(x.get_root_name(), Err(Error::UnimplementedMock)));
    }

    #[test]
    fn overridden_method_returns_its_value() {
        let x = AlwaysEmptyScreens;
        assert_eq!(x.screen_rects().unwrap(), vec![Rect::new(0, 0, 1920, 1080)]);
    }

    #[test]
    fn default_root_is_zero() {
        let x = AlwaysEmptyScreens;
        assert_eq!(x.root(), Xid(0));
    }
}
