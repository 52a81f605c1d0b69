use super::*;
use crate::input::device::{InputDevice, MouseInput};
use crate::foundation::core::Point;

#[test]
fn starts_with_a_normal_cursor() {
    let c = SimCanvas::new(CanvasSize::new(320, 240).unwrap());
    assert_eq!(c.mouse_state(), MouseState::Normal);
    assert_eq!(c.size().width, 320);
    assert_eq!(c.last_warp(), None);
}

#[test]
fn warp_is_clamped_to_the_surface() {
    let mut c = SimCanvas::new(CanvasSize::new(100, 50).unwrap());
    c.set_mouse_position(500, -3);
    assert_eq!(c.last_warp(), Some((99, 0)));
}

#[test]
fn warp_on_an_oversized_surface_does_not_panic() {
    let mut c = SimCanvas::new(CanvasSize {
        width: 3_000_000_000,
        height: 100,
    });
    c.set_mouse_position(i32::MAX, 500);
    assert_eq!(c.last_warp(), Some((i32::MAX, 99)));
}

#[test]
fn warp_reaches_a_linked_device() {
    let device = Rc::new(RefCell::new(MouseDevice::new()));
    let mut c = SimCanvas::new(CanvasSize::new(100, 50).unwrap());
    c.link_device(&device);
    c.set_mouse_position(40, 20);
    assert_eq!(device.borrow().pixel_position(), Point::new(40.0, 20.0));
    assert!(device.borrow().input(MouseInput::MouseX).is_active());

    drop(device);
    c.set_mouse_position(1, 1);
    assert_eq!(c.last_warp(), Some((1, 1)));
}
