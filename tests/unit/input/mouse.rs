use super::*;

#[test]
fn press_hold_release_cycle() {
    let mut m = MouseDevice::new();
    m.press(MouseInput::LeftMouse);
    assert_eq!(m.input(MouseInput::LeftMouse).current(), InputStatus::JustActivated);

    m.next_frame();
    assert_eq!(m.input(MouseInput::LeftMouse).current(), InputStatus::Active);

    m.press(MouseInput::LeftMouse);
    assert_eq!(m.input(MouseInput::LeftMouse).status.len(), 1);

    m.release(MouseInput::LeftMouse);
    assert_eq!(m.input(MouseInput::LeftMouse).current(), InputStatus::JustReleased);
    assert!(m.input(MouseInput::LeftMouse).released());

    m.next_frame();
    assert_eq!(m.input(MouseInput::LeftMouse).current(), InputStatus::None);
}

#[test]
fn click_within_one_frame_records_both_transitions() {
    let mut m = MouseDevice::new();
    m.press(MouseInput::RightMouse);
    m.release(MouseInput::RightMouse);
    let ev = m.input(MouseInput::RightMouse);
    assert!(ev.activated());
    assert!(ev.released());
    assert!(!ev.is_active());
}

#[test]
fn releasing_an_idle_button_is_ignored() {
    let mut m = MouseDevice::new();
    m.release(MouseInput::MiddleMouse);
    assert_eq!(m.input(MouseInput::MiddleMouse), &InputEvent::default());
}

#[test]
fn wheel_ticks_are_one_frame_pulses() {
    let mut m = MouseDevice::new();
    m.scroll(true);
    m.scroll(true);
    let ev = m.input(MouseInput::WheelUpMouse);
    assert_eq!(ev.current(), InputStatus::JustActivated);
    assert_eq!(ev.last_value(), 2);

    m.next_frame();
    assert_eq!(
        m.input(MouseInput::WheelUpMouse).current(),
        InputStatus::JustReleased
    );
    m.next_frame();
    assert_eq!(m.input(MouseInput::WheelUpMouse).current(), InputStatus::None);
    assert_eq!(m.input(MouseInput::WheelDownMouse).current(), InputStatus::None);
}

#[test]
fn movement_fires_changed_axes_and_keeps_position() {
    let mut m = MouseDevice::new();
    m.move_to(10, 0);
    assert!(m.input(MouseInput::MouseX).is_active());
    assert!(!m.input(MouseInput::MouseY).is_active());

    m.move_to(12, 4);
    assert_eq!(
        m.input(MouseInput::MouseX).current(),
        InputStatus::Active
    );
    assert_eq!(m.pixel_position(), Point::new(12.0, 4.0));

    m.next_frame();
    m.next_frame();
    assert!(!m.input(MouseInput::MouseX).is_active());
    assert_eq!(m.pixel_position(), Point::new(12.0, 4.0));
}

#[test]
fn frames_and_availability() {
    let mut m = MouseDevice::new();
    assert_eq!(m.frame(), FrameIndex(0));
    m.next_frame();
    assert_eq!(m.frame(), FrameIndex(1));
    assert!(m.is_available());
    m.set_available(false);
    assert!(!m.is_available());
}
