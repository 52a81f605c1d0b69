use crate::foundation::core::{FrameIndex, Point};
use crate::input::device::{InputDevice, InputEvent, InputStatus, MouseInput};

/// In-memory mouse fed by the host's window events.
///
/// Events accumulate during a frame; [`MouseDevice::next_frame`] collapses them into the state
/// the next frame starts from.
#[derive(Debug, Clone)]
pub struct MouseDevice {
    frame: FrameIndex,
    inputs: [InputEvent; MouseInput::COUNT],
    available: bool,
}

impl Default for MouseDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseDevice {
    pub fn new() -> Self {
        Self {
            frame: FrameIndex::default(),
            inputs: std::array::from_fn(|_| InputEvent::default()),
            available: true,
        }
    }

    fn event_mut(&mut self, key: MouseInput) -> &mut InputEvent {
        &mut self.inputs[key.index()]
    }

    /// Button down. Pressing a button that is already down is ignored.
    pub fn press(&mut self, button: MouseInput) {
        let ev = self.event_mut(button);
        if !ev.is_active() {
            ev.push(InputStatus::JustActivated, Some(1));
        }
    }

    /// Button up. Releasing a button that is not down is ignored.
    pub fn release(&mut self, button: MouseInput) {
        let ev = self.event_mut(button);
        if ev.is_active() {
            ev.push(InputStatus::JustReleased, Some(0));
        }
    }

    /// Cursor moved to pixel `(x, y)`. Only axes whose coordinate changed fire.
    pub fn move_to(&mut self, x: i32, y: i32) {
        for (axis, v) in [(MouseInput::MouseX, x), (MouseInput::MouseY, y)] {
            let ev = self.event_mut(axis);
            if ev.last_value() == v {
                continue;
            }
            let status = if ev.is_active() {
                InputStatus::Active
            } else {
                InputStatus::JustActivated
            };
            ev.status.push(status);
            if status == InputStatus::JustActivated {
                ev.queue.push(status);
            }
            ev.values.push(v);
        }
    }

    /// One wheel tick.
    pub fn scroll(&mut self, up: bool) {
        let key = if up {
            MouseInput::WheelUpMouse
        } else {
            MouseInput::WheelDownMouse
        };
        let ev = self.event_mut(key);
        let ticks = ev.last_value().saturating_add(1);
        if ev.is_active() {
            ev.values.push(ticks);
        } else {
            ev.push(InputStatus::JustActivated, Some(ticks));
        }
    }

    /// Start a new frame.
    pub fn next_frame(&mut self) {
        for key in MouseInput::ALL {
            let keep_value = !matches!(key, MouseInput::WheelUpMouse | MouseInput::WheelDownMouse);
            self.event_mut(key).advance(key.is_pulse(), keep_value);
        }
        self.frame = self.frame.next();
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Last known cursor position in pixels.
    pub fn pixel_position(&self) -> Point {
        Point::new(
            f64::from(self.input(MouseInput::MouseX).last_value()),
            f64::from(self.input(MouseInput::MouseY).last_value()),
        )
    }
}

impl InputDevice for MouseDevice {
    fn frame(&self) -> FrameIndex {
        self.frame
    }

    fn input(&self, key: MouseInput) -> &InputEvent {
        &self.inputs[key.index()]
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/mouse.rs"]
mod tests;
