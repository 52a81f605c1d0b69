use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::core::CanvasSize;
use crate::input::mouse::MouseDevice;

/// Cursor presentation on a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseState {
    Invisible,
    #[default]
    Normal,
    Wait,
}

/// The display surface the cursor lives on. Owned by the renderer, not by input observers.
pub trait Canvas {
    fn size(&self) -> CanvasSize;

    fn mouse_state(&self) -> MouseState;

    fn set_mouse_state(&mut self, state: MouseState);

    /// Warp the cursor to pixel `(x, y)`.
    fn set_mouse_position(&mut self, x: i32, y: i32);
}

/// Headless canvas for tests and tooling.
///
/// When linked to a [`MouseDevice`], warps are delivered to it as cursor movement, the way a
/// windowing system reports a programmatic cursor move back as a motion event.
#[derive(Debug, Default)]
pub struct SimCanvas {
    size: CanvasSize,
    mouse_state: MouseState,
    last_warp: Option<(i32, i32)>,
    linked: Option<Weak<RefCell<MouseDevice>>>,
}

impl SimCanvas {
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn link_device(&mut self, device: &Rc<RefCell<MouseDevice>>) {
        self.linked = Some(Rc::downgrade(device));
    }

    pub fn last_warp(&self) -> Option<(i32, i32)> {
        self.last_warp
    }
}

impl Canvas for SimCanvas {
    fn size(&self) -> CanvasSize {
        self.size
    }

    fn mouse_state(&self) -> MouseState {
        self.mouse_state
    }

    fn set_mouse_state(&mut self, state: MouseState) {
        tracing::debug!(?state, "canvas mouse state");
        self.mouse_state = state;
    }

    fn set_mouse_position(&mut self, x: i32, y: i32) {
        let (max_x, max_y) = self.size.pixel_bounds();
        let x = x.clamp(0, max_x);
        let y = y.clamp(0, max_y);
        tracing::debug!(x, y, "canvas warp");
        self.last_warp = Some((x, y));
        if let Some(device) = self.linked.as_ref().and_then(Weak::upgrade) {
            device.borrow_mut().move_to(x, y);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/canvas.rs"]
mod tests;
