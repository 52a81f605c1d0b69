use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::foundation::core::FrameIndex;
use crate::value::Value;

/// Inputs a mouse device reports. Names and codes are part of the host contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum MouseInput {
    #[serde(rename = "LEFTMOUSE")]
    LeftMouse,
    #[serde(rename = "MIDDLEMOUSE")]
    MiddleMouse,
    #[serde(rename = "RIGHTMOUSE")]
    RightMouse,
    #[serde(rename = "BUTTON4MOUSE")]
    Button4Mouse,
    #[serde(rename = "BUTTON5MOUSE")]
    Button5Mouse,
    #[serde(rename = "WHEELUPMOUSE")]
    WheelUpMouse,
    #[serde(rename = "WHEELDOWNMOUSE")]
    WheelDownMouse,
    #[serde(rename = "MOUSEX")]
    MouseX,
    #[serde(rename = "MOUSEY")]
    MouseY,
}

impl MouseInput {
    pub const COUNT: usize = 9;

    /// Every mouse input, in code order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::LeftMouse,
        Self::MiddleMouse,
        Self::RightMouse,
        Self::Button4Mouse,
        Self::Button5Mouse,
        Self::WheelUpMouse,
        Self::WheelDownMouse,
        Self::MouseX,
        Self::MouseY,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::LeftMouse => "LEFTMOUSE",
            Self::MiddleMouse => "MIDDLEMOUSE",
            Self::RightMouse => "RIGHTMOUSE",
            Self::Button4Mouse => "BUTTON4MOUSE",
            Self::Button5Mouse => "BUTTON5MOUSE",
            Self::WheelUpMouse => "WHEELUPMOUSE",
            Self::WheelDownMouse => "WHEELDOWNMOUSE",
            Self::MouseX => "MOUSEX",
            Self::MouseY => "MOUSEY",
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Self::LeftMouse => 1,
            Self::MiddleMouse => 2,
            Self::RightMouse => 3,
            Self::Button4Mouse => 4,
            Self::Button5Mouse => 5,
            Self::WheelUpMouse => 6,
            Self::WheelDownMouse => 7,
            Self::MouseX => 8,
            Self::MouseY => 9,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.code() - 1)
    }

    /// Buttons hold their state until released.
    pub fn is_button(self) -> bool {
        !self.is_pulse()
    }

    /// Wheel and axis inputs fire for one frame and release on their own.
    pub fn is_pulse(self) -> bool {
        matches!(
            self,
            Self::WheelUpMouse | Self::WheelDownMouse | Self::MouseX | Self::MouseY
        )
    }
}

/// Legacy per-input status, with stable integer codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InputStatus {
    #[default]
    None = 0,
    JustActivated = 1,
    Active = 2,
    JustReleased = 3,
}

impl InputStatus {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::JustActivated | Self::Active)
    }

    /// Status an input settles into at the start of the following frame.
    fn carried(self) -> Self {
        if self.is_active() {
            Self::Active
        } else {
            Self::None
        }
    }
}

/// State of one input during the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    /// Statuses the input went through this frame; the last one is current.
    pub status: SmallVec<[InputStatus; 4]>,
    /// Transitions that happened during this frame.
    pub queue: SmallVec<[InputStatus; 4]>,
    /// Raw values: pixel coordinates for axes, 1/0 for buttons, wheel ticks for the wheel.
    pub values: SmallVec<[i32; 4]>,
}

impl Default for InputEvent {
    fn default() -> Self {
        Self {
            status: SmallVec::from_elem(InputStatus::None, 1),
            queue: SmallVec::new(),
            values: SmallVec::from_elem(0, 1),
        }
    }
}

impl InputEvent {
    pub fn current(&self) -> InputStatus {
        self.status.last().copied().unwrap_or_default()
    }

    pub fn is_active(&self) -> bool {
        self.current().is_active()
    }

    /// Went down at some point this frame.
    pub fn activated(&self) -> bool {
        self.queue.contains(&InputStatus::JustActivated)
    }

    /// Went up at some point this frame.
    pub fn released(&self) -> bool {
        self.queue.contains(&InputStatus::JustReleased)
    }

    pub fn last_value(&self) -> i32 {
        self.values.last().copied().unwrap_or(0)
    }

    pub(crate) fn push(&mut self, status: InputStatus, value: Option<i32>) {
        self.status.push(status);
        self.queue.push(status);
        if let Some(v) = value {
            self.values.push(v);
        }
    }

    /// Collapse to the state the next frame starts from.
    pub(crate) fn advance(&mut self, pulse: bool, keep_value: bool) {
        let next = if pulse && self.is_active() {
            InputStatus::JustReleased
        } else {
            self.current().carried()
        };
        let last = if keep_value { self.last_value() } else { 0 };
        self.status.clear();
        self.status.push(next);
        self.queue.clear();
        if next == InputStatus::JustReleased {
            self.queue.push(next);
        }
        self.values.clear();
        self.values.push(last);
    }

    /// Host-facing record with the fields scripts read.
    pub fn to_value(&self) -> Value {
        fn statuses(s: &[InputStatus]) -> Value {
            Value::List(s.iter().map(|st| Value::Int(st.code())).collect())
        }

        let mut m = BTreeMap::new();
        m.insert("status".to_owned(), statuses(&self.status));
        m.insert("queue".to_owned(), statuses(&self.queue));
        m.insert(
            "values".to_owned(),
            Value::List(self.values.iter().map(|&v| Value::Int(i64::from(v))).collect()),
        );
        m.insert("active".to_owned(), Value::Bool(self.is_active()));
        m.insert("activated".to_owned(), Value::Bool(self.activated()));
        m.insert("released".to_owned(), Value::Bool(self.released()));
        Value::Map(m)
    }
}

/// A source of per-frame mouse state, owned by the engine rather than by its observers.
pub trait InputDevice {
    /// Frame the reported state belongs to.
    fn frame(&self) -> FrameIndex;

    fn input(&self, key: MouseInput) -> &InputEvent;

    /// `false` when the physical device is disconnected or not yet initialized.
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/device.rs"]
mod tests;
