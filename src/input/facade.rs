use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::foundation::core::{FrameIndex, Point};
use crate::foundation::error::{LogicError, LogicResult};
use crate::input::canvas::{Canvas, MouseState};
use crate::input::device::{InputDevice, InputEvent, InputStatus, MouseInput};
use crate::input::property::{Attributes, MethodDescriptor, PropertyDescriptor};
use crate::value::Value;

/// Non-owning handle to the engine's input device.
#[derive(Clone)]
pub struct DeviceHandle(Weak<RefCell<dyn InputDevice>>);

impl DeviceHandle {
    pub fn new<D: InputDevice + 'static>(device: &Rc<RefCell<D>>) -> Self {
        let weak: Weak<RefCell<D>> = Rc::downgrade(device);
        Self(weak)
    }

    fn upgrade(&self) -> LogicResult<Rc<RefCell<dyn InputDevice>>> {
        self.0.upgrade().ok_or_else(|| {
            tracing::warn!("mouse device dropped while a facade still refers to it");
            LogicError::device_unavailable("mouse device is gone")
        })
    }
}

/// Non-owning handle to the canvas the cursor is drawn on.
#[derive(Clone)]
pub struct CanvasHandle(Weak<RefCell<dyn Canvas>>);

impl CanvasHandle {
    pub fn new<C: Canvas + 'static>(canvas: &Rc<RefCell<C>>) -> Self {
        let weak: Weak<RefCell<C>> = Rc::downgrade(canvas);
        Self(weak)
    }

    fn upgrade(&self) -> LogicResult<Rc<RefCell<dyn Canvas>>> {
        self.0.upgrade().ok_or_else(|| {
            tracing::warn!("canvas dropped while a mouse facade still refers to it");
            LogicError::device_unavailable("canvas is gone")
        })
    }
}

#[derive(Debug, Clone)]
struct EventSnapshot {
    frame: FrameIndex,
    inputs: BTreeMap<MouseInput, InputEvent>,
}

/// Script-facing view of the mouse.
///
/// Reads go to the device and canvas on demand; the per-input event records are snapshotted on the
/// first query of each device frame. Cursor visibility lives on the canvas only.
pub struct MouseFacade {
    device: DeviceHandle,
    canvas: CanvasHandle,
    event_cache: RefCell<Option<EventSnapshot>>,
}

impl MouseFacade {
    pub fn new(device: DeviceHandle, canvas: CanvasHandle) -> Self {
        Self {
            device,
            canvas,
            event_cache: RefCell::new(None),
        }
    }

    fn with_device<R>(&self, f: impl FnOnce(&dyn InputDevice) -> R) -> LogicResult<R> {
        let rc = self.device.upgrade()?;
        let device = rc.borrow();
        if !device.is_available() {
            tracing::warn!("mouse device reports unavailable");
            return Err(LogicError::device_unavailable("mouse device is not available"));
        }
        Ok(f(&*device))
    }

    fn with_canvas<R>(&self, f: impl FnOnce(&mut dyn Canvas) -> R) -> LogicResult<R> {
        let rc = self.canvas.upgrade()?;
        let mut canvas = rc
            .try_borrow_mut()
            .map_err(|_| LogicError::device_unavailable("canvas is borrowed elsewhere"))?;
        Ok(f(&mut *canvas))
    }

    /// Event records for the device's current frame, rebuilt when the frame has moved on.
    fn snapshot(&self) -> LogicResult<BTreeMap<MouseInput, InputEvent>> {
        let frame = self.with_device(|d| d.frame())?;
        if let Some(snap) = self.event_cache.borrow().as_ref() {
            if snap.frame == frame {
                return Ok(snap.inputs.clone());
            }
        }

        tracing::debug!(frame = frame.0, "rebuilding mouse event snapshot");
        let inputs = self.with_device(|d| {
            MouseInput::ALL
                .into_iter()
                .map(|key| (key, d.input(key).clone()))
                .collect::<BTreeMap<_, _>>()
        })?;
        *self.event_cache.borrow_mut() = Some(EventSnapshot {
            frame,
            inputs: inputs.clone(),
        });
        Ok(inputs)
    }

    fn invalidate(&self) {
        self.event_cache.borrow_mut().take();
    }

    /// Show or hide the cursor.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn show(&self, visible: bool) -> LogicResult<()> {
        let state = if visible {
            MouseState::Normal
        } else {
            MouseState::Invisible
        };
        self.with_canvas(|c| c.set_mouse_state(state))
    }

    /// Current legacy status of every mouse input.
    pub fn events(&self) -> LogicResult<BTreeMap<MouseInput, InputStatus>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .map(|(k, ev)| (k, ev.current()))
            .collect())
    }

    /// Full event record of every mouse input.
    pub fn inputs(&self) -> LogicResult<BTreeMap<MouseInput, InputEvent>> {
        self.snapshot()
    }

    /// `events` restricted to inputs whose status is not `None`.
    pub fn active_events(&self) -> LogicResult<BTreeMap<MouseInput, InputStatus>> {
        let mut events = self.events()?;
        events.retain(|_, st| *st != InputStatus::None);
        Ok(events)
    }

    /// `inputs` restricted to inputs whose current status is not `None`.
    pub fn active_inputs(&self) -> LogicResult<BTreeMap<MouseInput, InputEvent>> {
        let mut inputs = self.inputs()?;
        inputs.retain(|_, ev| ev.current() != InputStatus::None);
        Ok(inputs)
    }

    /// Cursor position normalized to `[0, 1]` on both axes.
    pub fn position(&self) -> LogicResult<Point> {
        let px = self.with_device(|d| {
            Point::new(
                f64::from(d.input(MouseInput::MouseX).last_value()),
                f64::from(d.input(MouseInput::MouseY).last_value()),
            )
        })?;
        let size = self.with_canvas(|c| c.size())?;
        Ok(size.normalize(px))
    }

    /// Warp the cursor to a normalized position.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_position(&self, pos: Point) -> LogicResult<()> {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return Err(LogicError::type_error("position components must be finite"));
        }
        self.with_canvas(|c| {
            let (x, y) = c.size().denormalize(pos);
            c.set_mouse_position(x, y);
        })?;
        self.invalidate();
        Ok(())
    }

    pub fn visible(&self) -> LogicResult<bool> {
        self.with_canvas(|c| c.mouse_state() != MouseState::Invisible)
    }

    pub fn set_visible(&self, visible: bool) -> LogicResult<()> {
        self.show(visible)
    }
}

fn events_value(events: BTreeMap<MouseInput, InputStatus>) -> Value {
    Value::Map(
        events
            .into_iter()
            .map(|(k, st)| (k.name().to_owned(), Value::Int(st.code())))
            .collect(),
    )
}

fn inputs_value(inputs: BTreeMap<MouseInput, InputEvent>) -> Value {
    Value::Map(
        inputs
            .into_iter()
            .map(|(k, ev)| (k.name().to_owned(), ev.to_value()))
            .collect(),
    )
}

fn point_from_value(v: &Value) -> LogicResult<Point> {
    match v {
        Value::List(items) if items.len() == 2 => {
            match (items[0].as_f64(), items[1].as_f64()) {
                (Some(x), Some(y)) => Ok(Point::new(x, y)),
                _ => Err(LogicError::type_error(
                    "position expects two numbers [x, y]",
                )),
            }
        }
        other => Err(LogicError::type_error(format!(
            "position expects [x, y], got {}",
            other.kind()
        ))),
    }
}

fn bool_from_value(v: &Value, what: &str) -> LogicResult<bool> {
    v.as_bool()
        .ok_or_else(|| LogicError::type_error(format!("{what} expects bool, got {}", v.kind())))
}

fn get_events(m: &MouseFacade) -> LogicResult<Value> {
    m.events().map(events_value)
}

fn get_inputs(m: &MouseFacade) -> LogicResult<Value> {
    m.inputs().map(inputs_value)
}

fn get_active_events(m: &MouseFacade) -> LogicResult<Value> {
    m.active_events().map(events_value)
}

fn get_active_inputs(m: &MouseFacade) -> LogicResult<Value> {
    m.active_inputs().map(inputs_value)
}

fn get_position(m: &MouseFacade) -> LogicResult<Value> {
    let p = m.position()?;
    Ok(Value::List(vec![Value::Float(p.x), Value::Float(p.y)]))
}

fn set_position(m: &MouseFacade, v: Value) -> LogicResult<()> {
    m.set_position(point_from_value(&v)?)
}

fn get_visible(m: &MouseFacade) -> LogicResult<Value> {
    m.visible().map(Value::Bool)
}

fn set_visible(m: &MouseFacade, v: Value) -> LogicResult<()> {
    m.set_visible(bool_from_value(&v, "visible")?)
}

fn call_show(m: &MouseFacade, args: &[Value]) -> LogicResult<Value> {
    let [arg] = args else {
        return Err(LogicError::type_error(format!(
            "show expects 1 argument, got {}",
            args.len()
        )));
    };
    m.show(bool_from_value(arg, "show")?)?;
    Ok(Value::Null)
}

static MOUSE_PROPERTIES: [PropertyDescriptor<MouseFacade>; 6] = [
    PropertyDescriptor::read_only(
        "events",
        get_events,
        "Legacy status code of every mouse input.",
    ),
    PropertyDescriptor::read_only("inputs", get_inputs, "Event record of every mouse input."),
    PropertyDescriptor::read_only(
        "active_events",
        get_active_events,
        "Legacy status codes of inputs that are not idle.",
    ),
    PropertyDescriptor::read_only(
        "active_inputs",
        get_active_inputs,
        "Event records of inputs that are not idle.",
    ),
    PropertyDescriptor::read_write(
        "position",
        get_position,
        set_position,
        "Normalized cursor position [x, y].",
    ),
    PropertyDescriptor::read_write(
        "visible",
        get_visible,
        set_visible,
        "Whether the cursor is shown.",
    ),
];

static MOUSE_METHODS: [MethodDescriptor<MouseFacade>; 1] = [MethodDescriptor {
    name: "show",
    call: call_show,
    doc: "show(visible) -- show or hide the cursor.",
}];

impl Attributes for MouseFacade {
    fn properties() -> &'static [PropertyDescriptor<Self>] {
        &MOUSE_PROPERTIES
    }

    fn methods() -> &'static [MethodDescriptor<Self>] {
        &MOUSE_METHODS
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/facade.rs"]
mod tests;
