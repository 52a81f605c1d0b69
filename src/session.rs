use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::SessionConfig;
use crate::expression::ast::Expr;
use crate::expression::parser::parse_expr;
use crate::foundation::core::{CanvasSize, FrameIndex, Point};
use crate::foundation::error::{LogicError, LogicResult};
use crate::input::canvas::SimCanvas;
use crate::input::device::{InputDevice, MouseInput};
use crate::input::facade::{CanvasHandle, DeviceHandle, MouseFacade};
use crate::input::mouse::MouseDevice;
use crate::input::property::Attributes;
use crate::value::{ContextHandle, Scope, SharedScope, Value};

/// Owner of everything expressions and the mouse facade only borrow: the identifier context, the
/// mouse device and the canvas. Dropping the session invalidates every handle into it.
pub struct LogicSession {
    scope: SharedScope,
    device: Rc<RefCell<MouseDevice>>,
    canvas: Rc<RefCell<SimCanvas>>,
    mouse: MouseFacade,
}

impl LogicSession {
    #[tracing::instrument(skip(config))]
    pub fn new(config: &SessionConfig) -> LogicResult<Self> {
        config.validate()?;

        let session = Self::assemble(config.build_scope().shared(), config.canvas);
        session.mouse.show(config.cursor.visible)?;
        if let Some(pos) = config.cursor_position() {
            session.mouse.set_position(pos)?;
        }

        tracing::debug!(
            names = session.scope.borrow().len(),
            width = config.canvas.width,
            height = config.canvas.height,
            "session ready"
        );
        Ok(session)
    }

    fn assemble(scope: SharedScope, size: CanvasSize) -> Self {
        let device = Rc::new(RefCell::new(MouseDevice::new()));
        let canvas = Rc::new(RefCell::new(SimCanvas::new(size)));
        canvas.borrow_mut().link_device(&device);
        let mouse = MouseFacade::new(DeviceHandle::new(&device), CanvasHandle::new(&canvas));
        Self {
            scope,
            device,
            canvas,
            mouse,
        }
    }

    pub fn scope(&self) -> &SharedScope {
        &self.scope
    }

    pub fn context(&self) -> ContextHandle {
        ContextHandle::new(&self.scope)
    }

    pub fn set_var(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.scope.borrow_mut().set(name, value);
    }

    /// Parse `src` with identifiers bound to this session's context.
    pub fn parse(&self, src: &str) -> LogicResult<Expr> {
        Ok(parse_expr(src, &self.context())?)
    }

    pub fn eval(&self, src: &str) -> LogicResult<Value> {
        self.parse(src)?.evaluate()
    }

    pub fn mouse(&self) -> &MouseFacade {
        &self.mouse
    }

    pub fn device(&self) -> &Rc<RefCell<MouseDevice>> {
        &self.device
    }

    pub fn canvas(&self) -> &Rc<RefCell<SimCanvas>> {
        &self.canvas
    }

    pub fn frame(&self) -> FrameIndex {
        self.device.borrow().frame()
    }

    /// Apply one scripted host action.
    pub fn apply(&self, action: &MouseAction) -> LogicResult<()> {
        match action {
            MouseAction::Press(button) => {
                let button = button_input(*button)?;
                self.device.borrow_mut().press(button);
            }
            MouseAction::Release(button) => {
                let button = button_input(*button)?;
                self.device.borrow_mut().release(button);
            }
            MouseAction::Move([x, y]) => self.device.borrow_mut().move_to(*x, *y),
            MouseAction::Scroll(dir) => self
                .device
                .borrow_mut()
                .scroll(matches!(dir, ScrollDirection::Up)),
            MouseAction::Show(visible) => self.mouse.show(*visible)?,
            MouseAction::Warp([x, y]) => self.mouse.set_position(Point::new(*x, *y))?,
        }
        Ok(())
    }

    /// Run one script frame: apply its actions, read the requested attributes, then advance the
    /// device to the next frame.
    pub fn run_frame(&self, frame: &ScriptFrame) -> LogicResult<FrameReport> {
        for action in &frame.actions {
            self.apply(action)?;
        }

        let mut attrs = BTreeMap::new();
        for name in &frame.query {
            attrs.insert(name.clone(), self.mouse.get_attr(name)?);
        }
        let mut exprs = BTreeMap::new();
        for src in &frame.eval {
            exprs.insert(src.clone(), self.eval_to_json(src));
        }

        let report = FrameReport {
            frame: self.frame(),
            attrs,
            exprs,
        };
        self.device.borrow_mut().next_frame();
        Ok(report)
    }

    fn eval_to_json(&self, src: &str) -> serde_json::Value {
        match self.eval(src) {
            Ok(v) => v.to_json(),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        }
    }
}

fn button_input(input: MouseInput) -> LogicResult<MouseInput> {
    if input.is_button() {
        Ok(input)
    } else {
        Err(LogicError::type_error(format!(
            "{} is not a button",
            input.name()
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// A host-side event fed to the session during a script frame.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseAction {
    Press(MouseInput),
    Release(MouseInput),
    /// Device-reported cursor motion in pixels.
    Move([i32; 2]),
    Scroll(ScrollDirection),
    Show(bool),
    /// Programmatic cursor warp to a normalized position.
    Warp([f64; 2]),
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptFrame {
    pub actions: Vec<MouseAction>,
    /// Facade attributes to read after the actions are applied.
    pub query: Vec<String>,
    /// Expressions to evaluate against the session context.
    pub eval: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MouseScript {
    pub frames: Vec<ScriptFrame>,
}

impl MouseScript {
    pub fn from_reader<R: std::io::Read>(r: R) -> LogicResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LogicError::config(format!("parse mouse script JSON: {e}")))
    }
}

/// What a script frame observed.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FrameReport {
    pub frame: FrameIndex,
    pub attrs: BTreeMap<String, Value>,
    pub exprs: BTreeMap<String, serde_json::Value>,
}

impl Default for LogicSession {
    fn default() -> Self {
        Self::assemble(Scope::new().shared(), CanvasSize::default())
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
