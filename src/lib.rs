//! Game logic building blocks: expression trees whose identifiers resolve against a shared
//! context, and a script-facing mouse facade exposing device and cursor state through a fixed
//! attribute table.
//!
//! Everything here runs on the engine's update thread. Contexts, devices and canvases are owned by
//! a [`LogicSession`] (or by the embedding engine); expressions and facades hold weak handles and
//! report an error once their owner is gone.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod config;
pub(crate) mod expression;
pub(crate) mod input;
pub(crate) mod session;
pub(crate) mod value;

pub use crate::foundation::core::{CanvasSize, FrameIndex, Point};
pub use crate::foundation::error::{LogicError, LogicResult};

pub use crate::config::{CursorConfig, SessionConfig};
pub use crate::expression::ast::{BinaryOp, Expr, ExpressionId, IdentifierExpr, UnaryOp};
pub use crate::expression::error::ExprError;
pub use crate::expression::parser::parse_expr;
pub use crate::input::canvas::{Canvas, MouseState, SimCanvas};
pub use crate::input::device::{InputDevice, InputEvent, InputStatus, MouseInput};
pub use crate::input::facade::{CanvasHandle, DeviceHandle, MouseFacade};
pub use crate::input::mouse::MouseDevice;
pub use crate::input::property::{
    Attributes, Getter, Method, MethodDescriptor, PropertyDescriptor, Setter,
};
pub use crate::session::{
    FrameReport, LogicSession, MouseAction, MouseScript, ScriptFrame, ScrollDirection,
};
pub use crate::value::{ContextHandle, Namespace, Scope, SharedScope, Value};
