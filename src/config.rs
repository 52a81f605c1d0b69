use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{CanvasSize, Point};
use crate::foundation::error::{LogicError, LogicResult};
use crate::value::Scope;

/// Cursor presentation at session start.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CursorConfig {
    pub visible: bool,
    /// Normalized start position; `None` leaves the cursor where the device reports it.
    pub position: Option<[f64; 2]>,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            visible: true,
            position: None,
        }
    }
}

/// JSON-facing session setup: display surface, cursor, and the identifier context.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub canvas: CanvasSize,
    pub cursor: CursorConfig,
    /// Names expressions can resolve, with their initial values.
    pub context: BTreeMap<String, serde_json::Value>,
}

impl SessionConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> LogicResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LogicError::config(format!("parse session config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> LogicResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LogicError::config(format!("open session config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> LogicResult<()> {
        CanvasSize::new(self.canvas.width, self.canvas.height)?;
        if let Some([x, y]) = self.cursor.position {
            for (axis, v) in [("x", x), ("y", y)] {
                if !(0.0..=1.0).contains(&v) {
                    return Err(LogicError::config(format!(
                        "cursor.position.{axis} must be in [0, 1], got {v}"
                    )));
                }
            }
        }
        for name in self.context.keys() {
            if !is_identifier(name) {
                return Err(LogicError::config(format!(
                    "context name \"{name}\" is not a valid identifier"
                )));
            }
        }
        Ok(())
    }

    pub fn cursor_position(&self) -> Option<Point> {
        self.cursor.position.map(|[x, y]| Point::new(x, y))
    }

    /// Fresh scope holding the configured context values.
    pub fn build_scope(&self) -> Scope {
        Scope::from_json_map(&self.context)
    }
}

/// Names the expression parser can produce: `[A-Za-z_][A-Za-z0-9_]*`, excluding keywords.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    head_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !matches!(name, "true" | "false" | "null" | "if" | "then" | "else")
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
