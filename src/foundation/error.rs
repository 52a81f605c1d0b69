use crate::expression::error::ExprError;

pub type LogicResult<T> = Result<T, LogicError>;

/// Recoverable failures of the logic layer.
///
/// Nothing here is fatal: every variant is handed back to the direct caller, which decides whether
/// to substitute a default, retry next frame, or give up on the surrounding operation.
#[derive(thiserror::Error, Debug)]
pub enum LogicError {
    #[error("name not found: \"{identifier}\"")]
    NameNotFound { identifier: String },

    #[error("context of \"{identifier}\" is no longer alive")]
    ContextExpired { identifier: String },

    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("type error: {0}")]
    Type(String),

    #[error("parse error: {0}")]
    Parse(#[from] ExprError),

    #[error("unknown attribute: \"{0}\"")]
    UnknownAttribute(String),

    #[error("attribute \"{0}\" is read-only")]
    ReadOnly(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LogicError {
    pub fn name_not_found(identifier: impl Into<String>) -> Self {
        Self::NameNotFound {
            identifier: identifier.into(),
        }
    }

    pub fn context_expired(identifier: impl Into<String>) -> Self {
        Self::ContextExpired {
            identifier: identifier.into(),
        }
    }

    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self::DeviceUnavailable(msg.into())
    }

    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` for the "identifier absent" condition callers commonly substitute a default for.
    pub fn is_name_not_found(&self) -> bool {
        matches!(self, Self::NameNotFound { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
