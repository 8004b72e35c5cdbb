//! Error types for the calculation engine and the command parser.

use thiserror::Error;

/// Raised by the engine before any computation when an input breaks a domain constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl CalcError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { field, .. } => field,
        }
    }
}

/// Raised while turning a text command into engine inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("malformed argument '{0}', expected key=value")]
    Malformed(String),
    #[error("missing argument '{0}'")]
    Missing(&'static str),
    #[error("bad value for '{key}': {value}")]
    BadValue { key: String, value: String },
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
    #[error("no property with id {0} in catalog")]
    UnknownProperty(u32),
}

/// Anything that stops a single command; the caller reports it and moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Calc(#[from] CalcError),
}
