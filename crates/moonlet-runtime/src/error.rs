//! Error types

use thiserror::Error;

/// Failures of the introspection API
///
/// These are caller mistakes a front end may probe for; the state is left
/// untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DebugError {
    /// Unknown letter in a `get_info` option string
    #[error("invalid option `{0}' in info request")]
    InvalidOption(char),

    /// No frame selected, or `>` requested with an empty stack
    #[error("no function on the stack")]
    NoFunctionOnStack,

    /// The selected slot does not hold a function
    #[error("expected a function, found {0}")]
    NotAFunction(&'static str),

    /// The frame handle does not refer to an active Lua call
    #[error("frame {0} is not an active Lua call")]
    NotLuaFrame(usize),
}

/// Errors raised to running programs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Operation applied to a value of the wrong type
    #[error("{msg}")]
    TypeError { msg: String },

    /// Ordering comparison between incomparable values
    #[error("{msg}")]
    CompareError { msg: String },
}

impl RuntimeError {
    pub fn message(&self) -> &str {
        match self {
            RuntimeError::TypeError { msg } | RuntimeError::CompareError { msg } => msg,
        }
    }
}
