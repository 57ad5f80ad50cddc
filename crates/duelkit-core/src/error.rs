//! Error handling for the core G-code model.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Errors raised while lexing or classifying G-code lines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A toolchange command selects a tool index other than T0/T1.
    #[error("Unknown toolhead '{token}' at line {line_number}")]
    UnknownToolhead {
        /// The offending tool token as written in the input.
        token: String,
        /// The 1-based input line number.
        line_number: u32,
    },

    /// A line this system must interpret carries a parameter it cannot read.
    #[error("Invalid syntax at line {line_number}: {reason}")]
    InvalidSyntax {
        /// The 1-based input line number.
        line_number: u32,
        /// The reason for the syntax error.
        reason: String,
    },
}

/// Result type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
