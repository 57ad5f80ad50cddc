//! Core G-code model for duelkit.
//!
//! This crate owns everything the planner consumes and produces at the
//! stream boundary:
//! - lexing raw lines into [`GcodeLine`] records while preserving the
//!   original text for passthrough,
//! - classifying lines into structured [`Command`] values (toolchange,
//!   linear move, everything else),
//! - the [`GcodeSink`] output seam and the normalizing [`StreamWriter`].
//!
//! The collision-avoidance logic itself lives in `duelkit-planner`.

pub mod command;
pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

pub use command::{Command, MoveParams, ToolheadId, MARKER};
pub use error::{Error, Result};
pub use parser::{GcodeLine, GcodeParser, Word};
pub use types::Point;
pub use writer::{format_axis, format_extrusion, normalize_line, GcodeSink, StreamWriter};
