//! Structured command classification.
//!
//! The planner never inspects raw text: every line is classified here
//! into the three kinds it distinguishes. Marker detection (the
//! idempotence contract) is surfaced as the explicit `already_handled`
//! field rather than substring checks scattered through the planner.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::{GcodeLine, Word};

/// Marker substring appended to every toolchange comment this system
/// forwards or inserts. A later pass recognizes marked toolchanges and
/// swaps tool state without re-emitting parking motion.
pub const MARKER: &str = "duelkit";

/// Identifies one of the two toolheads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolheadId {
    /// T0, homed on the left rail.
    Left,
    /// T1, homed on the right rail.
    Right,
}

impl ToolheadId {
    /// The opposite head.
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// The G-code tool-select token for this head.
    pub fn token(self) -> &'static str {
        match self {
            Self::Left => "T0",
            Self::Right => "T1",
        }
    }
}

impl std::fmt::Display for ToolheadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Parameters of a linear move. Absent axes keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveParams {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub e: Option<f64>,
    pub f: Option<f64>,
}

/// One classified input command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A tool-select token (`T0`/`T1`). `already_handled` is set when the
    /// line's comment carries [`MARKER`], meaning a previous pass already
    /// emitted the associated parking motion.
    Toolchange {
        head: ToolheadId,
        already_handled: bool,
    },
    /// A linear move (`G0`/`G1`).
    Move(MoveParams),
    /// Anything else; passes through untouched.
    Other,
}

impl Command {
    /// Classify a lexed line.
    ///
    /// Unknown tool indices are fatal: rewriting a stream for a machine
    /// with tools we cannot model would silently produce colliding
    /// output. Moves with unreadable parameters are rejected for the
    /// same reason.
    pub fn classify(line: &GcodeLine) -> Result<Command> {
        match line.command {
            Some(('T', index)) => {
                let head = if index == 0.0 {
                    ToolheadId::Left
                } else if index == 1.0 {
                    ToolheadId::Right
                } else {
                    return Err(Error::UnknownToolhead {
                        token: line.command_token().unwrap_or("T").to_string(),
                        line_number: line.line_number,
                    });
                };
                let already_handled = line
                    .comment
                    .as_deref()
                    .is_some_and(|c| c.contains(MARKER));
                Ok(Command::Toolchange {
                    head,
                    already_handled,
                })
            }
            Some(('G', code)) if code == 0.0 || code == 1.0 => {
                Ok(Command::Move(MoveParams {
                    x: move_param(line, 'X')?,
                    y: move_param(line, 'Y')?,
                    e: move_param(line, 'E')?,
                    f: move_param(line, 'F')?,
                }))
            }
            _ => Ok(Command::Other),
        }
    }
}

fn move_param(line: &GcodeLine, letter: char) -> Result<Option<f64>> {
    match line.word(letter) {
        Some(Word { value: Some(v), .. }) => Ok(Some(*v)),
        Some(Word { value: None, .. }) => Err(Error::InvalidSyntax {
            line_number: line.line_number,
            reason: format!("parameter {letter} has no value"),
        }),
        None => Ok(None),
    }
}
