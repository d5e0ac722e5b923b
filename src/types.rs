//! Instruction stream and comparison options shared by the diff engine,
//! the group replay and the Python binding.
use crate::errors::ReconcilerError;
use serde::{Deserialize, Serialize};

/// One unit of mutation needed to turn the old list into the new one.
///
/// Positions index the list as it looks while the stream is being replayed:
/// every instruction assumes all earlier instructions have already been
/// applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instruction<T> {
    Added {
        item: T,
        pos: usize,
    },
    Removed {
        item: T,
        pos: usize,
    },
    /// Take the entry at `from_pos` out and reinsert it at `pos`.
    /// `item` is `None` for moves produced by collapsing a rotation.
    Moved {
        #[serde(skip_serializing_if = "Option::is_none")]
        item: Option<T>,
        pos: usize,
        from_pos: usize,
    },
}

pub const ADDED: &str = "ADDED";
pub const REMOVED: &str = "REMOVED";
pub const MOVED: &str = "MOVED";

impl<T> Instruction<T> {
    pub fn action(&self) -> &'static str {
        match self {
            Instruction::Added { .. } => ADDED,
            Instruction::Removed { .. } => REMOVED,
            Instruction::Moved { .. } => MOVED,
        }
    }

    pub fn pos(&self) -> usize {
        match self {
            Instruction::Added { pos, .. }
            | Instruction::Removed { pos, .. }
            | Instruction::Moved { pos, .. } => *pos,
        }
    }

    pub fn item(&self) -> Option<&T> {
        match self {
            Instruction::Added { item, .. } | Instruction::Removed { item, .. } => Some(item),
            Instruction::Moved { item, .. } => item.as_ref(),
        }
    }

    /// True for a move that shifts an entry exactly one slot towards the front.
    pub(crate) fn is_forward_shift(&self) -> bool {
        matches!(self, Instruction::Moved { pos, from_pos, .. } if pos + 1 == *from_pos)
    }
}

/// Knobs for a single `compare` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Collapse runs of one-slot forward moves into a single move.
    pub collapse_moves: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            collapse_moves: true,
        }
    }
}

/// Encode an instruction stream for a script-side patcher.
pub fn instructions_to_json<T: Serialize>(
    instructions: &[Instruction<T>],
) -> Result<serde_json::Value, ReconcilerError> {
    Ok(serde_json::to_value(instructions)?)
}
