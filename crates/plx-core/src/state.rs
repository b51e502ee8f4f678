//! Execution phase of a plugin run
//!
//! The numeric values are wire constants. External runtimes persist them,
//! so variants must never be renumbered or reordered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a single trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum State {
    /// First invocation, nothing has been armed yet
    Empty = 1,
    /// Re-invoked by the host after a poll request
    Poll = 2,
    /// Reserved for callback-driven resumption
    Callback = 3,
    /// Run finished successfully
    Success = 4,
    /// Run finished with an error
    Fail = 5,
}

impl State {
    /// All states in ordinal order
    pub const ALL: [State; 5] = [
        State::Empty,
        State::Poll,
        State::Callback,
        State::Success,
        State::Fail,
    ];

    /// Get the wire value
    #[inline]
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if no further invocation will follow
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Success | State::Fail)
    }
}

impl From<State> for u8 {
    fn from(state: State) -> Self {
        state.as_u8()
    }
}

impl TryFrom<u8> for State {
    type Error = UnknownState;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(State::Empty),
            2 => Ok(State::Poll),
            3 => Ok(State::Callback),
            4 => Ok(State::Success),
            5 => Ok(State::Fail),
            other => Err(UnknownState(other)),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Empty => "empty",
            State::Poll => "poll",
            State::Callback => "callback",
            State::Success => "success",
            State::Fail => "fail",
        };
        f.write_str(name)
    }
}

/// Wire value that does not name a [`State`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown state ordinal: {0}")]
pub struct UnknownState(pub u8);
