//! Error types for the executor
//!
//! Every [`ExecutorError`] means the trace ended in [`State::Fail`].

use plx_core::State;
use plx_registry::RegistryError;
use std::fmt;

/// Step of a schedule call that produced the failure being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureStage {
    /// Plugin lookup
    Lookup,
    /// Plugin execution
    Execute,
    /// Re-arming the poll
    SetPoll,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureStage::Lookup => "lookup",
            FailureStage::Execute => "execute",
            FailureStage::SetPoll => "set poll",
        };
        f.write_str(name)
    }
}

/// Execute or schedule call failed
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// Version is not installed
    #[error(transparent)]
    NotFound(#[from] RegistryError),

    /// Plugin returned an error
    #[error("plugin failed: {0}")]
    Plugin(anyhow::Error),

    /// Runtime collaborator returned an error
    #[error("runtime failed: {0}")]
    Runtime(anyhow::Error),

    /// A failure happened and reporting it through `set_fail` failed too
    #[error("set fail after {stage} error: {cause}: {report}")]
    Unreported {
        /// Step that failed first
        stage: FailureStage,
        /// Error of that step
        cause: anyhow::Error,
        /// Error returned by `set_fail`
        report: anyhow::Error,
    },
}

impl ExecutorError {
    /// Terminal state of the trace; always [`State::Fail`]
    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        State::Fail
    }

    /// Check if the version was unknown
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the host never learned about the failure
    #[inline]
    #[must_use]
    pub fn is_unreported(&self) -> bool {
        matches!(self, Self::Unreported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_is_fail() {
        let errors = [
            ExecutorError::NotFound(RegistryError::NotFound("9.9.9".to_string())),
            ExecutorError::Plugin(anyhow::anyhow!("boom")),
            ExecutorError::Runtime(anyhow::anyhow!("poll queue full")),
        ];
        for err in errors {
            assert_eq!(err.state(), State::Fail);
        }
    }

    #[test]
    fn not_found_is_transparent() {
        let err = ExecutorError::from(RegistryError::NotFound("9.9.9".to_string()));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "plugin version not found: 9.9.9");
    }

    #[test]
    fn unreported_message_keeps_both_errors() {
        let err = ExecutorError::Unreported {
            stage: FailureStage::Execute,
            cause: anyhow::anyhow!("plugin exploded"),
            report: anyhow::anyhow!("status backend down"),
        };
        let message = err.to_string();

        assert!(err.is_unreported());
        assert!(message.contains("execute"));
        assert!(message.contains("plugin exploded"));
        assert!(message.contains("status backend down"));
    }

    #[test]
    fn wrapped_error_printed_once() {
        let err = anyhow::Error::new(ExecutorError::Plugin(anyhow::anyhow!("boom")));
        assert_eq!(format!("{err:#}"), "plugin failed: boom");

        let err = anyhow::Error::new(ExecutorError::Runtime(anyhow::anyhow!("queue full")));
        assert_eq!(format!("{err:#}"), "runtime failed: queue full");
    }

    #[test]
    fn stage_display() {
        assert_eq!(FailureStage::Lookup.to_string(), "lookup");
        assert_eq!(FailureStage::SetPoll.to_string(), "set poll");
    }
}
