//! Error types for plugin-facing context operations

use std::fmt;

/// Payload a context operation was working on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// First-call inputs
    Inputs,
    /// Carried context inputs
    ContextInputs,
    /// Per-trace context data
    ContextData,
    /// Plugin outputs
    Outputs,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Inputs => "inputs",
            Channel::ContextInputs => "context inputs",
            Channel::ContextData => "context data",
            Channel::Outputs => "outputs",
        };
        f.write_str(name)
    }
}

/// Errors raised by [`ExecutionContext`](crate::ExecutionContext)
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// Reader or store failure, passed through as-is
    #[error(transparent)]
    Bridge(anyhow::Error),

    /// Payload did not match the requested type
    #[error("decode {channel}: {source}")]
    Decode {
        /// Payload being read
        channel: Channel,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be turned into a payload
    #[error("encode {channel}: {source}")]
    Encode {
        /// Payload being written
        channel: Channel,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

impl ContextError {
    /// Check if the error came from the host side rather than from serde
    #[inline]
    #[must_use]
    pub fn is_bridge(&self) -> bool {
        matches!(self, Self::Bridge(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_error_is_transparent() {
        let err = ContextError::Bridge(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.to_string(), "disk on fire");
        assert!(err.is_bridge());
    }

    #[test]
    fn decode_error_names_channel() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = ContextError::Decode {
            channel: Channel::ContextInputs,
            source,
        };
        assert!(err.to_string().starts_with("decode context inputs:"));
        assert!(!err.is_bridge());
    }
}
