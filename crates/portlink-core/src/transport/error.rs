//! Transport errors

use thiserror::Error;

use crate::codec::CodecError;

/// Errors that can occur while talking to a port
#[derive(Error, Debug)]
pub enum TransportError {
    /// Configuration rejected before opening
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The provider could not open the port
    #[error("Failed to open port: {0}")]
    Open(String),

    /// No port with that identifier
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Line setting the backend cannot apply
    #[error("Unsupported port parameter: {0}")]
    Unsupported(String),

    /// Open called while open
    #[error("Port already open")]
    AlreadyOpen,

    /// Receive called while closed
    #[error("Port not open")]
    NotOpen,

    /// No output channel, or the write failed
    #[error("Send failed: {0}")]
    Send(String),

    /// Deadline passed with nothing received
    #[error("Receive timed out with no data")]
    Timeout,

    /// Cancelled with nothing received
    #[error("Receive cancelled with no data")]
    Cancelled,

    /// Reading failed
    #[error("Stream error: {0}")]
    Stream(String),

    /// Payload encoding failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Other I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad failure classes callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad arguments, malformed input, or a call made in the wrong state
    Validation,
    /// The port could not be opened
    Open,
    /// Writing failed; the port stays open
    Send,
    /// The receive deadline passed with nothing read
    EmptyTimeout,
    /// Reading failed part way
    Stream,
}

impl TransportError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::Codec(_) | Self::NotOpen => ErrorCategory::Validation,
            Self::Open(_) | Self::PortNotFound(_) | Self::Unsupported(_) | Self::AlreadyOpen => {
                ErrorCategory::Open
            }
            Self::Send(_) => ErrorCategory::Send,
            Self::Timeout | Self::Cancelled => ErrorCategory::EmptyTimeout,
            Self::Stream(_) | Self::Io(_) => ErrorCategory::Stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(TransportError::Timeout.category(), ErrorCategory::EmptyTimeout);
        assert_eq!(
            TransportError::Send("broken pipe".into()).category(),
            ErrorCategory::Send
        );
        assert_eq!(
            TransportError::PortNotFound("COM9".into()).category(),
            ErrorCategory::Open
        );
        assert_eq!(
            TransportError::from(CodecError::InvalidPosition(9)).category(),
            ErrorCategory::Validation
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TransportError::Timeout.to_string(),
            "Receive timed out with no data"
        );
        assert_eq!(
            TransportError::Open("busy".into()).to_string(),
            "Failed to open port: busy"
        );
    }
}
