//! Error types for gateway operations.

use std::fmt;

/// Errors from messaging gateway operations.
#[derive(Debug)]
pub enum GatewayError {
    /// The request could not be completed.
    RequestFailed { reason: String },
    /// The gateway answered with a non-success status.
    Rejected { status: u16, reason: String },
    /// The gateway's response could not be interpreted.
    ResponseParseFailed { reason: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => {
                write!(f, "gateway request failed: {reason}")
            }
            Self::Rejected { status, reason } => {
                write!(f, "gateway rejected request ({status}): {reason}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse gateway response: {reason}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GatewayError::Rejected {
            status: 422,
            reason: "session not started".to_string(),
        };
        assert!(err.to_string().contains("422"));
        assert!(err.to_string().contains("session not started"));
    }
}
