//! Error types for LLM backend operations.
//!
//! The backend wrapper decides how a failure is classified; callers
//! branch on [`LlmError::kind`] instead of inspecting error text.

use std::fmt;

/// Coarse classification of a generation failure.
///
/// This drives the fallback policy: each kind maps to a distinct
/// user-visible fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credential is missing, invalid, or rejected.
    Auth,
    /// Quota exhausted or rate limited.
    Quota,
    /// Anything else: network failures, malformed responses, server errors.
    Other,
}

/// Errors from LLM backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The provider rejected the credential.
    AuthenticationFailed { reason: String },
    /// Quota exhausted or rate limited.
    QuotaExhausted { reason: String },
    /// The request could not be completed.
    RequestFailed { reason: String },
    /// The provider's response could not be interpreted.
    ResponseParseFailed { reason: String },
    /// The backend configuration is unusable.
    InvalidConfig { reason: String },
}

impl LlmError {
    /// Returns the failure classification for fallback routing.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::AuthenticationFailed { .. } | Self::InvalidConfig { .. } => FailureKind::Auth,
            Self::QuotaExhausted { .. } => FailureKind::Quota,
            Self::RequestFailed { .. } | Self::ResponseParseFailed { .. } => FailureKind::Other,
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "LLM authentication failed: {reason}")
            }
            Self::QuotaExhausted { reason } => {
                write!(f, "LLM quota exhausted: {reason}")
            }
            Self::RequestFailed { reason } => {
                write!(f, "LLM request failed: {reason}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse LLM response: {reason}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid LLM configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}
