//! LLM backend abstraction for the atendente assistant.
//!
//! This crate provides:
//!
//! - **Backend trait**: single-shot text generation behind [`LlmBackend`]
//! - **Typed failures**: [`LlmError`] with an explicit failure-kind
//!   classification, decided by the backend rather than by callers
//! - **Gemini backend**: the Google Generative Language REST API

pub mod backend;
pub mod error;
pub mod gemini;

pub use backend::{LlmBackend, LlmRequest, LlmResponse, TokenUsage};
pub use error::{FailureKind, LlmError};
pub use gemini::{GeminiBackend, GeminiConfig};
