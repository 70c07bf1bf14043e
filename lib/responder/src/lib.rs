//! Prompt assembly and response generation for the atendente assistant.
//!
//! This crate ties the persona, the conversation context, and the LLM
//! backend together:
//!
//! - **Prompt Assembler**: renders persona + context into a single prompt
//! - **Response Generator**: runs the analyze → prompt → generate →
//!   post-process → record cycle, degrading to persona fallbacks on
//!   failure instead of surfacing errors
//! - **Classifiers**: single-shot sentiment and intent analysis

pub mod analysis;
pub mod generator;
pub mod prompt;

pub use analysis::{Intent, Sentiment};
pub use generator::{ResponderConfig, ResponseGenerator, SERVICE_UNAVAILABLE_MESSAGE};
pub use prompt::{RECENT_HISTORY_WINDOW, conversation_prompt, system_prompt};
