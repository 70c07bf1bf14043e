//! Conversation context tracking for the atendente assistant.
//!
//! This crate provides:
//!
//! - **Context Store**: per-chat mutable session state, created lazily
//!   and held in memory for the life of the process
//! - **Stage Inference**: keyword heuristics that advance the coarse
//!   conversation stage and accumulate identified customer needs

pub mod context;
pub mod stage;

pub use context::{ContextStore, ConversationContext, HISTORY_CAP, Turn, TurnRole};
pub use stage::{Stage, analyze};
