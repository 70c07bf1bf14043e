//! Core domain types for the atendente assistant.
//!
//! This crate provides the foundational identifier types shared by the
//! conversation, responder, and gateway crates.

pub mod id;

pub use id::{ChatId, MessageId, ParseIdError};
