//! Persona definition for the atendente assistant.
//!
//! A persona is the static, declarative description of the bot's identity,
//! tone, behavioral scripts, and conversation-flow toggles. It is loaded
//! once from a JSON resource at startup and never mutated afterwards.

pub mod definition;
pub mod error;

pub use definition::{
    BehaviorScripts, ConversationFlow, KnowledgeBase, PersonaDefinition, ResponseStyle,
};
pub use error::PersonaError;
