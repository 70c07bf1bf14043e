//! Per-chat conversation context and its in-memory store.
//!
//! Contexts live for the duration of the process only; nothing here is
//! persisted. The store owns every context and hands out per-chat handles
//! so independent chats can be processed concurrently while each single
//! chat is serialized.

use crate::stage::Stage;
use atendente_core::ChatId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Maximum number of history entries kept per context.
///
/// Truncation happens at entry granularity (not turn pairs): after an
/// exchange is appended, the oldest entries are dropped until at most
/// this many remain.
pub const HISTORY_CAP: usize = 20;

/// Who produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The customer.
    User,
    /// The bot persona.
    Assistant,
}

/// A single history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who spoke.
    pub role: TurnRole,
    /// What was said.
    pub content: String,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Creates a customer entry.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a persona entry.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Mutable per-chat conversational state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Alternating customer/persona entries, oldest first.
    pub history: Vec<Turn>,
    /// Need tags inferred from customer messages, insertion order, no duplicates.
    pub needs_identified: Vec<String>,
    /// Solutions the persona has offered, insertion order, no duplicates.
    pub solutions_offered: Vec<String>,
    /// Current coarse conversation stage.
    pub stage: Stage,
    /// When the first message for this chat arrived.
    pub started_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Creates the initial context for a new chat.
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            needs_identified: Vec::new(),
            solutions_offered: Vec::new(),
            stage: Stage::Greeting,
            started_at: Utc::now(),
        }
    }

    /// Appends a completed exchange and truncates history to [`HISTORY_CAP`]
    /// entries, dropping the oldest first.
    pub fn append_exchange(&mut self, user_message: &str, assistant_message: &str) {
        self.history.push(Turn::user(user_message));
        self.history.push(Turn::assistant(assistant_message));
        if self.history.len() > HISTORY_CAP {
            let excess = self.history.len() - HISTORY_CAP;
            self.history.drain(..excess);
        }
    }

    /// Records an identified need, ignoring duplicates.
    pub fn add_need(&mut self, need: &str) {
        if !self.needs_identified.iter().any(|n| n == need) {
            self.needs_identified.push(need.to_string());
        }
    }

    /// Records an offered solution, ignoring duplicates.
    pub fn add_solution(&mut self, solution: &str) {
        if !self.solutions_offered.iter().any(|s| s == solution) {
            self.solutions_offered.push(solution.to_string());
        }
    }

    /// Returns the most recent `count` history entries in original order.
    #[must_use]
    pub fn recent_history(&self, count: usize) -> &[Turn] {
        let start = self.history.len().saturating_sub(count);
        &self.history[start..]
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a single chat's context.
///
/// Holding the lock serializes the read-infer-generate-write cycle for
/// that chat; other chats proceed independently.
pub type ContextHandle = Arc<tokio::sync::Mutex<ConversationContext>>;

/// In-memory store of conversation contexts, keyed by chat address.
///
/// The outer map lock is held only for map operations; the slow model
/// call happens under the per-chat lock inside each [`ContextHandle`].
#[derive(Debug, Default)]
pub struct ContextStore {
    inner: Mutex<HashMap<ChatId, ContextHandle>>,
}

impl ContextStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the context handle for a chat, creating a fresh context on
    /// first contact. Never fails.
    #[must_use]
    pub fn get(&self, chat: &ChatId) -> ContextHandle {
        let mut map = self.lock_map();
        map.entry(chat.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(ConversationContext::new())))
            .clone()
    }

    /// Removes a chat's context entirely; the next [`Self::get`] starts over.
    pub fn clear(&self, chat: &ChatId) {
        self.lock_map().remove(chat);
    }

    /// Number of chats with live contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    /// Returns true when no chat has a live context.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_map().is_empty()
    }

    fn lock_map(&self) -> std::sync::MutexGuard<'_, HashMap<ChatId, ContextHandle>> {
        // Nothing panics while the map lock is held, so a poisoned lock
        // still guards a consistent map.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_get_creates_initial_context() {
        let store = ContextStore::new();
        let chat = ChatId::new("5511999999999@c.us");

        let handle = store.get(&chat);
        let ctx = handle.blocking_lock();
        assert_eq!(ctx.stage, Stage::Greeting);
        assert!(ctx.history.is_empty());
        assert!(ctx.needs_identified.is_empty());
        assert!(ctx.solutions_offered.is_empty());
    }

    #[test]
    fn get_returns_the_same_context() {
        let store = ContextStore::new();
        let chat = ChatId::new("a@c.us");

        store.get(&chat).blocking_lock().add_need("assistência");
        let handle = store.get(&chat);
        assert_eq!(handle.blocking_lock().needs_identified, vec!["assistência"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn history_caps_at_twenty_entries_oldest_first() {
        let mut ctx = ConversationContext::new();
        for i in 0..15 {
            ctx.append_exchange(&format!("pergunta {i}"), &format!("resposta {i}"));
        }

        assert_eq!(ctx.history.len(), HISTORY_CAP);
        // 15 exchanges = 30 entries; the first 10 were dropped.
        assert_eq!(ctx.history[0].content, "pergunta 5");
        assert_eq!(ctx.history.last().unwrap().content, "resposta 14");
    }

    #[test]
    fn history_alternates_roles() {
        let mut ctx = ConversationContext::new();
        ctx.append_exchange("oi", "olá!");
        assert_eq!(ctx.history[0].role, TurnRole::User);
        assert_eq!(ctx.history[1].role, TurnRole::Assistant);
    }

    #[test]
    fn needs_and_solutions_deduplicate() {
        let mut ctx = ConversationContext::new();
        ctx.add_need("orçamento");
        ctx.add_need("orçamento");
        ctx.add_need("agendamento");
        ctx.add_solution("plano básico");
        ctx.add_solution("plano básico");

        assert_eq!(ctx.needs_identified, vec!["orçamento", "agendamento"]);
        assert_eq!(ctx.solutions_offered, vec!["plano básico"]);
    }

    #[test]
    fn recent_history_window() {
        let mut ctx = ConversationContext::new();
        ctx.append_exchange("um", "dois");
        ctx.append_exchange("três", "quatro");

        let recent = ctx.recent_history(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].content, "dois");

        assert_eq!(ctx.recent_history(10).len(), 4);
    }

    #[test]
    fn clear_then_get_is_indistinguishable_from_new() {
        let store = ContextStore::new();
        let chat = ChatId::new("b@c.us");

        {
            let handle = store.get(&chat);
            let mut ctx = handle.blocking_lock();
            ctx.append_exchange("tenho um problema", "posso ajudar");
            ctx.stage = Stage::Closing;
        }
        store.clear(&chat);
        assert!(store.is_empty());

        let handle = store.get(&chat);
        let ctx = handle.blocking_lock();
        assert_eq!(ctx.stage, Stage::Greeting);
        assert!(ctx.history.is_empty());
    }

    #[test]
    fn context_serde_roundtrip() {
        let mut ctx = ConversationContext::new();
        ctx.append_exchange("oi", "olá");
        ctx.add_need("assistência");

        let json = serde_json::to_string(&ctx).expect("serialize");
        let parsed: ConversationContext = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.history.len(), 2);
        assert_eq!(parsed.needs_identified, vec!["assistência"]);
    }
}
