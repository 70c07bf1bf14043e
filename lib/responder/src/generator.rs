//! Response generation and fallback policy.

use crate::analysis::{self, Intent, Sentiment};
use crate::prompt;
use atendente_ai::{FailureKind, LlmBackend, LlmRequest};
use atendente_conversation::{ContextStore, analyze};
use atendente_core::ChatId;
use atendente_persona::PersonaDefinition;
use serde::Deserialize;
use std::sync::Arc;

/// Fixed reply for credential failures.
///
/// Deliberately not persona-configurable: a broken credential is an
/// operator problem, and the message must not suggest retrying.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "⚠️ Configuração de serviço temporariamente \
     indisponível. Entre em contato com nosso suporte técnico.";

/// Generation parameters for conversation replies.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResponderConfig {
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Output-length cap, in tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    800
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Orchestrates one conversational turn per call.
///
/// Every failure path resolves to a textual fallback; callers never see
/// an error from [`Self::generate_response`].
pub struct ResponseGenerator {
    persona: Arc<PersonaDefinition>,
    contexts: Arc<ContextStore>,
    backend: Arc<dyn LlmBackend>,
    config: ResponderConfig,
}

impl ResponseGenerator {
    /// Creates a generator over explicitly injected collaborators.
    #[must_use]
    pub fn new(
        persona: Arc<PersonaDefinition>,
        contexts: Arc<ContextStore>,
        backend: Arc<dyn LlmBackend>,
        config: ResponderConfig,
    ) -> Self {
        Self {
            persona,
            contexts,
            backend,
            config,
        }
    }

    /// Generates the reply to one customer message.
    ///
    /// Holds that chat's context lock for the whole read-infer-generate-
    /// record cycle, so concurrent deliveries for the same chat are
    /// serialized while other chats proceed.
    pub async fn generate_response(&self, chat: &ChatId, user_message: &str) -> String {
        let handle = self.contexts.get(chat);
        let mut context = handle.lock().await;

        analyze(&mut context, user_message);

        let full_prompt = prompt::conversation_prompt(&self.persona, &context, user_message);
        let request = LlmRequest::new(full_prompt)
            .with_temperature(self.config.temperature)
            .with_max_output_tokens(self.config.max_output_tokens);

        match self.backend.generate(&request).await {
            Ok(response) => {
                let text = clean_response(&self.persona.name, &response.content);
                context.append_exchange(user_message, &text);
                tracing::debug!(
                    chat = %chat,
                    stage = %context.stage,
                    tokens = response.usage.total(),
                    "generated reply"
                );
                text
            }
            // A failed exchange is never recorded in history.
            Err(e) => {
                tracing::warn!(chat = %chat, error = %e, "model call failed");
                match e.kind() {
                    FailureKind::Auth => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
                    FailureKind::Quota => self.persona.behavior.busy.clone(),
                    FailureKind::Other => self.persona.behavior.unknown.clone(),
                }
            }
        }
    }

    /// Classifies the sentiment of a message; [`Sentiment::Neutro`] on any failure.
    pub async fn analyze_sentiment(&self, message: &str) -> Sentiment {
        let request = LlmRequest::new(analysis::sentiment_prompt(message))
            .with_temperature(self.config.temperature)
            .with_max_output_tokens(self.config.max_output_tokens);

        match self.backend.generate(&request).await {
            Ok(response) => Sentiment::from_label(&response.content).unwrap_or_default(),
            Err(e) => {
                tracing::debug!(error = %e, "sentiment analysis failed");
                Sentiment::default()
            }
        }
    }

    /// Extracts the intent of a message; [`Intent::Outro`] on any failure.
    pub async fn extract_intent(&self, message: &str) -> Intent {
        let request = LlmRequest::new(analysis::intent_prompt(message))
            .with_temperature(self.config.temperature)
            .with_max_output_tokens(self.config.max_output_tokens);

        match self.backend.generate(&request).await {
            Ok(response) => Intent::from_label(&response.content).unwrap_or_default(),
            Err(e) => {
                tracing::debug!(error = %e, "intent extraction failed");
                Intent::default()
            }
        }
    }

    /// Records a solution the persona has offered to this chat.
    ///
    /// This is the side channel that moves later turns to the
    /// solution-discussion stage.
    pub async fn record_solution(&self, chat: &ChatId, solution: &str) {
        let handle = self.contexts.get(chat);
        handle.lock().await.add_solution(solution);
    }

    /// Drops all conversational state for a chat.
    pub fn clear_session(&self, chat: &ChatId) {
        self.contexts.clear(chat);
    }

    /// Number of chats with live conversation state.
    #[must_use]
    pub fn active_conversations(&self) -> usize {
        self.contexts.len()
    }

    /// The persona this generator speaks as.
    #[must_use]
    pub fn persona(&self) -> &PersonaDefinition {
        &self.persona
    }
}

/// Strips persona-label artifacts the model sometimes echoes back and
/// capitalizes the first character.
fn clean_response(persona_name: &str, raw: &str) -> String {
    let mut text = raw.trim();

    let labels = [
        format!("{persona_name}:"),
        "ASSISTENTE:".to_string(),
        "BOT:".to_string(),
    ];
    for label in &labels {
        if let Some(stripped) = strip_label(text, label) {
            text = stripped;
            break;
        }
    }

    capitalize_first(text)
}

/// Case-insensitive prefix strip, safe on multi-byte labels.
fn strip_label<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let head = text.get(..label.len())?;
    if head.to_lowercase() == label.to_lowercase() {
        Some(text[label.len()..].trim_start())
    } else {
        None
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
