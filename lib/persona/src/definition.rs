//! The persona data model.

use crate::error::PersonaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The complete definition of a bot persona.
///
/// Read-only after load; every component receives it behind a shared
/// reference and none mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaDefinition {
    /// Display name the bot answers as.
    pub name: String,
    /// Role description (e.g. "Atendente Virtual").
    pub role: String,
    /// Company the persona represents.
    pub company: String,
    /// Short descriptive personality traits, in declared order.
    pub traits: Vec<String>,
    /// Scripted replies for fixed situations.
    pub behavior: BehaviorScripts,
    /// What the persona knows how to offer.
    pub knowledge_base: KnowledgeBase,
    /// How replies should read.
    pub response_style: ResponseStyle,
    /// Which conversation-flow steps are enabled.
    #[serde(default)]
    pub conversation_flow: ConversationFlow,
}

/// Fixed display strings for scripted situations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorScripts {
    /// Opening message for a new conversation.
    pub greeting: String,
    /// Message when the customer says goodbye.
    pub farewell: String,
    /// Message when handing off to a human.
    pub transfer_human: String,
    /// Message when the service is overloaded (quota fallback).
    pub busy: String,
    /// Message when the request cannot be understood (generic fallback).
    pub unknown: String,
}

/// Services the persona can talk about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    /// Offered services, in declared order.
    pub services: Vec<String>,
}

/// Stylistic directives for generated replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseStyle {
    /// Overall tone (e.g. "amigável e profissional").
    pub tone: String,
    /// Target reply length (e.g. "médio").
    pub length: String,
    /// Register of language (e.g. "simples e acessível").
    pub language_level: String,
    /// Whether replies may use emojis.
    pub use_emojis: bool,
    /// Whether replies may use gateway text formatting.
    pub use_formatting: bool,
}

/// Toggles for the six conversation-flow steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationFlow {
    pub greeting: bool,
    pub identify_needs: bool,
    pub offer_solutions: bool,
    pub confirm_understanding: bool,
    pub follow_up: bool,
    pub closing: bool,
}

impl Default for ConversationFlow {
    fn default() -> Self {
        Self {
            greeting: true,
            identify_needs: true,
            offer_solutions: true,
            confirm_understanding: true,
            follow_up: true,
            closing: true,
        }
    }
}

impl PersonaDefinition {
    /// Parses a persona definition from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Parse`] if the JSON is malformed or missing
    /// required fields.
    pub fn from_json_str(json: &str) -> Result<Self, PersonaError> {
        serde_json::from_str(json).map_err(|e| PersonaError::Parse {
            reason: e.to_string(),
        })
    }

    /// Loads a persona definition from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PersonaError::Io`] if the file cannot be read and
    /// [`PersonaError::Parse`] if its contents are not a valid definition.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PersonaError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| PersonaError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Renders the persona info card shown in response to the `info` command.
    #[must_use]
    pub fn info_card(&self) -> String {
        let mut card = format!("*{}*\n\n{} - {}\n", self.name, self.role, self.company);
        if !self.knowledge_base.services.is_empty() {
            card.push_str("\nServiços:\n");
            for service in &self.knowledge_base.services {
                card.push_str("• ");
                card.push_str(service);
                card.push('\n');
            }
        }
        card.push_str("\n_Sempre aqui para ajudar!_");
        card
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "Clara",
        "role": "Atendente Virtual",
        "company": "PrecisoCR",
        "traits": ["empática", "objetiva"],
        "behavior": {
            "greeting": "Olá! Como posso ajudar?",
            "farewell": "Até logo!",
            "transfer_human": "Vou transferir você para um atendente.",
            "busy": "Estamos com alto volume de atendimentos.",
            "unknown": "Desculpe, não entendi. Pode reformular?"
        },
        "knowledge_base": { "services": ["Suporte técnico", "Orçamentos"] },
        "response_style": {
            "tone": "amigável",
            "length": "médio",
            "language_level": "simples",
            "use_emojis": true,
            "use_formatting": true
        },
        "conversation_flow": {
            "greeting": true,
            "identify_needs": true,
            "offer_solutions": true,
            "confirm_understanding": false,
            "follow_up": true,
            "closing": true
        }
    }"#;

    #[test]
    fn parses_full_definition() {
        let persona = PersonaDefinition::from_json_str(SAMPLE).expect("should parse");
        assert_eq!(persona.name, "Clara");
        assert_eq!(persona.traits.len(), 2);
        assert!(!persona.conversation_flow.confirm_understanding);
        assert_eq!(persona.knowledge_base.services[1], "Orçamentos");
    }

    #[test]
    fn conversation_flow_defaults_to_all_enabled() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).expect("valid json");
        value.as_object_mut().expect("object").remove("conversation_flow");
        let persona =
            PersonaDefinition::from_json_str(&value.to_string()).expect("should parse");
        assert!(persona.conversation_flow.greeting);
        assert!(persona.conversation_flow.closing);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = PersonaDefinition::from_json_str("{ not json");
        assert!(matches!(result, Err(PersonaError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = PersonaDefinition::from_json_file("/nonexistent/persona.json");
        assert!(matches!(result, Err(PersonaError::Io { .. })));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("persona.json");
        std::fs::write(&path, SAMPLE).expect("write");

        let persona = PersonaDefinition::from_json_file(&path).expect("should load");
        assert_eq!(persona.company, "PrecisoCR");
    }

    #[test]
    fn info_card_lists_services() {
        let persona = PersonaDefinition::from_json_str(SAMPLE).expect("should parse");
        let card = persona.info_card();
        assert!(card.contains("Clara"));
        assert!(card.contains("Suporte técnico"));
        assert!(card.contains("Orçamentos"));
    }
}
