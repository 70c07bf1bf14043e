//! Single-shot sentiment and intent classification.
//!
//! Both are closed-answer prompts: the model is asked to return exactly
//! one label, and anything it says that is not a known label falls back
//! to the neutral default. Neither reads nor writes conversation context.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment of a customer message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positivo,
    #[default]
    Neutro,
    Negativo,
    Urgente,
}

impl Sentiment {
    /// Returns the label used in prompts and replies.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positivo => "POSITIVO",
            Self::Neutro => "NEUTRO",
            Self::Negativo => "NEGATIVO",
            Self::Urgente => "URGENTE",
        }
    }

    /// Parses a model-produced label, ignoring case and surrounding noise.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().trim_matches('.').to_uppercase().as_str() {
            "POSITIVO" => Some(Self::Positivo),
            "NEUTRO" => Some(Self::Neutro),
            "NEGATIVO" => Some(Self::Negativo),
            "URGENTE" => Some(Self::Urgente),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary intent of a customer message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Pergunta,
    Reclamacao,
    Elogio,
    Solicitacao,
    Duvida,
    Agendamento,
    Informacao,
    #[default]
    Outro,
}

impl Intent {
    /// Returns the label used in prompts and replies.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pergunta => "PERGUNTA",
            Self::Reclamacao => "RECLAMAÇÃO",
            Self::Elogio => "ELOGIO",
            Self::Solicitacao => "SOLICITAÇÃO",
            Self::Duvida => "DÚVIDA",
            Self::Agendamento => "AGENDAMENTO",
            Self::Informacao => "INFORMAÇÃO",
            Self::Outro => "OUTRO",
        }
    }

    /// Parses a model-produced label, ignoring case and surrounding noise.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().trim_matches('.').to_uppercase().as_str() {
            "PERGUNTA" => Some(Self::Pergunta),
            "RECLAMAÇÃO" => Some(Self::Reclamacao),
            "ELOGIO" => Some(Self::Elogio),
            "SOLICITAÇÃO" => Some(Self::Solicitacao),
            "DÚVIDA" => Some(Self::Duvida),
            "AGENDAMENTO" => Some(Self::Agendamento),
            "INFORMAÇÃO" => Some(Self::Informacao),
            "OUTRO" => Some(Self::Outro),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the closed-answer sentiment prompt.
#[must_use]
pub fn sentiment_prompt(message: &str) -> String {
    format!(
        "Analise o sentimento desta mensagem em português. Retorne apenas uma \
         das opções: POSITIVO, NEUTRO, NEGATIVO, URGENTE.\n\n\
         Mensagem: \"{message}\"\n\n\
         Sentimento:"
    )
}

/// Builds the closed-answer intent prompt.
#[must_use]
pub fn intent_prompt(message: &str) -> String {
    format!(
        "Extraia a intenção principal desta mensagem em português. Retorne \
         apenas uma palavra-chave: PERGUNTA, RECLAMAÇÃO, ELOGIO, SOLICITAÇÃO, \
         DÚVIDA, AGENDAMENTO, INFORMAÇÃO, OUTRO.\n\n\
         Mensagem: \"{message}\"\n\n\
         Intenção:"
    )
}
