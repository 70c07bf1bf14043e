//! Stage and needs inference.
//!
//! A keyword-driven progression over the conversation stage plus
//! extraction of need tags from inbound messages. The heuristics operate
//! on the lower-cased, trimmed message and use substring matching, so
//! "obrigado pela ajuda!" both closes the conversation and registers the
//! "assistência" need.

use crate::context::ConversationContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse conversation-progress label used to bias the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No message has been analyzed yet.
    Greeting,
    /// At least one message has been analyzed.
    IdentifyingNeeds,
    /// A solution has been offered.
    SolutionDiscussion,
    /// The customer has signaled the conversation is over.
    ///
    /// There is no dedicated exit rule; a later message only leaves this
    /// stage when the solutions rule re-fires.
    Closing,
}

impl Stage {
    /// Returns the stage token used in prompts and serialized state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::IdentifyingNeeds => "identifying_needs",
            Self::SolutionDiscussion => "solution_discussion",
            Self::Closing => "closing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger keyword to need tag, in evaluation order.
///
/// Every trigger present in the message adds its tag independently, so a
/// single message can register several needs.
pub const NEED_KEYWORDS: [(&str, &str); 10] = [
    ("problema", "suporte_técnico"),
    ("ajuda", "assistência"),
    ("quero", "solicitação"),
    ("preciso", "necessidade"),
    ("como", "instrução"),
    ("dúvida", "esclarecimento"),
    ("valor", "orçamento"),
    ("preço", "informação_preço"),
    ("agendar", "agendamento"),
    ("horário", "disponibilidade"),
];

/// Keywords that move the conversation to [`Stage::Closing`].
const CLOSING_KEYWORDS: [&str; 4] = ["obrigado", "agradeço", "tchau", "adeus"];

/// Analyzes an inbound message, updating stage and identified needs.
///
/// Pure with respect to everything except the given context: no I/O and
/// no effects beyond mutating `context.stage` and
/// `context.needs_identified`.
pub fn analyze(context: &mut ConversationContext, message: &str) {
    let lower = message.trim().to_lowercase();

    // The very first analyzed message moves past the greeting.
    if context.stage == Stage::Greeting {
        context.stage = Stage::IdentifyingNeeds;
    }

    for (keyword, need) in NEED_KEYWORDS {
        if lower.contains(keyword) {
            context.add_need(need);
        }
    }

    if !context.solutions_offered.is_empty() {
        context.stage = Stage::SolutionDiscussion;
    }

    if CLOSING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        context.stage = Stage::Closing;
    }
}
