//! Prompt assembly.
//!
//! Renders the persona definition and the current conversation context
//! into the single text prompt sent to the model. Pure string building,
//! no I/O and no secrets.

use atendente_conversation::{ConversationContext, TurnRole};
use atendente_persona::PersonaDefinition;

/// How many history entries the prompt includes.
pub const RECENT_HISTORY_WINDOW: usize = 5;

fn sim_nao(flag: bool) -> &'static str {
    if flag { "Sim" } else { "Não" }
}

/// Renders the persona-conditioned system prompt for the current context.
#[must_use]
pub fn system_prompt(persona: &PersonaDefinition, context: &ConversationContext) -> String {
    let mut out = String::with_capacity(2048);

    out.push_str(&format!("VOCÊ É: {} - {}\n", persona.name, persona.role));
    out.push_str(&format!("EMPRESA: {}\n\n", persona.company));

    out.push_str("TRAÇOS DE PERSONALIDADE:\n");
    for personality_trait in &persona.traits {
        out.push_str(&format!("- {personality_trait}\n"));
    }

    out.push_str("\nCOMPORTAMENTO:\n");
    out.push_str(&format!("- Saudação: {}\n", persona.behavior.greeting));
    out.push_str(&format!("- Despedida: {}\n", persona.behavior.farewell));
    out.push_str(&format!(
        "- Transferir para humano: {}\n",
        persona.behavior.transfer_human
    ));
    out.push_str(&format!("- Indisponível: {}\n", persona.behavior.busy));
    out.push_str(&format!("- Não entendeu: {}\n", persona.behavior.unknown));

    out.push_str("\nSERVIÇOS OFERECIDOS:\n");
    for service in &persona.knowledge_base.services {
        out.push_str(&format!("- {service}\n"));
    }

    out.push_str("\nCONTEXTO ATUAL DA CONVERSA:\n");
    out.push_str(&format!("- Estágio: {}\n", context.stage));
    out.push_str(&format!(
        "- Necessidades identificadas: {}\n",
        context.needs_identified.join(", ")
    ));
    out.push_str(&format!(
        "- Soluções oferecidas: {}\n",
        context.solutions_offered.join(", ")
    ));

    out.push_str(&format!(
        "\nHISTÓRICO RECENTE (últimas {RECENT_HISTORY_WINDOW} mensagens):\n"
    ));
    for turn in context.recent_history(RECENT_HISTORY_WINDOW) {
        let speaker = match turn.role {
            TurnRole::User => "Cliente",
            TurnRole::Assistant => persona.name.as_str(),
        };
        out.push_str(&format!("{speaker}: {}\n", turn.content));
    }

    out.push_str("\nESTILO DE RESPOSTA:\n");
    out.push_str(&format!("- Tom: {}\n", persona.response_style.tone));
    out.push_str(&format!(
        "- Comprimento: {}\n",
        persona.response_style.length
    ));
    out.push_str(&format!(
        "- Nível de linguagem: {}\n",
        persona.response_style.language_level
    ));
    out.push_str(&format!(
        "- Usar emojis: {}\n",
        sim_nao(persona.response_style.use_emojis)
    ));
    out.push_str(&format!(
        "- Usar formatação: {}\n",
        sim_nao(persona.response_style.use_formatting)
    ));

    let flow = &persona.conversation_flow;
    out.push_str("\nFLUXO DA CONVERSA:\n");
    out.push_str(&format!(
        "1. {}\n",
        if flow.greeting { "Saudar" } else { "Não saudar" }
    ));
    out.push_str(&format!(
        "2. {}\n",
        if flow.identify_needs {
            "Identificar necessidades"
        } else {
            "Não identificar"
        }
    ));
    out.push_str(&format!(
        "3. {}\n",
        if flow.offer_solutions {
            "Oferecer soluções"
        } else {
            "Não oferecer"
        }
    ));
    out.push_str(&format!(
        "4. {}\n",
        if flow.confirm_understanding {
            "Confirmar entendimento"
        } else {
            "Não confirmar"
        }
    ));
    out.push_str(&format!(
        "5. {}\n",
        if flow.follow_up {
            "Acompanhar"
        } else {
            "Não acompanhar"
        }
    ));
    out.push_str(&format!(
        "6. {}\n",
        if flow.closing { "Encerrar" } else { "Não encerrar" }
    ));

    out.push_str(
        "\nREGRAS IMPORTANTES:\n\
         1. NUNCA diga que é um bot ou IA\n\
         2. Seja empático e solucione problemas\n\
         3. Mantenha o foco no cliente\n\
         4. Ofereça ajuda concreta\n\
         5. Se não souber algo, seja honesto e ofereça alternativa\n\
         6. Use o nome do cliente quando possível\n\
         7. Mantenha conversa natural\n",
    );

    out.push_str("\nAGORA RESPONDA À SEGUINTE MENSAGEM DO CLIENTE:\n");
    out
}

/// Renders the full prompt for one customer message.
#[must_use]
pub fn conversation_prompt(
    persona: &PersonaDefinition,
    context: &ConversationContext,
    user_message: &str,
) -> String {
    format!(
        "{}\nCLIENTE: {}\n\n{}:",
        system_prompt(persona, context),
        user_message,
        persona.name.to_uppercase()
    )
}
