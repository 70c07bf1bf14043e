//! HTTP surface: webhook intake, health, and the manual test endpoint.

use atendente_core::{ChatId, MessageId};
use atendente_gateway::{GatewayClient, InboundMessage};
use atendente_responder::ResponseGenerator;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Chat identifier used by the manual test endpoint.
const TEST_CHAT: &str = "test-user";

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ResponseGenerator>,
    pub gateway: Arc<GatewayClient>,
    pub webhook_api_key: Option<String>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", get(verify_webhook).post(receive_message))
        .route("/test-message", post(test_message))
        .with_state(state)
}

/// Commands handled locally, without a model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Greet,
    Help,
    Info,
    Clear,
}

impl Command {
    /// Matches a whole message against the command vocabulary.
    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "oi" | "olá" | "ola" => Some(Self::Greet),
            "ajuda" | "help" => Some(Self::Help),
            "info" => Some(Self::Info),
            "limpar" | "clear" => Some(Self::Clear),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Greet => "greeting",
            Self::Help => "help",
            Self::Info => "info",
            Self::Clear => "clear",
        }
    }
}

fn help_message() -> String {
    "*🤖 COMANDOS DISPONÍVEIS*\n\n\
     • `oi` - Iniciar conversa\n\
     • `ajuda` - Ver comandos\n\
     • `info` - Sobre mim\n\
     • `limpar` - Limpar histórico\n\
     • Faça qualquer pergunta!\n\n\
     _Estou aqui para ajudar!_ 😊"
        .to_string()
}

/// Checks the shared webhook secret, when one is configured.
///
/// Accepted as an `x-api-key` header, an `Authorization: Bearer` header,
/// or an `api_key` query parameter.
fn authorized(state: &AppState, headers: &HeaderMap, query: &HashMap<String, String>) -> bool {
    let Some(expected) = &state.webhook_api_key else {
        return true;
    };

    let presented = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        })
        .or_else(|| query.get("api_key").map(String::as_str));

    presented == Some(expected.as_str())
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "persona": state.generator.persona().name,
        "conversations_active": state.generator.active_conversations(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn verify_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&state, &headers, &query) {
        return unauthorized();
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "online",
            "persona": state.generator.persona().name,
        })),
    )
}

async fn receive_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(message): Json<InboundMessage>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&state, &headers, &query) {
        tracing::warn!("unauthorized webhook delivery");
        return unauthorized();
    }

    if message.from_me {
        return (
            StatusCode::OK,
            Json(json!({ "processed": false, "reason": "own_message" })),
        );
    }

    let Some(text) = message.text() else {
        return (
            StatusCode::OK,
            Json(json!({ "processed": false, "reason": "empty_message" })),
        );
    };

    let chat = message.chat_id();
    let delivery = MessageId::new();
    tracing::info!(
        delivery = %delivery,
        chat = %chat,
        sender = message.sender_name.as_deref().unwrap_or("unknown"),
        "inbound message"
    );

    if let Some(command) = Command::parse(text) {
        let persona = state.generator.persona();
        let reply = match command {
            Command::Greet => persona.behavior.greeting.clone(),
            Command::Help => help_message(),
            Command::Info => persona.info_card(),
            Command::Clear => {
                state.generator.clear_session(&chat);
                "✅ Histórico da conversa limpo!".to_string()
            }
        };

        return match state.gateway.send_text(&chat, &reply).await {
            Ok(()) => (
                StatusCode::OK,
                Json(json!({ "processed": true, "type": command.label() })),
            ),
            Err(e) => {
                tracing::error!(chat = %chat, error = %e, "failed to send command reply");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": e.to_string() })),
                )
            }
        };
    }

    let reply = state.generator.generate_response(&chat, text).await;

    match state.gateway.send_text(&chat, &reply).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "processed": true,
                "type": "ai_response",
                "response_length": reply.len(),
            })),
        ),
        Err(e) => {
            tracing::error!(chat = %chat, error = %e, "failed to send reply");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct TestMessageRequest {
    message: String,
}

/// Generates a reply without touching the gateway. Local diagnostics only.
async fn test_message(
    State(state): State<AppState>,
    Json(request): Json<TestMessageRequest>,
) -> Json<Value> {
    let chat = ChatId::new(TEST_CHAT);
    let response = state.generator.generate_response(&chat, &request.message).await;
    Json(json!({ "response": response }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use atendente_ai::{LlmBackend, LlmError, LlmRequest, LlmResponse, TokenUsage};
    use atendente_conversation::ContextStore;
    use atendente_gateway::GatewayConfig;
    use atendente_persona::PersonaDefinition;
    use atendente_responder::ResponderConfig;

    struct EchoBackend;

    #[async_trait]
    impl LlmBackend for EchoBackend {
        async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
            Ok(LlmResponse {
                content: format!("echo: {} chars", request.prompt.len()),
                model: "echo".to_string(),
                usage: TokenUsage::default(),
            })
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn state(webhook_api_key: Option<&str>) -> AppState {
        let persona: PersonaDefinition = serde_json::from_str(
            r#"{
                "name": "Clara",
                "role": "Atendente Virtual",
                "company": "PrecisoCR",
                "traits": ["empática"],
                "behavior": {
                    "greeting": "Olá!",
                    "farewell": "Até logo!",
                    "transfer_human": "Vou chamar alguém.",
                    "busy": "Estamos ocupados.",
                    "unknown": "Não entendi."
                },
                "knowledge_base": { "services": ["Suporte"] },
                "response_style": {
                    "tone": "amigável",
                    "length": "médio",
                    "language_level": "simples",
                    "use_emojis": false,
                    "use_formatting": false
                }
            }"#,
        )
        .expect("persona");

        let generator = ResponseGenerator::new(
            Arc::new(persona),
            Arc::new(ContextStore::new()),
            Arc::new(EchoBackend),
            ResponderConfig::default(),
        );
        let gateway = GatewayClient::new(GatewayConfig::default()).expect("gateway client");

        AppState {
            generator: Arc::new(generator),
            gateway: Arc::new(gateway),
            webhook_api_key: webhook_api_key.map(str::to_string),
        }
    }

    #[test]
    fn command_vocabulary() {
        assert_eq!(Command::parse("oi"), Some(Command::Greet));
        assert_eq!(Command::parse("  OLÁ  "), Some(Command::Greet));
        assert_eq!(Command::parse("ola"), Some(Command::Greet));
        assert_eq!(Command::parse("ajuda"), Some(Command::Help));
        assert_eq!(Command::parse("HELP"), Some(Command::Help));
        assert_eq!(Command::parse("info"), Some(Command::Info));
        assert_eq!(Command::parse("limpar"), Some(Command::Clear));
        assert_eq!(Command::parse("clear"), Some(Command::Clear));
        assert_eq!(Command::parse("oi, tudo bem?"), None);
        assert_eq!(Command::parse("preciso de ajuda"), None);
    }

    #[test]
    fn no_configured_key_allows_everything() {
        let state = state(None);
        assert!(authorized(&state, &HeaderMap::new(), &HashMap::new()));
    }

    #[test]
    fn key_accepted_from_header_bearer_or_query() {
        let state = state(Some("secret"));

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "secret".parse().expect("header"));
        assert!(authorized(&state, &headers, &HashMap::new()));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer secret".parse().expect("header"));
        assert!(authorized(&state, &headers, &HashMap::new()));

        let mut query = HashMap::new();
        query.insert("api_key".to_string(), "secret".to_string());
        assert!(authorized(&state, &HeaderMap::new(), &query));
    }

    #[test]
    fn wrong_or_missing_key_is_rejected() {
        let state = state(Some("secret"));

        assert!(!authorized(&state, &HeaderMap::new(), &HashMap::new()));

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "wrong".parse().expect("header"));
        assert!(!authorized(&state, &headers, &HashMap::new()));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic secret".parse().expect("header"));
        assert!(!authorized(&state, &headers, &HashMap::new()));
    }

    #[tokio::test]
    async fn health_reports_persona_and_activity() {
        let app_state = state(None);
        app_state
            .generator
            .generate_response(&ChatId::new("x@c.us"), "tenho uma dúvida")
            .await;

        let Json(body) = health(State(app_state)).await;
        assert_eq!(body["status"], "online");
        assert_eq!(body["persona"], "Clara");
        assert_eq!(body["conversations_active"], 1);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn own_messages_are_skipped() {
        let message: InboundMessage = serde_json::from_str(
            r#"{"from": "me@c.us", "body": "oi", "fromMe": true}"#,
        )
        .expect("message");

        let (status, Json(body)) = receive_message(
            State(state(None)),
            HeaderMap::new(),
            Query(HashMap::new()),
            Json(message),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["processed"], false);
        assert_eq!(body["reason"], "own_message");
    }

    #[tokio::test]
    async fn unauthorized_delivery_is_rejected() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"from": "a@c.us", "body": "oi"}"#).expect("message");

        let (status, Json(body)) = receive_message(
            State(state(Some("secret"))),
            HeaderMap::new(),
            Query(HashMap::new()),
            Json(message),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn empty_body_is_not_processed() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"from": "a@c.us"}"#).expect("message");

        let (status, Json(body)) = receive_message(
            State(state(None)),
            HeaderMap::new(),
            Query(HashMap::new()),
            Json(message),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["processed"], false);
        assert_eq!(body["reason"], "empty_message");
    }

    #[tokio::test]
    async fn test_message_answers_without_gateway() {
        let Json(body) = test_message(
            State(state(None)),
            Json(TestMessageRequest {
                message: "qual o valor do serviço?".to_string(),
            }),
        )
        .await;

        let response = body["response"].as_str().expect("string response");
        assert!(response.starts_with("Echo:"));
    }
}
