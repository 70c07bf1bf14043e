use atendente_ai::{GeminiBackend, LlmBackend};
use atendente_conversation::ContextStore;
use atendente_gateway::GatewayClient;
use atendente_persona::PersonaDefinition;
use atendente_responder::ResponseGenerator;
use atendente_server::app::{self, AppState};
use atendente_server::config::ServerConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let persona = PersonaDefinition::from_json_file(&config.persona_path)
        .expect("failed to load persona definition");
    tracing::info!(persona = %persona.name, "Loaded persona");

    let backend = GeminiBackend::new(config.gemini).expect("failed to configure LLM backend");
    tracing::info!(model = backend.model(), "Configured LLM backend");

    let gateway =
        GatewayClient::new(config.gateway).expect("failed to configure gateway client");

    let generator = ResponseGenerator::new(
        Arc::new(persona),
        Arc::new(ContextStore::new()),
        Arc::new(backend),
        config.responder,
    );

    let state = AppState {
        generator: Arc::new(generator),
        gateway: Arc::new(gateway),
        webhook_api_key: config.webhook_api_key.clone(),
    };

    // Self-register the webhook once the gateway has had time to come up.
    if let Some(public_url) = config.public_url {
        let gateway = state.gateway.clone();
        let api_key = config.webhook_api_key.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            let url = format!("{}/webhook", public_url.trim_end_matches('/'));
            if let Err(e) = gateway.register_webhook(&url, api_key.as_deref()).await {
                tracing::warn!(error = %e, "webhook self-registration failed");
            }
        });
    }

    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!(addr = %config.listen_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
