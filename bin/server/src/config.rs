//! Centralized server configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables, with nested sections separated by `__`
//! (e.g. `GEMINI__API_KEY`, `GATEWAY__BASE_URL`).

use atendente_ai::GeminiConfig;
use atendente_gateway::GatewayConfig;
use atendente_responder::ResponderConfig;
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Path to the persona definition file.
    #[serde(default = "default_persona_path")]
    pub persona_path: String,

    /// Externally reachable base URL of this server.
    /// When set, the webhook is self-registered with the gateway at startup.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Shared secret the gateway must present on webhook deliveries.
    /// When unset, webhook authentication is disabled.
    #[serde(default)]
    pub webhook_api_key: Option<String>,

    /// LLM backend configuration.
    pub gemini: GeminiConfig,

    /// Messaging gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Reply generation parameters.
    #[serde(default)]
    pub responder: ResponderConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_persona_path() -> String {
    "personas/atendente.json".to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
