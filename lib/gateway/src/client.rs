//! HTTP client for a WAHA-compatible WhatsApp gateway.

use crate::error::GatewayError;
use atendente_core::ChatId;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_SESSION: &str = "default";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the messaging gateway client.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for gateway calls, if the gateway requires one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Gateway session name.
    #[serde(default = "default_session")]
    pub session: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_session() -> String {
    DEFAULT_SESSION.to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            session: default_session(),
        }
    }
}

/// Client for sending messages and managing webhook registration.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestFailed`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::RequestFailed {
                reason: e.to_string(),
            })?;

        Ok(Self { http, config })
    }

    /// Sends a plain-text message to a chat.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestFailed`] when the gateway is
    /// unreachable and [`GatewayError::Rejected`] when it answers with a
    /// non-success status.
    pub async fn send_text(&self, chat: &ChatId, text: &str) -> Result<(), GatewayError> {
        let body = json!({
            "chatId": chat.as_str(),
            "text": text,
            "session": self.config.session,
        });

        let mut request = self.http.post(self.url("/api/sendText")).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| GatewayError::RequestFailed {
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        tracing::debug!(chat = %chat, length = text.len(), "message sent");
        Ok(())
    }

    /// Registers `webhook_url` as the gateway's message webhook.
    ///
    /// Subscribes to `message` events and forwards `api_key` in an
    /// `x-api-key` header so our endpoint can authenticate deliveries.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequestFailed`] when the gateway is
    /// unreachable and [`GatewayError::Rejected`] when it answers with a
    /// non-success status.
    pub async fn register_webhook(
        &self,
        webhook_url: &str,
        api_key: Option<&str>,
    ) -> Result<(), GatewayError> {
        let headers = match api_key {
            Some(key) => json!({ "x-api-key": key }),
            None => json!({}),
        };
        let body = json!({
            "url": webhook_url,
            "events": ["message", "message.any"],
            "session": self.config.session,
            "headers": headers,
        });

        let mut request = self.http.post(self.url("/api/webhook")).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| GatewayError::RequestFailed {
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        tracing::info!(url = webhook_url, "webhook registered with gateway");
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}
