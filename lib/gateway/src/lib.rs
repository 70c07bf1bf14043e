//! WhatsApp messaging gateway client for the atendente assistant.
//!
//! Talks to a WAHA-compatible HTTP gateway:
//!
//! - **Outbound**: send text replies to a chat
//! - **Registration**: point the gateway's webhook at our own endpoint
//! - **Inbound**: deserialize the webhook event payload

pub mod client;
pub mod error;
pub mod webhook;

pub use client::{GatewayClient, GatewayConfig};
pub use error::GatewayError;
pub use webhook::InboundMessage;
