//! WhatsApp webhook server for the atendente assistant.

pub mod app;
pub mod config;
