//! Configuration module for pulsewatch.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// One monitored endpoint. Immutable after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Unique key used by the status and check endpoints.
    pub id: String,
    /// Display name used in alerts.
    pub name: String,
    pub url: String,
    /// Seconds between checks.
    pub interval_secs: u64,
}

/// WhatsApp gateway credentials. Empty url, key or phone disables
/// delivery without failing startup.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub api_url: String,
    pub instance: String,
    pub api_key: String,
    pub phone: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            instance: "pulsewatch".to_string(),
            api_key: String::new(),
            phone: String::new(),
        }
    }
}

impl NotifierConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty() && !self.phone.is_empty()
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the status API (default: 8001)
    pub http_port: u16,
    /// Services to monitor.
    pub services: Vec<ServiceConfig>,
    pub notifier: NotifierConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8001,
            services: Vec::new(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PULSEWATCH_HTTP_PORT`: HTTP port (default: 8001)
    /// - `PULSEWATCH_SERVICES`: JSON array of `{id, name, url, interval_secs}`
    /// - `WHATSAPP_API_URL`: Evolution API base URL
    /// - `WHATSAPP_INSTANCE`: gateway instance name (default: "pulsewatch")
    /// - `WHATSAPP_API_KEY`: gateway API key
    /// - `WHATSAPP_PHONE`: destination phone number
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(port_str) = env::var("PULSEWATCH_HTTP_PORT") {
            if let Ok(port) = port_str.parse() {
                cfg.http_port = port;
            }
        }

        if let Ok(json) = env::var("PULSEWATCH_SERVICES") {
            match serde_json::from_str(&json) {
                Ok(services) => cfg.services = services,
                Err(e) => tracing::warn!("ignoring invalid PULSEWATCH_SERVICES: {}", e),
            }
        }

        if let Ok(api_url) = env::var("WHATSAPP_API_URL") {
            cfg.notifier.api_url = api_url;
        }
        if let Ok(instance) = env::var("WHATSAPP_INSTANCE") {
            cfg.notifier.instance = instance;
        }
        if let Ok(api_key) = env::var("WHATSAPP_API_KEY") {
            cfg.notifier.api_key = api_key;
        }
        if let Ok(phone) = env::var("WHATSAPP_PHONE") {
            cfg.notifier.phone = phone;
        }

        cfg
    }
}
