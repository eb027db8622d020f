//! Alert delivery.
//!
//! The monitor loops only know the [`Notifier`] trait; the concrete
//! transport is a WhatsApp gateway (Evolution API), with a logging no-op
//! standing in when credentials are absent.

use crate::config::NotifierConfig;
use crate::probe::ProbeStatus;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers a human-readable alert message.
///
/// `send` reports failure by returning `false`; it must never panic or
/// propagate an error into the calling monitor loop.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> bool;
}

/// Pick the delivery transport for the given credentials.
pub fn from_config(cfg: &NotifierConfig) -> Arc<dyn Notifier> {
    if cfg.is_configured() {
        Arc::new(WhatsAppNotifier::new(cfg.clone()))
    } else {
        Arc::new(NoopNotifier)
    }
}

/// Format a status-transition alert.
pub fn alert_message(service_name: &str, status: ProbeStatus, error: &str) -> String {
    let timestamp = Utc::now().format("%d/%m/%Y %H:%M:%S");
    let mut message = format!(
        "pulsewatch alert\n\nService: {}\nStatus: {}\nTime: {}",
        service_name,
        status.as_str().to_uppercase(),
        timestamp
    );
    if !error.is_empty() {
        message.push_str("\nDetail: ");
        message.push_str(error);
    }
    message
}

/// Sends alerts through an Evolution API WhatsApp gateway.
pub struct WhatsAppNotifier {
    client: reqwest::Client,
    cfg: NotifierConfig,
}

impl WhatsAppNotifier {
    pub fn new(cfg: NotifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            cfg,
        }
    }
}

#[async_trait]
impl Notifier for WhatsAppNotifier {
    async fn send(&self, message: &str) -> bool {
        let url = format!(
            "{}/message/sendText/{}",
            self.cfg.api_url, self.cfg.instance
        );
        let payload = serde_json::json!({
            "number": self.cfg.phone,
            "text": message,
        });

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.cfg.api_key)
            .json(&payload)
            .timeout(SEND_TIMEOUT)
            .send()
            .await;

        match response {
            // The gateway answers 201 on accepted sends, older versions 200.
            Ok(response) if matches!(response.status().as_u16(), 200 | 201) => {
                tracing::info!("alert delivered");
                true
            }
            Ok(response) => {
                tracing::error!("alert delivery rejected: HTTP {}", response.status().as_u16());
                false
            }
            Err(e) => {
                tracing::error!("alert delivery failed: {}", e);
                false
            }
        }
    }
}

/// Stand-in used when the gateway is not configured.
///
/// Logs the message that would have been sent and reports failure, so
/// startup succeeds without credentials and callers still see a result.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, message: &str) -> bool {
        tracing::warn!("notifier not configured, dropping alert:\n{}", message);
        false
    }
}
