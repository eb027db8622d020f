//! pulsewatch - HTTP endpoint health monitor with debounced alerting.
//!
//! Probes a fixed set of endpoints on independent schedules, keeps the
//! latest status of each in a shared registry, and sends one alert per
//! confirmed outage and recovery.

mod config;
mod monitor;
mod notify;
mod probe;
mod registry;
mod web;

use config::{ServerConfig, ServiceConfig};
use monitor::Supervisor;
use registry::StatusRegistry;
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pulsewatch=info".parse()?),
        )
        .init();

    // Load configuration
    let mut cfg = ServerConfig::load();
    tracing::info!("Starting pulsewatch on port {}...", cfg.http_port);

    if cfg.services.is_empty() {
        tracing::info!("No services configured, adding sample service: example.com");
        cfg.services.push(ServiceConfig {
            id: "example".to_string(),
            name: "Example".to_string(),
            url: "https://example.com/".to_string(),
            interval_secs: 60,
        });
    }
    tracing::info!("Monitoring {} services", cfg.services.len());

    let notifier = notify::from_config(&cfg.notifier);
    if !cfg.notifier.is_configured() {
        tracing::warn!("WhatsApp gateway not configured, alerts will only be logged");
    }

    let registry = Arc::new(StatusRegistry::new());
    let client = probe::probe_client()?;
    let supervisor = Arc::new(Supervisor::new(
        cfg.services.clone(),
        client,
        registry.clone(),
        notifier,
    ));

    // Start monitor loops
    supervisor.start().await;

    // Start web server
    let server = Server::new(&cfg, registry, supervisor);
    server.start().await?;

    Ok(())
}
