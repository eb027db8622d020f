//! Web server module.
//!
//! Thin JSON layer over the registry and supervisor; no monitoring logic
//! lives here.

mod handlers;

use crate::config::ServerConfig;
use crate::monitor::Supervisor;
use crate::registry::StatusRegistry;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<StatusRegistry>,
    pub supervisor: Arc<Supervisor>,
}

/// Web server for pulsewatch.
pub struct Server {
    http_port: u16,
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(
        config: &ServerConfig,
        registry: Arc<StatusRegistry>,
        supervisor: Arc<Supervisor>,
    ) -> Self {
        Self {
            http_port: config.http_port,
            state: AppState {
                registry,
                supervisor,
            },
        }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        Router::new()
            .route("/", get(handlers::handle_root))
            .route("/status", get(handlers::handle_status))
            .route("/status/{id}", get(handlers::handle_service_status))
            .route("/health", get(handlers::handle_health))
            .route("/check/{id}", post(handlers::handle_force_check))
            .route("/test-alert", post(handlers::handle_test_alert))
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::notify::NoopNotifier;

    async fn serve_test_app(services: Vec<ServiceConfig>) -> (String, Arc<StatusRegistry>) {
        let registry = Arc::new(StatusRegistry::new());
        let supervisor = Arc::new(Supervisor::new(
            services,
            reqwest::Client::new(),
            registry.clone(),
            Arc::new(NoopNotifier),
        ));
        let server = Server::new(&ServerConfig::default(), registry.clone(), supervisor);
        let router = server.routes();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (format!("http://{}", addr), registry)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (base, _registry) = serve_test_app(vec![]).await;

        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["services_monitored"], 0);
    }

    #[tokio::test]
    async fn test_status_reflects_registry() {
        use crate::probe::ProbeStatus;
        use crate::registry::ServiceObservation;

        let (base, registry) = serve_test_app(vec![]).await;
        registry.upsert(
            "backend",
            ServiceObservation {
                name: "Backend API".to_string(),
                url: "https://api.example.com/health".to_string(),
                status: ProbeStatus::ErrorResponse,
                last_check: chrono::Utc::now(),
                response_time: 0.12,
                error_message: "HTTP 503".to_string(),
            },
        );

        let body: serde_json::Value = reqwest::get(format!("{}/status", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["services"]["backend"]["status"], "error");
        assert_eq!(body["services"]["backend"]["error_message"], "HTTP 503");
    }

    #[tokio::test]
    async fn test_unknown_service_is_404() {
        let (base, _registry) = serve_test_app(vec![]).await;

        let status_response = reqwest::get(format!("{}/status/ghost", base)).await.unwrap();
        assert_eq!(status_response.status().as_u16(), 404);

        let check_response = reqwest::Client::new()
            .post(format!("{}/check/ghost", base))
            .send()
            .await
            .unwrap();
        assert_eq!(check_response.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_configured_but_unobserved_service_is_404() {
        let (base, _registry) = serve_test_app(vec![ServiceConfig {
            id: "backend".to_string(),
            name: "Backend API".to_string(),
            url: "https://api.example.com/health".to_string(),
            interval_secs: 60,
        }])
        .await;

        let response = reqwest::get(format!("{}/status/backend", base)).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
        assert!(response.text().await.unwrap().contains("not checked yet"));
    }

    #[tokio::test]
    async fn test_test_alert_reports_notifier_outcome() {
        let (base, _registry) = serve_test_app(vec![]).await;

        let body: serde_json::Value = reqwest::Client::new()
            .post(format!("{}/test-alert", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        // NoopNotifier always reports failure.
        assert_eq!(body["success"], false);
    }
}
