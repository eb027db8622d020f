//! Per-service monitoring loops and the debounce state machine.

use crate::config::ServiceConfig;
use crate::notify::{alert_message, Notifier};
use crate::probe::{check_url, ProbeResult, ProbeStatus};
use crate::registry::{ServiceObservation, StatusRegistry};

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Consecutive non-online readings required to confirm an outage.
const CONFIRM_THRESHOLD: u32 = 2;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("unknown service id: {0}")]
    UnknownService(String),
}

/// A confirmed status transition produced by the debounce state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Second consecutive non-online reading while confirmed online.
    ConfirmedDown,
    /// Online reading after a confirmed outage.
    Recovered,
}

/// Debounce state owned by a single monitor loop.
///
/// A single failed reading never alerts. The outage is confirmed on
/// exactly the second consecutive non-online reading, and the counter
/// keeps climbing past the threshold while the service stays down, so
/// each outage produces one down alert and one recovery alert at most.
#[derive(Debug)]
pub struct MonitorState {
    /// Last confirmed status; starts online so a service that is down
    /// from the first cycle still alerts once confirmed.
    previous_status: ProbeStatus,
    consecutive_failures: u32,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            previous_status: ProbeStatus::Online,
            consecutive_failures: 0,
        }
    }
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw classification through the state machine.
    pub fn observe(&mut self, status: ProbeStatus) -> Option<Transition> {
        if !status.is_online() {
            self.consecutive_failures += 1;
            // Exact equality: count 3, 4, ... while still down must not
            // re-alert until an online reading intervenes.
            if self.consecutive_failures == CONFIRM_THRESHOLD
                && self.previous_status.is_online()
            {
                self.previous_status = status;
                return Some(Transition::ConfirmedDown);
            }
            None
        } else {
            let recovered = !self.previous_status.is_online()
                && self.consecutive_failures >= CONFIRM_THRESHOLD;
            self.consecutive_failures = 0;
            self.previous_status = ProbeStatus::Online;
            recovered.then_some(Transition::Recovered)
        }
    }
}

/// One full monitor cycle: probe, record, evaluate, alert.
async fn run_cycle(
    service: &ServiceConfig,
    client: &reqwest::Client,
    state: &mut MonitorState,
    registry: &StatusRegistry,
    notifier: &dyn Notifier,
) {
    let result = check_url(client, &service.url).await;

    registry.upsert(
        &service.id,
        ServiceObservation {
            name: service.name.clone(),
            url: service.url.clone(),
            status: result.status,
            last_check: Utc::now(),
            response_time: result.response_time,
            error_message: result.error_message.clone(),
        },
    );

    tracing::info!(
        "{}: {} ({:.2}s)",
        service.name,
        result.status.as_str(),
        result.response_time
    );

    match state.observe(result.status) {
        Some(Transition::ConfirmedDown) => {
            tracing::warn!("{} is {}", service.name, result.status.as_str());
            let message = alert_message(&service.name, result.status, &result.error_message);
            if !notifier.send(&message).await {
                tracing::error!("down alert for {} was not delivered", service.name);
            }
        }
        Some(Transition::Recovered) => {
            tracing::info!("{} recovered", service.name);
            let message = alert_message(&service.name, ProbeStatus::Online, "service recovered");
            if !notifier.send(&message).await {
                tracing::error!("recovery alert for {} was not delivered", service.name);
            }
        }
        None => {}
    }
}

/// Run the monitoring loop for a single service. Never returns; ends only
/// with the process.
async fn run_monitor(
    service: ServiceConfig,
    client: reqwest::Client,
    registry: Arc<StatusRegistry>,
    notifier: Arc<dyn Notifier>,
) {
    tracing::info!("starting monitor: {} ({})", service.name, service.url);

    let interval_secs = if service.interval_secs == 0 {
        60
    } else {
        service.interval_secs
    };
    let interval = Duration::from_secs(interval_secs);
    let mut state = MonitorState::new();

    loop {
        run_cycle(&service, &client, &mut state, &registry, notifier.as_ref()).await;
        tokio::time::sleep(interval).await;
    }
}

/// Owns the monitor tasks and the shared handles they run against.
pub struct Supervisor {
    services: HashMap<String, ServiceConfig>,
    client: reqwest::Client,
    registry: Arc<StatusRegistry>,
    notifier: Arc<dyn Notifier>,
}

impl Supervisor {
    pub fn new(
        services: Vec<ServiceConfig>,
        client: reqwest::Client,
        registry: Arc<StatusRegistry>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            services: services
                .into_iter()
                .map(|service| (service.id.clone(), service))
                .collect(),
            client,
            registry,
            notifier,
        }
    }

    /// Spawn one detached monitor task per configured service, then
    /// announce startup through the notifier.
    pub async fn start(&self) {
        tracing::info!("starting {} service monitors", self.services.len());

        for service in self.services.values() {
            tokio::spawn(run_monitor(
                service.clone(),
                self.client.clone(),
                self.registry.clone(),
                self.notifier.clone(),
            ));
        }

        let message = format!(
            "pulsewatch started\n\nMonitoring {} services.\nYou will be alerted if anything goes down.",
            self.services.len()
        );
        if !self.notifier.send(&message).await {
            tracing::warn!("startup notification was not delivered");
        }
    }

    /// One out-of-band probe for a known service. Touches neither the
    /// registry nor any monitor's debounce state.
    pub async fn force_check(&self, id: &str) -> Result<ProbeResult, MonitorError> {
        let service = self
            .service(id)
            .ok_or_else(|| MonitorError::UnknownService(id.to_string()))?;
        Ok(check_url(&self.client, &service.url).await)
    }

    pub fn service(&self, id: &str) -> Option<&ServiceConfig> {
        self.services.get(id)
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Send a fixed test message through the configured notifier.
    pub async fn send_test_alert(&self) -> bool {
        self.notifier
            .send("pulsewatch test notification\n\nIf you received this message, alerting works.")
            .await
    }
}
