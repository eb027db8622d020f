//! Probe module for endpoint health checks.

mod http;

pub use http::*;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Fixed per-probe timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Probe error types.
///
/// These never leave the probe module as `Err` values; they only supply
/// the error text carried by an offline [`ProbeResult`].
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("timeout: no response from service")]
    Timeout,
    #[error("connection error: {0}")]
    Connect(String),
    #[error("probe failed: {0}")]
    Other(String),
}

/// Health classification of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// The endpoint answered with HTTP 200.
    Online,
    /// The endpoint answered with any other status code.
    #[serde(rename = "error")]
    ErrorResponse,
    /// The endpoint could not be reached at all.
    Offline,
}

impl ProbeStatus {
    pub fn is_online(self) -> bool {
        matches!(self, ProbeStatus::Online)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeStatus::Online => "online",
            ProbeStatus::ErrorResponse => "error",
            ProbeStatus::Offline => "offline",
        }
    }
}

/// Outcome of one probe attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    /// Wall-clock duration of the attempt in seconds, populated on every
    /// path including failures.
    pub response_time: f64,
    /// Empty when the service is online.
    pub error_message: String,
}
