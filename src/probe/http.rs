//! HTTP probe implementation.

use super::{ProbeError, ProbeResult, ProbeStatus, PROBE_TIMEOUT};
use std::time::Instant;

/// Build the shared client used by every probe.
///
/// The timeout bounds the whole request, and redirects are followed so a
/// relocated health endpoint still counts as reachable.
pub fn probe_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Run one GET against the given URL and classify the outcome.
///
/// Never fails: every transport error is folded into an offline result so
/// a probe can never take down its monitor loop. Only an exact HTTP 200
/// counts as online; any other status code is an error response.
pub async fn check_url(client: &reqwest::Client, url: &str) -> ProbeResult {
    let start = Instant::now();

    match client.get(url).send().await {
        Ok(response) => {
            let response_time = start.elapsed().as_secs_f64();
            let code = response.status().as_u16();
            if code == 200 {
                ProbeResult {
                    status: ProbeStatus::Online,
                    response_time,
                    error_message: String::new(),
                }
            } else {
                ProbeResult {
                    status: ProbeStatus::ErrorResponse,
                    response_time,
                    error_message: format!("HTTP {}", code),
                }
            }
        }
        Err(e) => ProbeResult {
            status: ProbeStatus::Offline,
            response_time: start.elapsed().as_secs_f64(),
            error_message: classify_failure(&e).to_string(),
        },
    }
}

fn classify_failure(e: &reqwest::Error) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout
    } else if e.is_connect() {
        ProbeError::Connect(e.to_string())
    } else {
        ProbeError::Other(e.to_string())
    }
}
