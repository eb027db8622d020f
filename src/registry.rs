//! Shared status registry.

use crate::probe::ProbeStatus;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;

/// Latest observation for one monitored service.
///
/// Overwritten in place every cycle; no history is kept.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceObservation {
    pub name: String,
    pub url: String,
    pub status: ProbeStatus,
    pub last_check: DateTime<Utc>,
    pub response_time: f64,
    pub error_message: String,
}

/// Concurrency-safe map from service id to its latest observation.
///
/// Backed by a sharded map, so monitors writing distinct ids do not
/// serialize against each other and a reader never sees a torn record.
/// Services that have not completed a first cycle are simply absent.
#[derive(Debug, Default)]
pub struct StatusRegistry {
    entries: DashMap<String, ServiceObservation>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for `id` with a fresh observation.
    pub fn upsert(&self, id: &str, observation: ServiceObservation) {
        self.entries.insert(id.to_string(), observation);
    }

    pub fn get(&self, id: &str) -> Option<ServiceObservation> {
        self.entries.get(id).map(|entry| entry.value().clone())
    }

    /// Snapshot of all current records. Consistent per record; records for
    /// different ids may reflect different instants.
    pub fn get_all(&self) -> HashMap<String, ServiceObservation> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn observation(name: &str, status: ProbeStatus) -> ServiceObservation {
        ServiceObservation {
            name: name.to_string(),
            url: format!("https://{}.example.com/health", name),
            status,
            last_check: Utc::now(),
            response_time: 0.05,
            error_message: String::new(),
        }
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let registry = StatusRegistry::new();
        registry.upsert("api", observation("api", ProbeStatus::Online));
        registry.upsert("api", observation("api", ProbeStatus::Offline));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("api").unwrap().status, ProbeStatus::Offline);
    }

    #[test]
    fn test_get_unknown_id_is_absent() {
        let registry = StatusRegistry::new();
        assert!(registry.get("nope").is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_upserts_distinct_ids() {
        let registry = Arc::new(StatusRegistry::new());
        let mut handles = Vec::new();

        for i in 0..32 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("svc-{}", i);
                for _ in 0..100 {
                    registry.upsert(&id, observation(&id, ProbeStatus::Online));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = registry.get_all();
        assert_eq!(all.len(), 32);
        for (id, record) in all {
            assert_eq!(record.name, id);
            assert_eq!(record.status, ProbeStatus::Online);
        }
    }
}
