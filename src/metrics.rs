//! Per-endpoint success/failure counters.
//!
//! Counters live in an in-process registry so they can be read back, and every
//! increment is mirrored into the `metrics` facade for the Prometheus exporter.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub const SUCCESS_COUNTER: &str = "endpoint_success_count";
pub const FAILURE_COUNTER: &str = "endpoint_failure_count";

type CounterMap = RwLock<HashMap<String, Arc<AtomicU64>>>;

#[derive(Default)]
struct Registry {
    success: CounterMap,
    failure: CounterMap,
}

/// Cheaply cloneable handle to the process-wide counter registry.
#[derive(Clone, Default)]
pub struct EndpointMetrics {
    inner: Arc<Registry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointMetricsSnapshot {
    pub success: BTreeMap<String, u64>,
    pub failure: BTreeMap<String, u64>,
}

impl EndpointMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_success(&self, endpoint: &str) {
        increment(&self.inner.success, endpoint);
        metrics::counter!(SUCCESS_COUNTER, "endpoint" => endpoint.to_string()).increment(1);
    }

    pub fn increment_failure(&self, endpoint: &str) {
        increment(&self.inner.failure, endpoint);
        metrics::counter!(FAILURE_COUNTER, "endpoint" => endpoint.to_string()).increment(1);
    }

    /// `None` until the endpoint has recorded its first success.
    pub fn success_count(&self, endpoint: &str) -> Option<u64> {
        read(&self.inner.success, endpoint)
    }

    /// `None` until the endpoint has recorded its first failure.
    pub fn failure_count(&self, endpoint: &str) -> Option<u64> {
        read(&self.inner.failure, endpoint)
    }

    pub fn snapshot(&self) -> EndpointMetricsSnapshot {
        EndpointMetricsSnapshot {
            success: collect(&self.inner.success),
            failure: collect(&self.inner.failure),
        }
    }
}

fn increment(map: &CounterMap, endpoint: &str) {
    if let Some(counter) = map
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(endpoint)
    {
        counter.fetch_add(1, Ordering::Relaxed);
        return;
    }
    // Another request may have created the counter between the two locks.
    map.write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(endpoint.to_string())
        .or_default()
        .fetch_add(1, Ordering::Relaxed);
}

fn read(map: &CounterMap, endpoint: &str) -> Option<u64> {
    map.read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(endpoint)
        .map(|c| c.load(Ordering::Relaxed))
}

fn collect(map: &CounterMap) -> BTreeMap<String, u64> {
    map.read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .map(|(k, v)| (k.clone(), v.load(Ordering::Relaxed)))
        .collect()
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Install the global Prometheus recorder. Call once at startup.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, MetricsError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_created_lazily() {
        let metrics = EndpointMetrics::new();
        assert_eq!(metrics.success_count("GET /products"), None);

        metrics.increment_success("GET /products");
        metrics.increment_success("GET /products");
        assert_eq!(metrics.success_count("GET /products"), Some(2));
        assert_eq!(metrics.failure_count("GET /products"), None);
    }

    #[test]
    fn success_and_failure_are_independent() {
        let metrics = EndpointMetrics::new();
        metrics.increment_failure("PUT /products/{id}");

        let snapshot = metrics.snapshot();
        assert!(snapshot.success.is_empty());
        assert_eq!(snapshot.failure.get("PUT /products/{id}"), Some(&1));
    }

    #[test]
    fn clones_share_counters() {
        let metrics = EndpointMetrics::new();
        let other = metrics.clone();
        other.increment_success("DELETE /products/{id}");
        assert_eq!(metrics.success_count("DELETE /products/{id}"), Some(1));
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let metrics = EndpointMetrics::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.increment_success("GET /products/search");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.success_count("GET /products/search"), Some(8000));
    }
}
