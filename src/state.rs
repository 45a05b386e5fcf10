use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::{
    db::OrmConn,
    metrics::EndpointMetrics,
    repository::{InMemoryProductRepository, ProductRepository, SeaOrmProductRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub metrics: EndpointMetrics,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self {
            products,
            metrics: EndpointMetrics::new(),
            prometheus: None,
        }
    }

    pub fn with_orm(orm: OrmConn) -> Self {
        Self::new(Arc::new(SeaOrmProductRepository::new(orm)))
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductRepository::new()))
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
