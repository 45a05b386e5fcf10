use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    middleware::from_fn_with_state,
    routing::get,
};

use crate::{
    middleware::failures::record_unhandled_failure, response::ApiResponse, state::AppState,
};

pub mod doc;
pub mod health;
pub mod metrics;
pub mod params;
pub mod products;

/// Build the full application router with state bound.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/products", products::router())
        .nest("/metrics", metrics::router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), record_unhandled_failure))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<()>>) {
    tracing::debug!(path = uri.path(), "no route matched");
    (StatusCode::NOT_FOUND, Json(ApiResponse::failure("Not Found")))
}
