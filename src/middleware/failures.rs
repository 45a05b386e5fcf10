use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{error::UnhandledFailure, state::AppState};

/// Counts 500 responses under the error text rather than the endpoint label.
pub async fn record_unhandled_failure(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if let Some(UnhandledFailure(message)) = response.extensions().get::<UnhandledFailure>() {
        state.metrics.increment_failure(message);
    }
    response
}
