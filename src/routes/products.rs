use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use crate::{
    dto::products::{ProductList, ProductPayload},
    error::{AppError, AppResult},
    middleware::extract::{AppJson, AppPath, AppQuery},
    models::{Lookup, Product},
    response::ApiResponse,
    routes::params::SearchQuery,
    services::product_service,
    state::AppState,
};

/// Metric labels, one per route template.
pub mod endpoint {
    pub const LIST: &str = "GET /products";
    pub const GET: &str = "GET /products/{id}";
    pub const CREATE: &str = "POST /products";
    pub const UPDATE: &str = "PUT /products/{id}";
    pub const DELETE: &str = "DELETE /products/{id}";
    pub const SEARCH: &str = "GET /products/search";
    pub const BY_CATEGORY: &str = "GET /products/category/{category}";
    pub const DEPLOYMENT_CHECK: &str = "GET /products/cicd";
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/cicd", get(deployment_check))
        .route("/category/{category}", get(products_by_category))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Bumps the endpoint's success or failure counter according to `result`.
fn record<T>(state: &AppState, label: &str, result: AppResult<T>) -> AppResult<T> {
    match &result {
        Ok(_) => state.metrics.increment_success(label),
        Err(err) => {
            state.metrics.increment_failure(label);
            tracing::error!(endpoint = label, error = %err, "request failed");
        }
    }
    result
}

/// Counts a request that failed to bind as a failure of `label`.
fn accept<T>(state: &AppState, label: &str, extracted: Result<T, AppError>) -> AppResult<T> {
    if let Err(err) = &extracted {
        state.metrics.increment_failure(label);
        tracing::error!(endpoint = label, error = %err, "request rejected");
    }
    extracted
}

#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = record(&state, endpoint::LIST, product_service::list_all(&state).await)?;
    tracing::info!(count = items.len(), "fetched all products");
    Ok(Json(ApiResponse::success(
        "Products retrieved successfully",
        ProductList { items },
    )))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 400, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    path: Result<AppPath<i64>, AppError>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let AppPath(id) = accept(&state, endpoint::GET, path)?;
    let result = match product_service::get_by_id(&state, id).await {
        Ok(Lookup::Found(p)) => Ok(p),
        Ok(Lookup::Absent) => Err(AppError::InvalidArgument(format!(
            "Product not found with id: {id}"
        ))),
        Err(err) => Err(err),
    };
    let product = record(&state, endpoint::GET, result)?;
    tracing::info!(id, "fetched product");
    Ok(Json(ApiResponse::success(
        "Product retrieved successfully",
        product,
    )))
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Unreadable body or storage failure"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<AppJson<ProductPayload>, AppError>,
) -> AppResult<impl IntoResponse> {
    let AppJson(payload) = accept(&state, endpoint::CREATE, body)?;
    let created = record(
        &state,
        endpoint::CREATE,
        product_service::create(&state, payload).await,
    )?;
    tracing::info!(id = created.id, name = %created.name, "created product");
    let location = format!("/products/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success("Product created successfully", created)),
    ))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found", body = ApiResponse<Product>),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    path: Result<AppPath<i64>, AppError>,
    body: Result<AppJson<ProductPayload>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let (AppPath(id), AppJson(payload)) =
        accept(&state, endpoint::UPDATE, path.and_then(|p| body.map(|b| (p, b))))?;
    match product_service::update(&state, id, payload).await {
        Ok(Lookup::Found(updated)) => {
            state.metrics.increment_success(endpoint::UPDATE);
            tracing::info!(id, "updated product");
            Ok((
                StatusCode::OK,
                Json(ApiResponse::success("Product updated successfully", updated)),
            ))
        }
        Ok(Lookup::Absent) => {
            state.metrics.increment_failure(endpoint::UPDATE);
            tracing::warn!(id, "product not found for update");
            Ok((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Product not found")),
            ))
        }
        Err(err) => record(&state, endpoint::UPDATE, Err(err)),
    }
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<serde_json::Value>)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<AppPath<i64>, AppError>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let AppPath(id) = accept(&state, endpoint::DELETE, path)?;
    record(&state, endpoint::DELETE, product_service::delete(&state, id).await)?;
    tracing::info!(id, "deleted product");
    Ok(Json(ApiResponse::success(
        "Product deleted successfully",
        serde_json::Value::Null,
    )))
}

#[utoipa::path(
    get,
    path = "/products/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search by name or category", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    query: Result<AppQuery<SearchQuery>, AppError>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let AppQuery(params) = accept(&state, endpoint::SEARCH, query)?;
    let items = record(
        &state,
        endpoint::SEARCH,
        product_service::search(&state, &params.query).await,
    )?;
    tracing::info!(query = %params.query, count = items.len(), "search finished");
    Ok(Json(ApiResponse::success(
        "Search completed",
        ProductList { items },
    )))
}

#[utoipa::path(
    get,
    path = "/products/category/{category}",
    params(
        ("category" = String, Path, description = "Category, matched case-insensitively")
    ),
    responses(
        (status = 200, description = "Products in category", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn products_by_category(
    State(state): State<AppState>,
    path: Result<AppPath<String>, AppError>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let AppPath(category) = accept(&state, endpoint::BY_CATEGORY, path)?;
    let items = record(
        &state,
        endpoint::BY_CATEGORY,
        product_service::find_by_category(&state, &category).await,
    )?;
    tracing::info!(%category, count = items.len(), "fetched products for category");
    Ok(Json(ApiResponse::success(
        "Products retrieved by category",
        ProductList { items },
    )))
}

#[utoipa::path(
    get,
    path = "/products/cicd",
    responses(
        (status = 200, description = "Deployment check", body = ApiResponse<String>)
    ),
    tag = "Products"
)]
pub async fn deployment_check(State(state): State<AppState>) -> Json<ApiResponse<String>> {
    state.metrics.increment_success(endpoint::DEPLOYMENT_CHECK);
    Json(ApiResponse::success(
        "Deployment check",
        "Your Service has been deployed".to_string(),
    ))
}
