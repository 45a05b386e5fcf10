use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::products::{ProductList, ProductPayload},
    metrics::EndpointMetricsSnapshot,
    models::Product,
    response::ApiResponse,
    routes::{health, metrics, params, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::search_products,
        products::products_by_category,
        products::deployment_check,
        metrics::prometheus_metrics,
        metrics::endpoint_metrics
    ),
    components(
        schemas(
            Product,
            ProductPayload,
            ProductList,
            EndpointMetricsSnapshot,
            params::SearchQuery,
            health::HealthData,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<EndpointMetricsSnapshot>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Metrics", description = "Endpoint counters"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
