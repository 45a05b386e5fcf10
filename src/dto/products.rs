use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Body accepted by create and update. An `id` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "must be greater than or equal to 0"))]
    pub price: f64,
    #[validate(custom(function = "not_blank"))]
    pub category: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<crate::models::Product>)]
    pub items: Vec<crate::models::Product>,
}
