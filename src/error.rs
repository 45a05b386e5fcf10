use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed {}", join_field_errors(.0))]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidArgument(String),

    /// Request could not be bound: bad path segment, unreadable body, missing query.
    #[error("{0}")]
    Rejected(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error: {0}")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

/// Marker left on 500 responses so the failure middleware can count them by message.
#[derive(Debug, Clone)]
pub struct UnhandledFailure(pub String);

fn join_field_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let reason = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("{field}: {reason}")
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Validation(_) | AppError::InvalidArgument(_) => {
                let body = ApiResponse::<()>::failure(self.to_string());
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            AppError::Rejected(_)
            | AppError::DbError(_)
            | AppError::OrmError(_)
            | AppError::Internal(_) => {
                let cause = self.to_string();
                tracing::error!(error = %cause, "unhandled error");
                let body = ApiResponse::<()>::error(format!("An error occurred: {cause}"));
                let mut response =
                    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
                response.extensions_mut().insert(UnhandledFailure(cause));
                response
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::products::ProductPayload;
    use validator::Validate;

    #[test]
    fn validation_message_lists_fields_in_order() {
        let payload = ProductPayload {
            name: String::new(),
            description: None,
            price: -1.0,
            category: String::new(),
        };
        let err = AppError::from(payload.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation failed category: must not be blank, name: must not be blank, price: must be greater than or equal to 0"
        );
    }

    #[test]
    fn invalid_argument_maps_to_bad_request() {
        let response =
            AppError::InvalidArgument("Product not found with id: 7".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<UnhandledFailure>().is_none());
    }

    #[test]
    fn whitespace_only_fields_are_blank() {
        let payload = ProductPayload {
            name: "   ".into(),
            description: None,
            price: 1.0,
            category: "\t".into(),
        };
        let err = AppError::from(payload.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "Validation failed category: must not be blank, name: must not be blank"
        );
    }

    #[test]
    fn rejected_input_is_a_generic_failure() {
        let response =
            AppError::Rejected("Cannot parse `abc` to a `i64`".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let marker = response.extensions().get::<UnhandledFailure>().unwrap();
        assert_eq!(marker.0, "Cannot parse `abc` to a `i64`");
    }

    #[test]
    fn internal_error_is_marked_for_failure_counting() {
        let response = AppError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let marker = response.extensions().get::<UnhandledFailure>().unwrap();
        assert_eq!(marker.0, "disk on fire");
    }
}
