use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Uniform envelope wrapped around every JSON response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    fn new(success: bool, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self::new(true, message, Some(data))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(false, message, None)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(false, message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_data() {
        let before = Utc::now();
        let resp = ApiResponse::success("Products retrieved successfully", vec![1, 2]);
        assert!(resp.success);
        assert_eq!(resp.data, Some(vec![1, 2]));
        assert!(resp.timestamp >= before);
    }

    #[test]
    fn error_and_failure_are_equivalent() {
        let error = ApiResponse::<String>::error("Product not found");
        let failure = ApiResponse::<String>::failure("Product not found");
        assert_eq!(error.success, failure.success);
        assert_eq!(error.message, failure.message);
        assert!(!error.success);
        assert!(error.data.is_none() && failure.data.is_none());
    }

    #[test]
    fn serializes_missing_data_as_null() {
        let value = serde_json::to_value(ApiResponse::<String>::failure("nope")).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "nope");
        assert!(value["data"].is_null());
        assert!(value["timestamp"].is_string());
    }
}
