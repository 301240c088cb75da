use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::{RecommendationError, SupplierError};

/// Error returned by HTTP handlers, rendered as `{ success: false, error: { code, message } }`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Supplier(String),

    #[error("Failed to generate recommendations")]
    AiService,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Supplier(_) => "SUPPLIER_ERROR",
            ApiError::AiService => "AI_SERVICE_ERROR",
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Supplier(_) => StatusCode::BAD_GATEWAY,
            ApiError::AiService => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.code(), self.to_string()))
    }
}

impl From<RecommendationError> for ApiError {
    fn from(err: RecommendationError) -> Self {
        match err {
            RecommendationError::NotFound(_) => ApiError::NotFound("User not found".to_string()),
            RecommendationError::AiService(_) => ApiError::AiService,
        }
    }
}

impl From<SupplierError> for ApiError {
    fn from(err: SupplierError) -> Self {
        ApiError::Supplier(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    ApiError::Validation(format!("Invalid query: {}", err)).into()
}
