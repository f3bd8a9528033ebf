//! Response envelope and error mapping shared by every handler

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{DomainError, ErrorKind};

pub use validated_json::ValidatedJson;

/// Standard API response wrapper.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "...", "code": "conflict"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    /// Human-readable failure explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// `validation`, `conflict`, `not_found` or `unavailable`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: Some(kind.as_str().to_string()),
            ..Self::error(message)
        }
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a domain error to its HTTP status and envelope. Store failures are
/// logged with their cause and answered with a generic message.
pub fn domain_error<T>(e: DomainError) -> ApiError<T> {
    let kind = e.kind();
    if kind == ErrorKind::Unavailable {
        error!(error = %e, "Request failed on the reservation store");
    }
    (
        status_for(kind),
        Json(ApiResponse::failure(kind, e.public_message())),
    )
}
