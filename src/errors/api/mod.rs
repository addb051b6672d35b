use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::internal::{
    AccessError, ClaimError, InternalError, ItemError, MemberError,
};
use crate::types::dto::common::ErrorResponse;

/// API error responses shared by every endpoint group.
///
/// This is the explicit conversion point from internal errors to the wire.
/// Infrastructure error details are logged but never exposed to clients.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Missing or malformed input; nothing was written
    #[oai(status = 400)]
    ValidationError(Json<ErrorResponse>),

    /// Missing or invalid bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authorization or ownership failure
    #[oai(status = 403)]
    Denied(Json<ErrorResponse>),

    /// Unknown item or claim request
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Lock contention on claim submission; body carries `locked_until`
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Storage or transaction failure; the operation rolled back in full
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl ApiError {
    pub fn validation_error(message: impl Into<String>) -> Self {
        ApiError::ValidationError(Json(ErrorResponse {
            error: "validation_error".to_string(),
            message: message.into(),
            status_code: 400,
            locked_until: None,
        }))
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "Missing or invalid bearer token".to_string(),
            status_code: 401,
            locked_until: None,
        }))
    }

    pub fn denied(message: impl Into<String>) -> Self {
        ApiError::Denied(Json(ErrorResponse {
            error: "denied".to_string(),
            message: message.into(),
            status_code: 403,
            locked_until: None,
        }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
            locked_until: None,
        }))
    }

    pub fn conflict(message: impl Into<String>, locked_until: Option<i64>) -> Self {
        ApiError::Conflict(Json(ErrorResponse {
            error: "conflict".to_string(),
            message: message.into(),
            status_code: 409,
            locked_until,
        }))
    }

    fn internal_server_error() -> Self {
        ApiError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
            locked_until: None,
        }))
    }

    /// Convert InternalError to ApiError
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) => {
                tracing::error!("Storage failure: {}", err);
                Self::internal_server_error()
            }

            InternalError::Validation { .. } => Self::validation_error(err.to_string()),

            InternalError::Item(ItemError::NotFound(id)) => {
                Self::not_found(format!("Item not found: {}", id))
            }
            InternalError::Member(MemberError::NotFound(id)) => {
                Self::not_found(format!("Member not found: {}", id))
            }
            InternalError::Claim(ClaimError::NotFound(id)) => {
                Self::not_found(format!("Claim request not found: {}", id))
            }

            InternalError::Claim(ClaimError::WindowActive { locked_until, .. }) => Self::conflict(
                "A claim is already in progress for this item".to_string(),
                Some(*locked_until),
            ),
            InternalError::Claim(ClaimError::AlreadyFinalized(_)) => {
                Self::conflict("Item is already claimed by its owner", None)
            }
            InternalError::Claim(ClaimError::NotDecidable { .. }) => {
                Self::conflict("Claim request is no longer decidable", None)
            }

            InternalError::Claim(ClaimError::CollectionDenied { .. }) => {
                Self::denied("No collectable claim, or the item was already handed over")
            }
            InternalError::Access(AccessError::AdminRequired) => {
                Self::denied("Admin role required")
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            ApiError::ValidationError(json) => json.0.message.clone(),
            ApiError::Unauthorized(json) => json.0.message.clone(),
            ApiError::Denied(json) => json.0.message.clone(),
            ApiError::NotFound(json) => json.0.message.clone(),
            ApiError::Conflict(json) => json.0.message.clone(),
            ApiError::InternalError(json) => json.0.message.clone(),
        }
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError(json) => json.0.status_code,
            ApiError::Unauthorized(json) => json.0.status_code,
            ApiError::Denied(json) => json.0.status_code,
            ApiError::NotFound(json) => json.0.status_code,
            ApiError::Conflict(json) => json.0.status_code,
            ApiError::InternalError(json) => json.0.status_code,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}
