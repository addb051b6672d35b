use thiserror::Error;

pub mod access;
pub mod claim;
pub mod database;
pub mod item;
pub mod member;

pub use access::AccessError;
pub use claim::ClaimError;
pub use database::DatabaseError;
pub use item::ItemError;
pub use member::MemberError;

/// Internal error type for store and service operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors
/// (store-specific). Not exposed via API - endpoints must convert to ApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Item(#[from] ItemError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Member(#[from] MemberError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn validation(field: &str, message: impl Into<String>) -> InternalError {
        InternalError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
