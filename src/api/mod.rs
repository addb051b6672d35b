// API layer - HTTP endpoints
pub mod admin;
pub mod claims;
pub mod health;
pub mod items;
pub mod kiosk;

pub use admin::AdminApi;
pub use claims::ClaimsApi;
pub use health::HealthApi;
pub use items::ItemsApi;
pub use kiosk::KioskApi;

use poem_openapi::{auth::Bearer, SecurityScheme};

use crate::errors::ApiError;
use crate::services::TokenService;
use crate::types::internal::Principal;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// Resolve the bearer token into the typed principal every privileged service
/// operation takes. Token failures never reach the services.
pub(crate) fn principal_from(
    token_service: &TokenService,
    auth: &BearerAuth,
) -> Result<Principal, ApiError> {
    token_service.principal_from_token(&auth.0.token).map_err(|e| {
        tracing::debug!("Bearer token rejected: {}", e);
        ApiError::unauthorized()
    })
}
