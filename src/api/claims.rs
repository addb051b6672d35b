use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{principal_from, BearerAuth};
use crate::errors::ApiError;
use crate::services::claim_coordinator::SubmitClaimInput;
use crate::services::{ClaimCoordinator, TokenService};
use crate::types::dto::claims::{SubmitClaimRequest, SubmitClaimResponse};

/// Retrieval claim submission endpoints
pub struct ClaimsApi {
    coordinator: Arc<ClaimCoordinator>,
    token_service: Arc<TokenService>,
}

impl ClaimsApi {
    pub fn new(coordinator: Arc<ClaimCoordinator>, token_service: Arc<TokenService>) -> Self {
        Self {
            coordinator,
            token_service,
        }
    }
}

/// API tags for claim endpoints
#[derive(Tags)]
enum ApiTags {
    /// Retrieval claims
    Claims,
}

#[OpenApi]
impl ClaimsApi {
    /// Submit a retrieval claim on a held item
    ///
    /// Winning the claim locks the item for the cooldown window; a Conflict
    /// response carries the current lock expiry instead.
    #[oai(path = "/requests", method = "post", tag = "ApiTags::Claims")]
    async fn submit_claim(
        &self,
        auth: BearerAuth,
        body: Json<SubmitClaimRequest>,
    ) -> Result<Json<SubmitClaimResponse>, ApiError> {
        let principal = principal_from(&self.token_service, &auth)?;

        let submitted = self
            .coordinator
            .submit_claim(
                &principal,
                SubmitClaimInput {
                    item_id: body.0.item_id,
                    proof_description: body.0.proof_description,
                    proof_detail_address: body.0.proof_detail_address,
                    proof_image_url: body.0.proof_image_url,
                },
            )
            .await?;

        Ok(Json(SubmitClaimResponse {
            request_id: submitted.request.id,
            locked_until: submitted.locked_until,
            message: "Claim submitted; awaiting administrator review".to_string(),
        }))
    }
}
