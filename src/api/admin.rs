use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{principal_from, BearerAuth};
use crate::errors::ApiError;
use crate::services::{AdjudicationService, Decision, TokenService};
use crate::types::dto::claims::{self, DecideRequest, DecideResponse, PendingClaim};

/// Administrator adjudication endpoints
pub struct AdminApi {
    adjudication: Arc<AdjudicationService>,
    token_service: Arc<TokenService>,
}

impl AdminApi {
    pub fn new(adjudication: Arc<AdjudicationService>, token_service: Arc<TokenService>) -> Self {
        Self {
            adjudication,
            token_service,
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum ApiTags {
    /// Claim adjudication
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Pending claims for review, oldest first
    #[oai(path = "/requests", method = "get", tag = "ApiTags::Admin")]
    async fn list_pending(
        &self,
        auth: BearerAuth,
    ) -> Result<Json<Vec<PendingClaim>>, ApiError> {
        let principal = principal_from(&self.token_service, &auth)?;

        let pending = self.adjudication.list_pending(&principal).await?;

        Ok(Json(
            pending
                .into_iter()
                .map(|record| PendingClaim {
                    request_id: record.id,
                    item_id: record.item_id,
                    requester_id: record.requester_id,
                    requester_name: record.requester_name,
                    item_name: record.item_name,
                    original_description: record.original_description,
                    original_image: record.original_image,
                    proof_description: record.proof_description,
                    proof_detail_address: record.proof_detail_address,
                    proof_image_url: record.proof_image_url,
                    requested_at: record.requested_at,
                })
                .collect(),
        ))
    }

    /// Approve or reject a pending claim
    #[oai(
        path = "/requests/:request_id/process",
        method = "post",
        tag = "ApiTags::Admin"
    )]
    async fn process_request(
        &self,
        auth: BearerAuth,
        request_id: Path<i64>,
        body: Json<DecideRequest>,
    ) -> Result<Json<DecideResponse>, ApiError> {
        let principal = principal_from(&self.token_service, &auth)?;

        let decision = match body.0.action {
            claims::Decision::Approve => Decision::Approve,
            claims::Decision::Reject => Decision::Reject,
        };

        let decided = self
            .adjudication
            .decide(&principal, request_id.0, decision)
            .await?;

        let message = match decision {
            Decision::Approve => "Claim approved; owner may collect at the kiosk",
            Decision::Reject => "Claim rejected; item reopened for claims",
        };

        Ok(Json(DecideResponse {
            request_id: decided.id,
            message: message.to_string(),
        }))
    }
}
