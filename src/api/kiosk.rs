use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{principal_from, BearerAuth};
use crate::errors::ApiError;
use crate::services::{PickupService, TokenService};
use crate::types::dto::pickup::{CollectRequest, CollectResponse, CollectableItem};

/// Kiosk pickup endpoints
pub struct KioskApi {
    pickup: Arc<PickupService>,
    token_service: Arc<TokenService>,
}

impl KioskApi {
    pub fn new(pickup: Arc<PickupService>, token_service: Arc<TokenService>) -> Self {
        Self {
            pickup,
            token_service,
        }
    }
}

/// API tags for kiosk endpoints
#[derive(Tags)]
enum ApiTags {
    /// Kiosk pickup
    Kiosk,
}

#[OpenApi(prefix_path = "/kiosk")]
impl KioskApi {
    /// The caller's approved items still waiting in lockers
    #[oai(path = "/my-items", method = "get", tag = "ApiTags::Kiosk")]
    async fn my_items(&self, auth: BearerAuth) -> Result<Json<Vec<CollectableItem>>, ApiError> {
        let principal = principal_from(&self.token_service, &auth)?;

        let collectable = self.pickup.list_my_collectable(&principal).await?;

        Ok(Json(
            collectable
                .into_iter()
                .map(|record| CollectableItem {
                    item_id: record.item_id,
                    request_id: record.request_id,
                    name: record.item_name,
                    image_url: record.image_url,
                    locker_number: record.locker_number,
                })
                .collect(),
        ))
    }

    /// Collect an approved item
    ///
    /// Returns the locker number; the kiosk opens the door on it.
    #[oai(path = "/retrieve", method = "post", tag = "ApiTags::Kiosk")]
    async fn retrieve(
        &self,
        auth: BearerAuth,
        body: Json<CollectRequest>,
    ) -> Result<Json<CollectResponse>, ApiError> {
        let principal = principal_from(&self.token_service, &auth)?;

        let locker_number = self.pickup.collect(&principal, body.0.item_id).await?;

        Ok(Json(CollectResponse {
            locker_number,
            message: format!("Locker {} is opening", locker_number),
        }))
    }
}
