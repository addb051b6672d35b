use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};

use crate::api::{principal_from, BearerAuth};
use crate::errors::ApiError;
use crate::services::item_registry::RegisterItemInput;
use crate::services::{ItemRegistry, TokenService};
use crate::types::dto::items::{
    ItemDetail, ItemSummary, RegisterItemRequest, RegisterItemResponse,
};

/// Item registration and public browsing endpoints
pub struct ItemsApi {
    registry: Arc<ItemRegistry>,
    token_service: Arc<TokenService>,
}

impl ItemsApi {
    pub fn new(registry: Arc<ItemRegistry>, token_service: Arc<TokenService>) -> Self {
        Self {
            registry,
            token_service,
        }
    }
}

/// API tags for item endpoints
#[derive(Tags)]
enum ApiTags {
    /// Item registration and browsing
    Items,
}

#[OpenApi]
impl ItemsApi {
    /// Register a found item into a locker
    ///
    /// Identified finders are rewarded atomically with the registration.
    #[oai(path = "/items", method = "post", tag = "ApiTags::Items")]
    async fn register_item(
        &self,
        auth: BearerAuth,
        body: Json<RegisterItemRequest>,
    ) -> Result<Json<RegisterItemResponse>, ApiError> {
        principal_from(&self.token_service, &auth)?;

        let item = self
            .registry
            .register_item(RegisterItemInput {
                name: body.0.name,
                category_id: body.0.category_id,
                place_id: body.0.place_id,
                description: body.0.description,
                found_date: body.0.found_date,
                finder_id: body.0.finder_id,
                image_url: body.0.image_url,
                locker_number: body.0.locker_number,
            })
            .await?;

        Ok(Json(RegisterItemResponse {
            item_id: item.id,
            message: "Item registered".to_string(),
        }))
    }

    /// List items currently held or under an active claim
    ///
    /// Availability is derived against the clock on every call.
    #[oai(path = "/items", method = "get", tag = "ApiTags::Items")]
    async fn list_items(&self) -> Result<Json<Vec<ItemSummary>>, ApiError> {
        let items = self.registry.list_available().await?;

        Ok(Json(
            items
                .into_iter()
                .map(|(item, availability)| ItemSummary {
                    item_id: item.id,
                    name: item.name,
                    image_url: item.image_url,
                    display_status: availability.display_status,
                    is_available: availability.is_available,
                    created_at: item.created_at,
                })
                .collect(),
        ))
    }

    /// Item detail with category and place context
    #[oai(path = "/items/:item_id", method = "get", tag = "ApiTags::Items")]
    async fn get_item_detail(&self, item_id: Path<i64>) -> Result<Json<ItemDetail>, ApiError> {
        let (detail, availability) = self.registry.get_detail(item_id.0).await?;

        Ok(Json(ItemDetail {
            item_id: detail.id,
            name: detail.name,
            description: detail.description,
            category_name: detail.category_name,
            address: detail.address,
            detail_address: detail.detail_address,
            found_date: detail.found_date,
            image_url: detail.image_url,
            display_status: availability.display_status,
            is_available: availability.is_available,
            lock_message: availability.lock_message,
            created_at: detail.created_at,
        }))
    }
}
