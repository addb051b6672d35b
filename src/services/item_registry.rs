use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::config::ApplicationSettings;
use crate::errors::internal::{DatabaseError, ItemError};
use crate::errors::InternalError;
use crate::stores::item_store::{ItemDetailRecord, NewItem};
use crate::stores::{ItemStore, MemberStore};
use crate::types::db::item::{self, ItemStatus};

/// Availability derived at read time from status and the cooldown lock.
///
/// Never persisted: the lock expires purely by wall-clock passage and there is
/// no background job, so every read recomputes.
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub is_available: bool,
    pub display_status: String,
    pub lock_message: Option<String>,
}

/// The single availability rule: HELD is claimable, an active claim blocks
/// until its lock lapses, and approved/collected items are gated terminally
/// regardless of the lock timestamp.
pub fn derive_availability(
    status: &ItemStatus,
    locked_until: Option<i64>,
    now: i64,
) -> Availability {
    match status {
        ItemStatus::Held => Availability {
            is_available: true,
            display_status: "available".to_string(),
            lock_message: None,
        },
        ItemStatus::ClaimPending => match locked_until {
            Some(expiry) if now < expiry => Availability {
                is_available: false,
                display_status: "claim pending".to_string(),
                lock_message: Some(format!("a claim is being reviewed; locked until {}", expiry)),
            },
            _ => Availability {
                is_available: true,
                display_status: "available".to_string(),
                lock_message: None,
            },
        },
        ItemStatus::Approved => Availability {
            is_available: false,
            display_status: "awaiting pickup".to_string(),
            lock_message: Some("already claimed by owner".to_string()),
        },
        ItemStatus::Collected => Availability {
            is_available: false,
            display_status: "returned".to_string(),
            lock_message: Some("already claimed by owner".to_string()),
        },
    }
}

/// Input for registering a found item
#[derive(Debug, Clone)]
pub struct RegisterItemInput {
    pub name: String,
    pub category_id: i64,
    pub place_id: i64,
    pub description: String,
    pub found_date: i64,
    pub finder_id: Option<i64>,
    pub image_url: Option<String>,
    pub locker_number: Option<i32>,
}

/// ItemRegistry creates items and exposes the public listings with derived
/// availability.
pub struct ItemRegistry {
    db: DatabaseConnection,
    settings: Arc<ApplicationSettings>,
    item_store: Arc<ItemStore>,
    member_store: Arc<MemberStore>,
}

impl ItemRegistry {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            settings: app_data.settings.clone(),
            item_store: app_data.item_store.clone(),
            member_store: app_data.member_store.clone(),
        }
    }

    /// Register a found item, rewarding an identified finder atomically.
    ///
    /// The item insert and the point increment commit or roll back together;
    /// an unknown finder aborts the whole registration.
    pub async fn register_item(
        &self,
        input: RegisterItemInput,
    ) -> Result<item::Model, InternalError> {
        if input.name.trim().is_empty() {
            return Err(InternalError::validation("name", "must not be empty"));
        }
        if input.description.trim().is_empty() {
            return Err(InternalError::validation("description", "must not be empty"));
        }
        if let Some(locker) = input.locker_number {
            if locker <= 0 {
                return Err(InternalError::validation(
                    "locker_number",
                    "must be a positive locker number",
                ));
            }
        }

        // No locker-occupancy check is performed; the fallback locker is a
        // configured constant.
        let locker_number = input
            .locker_number
            .unwrap_or_else(|| self.settings.default_locker_number());

        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        let item = self
            .item_store
            .insert(
                &txn,
                NewItem {
                    name: input.name,
                    category_id: input.category_id,
                    place_id: input.place_id,
                    description: input.description,
                    found_date: input.found_date,
                    finder_id: input.finder_id,
                    image_url: input.image_url,
                    locker_number,
                },
            )
            .await?;

        if let Some(finder_id) = input.finder_id {
            self.member_store
                .add_points(&txn, finder_id, self.settings.registration_reward_points())
                .await?;
        }

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        tracing::info!(item_id = item.id, locker_number, "Item registered");

        Ok(item)
    }

    /// Public listing: held items plus claim-pending ones, availability
    /// recomputed against the clock on every call
    pub async fn list_available(
        &self,
    ) -> Result<Vec<(item::Model, Availability)>, InternalError> {
        let now = Utc::now().timestamp();
        let items = self.item_store.list_listable(&self.db).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let availability = derive_availability(&item.status, item.locked_until, now);
                (item, availability)
            })
            .collect())
    }

    /// Item detail with category/place context and the availability rule
    /// applied, including terminal gating for approved/collected items
    pub async fn get_detail(
        &self,
        item_id: i64,
    ) -> Result<(ItemDetailRecord, Availability), InternalError> {
        let detail = self
            .item_store
            .find_detail(&self.db, item_id)
            .await?
            .ok_or(ItemError::NotFound(item_id))?;

        let now = Utc::now().timestamp();
        let availability = derive_availability(&detail.status, detail.locked_until, now);

        Ok((detail, availability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_category, seed_member, seed_place, setup_test_app};
    use crate::types::internal::Role;

    fn register_input(
        category_id: i64,
        place_id: i64,
        finder_id: Option<i64>,
    ) -> RegisterItemInput {
        RegisterItemInput {
            name: "blue wallet".to_string(),
            category_id,
            place_id,
            description: "leather, three cards inside".to_string(),
            found_date: Utc::now().timestamp(),
            finder_id,
            image_url: Some("/uploads/wallet.jpg".to_string()),
            locker_number: None,
        }
    }

    #[tokio::test]
    async fn test_register_item_defaults_locker_and_starts_held() {
        let (db, app) = setup_test_app().await;
        let category_id = seed_category(&db, "wallets").await;
        let place_id = seed_place(&db, "cafeteria").await;
        let registry = ItemRegistry::new(app);

        let item = registry
            .register_item(register_input(category_id, place_id, None))
            .await
            .expect("registration failed");

        assert_eq!(item.status, ItemStatus::Held);
        assert_eq!(item.locker_number, 1);
        assert_eq!(item.locked_until, None);
        assert!(!item.is_retrieved);
    }

    #[tokio::test]
    async fn test_register_item_rewards_identified_finder() {
        let (db, app) = setup_test_app().await;
        let category_id = seed_category(&db, "wallets").await;
        let place_id = seed_place(&db, "cafeteria").await;
        let finder_id = seed_member(&db, "finder", Role::User).await;
        let registry = ItemRegistry::new(app.clone());

        registry
            .register_item(register_input(category_id, place_id, Some(finder_id)))
            .await
            .expect("registration failed");

        let member = app
            .member_store
            .find_by_id(&db, finder_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.point, 100);
    }

    #[tokio::test]
    async fn test_register_item_anonymous_grants_no_points() {
        let (db, app) = setup_test_app().await;
        let category_id = seed_category(&db, "wallets").await;
        let place_id = seed_place(&db, "cafeteria").await;
        let bystander = seed_member(&db, "bystander", Role::User).await;
        let registry = ItemRegistry::new(app.clone());

        registry
            .register_item(register_input(category_id, place_id, None))
            .await
            .expect("registration failed");

        let member = app
            .member_store
            .find_by_id(&db, bystander)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.point, 0);
    }

    #[tokio::test]
    async fn test_register_item_unknown_finder_rolls_back_insert() {
        let (db, app) = setup_test_app().await;
        let category_id = seed_category(&db, "wallets").await;
        let place_id = seed_place(&db, "cafeteria").await;
        let registry = ItemRegistry::new(app.clone());

        let result = registry
            .register_item(register_input(category_id, place_id, Some(777)))
            .await;
        assert!(result.is_err());

        // The item insert must not survive the failed reward
        let listed = app.item_store.list_listable(&db).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_register_item_rejects_blank_name() {
        let (db, app) = setup_test_app().await;
        let category_id = seed_category(&db, "wallets").await;
        let place_id = seed_place(&db, "cafeteria").await;
        let registry = ItemRegistry::new(app);

        let mut input = register_input(category_id, place_id, None);
        input.name = "   ".to_string();

        match registry.register_item(input).await {
            Err(InternalError::Validation { field, .. }) => assert_eq!(field, "name"),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_availability_held_is_available() {
        let availability = derive_availability(&ItemStatus::Held, None, 1_000);
        assert!(availability.is_available);
        assert_eq!(availability.display_status, "available");
        assert!(availability.lock_message.is_none());
    }

    #[test]
    fn test_availability_active_lock_blocks() {
        let availability = derive_availability(&ItemStatus::ClaimPending, Some(2_000), 1_000);
        assert!(!availability.is_available);
        assert_eq!(availability.display_status, "claim pending");
        assert!(availability.lock_message.unwrap().contains("2000"));
    }

    #[test]
    fn test_availability_expired_lock_reopens() {
        let availability = derive_availability(&ItemStatus::ClaimPending, Some(1_000), 2_000);
        assert!(availability.is_available);
        assert_eq!(availability.display_status, "available");
    }

    #[test]
    fn test_availability_lock_boundary_is_inclusive() {
        // now >= locked_until reopens the item
        let availability = derive_availability(&ItemStatus::ClaimPending, Some(1_000), 1_000);
        assert!(availability.is_available);
    }

    #[test]
    fn test_availability_terminal_states_ignore_lock_expiry() {
        for status in [ItemStatus::Approved, ItemStatus::Collected] {
            let availability = derive_availability(&status, Some(1_000), 2_000);
            assert!(!availability.is_available);
            assert_eq!(
                availability.lock_message.as_deref(),
                Some("already claimed by owner")
            );
        }
    }
}
