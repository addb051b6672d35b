use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::internal::{ClaimError, DatabaseError};
use crate::errors::InternalError;
use crate::stores::claim_store::CollectableRecord;
use crate::stores::{ClaimStore, ItemStore};
use crate::types::db::claim_request::ClaimStatus;
use crate::types::internal::Principal;

/// PickupService closes the custody loop once the owner stands at the kiosk.
///
/// It only reports the locker number; opening the physical locker is the
/// trusted kiosk boundary's job.
pub struct PickupService {
    db: DatabaseConnection,
    item_store: Arc<ItemStore>,
    claim_store: Arc<ClaimStore>,
}

impl PickupService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            item_store: app_data.item_store.clone(),
            claim_store: app_data.claim_store.clone(),
        }
    }

    /// The caller's approved, not-yet-collected items
    pub async fn list_my_collectable(
        &self,
        principal: &Principal,
    ) -> Result<Vec<CollectableRecord>, InternalError> {
        self.claim_store
            .list_collectable(&self.db, principal.id)
            .await
    }

    /// Hand the item over: requires the caller's own APPROVED claim on an item
    /// still in its locker. Denial means no mutation at all; the check and the
    /// hand-over are a single row-locked transaction so a double collect can
    /// never open the locker twice.
    pub async fn collect(
        &self,
        principal: &Principal,
        item_id: i64,
    ) -> Result<i32, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        let denied = || ClaimError::CollectionDenied {
            item_id,
            requester_id: principal.id,
        };

        // Missing items fall under Denied as well: the kiosk response must not
        // reveal whether an id exists.
        let item = self
            .item_store
            .find_by_id_for_update(&txn, item_id)
            .await?
            .ok_or_else(denied)?;

        if item.is_retrieved {
            return Err(denied().into());
        }

        let claim = self
            .claim_store
            .find_approved_for_item(&txn, item_id, principal.id)
            .await?
            .ok_or_else(denied)?;

        let now = Utc::now().timestamp();
        let item = self.item_store.mark_collected(&txn, item).await?;
        self.claim_store
            .set_status(&txn, claim, ClaimStatus::Collected, Some(now))
            .await?;

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        tracing::info!(
            item_id,
            requester_id = principal.id,
            locker_number = item.locker_number,
            "Item collected, reporting locker to kiosk"
        );

        Ok(item.locker_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::adjudication_service::{AdjudicationService, Decision};
    use crate::services::claim_coordinator::{ClaimCoordinator, SubmitClaimInput};
    use crate::test::utils::{
        admin_principal, seed_held_item, seed_member, setup_test_app, user_principal,
    };
    use crate::types::db::item::ItemStatus;
    use crate::types::internal::Role;

    /// Walks an item to the APPROVED state and returns (item_id, requester_id)
    async fn approved_claim(
        db: &sea_orm::DatabaseConnection,
        app: &Arc<AppData>,
    ) -> (i64, i64) {
        let item = seed_held_item(db, app).await;
        let requester = seed_member(db, "owner", Role::User).await;
        let admin = seed_member(db, "admin", Role::Admin).await;

        let submitted = ClaimCoordinator::new(app.clone())
            .submit_claim(
                &user_principal(requester),
                SubmitClaimInput {
                    item_id: item.id,
                    proof_description: "description of the contents".to_string(),
                    proof_detail_address: None,
                    proof_image_url: None,
                },
            )
            .await
            .expect("seed claim failed");

        AdjudicationService::new(app.clone())
            .decide(&admin_principal(admin), submitted.request.id, Decision::Approve)
            .await
            .expect("seed approval failed");

        (item.id, requester)
    }

    #[tokio::test]
    async fn test_collect_hands_over_and_reports_locker() {
        let (db, app) = setup_test_app().await;
        let (item_id, requester) = approved_claim(&db, &app).await;
        let service = PickupService::new(app.clone());

        let locker = service
            .collect(&user_principal(requester), item_id)
            .await
            .expect("collection failed");

        let item = app
            .item_store
            .find_by_id(&db, item_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(locker, item.locker_number);
        assert_eq!(item.status, ItemStatus::Collected);
        assert!(item.is_retrieved);
        assert_eq!(item.locked_until, None);

        // No active claim remains once custody transferred
        let active = app
            .claim_store
            .count_active_for_item(&db, item_id)
            .await
            .unwrap();
        assert_eq!(active, 0);
    }

    #[tokio::test]
    async fn test_collect_by_stranger_is_denied_without_mutation() {
        let (db, app) = setup_test_app().await;
        let (item_id, _) = approved_claim(&db, &app).await;
        let stranger = seed_member(&db, "stranger", Role::User).await;
        let service = PickupService::new(app.clone());

        let result = service.collect(&user_principal(stranger), item_id).await;
        assert!(matches!(
            result,
            Err(InternalError::Claim(ClaimError::CollectionDenied { .. }))
        ));

        let item = app
            .item_store
            .find_by_id(&db, item_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.status, ItemStatus::Approved);
        assert!(!item.is_retrieved);
    }

    #[tokio::test]
    async fn test_collect_twice_is_denied() {
        let (db, app) = setup_test_app().await;
        let (item_id, requester) = approved_claim(&db, &app).await;
        let service = PickupService::new(app.clone());

        service
            .collect(&user_principal(requester), item_id)
            .await
            .unwrap();

        let second = service.collect(&user_principal(requester), item_id).await;
        assert!(matches!(
            second,
            Err(InternalError::Claim(ClaimError::CollectionDenied { .. }))
        ));
    }

    #[tokio::test]
    async fn test_collect_unknown_item_is_denied_not_not_found() {
        let (db, app) = setup_test_app().await;
        let requester = seed_member(&db, "owner", Role::User).await;
        let service = PickupService::new(app);

        let result = service.collect(&user_principal(requester), 9999).await;
        assert!(matches!(
            result,
            Err(InternalError::Claim(ClaimError::CollectionDenied { .. }))
        ));
    }

    #[tokio::test]
    async fn test_list_my_collectable_shows_only_own_pending_pickups() {
        let (db, app) = setup_test_app().await;
        let (item_id, requester) = approved_claim(&db, &app).await;
        let stranger = seed_member(&db, "stranger", Role::User).await;
        let service = PickupService::new(app.clone());

        let mine = service
            .list_my_collectable(&user_principal(requester))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].item_id, item_id);
        assert!(mine[0].locker_number > 0);

        let theirs = service
            .list_my_collectable(&user_principal(stranger))
            .await
            .unwrap();
        assert!(theirs.is_empty());

        // Collected items drop off the list
        service
            .collect(&user_principal(requester), item_id)
            .await
            .unwrap();
        let after = service
            .list_my_collectable(&user_principal(requester))
            .await
            .unwrap();
        assert!(after.is_empty());
    }
}
