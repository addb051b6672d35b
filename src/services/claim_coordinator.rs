use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::config::ApplicationSettings;
use crate::errors::internal::{ClaimError, DatabaseError, ItemError};
use crate::errors::InternalError;
use crate::stores::claim_store::NewClaim;
use crate::stores::{ClaimStore, ItemStore};
use crate::types::db::claim_request;
use crate::types::db::item::ItemStatus;
use crate::types::internal::Principal;

/// Input for submitting a retrieval claim
#[derive(Debug, Clone)]
pub struct SubmitClaimInput {
    pub item_id: i64,
    pub proof_description: String,
    pub proof_detail_address: Option<String>,
    pub proof_image_url: Option<String>,
}

/// Outcome of a winning submission: the new claim row and the lock expiry the
/// item was stamped with
#[derive(Debug, Clone)]
pub struct SubmittedClaim {
    pub request: claim_request::Model,
    pub locked_until: i64,
}

/// ClaimCoordinator owns the custody state machine's admission step.
///
/// A claim submission must serialize against every other mutation of the same
/// item, so the whole protocol runs inside one transaction that starts with an
/// exclusive read of the item row. The lock expiry, not any claim row's own
/// status, is authoritative for admission; stale PENDING rows are closed out
/// lazily when a later claim wins the window.
pub struct ClaimCoordinator {
    db: DatabaseConnection,
    settings: Arc<ApplicationSettings>,
    item_store: Arc<ItemStore>,
    claim_store: Arc<ClaimStore>,
}

impl ClaimCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            settings: app_data.settings.clone(),
            item_store: app_data.item_store.clone(),
            claim_store: app_data.claim_store.clone(),
        }
    }

    /// Submit a retrieval claim on an item.
    ///
    /// Exactly one caller can win the claim window for an item: concurrent
    /// submissions serialize through the item row lock, and the loser observes
    /// the winner's committed `locked_until` as a WindowActive conflict. Every
    /// error path drops the transaction unfinished, which rolls it back.
    pub async fn submit_claim(
        &self,
        principal: &Principal,
        input: SubmitClaimInput,
    ) -> Result<SubmittedClaim, InternalError> {
        if input.proof_description.trim().is_empty() {
            return Err(InternalError::validation(
                "proof_description",
                "must not be empty",
            ));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        let item = self
            .item_store
            .find_by_id_for_update(&txn, input.item_id)
            .await?
            .ok_or(ItemError::NotFound(input.item_id))?;

        let now = Utc::now().timestamp();

        if let Some(locked_until) = item.locked_until {
            if locked_until > now {
                return Err(ClaimError::WindowActive {
                    item_id: item.id,
                    locked_until,
                }
                .into());
            }
        }

        // Once the item is approved for (or handed to) its owner the status
        // alone gates admission; a lapsed lock must not reopen it.
        if matches!(item.status, ItemStatus::Approved | ItemStatus::Collected) {
            return Err(ClaimError::AlreadyFinalized(item.id).into());
        }

        let expired = self
            .claim_store
            .expire_stale_pending(&txn, item.id, now)
            .await?;
        if expired > 0 {
            tracing::debug!(item_id = item.id, expired, "Closed out stale pending claims");
        }

        let claim = self
            .claim_store
            .insert_pending(
                &txn,
                NewClaim {
                    item_id: item.id,
                    requester_id: principal.id,
                    proof_description: input.proof_description,
                    proof_detail_address: input.proof_detail_address,
                    proof_image_url: input.proof_image_url,
                },
                now,
            )
            .await?;

        let locked_until = now + self.settings.claim_cooldown().num_seconds();
        self.item_store
            .set_claim_window(&txn, item, locked_until)
            .await?;

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        tracing::info!(
            item_id = claim.item_id,
            request_id = claim.id,
            requester_id = principal.id,
            locked_until,
            "Claim submitted, item locked"
        );

        Ok(SubmittedClaim {
            request: claim,
            locked_until,
        })
    }
}
