use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::app_data::AppData;
use crate::errors::internal::{AccessError, ClaimError, DatabaseError, ItemError};
use crate::errors::InternalError;
use crate::stores::claim_store::PendingClaimRecord;
use crate::stores::{ClaimStore, ItemStore};
use crate::types::db::claim_request::{self, ClaimStatus};
use crate::types::internal::Principal;

/// Administrator decision on a pending claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// AdjudicationService finalizes or releases pending claims.
///
/// Approval leaves `locked_until` untouched (it stops gating once the status
/// is APPROVED and stays for audit); rejection is the only path that releases
/// the cooldown early and reopens the item.
pub struct AdjudicationService {
    db: DatabaseConnection,
    item_store: Arc<ItemStore>,
    claim_store: Arc<ClaimStore>,
}

impl AdjudicationService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            item_store: app_data.item_store.clone(),
            claim_store: app_data.claim_store.clone(),
        }
    }

    /// Pending claims joined with requester and item context, oldest first so
    /// administrators review in submission order
    pub async fn list_pending(
        &self,
        principal: &Principal,
    ) -> Result<Vec<PendingClaimRecord>, InternalError> {
        if !principal.is_admin() {
            return Err(AccessError::AdminRequired.into());
        }

        self.claim_store.list_pending_for_review(&self.db).await
    }

    /// Decide a pending claim. Runs as one transaction holding the item row
    /// lock, so a decision cannot interleave with a concurrent submission on
    /// the same item.
    pub async fn decide(
        &self,
        principal: &Principal,
        request_id: i64,
        decision: Decision,
    ) -> Result<claim_request::Model, InternalError> {
        if !principal.is_admin() {
            return Err(AccessError::AdminRequired.into());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        let claim = self
            .claim_store
            .find_by_id(&txn, request_id)
            .await?
            .ok_or(ClaimError::NotFound(request_id))?;

        let item = self
            .item_store
            .find_by_id_for_update(&txn, claim.item_id)
            .await?
            .ok_or(ItemError::NotFound(claim.item_id))?;

        if claim.status != ClaimStatus::Pending {
            return Err(ClaimError::NotDecidable {
                id: claim.id,
                status: format!("{:?}", claim.status),
            }
            .into());
        }

        let now = Utc::now().timestamp();

        let decided = match decision {
            Decision::Approve => {
                let decided = self
                    .claim_store
                    .set_status(&txn, claim, ClaimStatus::Approved, Some(now))
                    .await?;
                self.item_store.mark_approved(&txn, item).await?;
                decided
            }
            Decision::Reject => {
                let decided = self
                    .claim_store
                    .set_status(&txn, claim, ClaimStatus::Rejected, Some(now))
                    .await?;
                self.item_store.release_to_held(&txn, item).await?;
                decided
            }
        };

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        tracing::info!(
            request_id = decided.id,
            item_id = decided.item_id,
            decision = ?decision,
            admin_id = principal.id,
            "Claim adjudicated"
        );

        Ok(decided)
    }
}
