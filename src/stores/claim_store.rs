use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::errors::InternalError;
use crate::types::db::claim_request::{self, ActiveModel, ClaimStatus, Entity as ClaimRequest};
use crate::types::db::{item, member};

/// Fields required to open a new PENDING claim
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub item_id: i64,
    pub requester_id: i64,
    pub proof_description: String,
    pub proof_detail_address: Option<String>,
    pub proof_image_url: Option<String>,
}

/// Pending claim joined with requester and item context for adjudication
#[derive(FromQueryResult, Debug)]
pub struct PendingClaimRecord {
    pub id: i64,
    pub item_id: i64,
    pub requester_id: i64,
    pub requester_name: String,
    pub item_name: String,
    pub original_description: String,
    pub original_image: Option<String>,
    pub proof_description: String,
    pub proof_detail_address: Option<String>,
    pub proof_image_url: Option<String>,
    pub requested_at: i64,
}

/// Approved claim joined with its not-yet-retrieved item for the kiosk list
#[derive(FromQueryResult, Debug)]
pub struct CollectableRecord {
    pub request_id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub image_url: Option<String>,
    pub locker_number: i32,
}

/// ClaimStore manages claim request rows. Callers own the transaction boundary.
pub struct ClaimStore;

impl ClaimStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert_pending(
        &self,
        conn: &impl ConnectionTrait,
        new_claim: NewClaim,
        requested_at: i64,
    ) -> Result<claim_request::Model, InternalError> {
        let model = ActiveModel {
            item_id: Set(new_claim.item_id),
            requester_id: Set(new_claim.requester_id),
            proof_description: Set(new_claim.proof_description),
            proof_detail_address: Set(new_claim.proof_detail_address),
            proof_image_url: Set(new_claim.proof_image_url),
            status: Set(ClaimStatus::Pending),
            requested_at: Set(requested_at),
            decided_at: Set(None),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_claim_request", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        request_id: i64,
    ) -> Result<Option<claim_request::Model>, InternalError> {
        ClaimRequest::find_by_id(request_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_claim_request", e))
    }

    /// Close out stale PENDING claims for an item whose cooldown lapsed.
    ///
    /// Runs inside the admission transaction of the claim that superseded
    /// them, keeping the one-active-claim invariant observable in storage.
    pub async fn expire_stale_pending(
        &self,
        conn: &impl ConnectionTrait,
        item_id: i64,
        decided_at: i64,
    ) -> Result<u64, InternalError> {
        let result = ClaimRequest::update_many()
            .col_expr(claim_request::Column::Status, Expr::value(ClaimStatus::Expired))
            .col_expr(claim_request::Column::DecidedAt, Expr::value(Some(decided_at)))
            .filter(claim_request::Column::ItemId.eq(item_id))
            .filter(claim_request::Column::Status.eq(ClaimStatus::Pending))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("expire_stale_pending_claims", e))?;

        Ok(result.rows_affected)
    }

    pub async fn set_status(
        &self,
        conn: &impl ConnectionTrait,
        claim: claim_request::Model,
        status: ClaimStatus,
        decided_at: Option<i64>,
    ) -> Result<claim_request::Model, InternalError> {
        let mut active: ActiveModel = claim.into();
        active.status = Set(status);
        if decided_at.is_some() {
            active.decided_at = Set(decided_at);
        }

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_claim_status", e))
    }

    /// PENDING claims joined with requester and item summary, oldest first
    pub async fn list_pending_for_review(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<PendingClaimRecord>, InternalError> {
        ClaimRequest::find()
            .filter(claim_request::Column::Status.eq(ClaimStatus::Pending))
            .join(JoinType::InnerJoin, claim_request::Relation::Requester.def())
            .join(JoinType::InnerJoin, claim_request::Relation::Item.def())
            .select_only()
            .columns([
                claim_request::Column::Id,
                claim_request::Column::ItemId,
                claim_request::Column::RequesterId,
                claim_request::Column::ProofDescription,
                claim_request::Column::ProofDetailAddress,
                claim_request::Column::ProofImageUrl,
                claim_request::Column::RequestedAt,
            ])
            .column_as(member::Column::Name, "requester_name")
            .column_as(item::Column::Name, "item_name")
            .column_as(item::Column::Description, "original_description")
            .column_as(item::Column::ImageUrl, "original_image")
            .order_by_asc(claim_request::Column::RequestedAt)
            .into_model::<PendingClaimRecord>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_pending_claims", e))
    }

    /// The caller's APPROVED claim on a specific item, if any
    pub async fn find_approved_for_item(
        &self,
        conn: &impl ConnectionTrait,
        item_id: i64,
        requester_id: i64,
    ) -> Result<Option<claim_request::Model>, InternalError> {
        ClaimRequest::find()
            .filter(claim_request::Column::ItemId.eq(item_id))
            .filter(claim_request::Column::RequesterId.eq(requester_id))
            .filter(claim_request::Column::Status.eq(ClaimStatus::Approved))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_approved_claim", e))
    }

    /// Approved claims of the caller whose items are still in the lockers
    pub async fn list_collectable(
        &self,
        conn: &impl ConnectionTrait,
        requester_id: i64,
    ) -> Result<Vec<CollectableRecord>, InternalError> {
        ClaimRequest::find()
            .filter(claim_request::Column::RequesterId.eq(requester_id))
            .filter(claim_request::Column::Status.eq(ClaimStatus::Approved))
            .join(JoinType::InnerJoin, claim_request::Relation::Item.def())
            .filter(item::Column::IsRetrieved.eq(false))
            .select_only()
            .column_as(claim_request::Column::Id, "request_id")
            .column_as(item::Column::Id, "item_id")
            .column_as(item::Column::Name, "item_name")
            .column_as(item::Column::ImageUrl, "image_url")
            .column_as(item::Column::LockerNumber, "locker_number")
            .into_model::<CollectableRecord>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_collectable_claims", e))
    }

    /// Number of claims counting against the one-active-claim invariant
    pub async fn count_active_for_item(
        &self,
        conn: &impl ConnectionTrait,
        item_id: i64,
    ) -> Result<u64, InternalError> {
        ClaimRequest::find()
            .filter(claim_request::Column::ItemId.eq(item_id))
            .filter(
                claim_request::Column::Status
                    .is_in([ClaimStatus::Pending, ClaimStatus::Approved]),
            )
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_active_claims", e))
    }
}

impl Default for ClaimStore {
    fn default() -> Self {
        Self::new()
    }
}
