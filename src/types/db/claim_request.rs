use sea_orm::entity::prelude::*;

/// Lifecycle of a retrieval claim.
///
/// EXPIRED is applied lazily: when a later claim is admitted after the cooldown
/// lapsed, any claim still PENDING for that item is closed out in the same
/// transaction. PENDING/APPROVED are the only states that count as active; per
/// item at most one claim may be in either at any instant.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ClaimStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "COLLECTED")]
    Collected,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "claim_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub item_id: i64,
    pub requester_id: i64,
    pub proof_description: String,
    pub proof_detail_address: Option<String>,
    pub proof_image_url: Option<String>,
    pub status: ClaimStatus,
    pub requested_at: i64,
    pub decided_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::RequesterId",
        to = "super::member::Column::Id"
    )]
    Requester,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requester.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
