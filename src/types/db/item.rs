use sea_orm::entity::prelude::*;

/// Custody status of a stored item.
///
/// `locked_until` on the item row is non-null only while a claim is in flight
/// (CLAIM_PENDING) or retained for audit after approval; rejection and collection
/// clear it.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ItemStatus {
    #[sea_orm(string_value = "HELD")]
    Held,
    #[sea_orm(string_value = "CLAIM_PENDING")]
    ClaimPending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "COLLECTED")]
    Collected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub place_id: i64,
    pub description: String,
    pub found_date: i64,
    pub finder_id: Option<i64>,
    pub image_url: Option<String>,
    pub locker_number: i32,
    pub status: ItemStatus,
    pub locked_until: Option<i64>,
    pub is_retrieved: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::place::Entity",
        from = "Column::PlaceId",
        to = "super::place::Column::Id"
    )]
    Place,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::FinderId",
        to = "super::member::Column::Id"
    )]
    Finder,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::place::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Place.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
