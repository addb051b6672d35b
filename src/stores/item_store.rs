use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::errors::InternalError;
use crate::types::db::item::{self, ActiveModel, Entity as Item, ItemStatus};
use crate::types::db::{category, place};

/// Fields required to insert a new item row
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category_id: i64,
    pub place_id: i64,
    pub description: String,
    pub found_date: i64,
    pub finder_id: Option<i64>,
    pub image_url: Option<String>,
    pub locker_number: i32,
}

/// Item joined with its category and place for the detail view
#[derive(FromQueryResult, Debug)]
pub struct ItemDetailRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category_name: String,
    pub address: String,
    pub detail_address: Option<String>,
    pub found_date: i64,
    pub image_url: Option<String>,
    pub locker_number: i32,
    pub status: ItemStatus,
    pub locked_until: Option<i64>,
    pub created_at: i64,
}

/// ItemStore manages item rows. All methods take the connection (or open
/// transaction) from the caller, which owns the transaction boundary.
pub struct ItemStore;

impl ItemStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert a new item in HELD custody with no claim lock
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new_item: NewItem,
    ) -> Result<item::Model, InternalError> {
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(new_item.name),
            category_id: Set(new_item.category_id),
            place_id: Set(new_item.place_id),
            description: Set(new_item.description),
            found_date: Set(new_item.found_date),
            finder_id: Set(new_item.finder_id),
            image_url: Set(new_item.image_url),
            locker_number: Set(new_item.locker_number),
            status: Set(ItemStatus::Held),
            locked_until: Set(None),
            is_retrieved: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_item", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        item_id: i64,
    ) -> Result<Option<item::Model>, InternalError> {
        Item::find_by_id(item_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_item", e))
    }

    /// Read an item row with an exclusive row lock (`SELECT ... FOR UPDATE`).
    ///
    /// Must be called inside an open transaction; the lock is held until that
    /// transaction ends. SQLite ignores the lock clause and serializes at the
    /// connection instead; MySQL/Postgres take a real row lock.
    pub async fn find_by_id_for_update(
        &self,
        conn: &impl ConnectionTrait,
        item_id: i64,
    ) -> Result<Option<item::Model>, InternalError> {
        Item::find_by_id(item_id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_item_for_update", e))
    }

    /// Items shown in the public listing: held, or under an active claim whose
    /// availability is derived at read time by the caller
    pub async fn list_listable(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<item::Model>, InternalError> {
        Item::find()
            .filter(item::Column::Status.is_in([ItemStatus::Held, ItemStatus::ClaimPending]))
            .order_by_desc(item::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_listable_items", e))
    }

    /// Item detail joined with category and place descriptive data
    pub async fn find_detail(
        &self,
        conn: &impl ConnectionTrait,
        item_id: i64,
    ) -> Result<Option<ItemDetailRecord>, InternalError> {
        Item::find_by_id(item_id)
            .join(JoinType::InnerJoin, item::Relation::Category.def())
            .join(JoinType::InnerJoin, item::Relation::Place.def())
            .select_only()
            .columns([
                item::Column::Id,
                item::Column::Name,
                item::Column::Description,
                item::Column::FoundDate,
                item::Column::ImageUrl,
                item::Column::LockerNumber,
                item::Column::Status,
                item::Column::LockedUntil,
                item::Column::CreatedAt,
            ])
            .column_as(category::Column::Name, "category_name")
            .column_as(place::Column::Address, "address")
            .column_as(place::Column::DetailAddress, "detail_address")
            .into_model::<ItemDetailRecord>()
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_item_detail", e))
    }

    /// Open the exclusive claim window: CLAIM_PENDING with a fresh lock expiry
    pub async fn set_claim_window(
        &self,
        conn: &impl ConnectionTrait,
        item: item::Model,
        locked_until: i64,
    ) -> Result<item::Model, InternalError> {
        let mut active: ActiveModel = item.into();
        active.status = Set(ItemStatus::ClaimPending);
        active.locked_until = Set(Some(locked_until));
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_claim_window", e))
    }

    /// Approval keeps `locked_until` in place; once APPROVED the status alone
    /// gates further claims, the timestamp stays for audit
    pub async fn mark_approved(
        &self,
        conn: &impl ConnectionTrait,
        item: item::Model,
    ) -> Result<item::Model, InternalError> {
        let mut active: ActiveModel = item.into();
        active.status = Set(ItemStatus::Approved);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("mark_item_approved", e))
    }

    /// Rejection path: back to HELD and the lock cleared. This is the only
    /// transition that releases the cooldown before natural expiry.
    pub async fn release_to_held(
        &self,
        conn: &impl ConnectionTrait,
        item: item::Model,
    ) -> Result<item::Model, InternalError> {
        let mut active: ActiveModel = item.into();
        active.status = Set(ItemStatus::Held);
        active.locked_until = Set(None);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("release_item_to_held", e))
    }

    /// Terminal custody transfer: retrieved flag set, lock cleared
    pub async fn mark_collected(
        &self,
        conn: &impl ConnectionTrait,
        item: item::Model,
    ) -> Result<item::Model, InternalError> {
        let mut active: ActiveModel = item.into();
        active.status = Set(ItemStatus::Collected);
        active.is_retrieved = Set(true);
        active.locked_until = Set(None);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("mark_item_collected", e))
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{seed_category, seed_place, setup_test_db};

    fn sample_item(category_id: i64, place_id: i64) -> NewItem {
        NewItem {
            name: "black umbrella".to_string(),
            category_id,
            place_id,
            description: "left by the east entrance".to_string(),
            found_date: Utc::now().timestamp(),
            finder_id: None,
            image_url: None,
            locker_number: 3,
        }
    }

    #[tokio::test]
    async fn test_insert_starts_held_and_unlocked() {
        let db = setup_test_db().await;
        let category_id = seed_category(&db, "umbrellas").await;
        let place_id = seed_place(&db, "main hall").await;

        let store = ItemStore::new();
        let item = store
            .insert(&db, sample_item(category_id, place_id))
            .await
            .expect("insert failed");

        assert_eq!(item.status, ItemStatus::Held);
        assert_eq!(item.locked_until, None);
        assert!(!item.is_retrieved);
    }

    #[tokio::test]
    async fn test_list_listable_excludes_finalized_items() {
        let db = setup_test_db().await;
        let category_id = seed_category(&db, "bags").await;
        let place_id = seed_place(&db, "library").await;

        let store = ItemStore::new();
        let held = store
            .insert(&db, sample_item(category_id, place_id))
            .await
            .unwrap();
        let approved = store
            .insert(&db, sample_item(category_id, place_id))
            .await
            .unwrap();
        store.mark_approved(&db, approved).await.unwrap();

        let listed = store.list_listable(&db).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|i| i.id).collect();
        assert!(ids.contains(&held.id));
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_find_detail_joins_category_and_place() {
        let db = setup_test_db().await;
        let category_id = seed_category(&db, "electronics").await;
        let place_id = seed_place(&db, "gym").await;

        let store = ItemStore::new();
        let item = store
            .insert(&db, sample_item(category_id, place_id))
            .await
            .unwrap();

        let detail = store
            .find_detail(&db, item.id)
            .await
            .unwrap()
            .expect("detail missing");

        assert_eq!(detail.category_name, "electronics");
        assert_eq!(detail.address, "gym");
        assert_eq!(detail.locker_number, 3);
    }

    #[tokio::test]
    async fn test_find_detail_missing_item_is_none() {
        let db = setup_test_db().await;
        let store = ItemStore::new();
        assert!(store.find_detail(&db, 9999).await.unwrap().is_none());
    }
}
