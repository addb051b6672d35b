// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, Set};

use crate::app_data::AppData;
use crate::config::ApplicationSettings;
use crate::stores::item_store::NewItem;
use crate::types::db::{category, item, member, place};
use crate::types::internal::{Principal, Role};

/// Creates an in-memory database with the schema applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a migrated database plus an AppData wired with default settings
pub async fn setup_test_app() -> (DatabaseConnection, Arc<AppData>) {
    let db = setup_test_db().await;

    let app_data = Arc::new(AppData::init(
        db.clone(),
        ApplicationSettings::default(),
        "test-secret-key-minimum-32-characters-long",
    ));

    (db, app_data)
}

/// Inserts a member and returns its id. Name doubles as the e-mail local part,
/// so names must be unique within one test database.
pub async fn seed_member(db: &DatabaseConnection, name: &str, role: Role) -> i64 {
    let model = member::ActiveModel {
        name: Set(name.to_string()),
        email: Set(format!("{}@example.com", name)),
        role: Set(role.as_str().to_string()),
        point: Set(0),
        created_at: Set(Utc::now().timestamp()),
        ..Default::default()
    };

    model
        .insert(db)
        .await
        .expect("Failed to seed member")
        .id
}

pub async fn seed_category(db: &DatabaseConnection, name: &str) -> i64 {
    let model = category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    };

    model
        .insert(db)
        .await
        .expect("Failed to seed category")
        .id
}

pub async fn seed_place(db: &DatabaseConnection, address: &str) -> i64 {
    let model = place::ActiveModel {
        address: Set(address.to_string()),
        detail_address: Set(None),
        ..Default::default()
    };

    model
        .insert(db)
        .await
        .expect("Failed to seed place")
        .id
}

/// Registers a held item with a fresh category and place
pub async fn seed_held_item(db: &DatabaseConnection, app_data: &Arc<AppData>) -> item::Model {
    let category_id = seed_category(db, "misc").await;
    let place_id = seed_place(db, "front desk").await;

    app_data
        .item_store
        .insert(
            db,
            NewItem {
                name: "found item".to_string(),
                category_id,
                place_id,
                description: "seeded for tests".to_string(),
                found_date: Utc::now().timestamp(),
                finder_id: None,
                image_url: None,
                locker_number: 2,
            },
        )
        .await
        .expect("Failed to seed item")
}

/// Overwrites an item's lock expiry directly, simulating the passage (or
/// presence) of cooldown time without a mockable clock
pub async fn force_lock(db: &DatabaseConnection, item_id: i64, locked_until: i64) {
    let existing = crate::types::db::item::Entity::find_by_id(item_id)
        .one(db)
        .await
        .expect("Failed to load item")
        .expect("Item missing");

    let mut active: item::ActiveModel = existing.into();
    active.locked_until = Set(Some(locked_until));
    active
        .update(db)
        .await
        .expect("Failed to force lock");
}

pub fn user_principal(id: i64) -> Principal {
    Principal::new(id, Role::User)
}

pub fn admin_principal(id: i64) -> Principal {
    Principal::new(id, Role::Admin)
}
