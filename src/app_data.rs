use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::ApplicationSettings;
use crate::services::TokenService;
use crate::stores::{ClaimStore, ItemStore, MemberStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across services.
/// Services extract the stores they need and keep stable constructor
/// signatures (`Service::new(app_data)`).
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<ApplicationSettings>,
    pub token_service: Arc<TokenService>,
    pub item_store: Arc<ItemStore>,
    pub claim_store: Arc<ClaimStore>,
    pub member_store: Arc<MemberStore>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database connection should be initialized and migrated before
    /// calling this.
    pub fn init(db: DatabaseConnection, settings: ApplicationSettings, jwt_secret: &str) -> Self {
        tracing::debug!("Initializing AppData...");

        let token_service = Arc::new(TokenService::new(jwt_secret.to_string()));

        let item_store = Arc::new(ItemStore::new());
        let claim_store = Arc::new(ClaimStore::new());
        let member_store = Arc::new(MemberStore::new());

        tracing::debug!("Stores created");

        Self {
            db,
            settings: Arc::new(settings),
            token_service,
            item_store,
            claim_store,
            member_store,
        }
    }
}
