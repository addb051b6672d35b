use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};

use foundbox_backend::api::{AdminApi, ClaimsApi, HealthApi, ItemsApi, KioskApi};
use foundbox_backend::app_data::AppData;
use foundbox_backend::config::{init_logging, ApplicationSettings, BootstrapSettings};
use foundbox_backend::services::{
    AdjudicationService, ClaimCoordinator, ItemRegistry, PickupService,
};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let bootstrap = BootstrapSettings::from_env().expect("Failed to load bootstrap settings");
    let settings = ApplicationSettings::from_env().expect("Failed to load application settings");
    tracing::info!("Loaded settings: {}", settings);

    let db: DatabaseConnection = Database::connect(bootstrap.database_url())
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database: {}", bootstrap.database_url());

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database migrations completed");

    let app_data = Arc::new(AppData::init(db, settings, bootstrap.jwt_secret()));
    let token_service = app_data.token_service.clone();

    let item_registry = Arc::new(ItemRegistry::new(app_data.clone()));
    let claim_coordinator = Arc::new(ClaimCoordinator::new(app_data.clone()));
    let adjudication_service = Arc::new(AdjudicationService::new(app_data.clone()));
    let pickup_service = Arc::new(PickupService::new(app_data.clone()));

    let api_service = OpenApiService::new(
        (
            HealthApi,
            ItemsApi::new(item_registry, token_service.clone()),
            ClaimsApi::new(claim_coordinator, token_service.clone()),
            AdminApi::new(adjudication_service, token_service.clone()),
            KioskApi::new(pickup_service, token_service),
        ),
        "Foundbox API",
        "1.0.0",
    )
    .server("http://localhost:8080/api");

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    // Compose routes: nest API service under /api and Swagger UI under /swagger
    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui);

    tracing::info!("Starting server on http://0.0.0.0:8080");
    tracing::info!("Swagger UI available at http://localhost:8080/swagger");

    Server::new(TcpListener::bind("0.0.0.0:8080"))
        .run(app)
        .await
}
