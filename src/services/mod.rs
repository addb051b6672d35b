// Services layer - Business logic and orchestration
pub mod adjudication_service;
pub mod claim_coordinator;
pub mod item_registry;
pub mod pickup_service;
pub mod token_service;

pub use adjudication_service::{AdjudicationService, Decision};
pub use claim_coordinator::ClaimCoordinator;
pub use item_registry::ItemRegistry;
pub use pickup_service::PickupService;
pub use token_service::{TokenError, TokenService};
