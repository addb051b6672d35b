// Database entities - SeaORM models
pub mod category;
pub mod claim_request;
pub mod item;
pub mod member;
pub mod place;

pub use claim_request::ClaimStatus;
pub use item::ItemStatus;
