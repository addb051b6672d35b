pub mod auth;
pub mod principal;

pub use auth::Claims;
pub use principal::{Principal, Role};
