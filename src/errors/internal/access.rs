use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Admin role required")]
    AdminRequired,
}
