use thiserror::Error;

#[derive(Error, Debug)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(i64),
}
