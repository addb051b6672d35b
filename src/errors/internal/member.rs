use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemberError {
    #[error("Member not found: {0}")]
    NotFound(i64),
}
