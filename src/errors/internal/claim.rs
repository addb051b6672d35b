use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("Claim request not found: {0}")]
    NotFound(i64),

    /// Another claim holds the cooldown lock. Carries the lock expiry so the
    /// caller can show remaining time.
    #[error("Item {item_id} already has an active claim until {locked_until}")]
    WindowActive { item_id: i64, locked_until: i64 },

    /// The item has been approved for or handed to its owner; no further
    /// claims are admissible.
    #[error("Item {0} is already claimed by its owner")]
    AlreadyFinalized(i64),

    /// Adjudication on a claim that is not PENDING.
    #[error("Claim request {id} is not decidable (status {status})")]
    NotDecidable { id: i64, status: String },

    /// Collection attempt without a matching APPROVED claim, or the item was
    /// already handed over.
    #[error("No collectable claim on item {item_id} for member {requester_id}")]
    CollectionDenied { item_id: i64, requester_id: i64 },
}
