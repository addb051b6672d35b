use poem_openapi::{Enum, Object};

/// Request body for submitting a retrieval claim
#[derive(Object, Debug)]
pub struct SubmitClaimRequest {
    pub item_id: i64,
    /// Free-text proof of ownership
    pub proof_description: String,
    /// Where the requester believes they lost the item
    pub proof_detail_address: Option<String>,
    /// Opaque URL from the blob collaborator
    pub proof_image_url: Option<String>,
}

#[derive(Object, Debug)]
pub struct SubmitClaimResponse {
    pub request_id: i64,
    /// Unix timestamp the exclusive claim window expires at
    pub locked_until: i64,
    pub message: String,
}

/// Pending claim joined with requester and item context for adjudication
#[derive(Object, Debug)]
pub struct PendingClaim {
    pub request_id: i64,
    pub item_id: i64,
    pub requester_id: i64,
    pub requester_name: String,
    pub item_name: String,
    pub original_description: String,
    pub original_image: Option<String>,
    pub proof_description: String,
    pub proof_detail_address: Option<String>,
    pub proof_image_url: Option<String>,
    pub requested_at: i64,
}

/// Administrator decision on a pending claim
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "UPPERCASE")]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Object, Debug)]
pub struct DecideRequest {
    pub action: Decision,
}

#[derive(Object, Debug)]
pub struct DecideResponse {
    pub request_id: i64,
    pub message: String,
}
