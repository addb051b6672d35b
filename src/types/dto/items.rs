use poem_openapi::Object;

/// Request body for registering a found item
#[derive(Object, Debug)]
pub struct RegisterItemRequest {
    pub name: String,
    pub category_id: i64,
    pub place_id: i64,
    pub description: String,
    /// Unix timestamp of when the item was found
    pub found_date: i64,
    /// Registering member; omit for anonymous registration (no reward)
    pub finder_id: Option<i64>,
    /// Opaque URL from the blob collaborator, stored verbatim
    pub image_url: Option<String>,
    /// Physical locker the item was placed in; defaults when omitted
    pub locker_number: Option<i32>,
}

#[derive(Object, Debug)]
pub struct RegisterItemResponse {
    pub item_id: i64,
    pub message: String,
}

/// Public listing entry with availability derived at read time
#[derive(Object, Debug)]
pub struct ItemSummary {
    pub item_id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub display_status: String,
    pub is_available: bool,
    pub created_at: i64,
}

/// Full item detail with category/place context
#[derive(Object, Debug)]
pub struct ItemDetail {
    pub item_id: i64,
    pub name: String,
    pub description: String,
    pub category_name: String,
    pub address: String,
    pub detail_address: Option<String>,
    pub found_date: i64,
    pub image_url: Option<String>,
    pub display_status: String,
    pub is_available: bool,
    /// Present when the item cannot currently be claimed
    pub lock_message: Option<String>,
    pub created_at: i64,
}
