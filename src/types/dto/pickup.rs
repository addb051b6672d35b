use poem_openapi::Object;

/// An approved, not-yet-collected item belonging to the caller
#[derive(Object, Debug)]
pub struct CollectableItem {
    pub item_id: i64,
    pub request_id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub locker_number: i32,
}

#[derive(Object, Debug)]
pub struct CollectRequest {
    pub item_id: i64,
}

#[derive(Object, Debug)]
pub struct CollectResponse {
    /// Locker to open; the kiosk boundary performs the actuation
    pub locker_number: i32,
    pub message: String,
}
