use serde::{Deserialize, Serialize};

/// Identity shared by a pending alarm and the notification it eventually
/// renders. Re-using an id replaces the pending alarm, and later the visible
/// notification, instead of creating a duplicate.
pub type NotificationId = i32;

#[derive(Debug, Clone)]
pub struct ReminderRequest {
    /// Absolute trigger time in epoch milliseconds. Past values are not
    /// rejected; the host timer fires them immediately.
    pub trigger_at: i64,
    pub id: NotificationId,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Data handed from the host timer facility to the deliverer at fire time.
/// All fields are optional on the wire; defaults are resolved by the
/// deliverer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPayload {
    pub id: Option<NotificationId>,
    pub title: Option<String>,
    pub body: Option<String>,
}

impl From<&ReminderRequest> for DeliveryPayload {
    fn from(request: &ReminderRequest) -> Self {
        Self {
            id: Some(request.id),
            title: request.title.clone(),
            body: request.body.clone(),
        }
    }
}
