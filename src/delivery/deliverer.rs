use std::sync::Arc;

use async_trait::async_trait;

use crate::reminder::DeliveryPayload;
use crate::scheduling::AlarmHandler;

use super::notification::{
    NotificationFacility, NotificationPriority, NotificationRecord, NotificationSound,
};

const DEFAULT_TITLE: &str = "Exam Reminder";
const DEFAULT_BODY: &str = "Your exam is about to start!";

/// Turns a matured trigger into a user-visible notification. The only side
/// effect is the single call into the notification facility; everything else
/// is the pure payload resolution below.
pub struct ReminderDeliverer {
    notifications: Arc<dyn NotificationFacility>,
}

impl ReminderDeliverer {
    pub fn new(notifications: Arc<dyn NotificationFacility>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl AlarmHandler for ReminderDeliverer {
    async fn on_fire(&self, payload: DeliveryPayload) {
        let record = resolve_notification(payload);
        log::info!(
            "Delivering reminder notification. [notification_id = {}]",
            record.id
        );
        self.notifications.show(record).await;
    }
}

/// Defaults are resolved here, at delivery time, one field at a time. A
/// missing or empty title does not force the body to default, and vice versa.
fn resolve_notification(payload: DeliveryPayload) -> NotificationRecord {
    NotificationRecord {
        id: payload.id.unwrap_or(0),
        title: resolve_or_default(payload.title, DEFAULT_TITLE),
        body: resolve_or_default(payload.body, DEFAULT_BODY),
        priority: NotificationPriority::High,
        sound: NotificationSound::Default,
        auto_dismiss: true,
    }
}

fn resolve_or_default(field: Option<String>, default: &str) -> String {
    field
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
