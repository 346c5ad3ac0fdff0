use async_trait::async_trait;

use crate::reminder::NotificationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPriority {
    Default,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSound {
    Silent,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub priority: NotificationPriority,
    pub sound: NotificationSound,
    /// Dismiss the notification when the user interacts with it.
    pub auto_dismiss: bool,
}

/// Host notification-rendering service. Showing a record whose id matches a
/// still-visible notification replaces it; submission is infallible at this
/// layer, rendering failures are the host's concern.
#[async_trait]
pub trait NotificationFacility: Send + Sync + 'static {
    async fn show(&self, record: NotificationRecord);
}

/// Renders notifications into the log, tagged with the notification channel.
/// Stands in for the host facility on headless runs.
pub struct LogNotificationFacility {
    channel: String,
}

impl LogNotificationFacility {
    pub fn new(channel: String) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl NotificationFacility for LogNotificationFacility {
    async fn show(&self, record: NotificationRecord) {
        log::info!(
            "🔔 [{}] {}: {} [notification_id = {}]",
            self.channel,
            record.title,
            record.body,
            record.id
        );
    }
}
