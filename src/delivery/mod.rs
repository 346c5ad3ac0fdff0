mod deliverer;
mod notification;

pub use deliverer::ReminderDeliverer;
pub use notification::{
    LogNotificationFacility, NotificationFacility, NotificationPriority, NotificationRecord,
    NotificationSound,
};
