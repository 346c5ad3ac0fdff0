use std::sync::Arc;

use thiserror::Error;

use crate::reminder::{DeliveryPayload, ReminderRequest};

use super::alarm::{AlarmError, AlarmFacility};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("host alarm facility rejected the reminder")]
    Alarm(#[from] AlarmError),
}

/// Registers exam reminders with the host alarm facility. Holds no state of
/// its own; the set of pending triggers is owned by the facility, keyed by
/// notification id.
pub struct ExamReminderScheduler {
    alarms: Arc<dyn AlarmFacility>,
}

impl ExamReminderScheduler {
    pub fn new(alarms: Arc<dyn AlarmFacility>) -> Self {
        Self { alarms }
    }

    /// Registers a one-shot wake-up for the request. Past trigger times are
    /// forwarded as-is and fire immediately. Scheduling an id that is still
    /// pending replaces the pending trigger.
    pub async fn schedule(&self, request: ReminderRequest) -> Result<(), ScheduleError> {
        log::info!(
            "Scheduling exam reminder. [notification_id = {}, trigger_at_millis = {}]",
            request.id,
            request.trigger_at
        );

        let payload = DeliveryPayload::from(&request);
        self.alarms
            .register_one_shot_wake(request.id, request.trigger_at, payload)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::reminder::{DeliveryPayload, NotificationId, ReminderRequest};

    use super::*;

    type Registrations = Arc<Mutex<Vec<(NotificationId, i64, DeliveryPayload)>>>;

    #[derive(Default)]
    struct RecordingAlarmFacility {
        registrations: Registrations,
    }

    #[async_trait]
    impl AlarmFacility for RecordingAlarmFacility {
        async fn register_one_shot_wake(
            &self,
            id: NotificationId,
            trigger_at_millis: i64,
            payload: DeliveryPayload,
        ) -> Result<(), AlarmError> {
            self.registrations
                .lock()
                .unwrap()
                .push((id, trigger_at_millis, payload));
            Ok(())
        }

        async fn cancel(&self, _id: NotificationId) -> Result<(), AlarmError> {
            Ok(())
        }
    }

    struct DenyingAlarmFacility;

    #[async_trait]
    impl AlarmFacility for DenyingAlarmFacility {
        async fn register_one_shot_wake(
            &self,
            _id: NotificationId,
            _trigger_at_millis: i64,
            _payload: DeliveryPayload,
        ) -> Result<(), AlarmError> {
            Err(AlarmError::PermissionDenied)
        }

        async fn cancel(&self, _id: NotificationId) -> Result<(), AlarmError> {
            Ok(())
        }
    }

    fn request(id: NotificationId, trigger_at: i64) -> ReminderRequest {
        ReminderRequest {
            trigger_at,
            id,
            title: Some("Math Exam".to_owned()),
            body: None,
        }
    }

    #[tokio::test]
    async fn schedule_forwards_the_request_to_the_alarm_facility() {
        let registrations = Registrations::default();
        let facility = RecordingAlarmFacility {
            registrations: Arc::clone(&registrations),
        };
        let scheduler = ExamReminderScheduler::new(Arc::new(facility));

        scheduler
            .schedule(request(42, 1_700_000_000_000))
            .await
            .unwrap();

        let registrations = registrations.lock().unwrap();
        assert_eq!(registrations.len(), 1);

        let (id, trigger_at, payload) = &registrations[0];
        assert_eq!(*id, 42);
        assert_eq!(*trigger_at, 1_700_000_000_000);
        assert_eq!(
            payload,
            &DeliveryPayload {
                id: Some(42),
                title: Some("Math Exam".to_owned()),
                body: None,
            }
        );
    }

    #[tokio::test]
    async fn schedule_does_not_reject_past_trigger_times() {
        let registrations = Registrations::default();
        let facility = RecordingAlarmFacility {
            registrations: Arc::clone(&registrations),
        };
        let scheduler = ExamReminderScheduler::new(Arc::new(facility));

        scheduler.schedule(request(7, 0)).await.unwrap();

        assert_eq!(registrations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn host_rejection_surfaces_as_a_schedule_error() {
        let scheduler = ExamReminderScheduler::new(Arc::new(DenyingAlarmFacility));

        let result = scheduler.schedule(request(1, 1_700_000_000_000)).await;

        assert!(matches!(
            result,
            Err(ScheduleError::Alarm(AlarmError::PermissionDenied))
        ));
    }
}
