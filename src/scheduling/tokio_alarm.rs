use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::{
    sync::{RwLock, watch},
    task::{self, JoinHandle},
};
use tokio_util::sync::CancellationToken;

use crate::reminder::{DeliveryPayload, NotificationId};

use super::alarm::{AlarmError, AlarmFacility, AlarmHandler};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

struct PendingAlarm {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl PendingAlarm {
    fn cancel(self) {
        self.cancellation_token.cancel();
    }
}

struct CleanupTask(watch::Sender<()>);

type AlarmStore = RwLock<HashMap<NotificationId, PendingAlarm>>;

/// In-process stand-in for the host's exact-alarm service. Each pending
/// trigger is one tokio task sleeping until its trigger time; the registered
/// handler receives the payload when the task wakes.
pub struct TokioAlarmFacility {
    alarms: Arc<AlarmStore>,
    handler: Arc<dyn AlarmHandler>,
    cleanup_task: CleanupTask,
}

impl TokioAlarmFacility {
    /// The handler is this facility's dispatch table entry: registered once
    /// here and invoked for every matured trigger.
    pub fn new(handler: Arc<dyn AlarmHandler>) -> Self {
        let alarms = Arc::new(RwLock::new(HashMap::new()));
        let cleanup_task = Self::spawn_cleanup_task(Arc::clone(&alarms));

        Self {
            alarms,
            handler,
            cleanup_task,
        }
    }

    fn create_alarm_task(
        &self,
        id: NotificationId,
        trigger_at_millis: i64,
        payload: DeliveryPayload,
    ) -> PendingAlarm {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();
        let handler = Arc::clone(&self.handler);
        let delay = delay_until(trigger_at_millis, Utc::now());

        let task = task::spawn(async move {
            tokio::select! {
                _ = task_cancellation_token.cancelled() => {
                    log::info!("Pending alarm was cancelled. [notification_id = {id}]");
                }
                _ = tokio::time::sleep(delay) => {
                    handler.on_fire(payload).await;
                }
            }
        });

        PendingAlarm {
            task,
            cancellation_token,
        }
    }

    fn spawn_cleanup_task(alarms: Arc<AlarmStore>) -> CleanupTask {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(());
        task::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(CLEANUP_INTERVAL) => {
                        Self::clean_finished_alarms(&alarms).await;
                    }
                    _ = shutdown_rx.changed() => {
                        log::info!("Alarm cleanup task shutting down");
                        break;
                    }
                };
            }
        });

        CleanupTask(shutdown_tx)
    }

    async fn clean_finished_alarms(alarms: &AlarmStore) {
        let mut alarms = alarms.write().await;
        let before = alarms.len();
        alarms.retain(|_, alarm| !alarm.task.is_finished());
        let after = alarms.len();

        if before != after {
            log::info!("Cleaned up {} fired alarms", before - after);
        }
    }
}

impl Drop for TokioAlarmFacility {
    fn drop(&mut self) {
        let _ = self.cleanup_task.0.send(());
    }
}

#[async_trait]
impl AlarmFacility for TokioAlarmFacility {
    async fn register_one_shot_wake(
        &self,
        id: NotificationId,
        trigger_at_millis: i64,
        payload: DeliveryPayload,
    ) -> Result<(), AlarmError> {
        log::info!("Registering one-shot wake-up. [notification_id = {id}]");
        let alarm = self.create_alarm_task(id, trigger_at_millis, payload);

        if let Some(previous) = self.alarms.write().await.insert(id, alarm) {
            log::info!("Replacing pending alarm. [notification_id = {id}]");
            previous.cancel();
        }

        Ok(())
    }

    async fn cancel(&self, id: NotificationId) -> Result<(), AlarmError> {
        if let Some((_, alarm)) = self.alarms.write().await.remove_entry(&id) {
            alarm.cancel();
        }

        Ok(())
    }
}

/// Delay from `now` until the trigger. Past triggers clamp to zero, so the
/// alarm task fires on its first poll.
pub(crate) fn delay_until(trigger_at_millis: i64, now: DateTime<Utc>) -> Duration {
    let delta = trigger_at_millis as i128 - now.timestamp_millis() as i128;
    if delta <= 0 {
        Duration::ZERO
    } else {
        Duration::from_millis(delta as u64)
    }
}
