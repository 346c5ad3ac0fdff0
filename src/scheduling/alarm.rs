use async_trait::async_trait;
use thiserror::Error;

use crate::reminder::{DeliveryPayload, NotificationId};

#[derive(Debug, Error)]
pub enum AlarmError {
    #[error("host denied exact wake-up scheduling")]
    PermissionDenied,

    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

/// One-shot wake-capable timer service provided by the host. Registration is
/// keyed by id with replace-if-exists semantics, and a registered timer must
/// fire even if the device is in a low-power idle state.
#[async_trait]
pub trait AlarmFacility: Send + Sync + 'static {
    async fn register_one_shot_wake(
        &self,
        id: NotificationId,
        trigger_at_millis: i64,
        payload: DeliveryPayload,
    ) -> Result<(), AlarmError>;

    async fn cancel(&self, id: NotificationId) -> Result<(), AlarmError>;
}

/// Callback invoked by the host exactly once per matured trigger. Registered
/// with the facility once, at construction, never called by application code.
#[async_trait]
pub trait AlarmHandler: Send + Sync + 'static {
    async fn on_fire(&self, payload: DeliveryPayload);
}
