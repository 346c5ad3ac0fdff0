use serde::Deserialize;
use serde_json::Value;

use crate::reminder::ReminderRequest;
use crate::scheduling::ExamReminderScheduler;

/// Name of the single channel application logic uses to reach the scheduler.
pub const REMINDER_CHANNEL: &str = "exam_reminder_channel";
pub const SET_REMINDER_METHOD: &str = "setExamReminder";

#[derive(Debug, Clone, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, PartialEq)]
pub enum BridgeReply {
    Success(Value),
    Error { code: String, message: String },
    NotImplemented,
}

/// Cross-runtime entry point: decodes loosely-typed method-call arguments
/// into a typed request in one place, then hands it to the scheduler.
pub struct ReminderBridge {
    scheduler: ExamReminderScheduler,
}

impl ReminderBridge {
    pub fn new(scheduler: ExamReminderScheduler) -> Self {
        Self { scheduler }
    }

    pub async fn handle(&self, call: MethodCall) -> BridgeReply {
        match call.method.as_str() {
            SET_REMINDER_METHOD => self.set_exam_reminder(&call.args).await,
            _ => BridgeReply::NotImplemented,
        }
    }

    async fn set_exam_reminder(&self, args: &Value) -> BridgeReply {
        // A call with missing required arguments does not schedule anything,
        // and the caller still observes a plain success.
        let Some(request) = decode_set_reminder_args(args) else {
            return BridgeReply::Success(Value::Null);
        };

        match self.scheduler.schedule(request).await {
            Ok(()) => BridgeReply::Success(Value::Null),
            Err(error) => {
                log::error!("Failed to schedule exam reminder. [error = {error}]");
                BridgeReply::Error {
                    code: "schedule_failed".to_owned(),
                    message: error.to_string(),
                }
            }
        }
    }
}

fn decode_set_reminder_args(args: &Value) -> Option<ReminderRequest> {
    let trigger_at = required_int(args, "triggerAtMillis")?;
    let id = required_int(args, "notificationId")?;
    let id = match i32::try_from(id) {
        Ok(id) => id,
        Err(_) => {
            log::warn!(
                "Dropping {SET_REMINDER_METHOD} call, notificationId does not fit a 32-bit id. [notificationId = {id}]"
            );
            return None;
        }
    };

    Some(ReminderRequest {
        trigger_at,
        id,
        title: optional_string(args, "title"),
        body: optional_string(args, "body"),
    })
}

fn required_int(args: &Value, name: &str) -> Option<i64> {
    let value = args.get(name).and_then(Value::as_i64);
    if value.is_none() {
        log::warn!(
            "Dropping {SET_REMINDER_METHOD} call, required argument is missing. [argument = {name}]"
        );
    }

    value
}

fn optional_string(args: &Value, name: &str) -> Option<String> {
    args.get(name).and_then(Value::as_str).map(str::to_owned)
}
