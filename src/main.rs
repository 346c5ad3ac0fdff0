use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use exam_notify::appsettings;
use exam_notify::bridge::{BridgeReply, MethodCall, REMINDER_CHANNEL, ReminderBridge};
use exam_notify::delivery::{LogNotificationFacility, ReminderDeliverer};
use exam_notify::scheduling::{ExamReminderScheduler, TokioAlarmFacility};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = appsettings::get();

    let notifications = Arc::new(LogNotificationFacility::new(
        settings.notifications.channel.clone(),
    ));
    let deliverer = Arc::new(ReminderDeliverer::new(notifications));
    let alarms = Arc::new(TokioAlarmFacility::new(deliverer));
    let scheduler = ExamReminderScheduler::new(alarms);
    let bridge = ReminderBridge::new(scheduler);

    log::info!("Serving reminder bridge on stdin. [channel = {REMINDER_CHANNEL}]");
    serve_bridge(&bridge).await
}

/// One JSON method call per line in, one JSON reply per line out.
async fn serve_bridge(bridge: &ReminderBridge) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read bridge input")?
    {
        if line.trim().is_empty() {
            continue;
        }

        let call: MethodCall = match serde_json::from_str(&line) {
            Ok(call) => call,
            Err(error) => {
                log::warn!("Ignoring malformed method call. [error = {error}]");
                continue;
            }
        };

        let reply = encode_reply(&bridge.handle(call).await);
        stdout.write_all(reply.to_string().as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

fn encode_reply(reply: &BridgeReply) -> serde_json::Value {
    match reply {
        BridgeReply::Success(result) => {
            serde_json::json!({ "status": "ok", "result": result })
        }
        BridgeReply::Error { code, message } => {
            serde_json::json!({ "status": "error", "code": code, "message": message })
        }
        BridgeReply::NotImplemented => serde_json::json!({ "status": "not_implemented" }),
    }
}
