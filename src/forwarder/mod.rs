use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Topic every device subscribed to exam announcements listens on.
pub const EXAMS_TOPIC: &str = "exams";

const NEW_EXAM_TITLE: &str = "New Exam Added";

#[derive(Debug, Clone, Deserialize)]
pub struct ExamDocument {
    pub subject: String,
}

/// Creation event for a record in the "exams" collection.
#[derive(Debug, Clone)]
pub struct ExamCreatedEvent {
    pub exam_id: String,
    pub document: ExamDocument,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushData {
    pub subject: String,
    #[serde(rename = "examId")]
    pub exam_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub notification: PushNotification,
    pub data: PushData,
}

/// Topic-based push-messaging backend. Returns the backend's message id on
/// success.
#[async_trait]
pub trait TopicMessaging: Send + Sync + 'static {
    async fn send_to_topic(&self, topic: &str, message: &PushMessage) -> anyhow::Result<String>;
}

/// Forwards new-exam document events into the push topic. Publish failures
/// are logged and swallowed; there is no retry and no dead-letter.
pub struct ExamEventForwarder {
    messaging: Arc<dyn TopicMessaging>,
}

impl ExamEventForwarder {
    pub fn new(messaging: Arc<dyn TopicMessaging>) -> Self {
        Self { messaging }
    }

    pub async fn on_exam_created(&self, event: ExamCreatedEvent) {
        let message = build_push_message(&event);

        match self.messaging.send_to_topic(EXAMS_TOPIC, &message).await {
            Ok(message_id) => {
                log::info!("Successfully sent new-exam message. [message_id = {message_id}]");
            }
            Err(error) => {
                log::error!("Error sending new-exam message. [error = {error:#}]");
            }
        }
    }
}

fn build_push_message(event: &ExamCreatedEvent) -> PushMessage {
    PushMessage {
        notification: PushNotification {
            title: NEW_EXAM_TITLE.to_owned(),
            body: format!("A new exam for {} has been added.", event.document.subject),
        },
        data: PushData {
            subject: event.document.subject.clone(),
            exam_id: event.exam_id.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;

    fn physics_event() -> ExamCreatedEvent {
        ExamCreatedEvent {
            exam_id: "exam-17".to_owned(),
            document: ExamDocument {
                subject: "Physics".to_owned(),
            },
        }
    }

    #[test]
    fn push_message_carries_the_subject_and_exam_id() {
        let message = build_push_message(&physics_event());

        assert_eq!(message.notification.title, "New Exam Added");
        assert_eq!(
            message.notification.body,
            "A new exam for Physics has been added."
        );
        assert_eq!(message.data.subject, "Physics");
        assert_eq!(message.data.exam_id, "exam-17");
    }

    #[test]
    fn exam_id_serializes_under_its_wire_name() {
        let message = build_push_message(&physics_event());
        let encoded = serde_json::to_value(&message).unwrap();

        assert_eq!(encoded["data"]["examId"], "exam-17");
    }

    type SentMessages = Arc<Mutex<Vec<(String, PushMessage)>>>;

    struct RecordingMessaging {
        sent: SentMessages,
    }

    #[async_trait]
    impl TopicMessaging for RecordingMessaging {
        async fn send_to_topic(
            &self,
            topic: &str,
            message: &PushMessage,
        ) -> anyhow::Result<String> {
            self.sent
                .lock()
                .unwrap()
                .push((topic.to_owned(), message.clone()));
            Ok("projects/0/messages/1".to_owned())
        }
    }

    struct FailingMessaging {
        attempts: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl TopicMessaging for FailingMessaging {
        async fn send_to_topic(
            &self,
            _topic: &str,
            _message: &PushMessage,
        ) -> anyhow::Result<String> {
            *self.attempts.lock().unwrap() += 1;
            anyhow::bail!("messaging backend unavailable")
        }
    }

    #[tokio::test]
    async fn publishes_to_the_exams_topic() {
        let sent = SentMessages::default();
        let forwarder = ExamEventForwarder::new(Arc::new(RecordingMessaging {
            sent: Arc::clone(&sent),
        }));

        forwarder.on_exam_created(physics_event()).await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, EXAMS_TOPIC);
    }

    #[tokio::test]
    async fn publish_failure_is_swallowed_without_retry() {
        let attempts = Arc::new(Mutex::new(0));
        let forwarder = ExamEventForwarder::new(Arc::new(FailingMessaging {
            attempts: Arc::clone(&attempts),
        }));

        forwarder.on_exam_created(physics_event()).await;

        assert_eq!(*attempts.lock().unwrap(), 1);
    }
}
