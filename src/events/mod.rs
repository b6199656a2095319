/*!
 * 领域事件
 *
 * 选课、学习进度、测验与作业的状态变化都会通过 [`EventBus`] 广播，
 * 通知、审计等下游模块自行订阅。
 *
 * ## 消息格式
 *
 * ```json
 * {
 *     "occurred_at": "2026-03-01T12:00:00Z",
 *     "actor_id": 42,
 *     "event": { "type": "enrollment_completed", "enrollment_id": 7, "final_score": 8.7 }
 * }
 * ```
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// 领域事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    Enrolled {
        enrollment_id: i64,
        student_id: i64,
        course_version_id: i64,
    },
    EnrollmentCancelled {
        enrollment_id: i64,
        reason: String,
    },
    EnrollmentBanned {
        enrollment_id: i64,
        reason: String,
    },
    EnrollmentExpired {
        enrollment_id: i64,
    },
    EnrollmentCompleted {
        enrollment_id: i64,
        final_score: f64,
    },
    CertificateIssued {
        enrollment_id: i64,
        certificate_id: i64,
        code: String,
    },
    CertificateRevoked {
        enrollment_id: i64,
        certificate_id: i64,
        reason: String,
    },
    LessonCompleted {
        enrollment_id: i64,
        lesson_id: i64,
    },
    QuizAttemptStarted {
        attempt_id: i64,
        quiz_id: i64,
        attempt_number: i32,
    },
    QuizAttemptFinished {
        attempt_id: i64,
        quiz_id: i64,
        status: String,
        total_score: Option<f64>,
    },
    QuizAttemptExpired {
        attempt_id: i64,
        quiz_id: i64,
    },
    SubmissionGraded {
        submission_id: i64,
        assignment_id: i64,
        score: f64,
    },
    SubmissionRejected {
        submission_id: i64,
        assignment_id: i64,
    },
}

impl DomainEvent {
    /// 事件名（与序列化后的 type 字段一致）
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::Enrolled { .. } => "enrolled",
            DomainEvent::EnrollmentCancelled { .. } => "enrollment_cancelled",
            DomainEvent::EnrollmentBanned { .. } => "enrollment_banned",
            DomainEvent::EnrollmentExpired { .. } => "enrollment_expired",
            DomainEvent::EnrollmentCompleted { .. } => "enrollment_completed",
            DomainEvent::CertificateIssued { .. } => "certificate_issued",
            DomainEvent::CertificateRevoked { .. } => "certificate_revoked",
            DomainEvent::LessonCompleted { .. } => "lesson_completed",
            DomainEvent::QuizAttemptStarted { .. } => "quiz_attempt_started",
            DomainEvent::QuizAttemptFinished { .. } => "quiz_attempt_finished",
            DomainEvent::QuizAttemptExpired { .. } => "quiz_attempt_expired",
            DomainEvent::SubmissionGraded { .. } => "submission_graded",
            DomainEvent::SubmissionRejected { .. } => "submission_rejected",
        }
    }
}

/// 带元数据的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub occurred_at: DateTime<Utc>,
    /// 触发者，系统任务（清扫等）为空
    pub actor_id: Option<i64>,
    pub event: DomainEvent,
}

/// 事件总线
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 发布事件，没有订阅者时直接丢弃
    pub fn publish(&self, occurred_at: DateTime<Utc>, actor_id: Option<i64>, event: DomainEvent) {
        info!(event = event.name(), actor_id = ?actor_id, "domain event");
        let envelope = EventEnvelope {
            occurred_at,
            actor_id,
            event,
        };
        if self.sender.send(envelope).is_err() {
            debug!("No event subscribers, event dropped");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = DomainEvent::EnrollmentCompleted {
            enrollment_id: 7,
            final_score: 8.7,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "enrollment_completed");
        assert_eq!(json["enrollment_id"], 7);
        assert_eq!(event.name(), "enrollment_completed");
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();

        bus.publish(now, Some(1), DomainEvent::EnrollmentExpired { enrollment_id: 3 });

        let received = rx.recv().await.unwrap();
        assert_eq!(received.actor_id, Some(1));
        assert_eq!(
            received.event,
            DomainEvent::EnrollmentExpired { enrollment_id: 3 }
        );
    }

    #[test]
    fn test_publish_without_subscribers_does_not_fail() {
        let bus = EventBus::default();
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        bus.publish(now, None, DomainEvent::EnrollmentExpired { enrollment_id: 1 });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
