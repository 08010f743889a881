//! # Notification
//!
//! Outbound events the allocation engine publishes after commit. Delivery
//! is best-effort: a failing sink never un-assigns an order.

use crate::domain::value_objects::{AgentId, OrderId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An allocation lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AssignmentEvent {
    /// An agent was committed to an order.
    DeliveryAssigned {
        /// The order.
        order_id: OrderId,
        /// The committed agent.
        agent_id: AgentId,
    },
    /// Allocation ran and could not commit an agent.
    AssignmentFailed {
        /// The order.
        order_id: OrderId,
        /// Why no agent was committed.
        reason: String,
    },
}

/// Port for publishing assignment events.
#[async_trait]
pub trait NotificationSink: Send + Sync + std::fmt::Debug {
    /// Publishes one event. Implementations swallow their own transport
    /// errors; the engine does not roll back on publish failure.
    async fn publish(&self, event: AssignmentEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn publish(&self, _event: AssignmentEvent) {}
}

/// Sink that records events for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: parking_lot::Mutex<Vec<AssignmentEvent>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<AssignmentEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn publish(&self, event: AssignmentEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        let order_id = OrderId::new_v4();
        sink.publish(AssignmentEvent::AssignmentFailed {
            order_id,
            reason: "no agents".to_string(),
        })
        .await;
        sink.publish(AssignmentEvent::DeliveryAssigned {
            order_id,
            agent_id: AgentId::new("agent-1"),
        })
        .await;

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AssignmentEvent::AssignmentFailed { .. }));
        assert!(matches!(events[1], AssignmentEvent::DeliveryAssigned { .. }));
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = AssignmentEvent::DeliveryAssigned {
            order_id: OrderId::new_v4(),
            agent_id: AgentId::new("agent-1"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"delivery_assigned\""));
    }
}
