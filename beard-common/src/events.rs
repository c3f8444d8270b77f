//! Event types for the Beard console event system
//!
//! Every workflow lifecycle transition and progress-indicator change is
//! broadcast as a [`ConsoleEvent`] so that front ends can re-render when
//! view state changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

/// The three analysis workflows driven by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workflow {
    /// Author-signature clustering
    Clustering,
    /// Name phonetic blocking
    PhoneticBlock,
    /// Publication coreness prediction
    Prediction,
}

impl Workflow {
    /// DOM anchor of the modal that hosts this workflow's progress bar
    pub fn modal_scope(&self) -> &'static str {
        match self {
            Workflow::Clustering => "#clustering-modal",
            Workflow::PhoneticBlock => "#text-modal",
            Workflow::Prediction => "#predictor-modal",
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Workflow::Clustering => "clustering",
            Workflow::PhoneticBlock => "phonetic_block",
            Workflow::Prediction => "prediction",
        };
        f.write_str(name)
    }
}

/// Per-workflow lifecycle
///
/// `Idle -> Submitting -> Done | Failed`; a fresh submit from `Done` or
/// `Failed` re-enters `Submitting`. Nothing returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Idle,
    Submitting,
    Done,
    Failed,
}

/// Console event types
///
/// Events are broadcast via [`EventBus`] and serialize with a `type` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConsoleEvent {
    /// Raw input fields of a workflow were written
    InputsChanged {
        workflow: Workflow,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A submit passed its input guard and entered `Submitting`
    WorkflowSubmitted {
        workflow: Workflow,
        submission: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A response was applied and the workflow entered `Done`
    WorkflowCompleted {
        workflow: Workflow,
        submission: u64,
        /// A newer submission was already in flight when this one landed
        stale: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The workflow entered `Failed`
    WorkflowFailed {
        workflow: Workflow,
        submission: u64,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Progress indicator started for a modal scope
    ProgressStarted {
        scope: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Progress indicator completed for a modal scope
    ProgressDone {
        scope: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl ConsoleEvent {
    /// Event type name, matching the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            ConsoleEvent::InputsChanged { .. } => "InputsChanged",
            ConsoleEvent::WorkflowSubmitted { .. } => "WorkflowSubmitted",
            ConsoleEvent::WorkflowCompleted { .. } => "WorkflowCompleted",
            ConsoleEvent::WorkflowFailed { .. } => "WorkflowFailed",
            ConsoleEvent::ProgressStarted { .. } => "ProgressStarted",
            ConsoleEvent::ProgressDone { .. } => "ProgressDone",
        }
    }

    /// Workflow the event concerns, if any
    pub fn workflow(&self) -> Option<Workflow> {
        match self {
            ConsoleEvent::InputsChanged { workflow, .. }
            | ConsoleEvent::WorkflowSubmitted { workflow, .. }
            | ConsoleEvent::WorkflowCompleted { workflow, .. }
            | ConsoleEvent::WorkflowFailed { workflow, .. } => Some(*workflow),
            ConsoleEvent::ProgressStarted { .. } | ConsoleEvent::ProgressDone { .. } => None,
        }
    }
}

/// Broadcast bus for [`ConsoleEvent`]s
///
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ConsoleEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Events beyond `capacity` that no subscriber has read are dropped
    /// oldest-first.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ConsoleEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ConsoleEvent::WorkflowFailed {
            workflow: Workflow::PhoneticBlock,
            submission: 3,
            message: "API error 500".to_string(),
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "WorkflowFailed");
        assert_eq!(json["workflow"], "phonetic_block");
        assert_eq!(json["submission"], 3);
        assert_eq!(event.event_type(), "WorkflowFailed");
        assert_eq!(event.workflow(), Some(Workflow::PhoneticBlock));
    }

    #[test]
    fn test_modal_scopes_are_distinct() {
        let scopes: std::collections::HashSet<_> = [
            Workflow::Clustering,
            Workflow::PhoneticBlock,
            Workflow::Prediction,
        ]
        .iter()
        .map(|w| w.modal_scope())
        .collect();
        assert_eq!(scopes.len(), 3);
        assert_eq!(Workflow::Clustering.modal_scope(), "#clustering-modal");
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(8);
        bus.emit_lossy(ConsoleEvent::ProgressDone {
            scope: "#text-modal".to_string(),
            timestamp: chrono::Utc::now(),
        });
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.capacity(), 8);

        let _rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit_lossy(ConsoleEvent::InputsChanged {
            workflow: Workflow::Clustering,
            timestamp: chrono::Utc::now(),
        });

        let received = rx.recv().await.unwrap();
        assert_eq!(received.workflow(), Some(Workflow::Clustering));
    }

    #[test]
    fn test_lifecycle_defaults_to_idle() {
        assert_eq!(Lifecycle::default(), Lifecycle::Idle);
    }
}
