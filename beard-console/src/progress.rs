//! Progress indicator
//!
//! The indicator is cosmetic: it shows that a workflow is waiting on the
//! server. It is injected into the orchestrator and each workflow holds a
//! [`ProgressHandle`] bound to its own modal scope.

use beard_common::{ConsoleEvent, EventBus, Workflow};
use std::sync::Arc;

/// Start/done capability of a progress widget
pub trait ProgressIndicator: Send + Sync {
    /// Show progress inside `scope`
    fn start(&self, scope: &str);

    /// Complete progress inside `scope`
    fn done(&self, scope: &str);
}

/// Progress indicator that publishes `ProgressStarted` / `ProgressDone`
#[derive(Debug, Clone)]
pub struct EventProgress {
    bus: EventBus,
}

impl EventProgress {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl ProgressIndicator for EventProgress {
    fn start(&self, scope: &str) {
        self.bus.emit_lossy(ConsoleEvent::ProgressStarted {
            scope: scope.to_string(),
            timestamp: chrono::Utc::now(),
        });
    }

    fn done(&self, scope: &str) {
        self.bus.emit_lossy(ConsoleEvent::ProgressDone {
            scope: scope.to_string(),
            timestamp: chrono::Utc::now(),
        });
    }
}

/// A workflow's handle on the shared progress indicator
#[derive(Clone)]
pub struct ProgressHandle {
    scope: &'static str,
    indicator: Arc<dyn ProgressIndicator>,
}

impl ProgressHandle {
    pub fn new(workflow: Workflow, indicator: Arc<dyn ProgressIndicator>) -> Self {
        Self {
            scope: workflow.modal_scope(),
            indicator,
        }
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    pub fn start(&self) {
        tracing::trace!(scope = self.scope, "Progress started");
        self.indicator.start(self.scope);
    }

    pub fn done(&self) {
        tracing::trace!(scope = self.scope, "Progress done");
        self.indicator.done(self.scope);
    }
}

impl std::fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressHandle")
            .field("scope", &self.scope)
            .finish()
    }
}
