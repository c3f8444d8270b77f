//! beard-console library
//!
//! Operator console for the Beard analysis services (signature clustering,
//! phonetic blocking, coreness prediction). The library holds the view
//! state, the request orchestration and the result rendering; the binary
//! is a thin command-line front end over it.

pub mod display;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod render;
pub mod samples;
pub mod services;
pub mod view_state;

pub use error::{ConsoleError, ConsoleResult};
pub use orchestrator::{RequestOrchestrator, SubmitOutcome};
pub use view_state::ViewState;

use beard_common::EventBus;
use progress::EventProgress;
use services::BeardClient;
use std::sync::Arc;

/// Console session wired to one Beard server
///
/// State changes and progress are published on `events`.
pub struct Console {
    pub events: EventBus,
    pub orchestrator: RequestOrchestrator,
}

impl Console {
    pub fn new(client: BeardClient, events: EventBus) -> Self {
        let view = Arc::new(ViewState::new(events.clone()));
        let progress = Arc::new(EventProgress::new(events.clone()));
        let orchestrator = RequestOrchestrator::with_client(view, client, progress);
        Self {
            events,
            orchestrator,
        }
    }

    pub fn view(&self) -> &Arc<ViewState> {
        self.orchestrator.view()
    }
}
