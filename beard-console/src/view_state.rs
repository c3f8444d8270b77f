//! Shared view state
//!
//! Holds the raw input fields, lifecycle and display-ready result of each
//! workflow. Each workflow lives behind its own lock, so writes to one
//! never wait on another. Every change is announced on the [`EventBus`].

use crate::display::DisplayColor;
use crate::models::{ClusteringResult, Decision};
use beard_common::{ConsoleEvent, EventBus, Lifecycle, Workflow};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Per-workflow submission counter value, starting at 1
pub type SubmissionId = u64;

/// Raw inputs of the clustering workflow (JSON text)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusteringInputs {
    pub records: Option<String>,
    pub signatures: Option<String>,
}

/// Raw input of the phonetic block workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneticInputs {
    pub full_name: Option<String>,
}

/// Raw inputs of the coreness predictor workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictorInputs {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    /// Categories as one display string, `", "` separated
    pub category: Option<String>,
}

/// Display-ready clustering result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringView {
    pub clusters: ClusteringResult,
    /// Pre-rendered result table
    pub table_html: String,
}

/// Display-ready phonetic block result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneticView {
    pub name: String,
    pub code: String,
}

/// Display-ready coreness result
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub decision: Decision,
    pub scores: Vec<f64>,
}

/// State of one workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState<I, R> {
    pub inputs: I,
    pub lifecycle: Lifecycle,
    /// `None` until the first response arrives (and after a failure)
    pub result: Option<R>,
    pub color: DisplayColor,
    /// Message of the failure that put the workflow in `Failed`
    pub error: Option<String>,
    /// Most recent submission that passed the input guard
    pub latest_submission: Option<SubmissionId>,
    /// Submission whose response (or failure) is currently shown
    pub applied_submission: Option<SubmissionId>,
    pub updated_at: DateTime<Utc>,
}

impl<I: Default, R> WorkflowState<I, R> {
    fn new() -> Self {
        Self {
            inputs: I::default(),
            lifecycle: Lifecycle::Idle,
            result: None,
            color: DisplayColor::Idle,
            error: None,
            latest_submission: None,
            applied_submission: None,
            updated_at: Utc::now(),
        }
    }
}

impl<I, R> WorkflowState<I, R> {
    /// True when the shown outcome belongs to an older submission than the
    /// most recent one
    pub fn is_stale(&self) -> bool {
        match (self.applied_submission, self.latest_submission) {
            (Some(applied), Some(latest)) => applied < latest,
            _ => false,
        }
    }
}

pub type ClusteringState = WorkflowState<ClusteringInputs, ClusteringView>;
pub type PhoneticState = WorkflowState<PhoneticInputs, PhoneticView>;
pub type PredictionState = WorkflowState<PredictorInputs, PredictionView>;

/// View state of the whole console session
#[derive(Debug)]
pub struct ViewState {
    clustering: RwLock<ClusteringState>,
    phonetic: RwLock<PhoneticState>,
    prediction: RwLock<PredictionState>,
    events: EventBus,
}

impl ViewState {
    /// Create idle state for all three workflows
    pub fn new(events: EventBus) -> Self {
        Self {
            clustering: RwLock::new(WorkflowState::new()),
            phonetic: RwLock::new(WorkflowState::new()),
            prediction: RwLock::new(WorkflowState::new()),
            events,
        }
    }

    /// Bus on which state changes are announced
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // === Snapshots ===

    pub async fn clustering(&self) -> ClusteringState {
        self.clustering.read().await.clone()
    }

    pub async fn phonetic_block(&self) -> PhoneticState {
        self.phonetic.read().await.clone()
    }

    pub async fn prediction(&self) -> PredictionState {
        self.prediction.read().await.clone()
    }

    /// Lifecycle of any workflow
    pub async fn lifecycle(&self, workflow: Workflow) -> Lifecycle {
        match workflow {
            Workflow::Clustering => self.clustering.read().await.lifecycle,
            Workflow::PhoneticBlock => self.phonetic.read().await.lifecycle,
            Workflow::Prediction => self.prediction.read().await.lifecycle,
        }
    }

    // === Input setters ===

    pub async fn set_clustering_records(&self, records: Option<String>) {
        {
            let mut state = self.clustering.write().await;
            state.inputs.records = records;
            state.updated_at = Utc::now();
        }
        self.inputs_changed(Workflow::Clustering);
    }

    pub async fn set_clustering_signatures(&self, signatures: Option<String>) {
        {
            let mut state = self.clustering.write().await;
            state.inputs.signatures = signatures;
            state.updated_at = Utc::now();
        }
        self.inputs_changed(Workflow::Clustering);
    }

    pub async fn set_full_name(&self, full_name: Option<String>) {
        {
            let mut state = self.phonetic.write().await;
            state.inputs.full_name = full_name;
            state.updated_at = Utc::now();
        }
        self.inputs_changed(Workflow::PhoneticBlock);
    }

    pub async fn set_publication_title(&self, title: Option<String>) {
        {
            let mut state = self.prediction.write().await;
            state.inputs.title = title;
            state.updated_at = Utc::now();
        }
        self.inputs_changed(Workflow::Prediction);
    }

    pub async fn set_publication_abstract(&self, abstract_text: Option<String>) {
        {
            let mut state = self.prediction.write().await;
            state.inputs.abstract_text = abstract_text;
            state.updated_at = Utc::now();
        }
        self.inputs_changed(Workflow::Prediction);
    }

    pub async fn set_publication_category(&self, category: Option<String>) {
        {
            let mut state = self.prediction.write().await;
            state.inputs.category = category;
            state.updated_at = Utc::now();
        }
        self.inputs_changed(Workflow::Prediction);
    }

    fn inputs_changed(&self, workflow: Workflow) {
        self.events.emit_lossy(ConsoleEvent::InputsChanged {
            workflow,
            timestamp: Utc::now(),
        });
    }

    // === Lifecycle transitions (orchestrator only) ===

    pub(crate) fn clustering_slot(&self) -> &RwLock<ClusteringState> {
        &self.clustering
    }

    pub(crate) fn phonetic_slot(&self) -> &RwLock<PhoneticState> {
        &self.phonetic
    }

    pub(crate) fn prediction_slot(&self) -> &RwLock<PredictionState> {
        &self.prediction
    }

    /// Enter `Submitting` and allocate the next submission id
    pub(crate) async fn begin_submission<I, R>(
        &self,
        workflow: Workflow,
        slot: &RwLock<WorkflowState<I, R>>,
    ) -> SubmissionId {
        let submission = {
            let mut state = slot.write().await;
            let submission = state.latest_submission.map_or(1, |latest| latest + 1);
            state.latest_submission = Some(submission);
            state.lifecycle = Lifecycle::Submitting;
            state.error = None;
            state.updated_at = Utc::now();
            submission
        };

        debug!(workflow = %workflow, submission, "Workflow submitting");
        self.events.emit_lossy(ConsoleEvent::WorkflowSubmitted {
            workflow,
            submission,
            timestamp: Utc::now(),
        });

        submission
    }

    /// Store a response and enter `Done`
    ///
    /// The last response to arrive wins, whichever submission it belongs to.
    /// Returns true when the applied response is stale.
    pub(crate) async fn complete_submission<I, R>(
        &self,
        workflow: Workflow,
        slot: &RwLock<WorkflowState<I, R>>,
        submission: SubmissionId,
        result: R,
        color: DisplayColor,
    ) -> bool {
        let stale = {
            let mut state = slot.write().await;
            warn_if_out_of_order(workflow, state.applied_submission, submission);
            state.result = Some(result);
            state.color = color;
            state.error = None;
            state.lifecycle = Lifecycle::Done;
            state.applied_submission = Some(submission);
            state.updated_at = Utc::now();
            state.is_stale()
        };

        if stale {
            warn!(workflow = %workflow, submission, "Applied response of a superseded submission");
        }
        self.events.emit_lossy(ConsoleEvent::WorkflowCompleted {
            workflow,
            submission,
            stale,
            timestamp: Utc::now(),
        });

        stale
    }

    /// Record a failure and enter `Failed`
    pub(crate) async fn fail_submission<I, R>(
        &self,
        workflow: Workflow,
        slot: &RwLock<WorkflowState<I, R>>,
        submission: SubmissionId,
        message: String,
    ) {
        {
            let mut state = slot.write().await;
            warn_if_out_of_order(workflow, state.applied_submission, submission);
            state.result = None;
            state.color = DisplayColor::Error;
            state.error = Some(message.clone());
            state.lifecycle = Lifecycle::Failed;
            state.applied_submission = Some(submission);
            state.updated_at = Utc::now();
        }

        warn!(workflow = %workflow, submission, error = %message, "Workflow failed");
        self.events.emit_lossy(ConsoleEvent::WorkflowFailed {
            workflow,
            submission,
            message,
            timestamp: Utc::now(),
        });
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(EventBus::new(100))
    }
}

fn warn_if_out_of_order(workflow: Workflow, applied: Option<SubmissionId>, incoming: SubmissionId) {
    if let Some(applied) = applied {
        if applied > incoming {
            warn!(
                workflow = %workflow,
                applied,
                incoming,
                "Older submission overwrites newer result"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let view = ViewState::default();

        let clustering = view.clustering().await;
        assert_eq!(clustering.lifecycle, Lifecycle::Idle);
        assert!(clustering.result.is_none());
        assert_eq!(clustering.color, DisplayColor::Idle);
        assert!(!clustering.is_stale());

        assert_eq!(view.lifecycle(Workflow::PhoneticBlock).await, Lifecycle::Idle);
        assert_eq!(view.lifecycle(Workflow::Prediction).await, Lifecycle::Idle);
    }

    #[tokio::test]
    async fn test_setters_touch_only_their_workflow() {
        let view = ViewState::default();
        let mut rx = view.events().subscribe();

        view.set_full_name(Some("John Smith".to_string())).await;

        assert_eq!(
            view.phonetic_block().await.inputs.full_name.as_deref(),
            Some("John Smith")
        );
        assert_eq!(view.clustering().await.inputs, ClusteringInputs::default());
        assert_eq!(view.prediction().await.inputs, PredictorInputs::default());

        let event = rx.recv().await.unwrap();
        assert_eq!(event.workflow(), Some(Workflow::PhoneticBlock));
    }

    #[tokio::test]
    async fn test_submission_ids_increase() {
        let view = ViewState::default();
        let first = view.begin_submission(Workflow::Clustering, view.clustering_slot()).await;
        let second = view.begin_submission(Workflow::Clustering, view.clustering_slot()).await;
        assert_eq!((first, second), (1, 2));

        // Independent counter per workflow
        let other = view.begin_submission(Workflow::Prediction, view.prediction_slot()).await;
        assert_eq!(other, 1);
    }

    #[tokio::test]
    async fn test_stale_completion_is_reported() {
        let view = ViewState::default();
        let slot = view.phonetic_slot();
        let first = view.begin_submission(Workflow::PhoneticBlock, slot).await;
        let _second = view.begin_submission(Workflow::PhoneticBlock, slot).await;

        let result = PhoneticView {
            name: "A".to_string(),
            code: "X".to_string(),
        };
        let stale = view
            .complete_submission(Workflow::PhoneticBlock, slot, first, result, DisplayColor::Success)
            .await;

        assert!(stale);
        let state = view.phonetic_block().await;
        assert_eq!(state.lifecycle, Lifecycle::Done);
        assert!(state.is_stale());
    }

    #[tokio::test]
    async fn test_failure_sets_error_state() {
        let view = ViewState::default();
        let slot = view.prediction_slot();
        let submission = view.begin_submission(Workflow::Prediction, slot).await;

        view.fail_submission(Workflow::Prediction, slot, submission, "API error 500".to_string())
            .await;

        let state = view.prediction().await;
        assert_eq!(state.lifecycle, Lifecycle::Failed);
        assert_eq!(state.error.as_deref(), Some("API error 500"));
        assert_eq!(state.color, DisplayColor::Error);
        assert_eq!(state.applied_submission, Some(1));
    }
}
