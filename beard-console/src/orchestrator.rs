//! Request orchestration
//!
//! Each workflow has a `submit_*` entry point that guards its inputs,
//! starts the workflow's progress handle and runs the matching fetch. A
//! fetch serializes the inputs into the service request, awaits the
//! service and writes the display-ready result (or the failure) back into
//! [`ViewState`]. Progress is always completed once the outcome is known.
//!
//! There is no in-flight guard: a workflow may be submitted again before an
//! earlier response arrives, and whichever response lands last is shown.
//! Submission ids make that ordering observable.

use crate::display::{display_color, DisplayColor, ResultLabel};
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{split_categories, ClusteringRequest, PhoneticBlockRequest, Publication};
use crate::progress::{ProgressHandle, ProgressIndicator};
use crate::render::clustering_table_html;
use crate::samples;
use crate::services::{
    BeardClient, ClusteringService, CorenessPredictorService, PhoneticBlockService, ServiceError,
};
use crate::view_state::{
    ClusteringView, PhoneticView, PredictionView, SubmissionId, ViewState, WorkflowState,
};
use beard_common::Workflow;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Result of a `submit_*` call that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required input was missing; nothing was sent
    Skipped,
    /// The response was applied to the view state
    Completed {
        submission: SubmissionId,
        /// A newer submission was accepted before this response arrived
        stale: bool,
    },
}

/// Drives the three workflows against their services
#[derive(Clone)]
pub struct RequestOrchestrator {
    view: Arc<ViewState>,
    clustering: Arc<dyn ClusteringService>,
    phonetic: Arc<dyn PhoneticBlockService>,
    predictor: Arc<dyn CorenessPredictorService>,
    clustering_progress: ProgressHandle,
    phonetic_progress: ProgressHandle,
    predictor_progress: ProgressHandle,
}

impl RequestOrchestrator {
    pub fn new(
        view: Arc<ViewState>,
        clustering: Arc<dyn ClusteringService>,
        phonetic: Arc<dyn PhoneticBlockService>,
        predictor: Arc<dyn CorenessPredictorService>,
        progress: Arc<dyn ProgressIndicator>,
    ) -> Self {
        Self {
            view,
            clustering,
            phonetic,
            predictor,
            clustering_progress: ProgressHandle::new(Workflow::Clustering, progress.clone()),
            phonetic_progress: ProgressHandle::new(Workflow::PhoneticBlock, progress.clone()),
            predictor_progress: ProgressHandle::new(Workflow::Prediction, progress),
        }
    }

    /// All three services served by one Beard server
    pub fn with_client(
        view: Arc<ViewState>,
        client: BeardClient,
        progress: Arc<dyn ProgressIndicator>,
    ) -> Self {
        let client = Arc::new(client);
        Self::new(view, client.clone(), client.clone(), client, progress)
    }

    pub fn view(&self) -> &Arc<ViewState> {
        &self.view
    }

    // === Sample inputs ===

    pub async fn load_sample_clusters(&self) -> ConsoleResult<()> {
        self.view
            .set_clustering_signatures(Some(samples::sample_signatures_text()?))
            .await;
        self.view
            .set_clustering_records(Some(samples::sample_records_text()?))
            .await;
        Ok(())
    }

    pub async fn load_sample_phonetic_block(&self) {
        self.view
            .set_full_name(Some(samples::SAMPLE_FULL_NAME.to_string()))
            .await;
    }

    pub async fn load_sample_publication(&self) {
        self.view
            .set_publication_title(Some(samples::SAMPLE_PUBLICATION_TITLE.to_string()))
            .await;
        self.view
            .set_publication_abstract(Some(samples::SAMPLE_PUBLICATION_ABSTRACT.to_string()))
            .await;
        self.view
            .set_publication_category(Some(samples::SAMPLE_PUBLICATION_CATEGORY.to_string()))
            .await;
    }

    // === Clustering ===

    /// Submit the records and signatures text for clustering
    ///
    /// Skipped when either field is unset. The text is not checked here;
    /// malformed JSON fails the workflow during the fetch.
    pub async fn submit_clusters(&self) -> ConsoleResult<SubmitOutcome> {
        let inputs = self.view.clustering_slot().read().await.inputs.clone();
        let (Some(records), Some(signatures)) = (inputs.records, inputs.signatures) else {
            debug!(workflow = %Workflow::Clustering, "Submit skipped: input missing");
            return Ok(SubmitOutcome::Skipped);
        };

        let submission = self
            .view
            .begin_submission(Workflow::Clustering, self.view.clustering_slot())
            .await;
        self.clustering_progress.start();

        self.fetch_clusters(submission, &records, &signatures).await
    }

    async fn fetch_clusters(
        &self,
        submission: SubmissionId,
        records: &str,
        signatures: &str,
    ) -> ConsoleResult<SubmitOutcome> {
        let outcome = match parse_clustering_request(records, signatures) {
            Ok(request) => {
                info!(
                    submission,
                    records = request.records.len(),
                    signatures = request.signatures.len(),
                    "Requesting clusters"
                );
                self.clustering
                    .clusters(&request)
                    .await
                    .map(|clusters| {
                        let table_html = clustering_table_html(&clusters);
                        let view = ClusteringView {
                            clusters,
                            table_html,
                        };
                        (view, display_color(&ResultLabel::Clusters))
                    })
                    .map_err(ConsoleError::from)
            }
            Err(e) => Err(e),
        };

        self.finish(
            Workflow::Clustering,
            self.view.clustering_slot(),
            &self.clustering_progress,
            submission,
            outcome,
        )
        .await
    }

    // === Phonetic block ===

    /// Submit the full name for phonetic blocking
    pub async fn submit_phonetic_block(&self) -> ConsoleResult<SubmitOutcome> {
        let inputs = self.view.phonetic_slot().read().await.inputs.clone();
        let Some(full_name) = inputs.full_name else {
            debug!(workflow = %Workflow::PhoneticBlock, "Submit skipped: input missing");
            return Ok(SubmitOutcome::Skipped);
        };

        let submission = self
            .view
            .begin_submission(Workflow::PhoneticBlock, self.view.phonetic_slot())
            .await;
        self.phonetic_progress.start();

        self.fetch_phonetic_block(submission, full_name).await
    }

    async fn fetch_phonetic_block(
        &self,
        submission: SubmissionId,
        name: String,
    ) -> ConsoleResult<SubmitOutcome> {
        info!(submission, name = %name, "Requesting phonetic block");
        let request = PhoneticBlockRequest::single(name.clone());

        let outcome = match self.phonetic.phonetic_blocks(&request).await {
            Ok(mut result) => match result.phonetic_blocks.remove(&name) {
                Some(code) => {
                    let color = display_color(&ResultLabel::Phonetic(code.clone()));
                    Ok((PhoneticView { name, code }, color))
                }
                None => Err(ServiceError::MissingEntry(name).into()),
            },
            Err(e) => Err(e.into()),
        };

        self.finish(
            Workflow::PhoneticBlock,
            self.view.phonetic_slot(),
            &self.phonetic_progress,
            submission,
            outcome,
        )
        .await
    }

    // === Coreness prediction ===

    /// Submit the publication for coreness prediction
    pub async fn submit_predictor(&self) -> ConsoleResult<SubmitOutcome> {
        let inputs = self.view.prediction_slot().read().await.inputs.clone();
        let (Some(abstract_text), Some(category), Some(title)) =
            (inputs.abstract_text, inputs.category, inputs.title)
        else {
            debug!(workflow = %Workflow::Prediction, "Submit skipped: input missing");
            return Ok(SubmitOutcome::Skipped);
        };

        let submission = self
            .view
            .begin_submission(Workflow::Prediction, self.view.prediction_slot())
            .await;
        self.predictor_progress.start();

        self.fetch_prediction(submission, abstract_text, &category, title)
            .await
    }

    async fn fetch_prediction(
        &self,
        submission: SubmissionId,
        abstract_text: String,
        category: &str,
        title: String,
    ) -> ConsoleResult<SubmitOutcome> {
        let publication = Publication {
            title,
            abstract_text,
            categories: split_categories(category),
        };
        info!(
            submission,
            categories = ?publication.categories,
            "Requesting coreness prediction"
        );

        let outcome = self
            .predictor
            .coreness(&publication)
            .await
            .map(|prediction| {
                let color = display_color(&ResultLabel::Decision(prediction.decision.clone()));
                let view = PredictionView {
                    decision: prediction.decision,
                    scores: prediction.scores,
                };
                (view, color)
            })
            .map_err(ConsoleError::from);

        self.finish(
            Workflow::Prediction,
            self.view.prediction_slot(),
            &self.predictor_progress,
            submission,
            outcome,
        )
        .await
    }

    /// Apply a fetch outcome to the workflow and complete its progress
    async fn finish<I, R>(
        &self,
        workflow: Workflow,
        slot: &RwLock<WorkflowState<I, R>>,
        progress: &ProgressHandle,
        submission: SubmissionId,
        outcome: ConsoleResult<(R, DisplayColor)>,
    ) -> ConsoleResult<SubmitOutcome> {
        let result = match outcome {
            Ok((result, color)) => {
                let stale = self
                    .view
                    .complete_submission(workflow, slot, submission, result, color)
                    .await;
                info!(workflow = %workflow, submission, stale, "Workflow done");
                Ok(SubmitOutcome::Completed { submission, stale })
            }
            Err(e) => {
                self.view
                    .fail_submission(workflow, slot, submission, e.to_string())
                    .await;
                Err(e)
            }
        };

        progress.done();
        result
    }
}

/// Parse the two clustering text fields into a request
///
/// Each field must be a JSON array; its elements are forwarded unchanged.
fn parse_clustering_request(records: &str, signatures: &str) -> ConsoleResult<ClusteringRequest> {
    Ok(ClusteringRequest {
        signatures: parse_json_array("signatures", signatures)?,
        records: parse_json_array("records", records)?,
    })
}

fn parse_json_array(field: &'static str, text: &str) -> ConsoleResult<Vec<Value>> {
    serde_json::from_str(text).map_err(|e| ConsoleError::MalformedInput {
        field,
        message: e.to_string(),
    })
}
