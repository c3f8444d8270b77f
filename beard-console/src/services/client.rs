//! HTTP client for the Beard server
//!
//! One `reqwest::Client` serves all three analysis endpoints plus the
//! health and method-listing routes.

use super::{ClusteringService, CorenessPredictorService, PhoneticBlockService, ServiceError};
use crate::models::{
    ClusteringRequest, ClusteringResult, PhoneticBlockRequest, PhoneticBlockResult,
    PredictionResult, Publication,
};
use async_trait::async_trait;
use beard_common::config::ConsoleConfig;
use beard_common::Workflow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("beard-console/", env!("CARGO_PKG_VERSION"));

const CLUSTERS_PATH: &str = "/api/clustering/clusters";
const PHONETIC_BLOCKS_PATH: &str = "/api/text/phonetic_blocks";
const CORENESS_PATH: &str = "/api/predictor/coreness";
const PING_PATH: &str = "/ping";

/// Beard server API client
#[derive(Debug, Clone)]
pub struct BeardClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BeardClient {
    /// Create a client for `base_url`
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from resolved console configuration
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ServiceError> {
        Self::new(config.server_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Health check; the server answers `OK`
    pub async fn ping(&self) -> Result<String, ServiceError> {
        let url = self.url(PING_PATH);
        tracing::debug!(url = %url, "Pinging Beard server");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let response = check_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(body.trim().to_string())
    }

    /// Method listing the server publishes for one service
    pub async fn available_methods(
        &self,
        workflow: Workflow,
    ) -> Result<serde_json::Value, ServiceError> {
        let url = self.url(methods_path(workflow));
        tracing::debug!(url = %url, workflow = %workflow, "Listing service methods");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(url = %url, "POST to Beard server");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

/// Listing route per service
fn methods_path(workflow: Workflow) -> &'static str {
    match workflow {
        Workflow::Clustering => "/api/clustering/",
        Workflow::PhoneticBlock => "/api/text/",
        Workflow::Prediction => "/api/predictor/",
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "Beard server returned error status");
    Err(ServiceError::Api(status.as_u16(), error_text))
}

#[async_trait]
impl ClusteringService for BeardClient {
    async fn clusters(
        &self,
        request: &ClusteringRequest,
    ) -> Result<ClusteringResult, ServiceError> {
        let result: ClusteringResult = self.post_json(CLUSTERS_PATH, request).await?;
        if result.is_empty() {
            tracing::warn!(
                signatures = request.signatures.len(),
                "Clustering returned no clusters"
            );
        }
        tracing::info!(
            signatures = request.signatures.len(),
            clusters = result.len(),
            "Clustering request successful"
        );
        Ok(result)
    }
}

#[async_trait]
impl PhoneticBlockService for BeardClient {
    async fn phonetic_blocks(
        &self,
        request: &PhoneticBlockRequest,
    ) -> Result<PhoneticBlockResult, ServiceError> {
        self.post_json(PHONETIC_BLOCKS_PATH, request).await
    }
}

#[async_trait]
impl CorenessPredictorService for BeardClient {
    async fn coreness(&self, publication: &Publication) -> Result<PredictionResult, ServiceError> {
        let result: PredictionResult = self.post_json(CORENESS_PATH, publication).await?;
        tracing::info!(decision = %result.decision, "Coreness prediction successful");
        Ok(result)
    }
}
