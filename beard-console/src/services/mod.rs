//! Backend service interfaces
//!
//! Each Beard analysis service is an async trait so the orchestrator can be
//! driven by the HTTP client in production and by in-memory fakes in tests.

mod client;

pub use client::BeardClient;

use crate::models::{
    ClusteringRequest, ClusteringResult, PhoneticBlockRequest, PhoneticBlockResult,
    PredictionResult, Publication,
};
use async_trait::async_trait;
use thiserror::Error;

/// Service call errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Connection, timeout or body transfer failure
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Success status but the body lacked the consumed fields
    #[error("Decode error: {0}")]
    Decode(String),

    /// Phonetic block response had no entry for the submitted name
    #[error("No phonetic block returned for {0:?}")]
    MissingEntry(String),
}

/// Author-signature clustering
#[async_trait]
pub trait ClusteringService: Send + Sync {
    async fn clusters(&self, request: &ClusteringRequest)
        -> Result<ClusteringResult, ServiceError>;
}

/// Name phonetic blocking
#[async_trait]
pub trait PhoneticBlockService: Send + Sync {
    async fn phonetic_blocks(
        &self,
        request: &PhoneticBlockRequest,
    ) -> Result<PhoneticBlockResult, ServiceError>;
}

/// Publication coreness prediction
#[async_trait]
pub trait CorenessPredictorService: Send + Sync {
    async fn coreness(&self, publication: &Publication) -> Result<PredictionResult, ServiceError>;
}
