//! Wire types for the three Beard analysis services
//!
//! Field order follows the JSON the server documents so that pretty-printed
//! samples read the same as the server's own examples.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// One claimed authorship instance tied to a publication
///
/// Typed shape of the sample signatures. Submitted signatures are sent as
/// the operator wrote them; see [`ClusteringRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub author_affiliation: String,
    pub author_name: String,
    /// References [`Record::publication_id`] in the same request
    pub publication_id: i64,
    /// Unique within a submission
    pub signature_id: String,
}

/// Publication record the signatures point to
///
/// Typed shape of the sample records. The server also reads optional keys
/// such as `abstract`, `keywords` or `journal`, which pass through
/// [`ClusteringRequest`] untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub year: i32,
    /// Unique within a submission
    pub publication_id: i64,
    /// Author names in byline order
    pub authors: Vec<String>,
}

/// Body of `POST /api/clustering/clusters`
///
/// Both lists hold the operator's JSON objects verbatim: every key is
/// forwarded and none is required. Signature to record references are not
/// checked client side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteringRequest {
    pub signatures: Vec<Value>,
    pub records: Vec<Value>,
}

/// One cluster: a group of signatures attributed to the same person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub label: String,
    /// Signature ids in the order the service returned them
    pub signature_ids: Vec<String>,
}

/// Response of the clustering service, ordered for display
///
/// Labels that are non-negative integers come first in numeric order,
/// followed by any other labels in string order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "HashMap<String, Vec<String>>")]
pub struct ClusteringResult {
    pub clusters: Vec<Cluster>,
}

impl From<HashMap<String, Vec<String>>> for ClusteringResult {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        let mut clusters: Vec<Cluster> = map
            .into_iter()
            .map(|(label, signature_ids)| Cluster {
                label,
                signature_ids,
            })
            .collect();

        clusters.sort_by(|a, b| label_sort_key(&a.label).cmp(&label_sort_key(&b.label)));

        Self { clusters }
    }
}

fn label_sort_key(label: &str) -> (u8, u64, &str) {
    match label.parse::<u64>() {
        // "01" is not an index-like key
        Ok(n) if n.to_string() == label => (0, n, ""),
        _ => (1, 0, label),
    }
}

impl ClusteringResult {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Body of `POST /api/text/phonetic_blocks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticBlockRequest {
    pub full_names: Vec<String>,
}

impl PhoneticBlockRequest {
    /// The console always submits exactly one name
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            full_names: vec![name.into()],
        }
    }
}

/// Response of the phonetic block service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhoneticBlockResult {
    /// Full name to phonetic block code
    pub phonetic_blocks: HashMap<String, String>,
}

/// Body of `POST /api/predictor/coreness`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub categories: Vec<String>,
}

/// Coreness decision label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    /// `"CORE"`
    Core,
    /// `"Non-CORE"`
    NonCore,
    /// Any other label the predictor may return
    Other(String),
}

impl From<String> for Decision {
    fn from(label: String) -> Self {
        match label.as_str() {
            "CORE" => Decision::Core,
            "Non-CORE" => Decision::NonCore,
            _ => Decision::Other(label),
        }
    }
}

impl From<Decision> for String {
    fn from(decision: Decision) -> Self {
        decision.to_string()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Core => f.write_str("CORE"),
            Decision::NonCore => f.write_str("Non-CORE"),
            Decision::Other(label) => f.write_str(label),
        }
    }
}

/// Response of the coreness predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub decision: Decision,
    /// Per-class scores; older servers omit them
    #[serde(default)]
    pub scores: Vec<f64>,
}

/// Split the category display string into the submitted list
///
/// `"astro-ph, hep-ph"` becomes `["astro-ph", "hep-ph"]`. Only the exact
/// `", "` separator splits.
pub fn split_categories(category: &str) -> Vec<String> {
    category.split(", ").map(str::to_string).collect()
}
