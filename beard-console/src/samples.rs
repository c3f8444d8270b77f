//! Sample inputs for each workflow
//!
//! The same data the Beard server documents in its method listings, so an
//! operator can exercise every service without preparing input.

use crate::models::{Record, Signature};

pub const SAMPLE_FULL_NAME: &str = "John Smith";

pub const SAMPLE_PUBLICATION_TITLE: &str =
    "Discovery of a Long-Lived, High Amplitude Dusty Infrared Transient";

pub const SAMPLE_PUBLICATION_CATEGORY: &str = "astro-ph";

pub const SAMPLE_PUBLICATION_ABSTRACT: &str = "We report the detection \
of an infrared selected transient which has lasted at least 5 years, first \
identified by a large mid-infrared and optical outburst from a faint X-ray \
source detected with the Chandra X-ray Observatory. In this paper we rule out \
several scenarios for the cause of this outburst, including a classical nova, \
a luminous red nova, AGN flaring, a stellar merger, and intermediate \
luminosity optical transients, and interpret this transient as the result of \
a Young Stellar Object (YSO) of at least solar mass accreting material from \
the remains of the dusty envelope from which it formed, in isolation from \
either a dense complex of cold gas or massive star formation. This object \
does not fit neatly into other existing categories of large outbursts of YSOs \
(FU Orionis types) which may be a result of the object's mass, age, and \
environment. It is also possible that this object is a new type of transient \
unrelated to YSOs.";

/// Three signatures over two publications
pub fn sample_signatures() -> Vec<Signature> {
    vec![
        Signature {
            author_affiliation: "Taiwan, Natl. Chiao Tung U.".to_string(),
            author_name: "Wang, Shang-Yung".to_string(),
            publication_id: 1395222,
            signature_id: "Wang_1395222".to_string(),
        },
        Signature {
            author_affiliation: "Taiwan, Natl. Chiao Tung U.".to_string(),
            author_name: "Wang, Shang-Yung".to_string(),
            publication_id: 428605,
            signature_id: "Wang_428605".to_string(),
        },
        Signature {
            author_affiliation: "Taiwan, Natl. Chiao Tung U.".to_string(),
            author_name: "Lin, Shih-Yuin".to_string(),
            publication_id: 428605,
            signature_id: "Lin_428605".to_string(),
        },
    ]
}

/// The two publications the sample signatures reference
pub fn sample_records() -> Vec<Record> {
    vec![
        Record {
            title: "Towards graphene-based detectors for dark matter directional detection"
                .to_string(),
            year: 2015,
            publication_id: 1395222,
            authors: vec!["Wang, Shang-Yung".to_string()],
        },
        Record {
            title: "Induced Einstein-Kalb-Ramond theory and the black hole".to_string(),
            year: 1996,
            publication_id: 428605,
            authors: vec![
                "Kao, W.F.".to_string(),
                "Chyi, Tzuu-Kang".to_string(),
                "Dai, W.B.".to_string(),
                "Wang, Shang-Yung".to_string(),
                "Lin, Shih-Yuun".to_string(),
            ],
        },
    ]
}

/// Sample signatures as the pretty-printed text an operator would edit
pub fn sample_signatures_text() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&sample_signatures())
}

/// Sample records as the pretty-printed text an operator would edit
pub fn sample_records_text() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&sample_records())
}
