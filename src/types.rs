use serde::{Deserialize, Serialize};

/// One message joined with its packed category string, as loaded from the
/// two input files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRecord {
    pub id: String,
    pub message: String,
    pub categories: String,
}

/// One message with its decoded 0/1 label values. The value order matches
/// the owning dataset's label list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub id: String,
    pub message: String,
    pub values: Vec<u8>,
}

/// The cleaned dataset: label names plus one record per surviving row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedDataset {
    pub labels: Vec<String>,
    pub records: Vec<CleanedRecord>,
}

/// Policy for decoded label values outside {0, 1}.
///
/// The upstream data occasionally carries other integers (e.g. `related-2`);
/// clamping them to 1 matches the source system's behavior. Flip to `Reject`
/// per dataset once a product owner confirms which is wanted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelValuePolicy {
    /// Rewrite any out-of-range value to 1.
    #[default]
    Clamp,
    /// Fail the run on the first out-of-range value.
    Reject,
}
