use std::path::Path;

use tracing::info;

use crate::cleaner::{decode_labels, dedup_records, drop_degenerate_labels};
use crate::error::Result;
use crate::loader::load_and_merge;
use crate::storage::DatasetStore;
use crate::types::LabelValuePolicy;

/// Summary of one pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    pub merged_rows: usize,
    pub cleaned_rows: usize,
    pub duplicates_removed: usize,
    pub labels: Vec<String>,
    pub dropped_labels: Vec<String>,
}

/// Run the full load → clean → persist pass over one set of input files.
///
/// The store is only written after cleaning succeeds, so a failed run
/// leaves any previously persisted table untouched.
pub fn run_pipeline(
    messages_path: impl AsRef<Path>,
    categories_path: impl AsRef<Path>,
    policy: LabelValuePolicy,
    store: &dyn DatasetStore,
) -> Result<PipelineResult> {
    let span = tracing::info_span!("pipeline");
    let _enter = span.enter();

    info!(
        messages = %messages_path.as_ref().display(),
        categories = %categories_path.as_ref().display(),
        "Loading data"
    );
    let merged = load_and_merge(&messages_path, &categories_path)?;
    let merged_rows = merged.len();

    info!("Cleaning data");
    let mut dataset = decode_labels(&merged, policy)?;
    let dropped_labels = drop_degenerate_labels(&mut dataset);
    let duplicates_removed = dedup_records(&mut dataset);

    info!("Saving data");
    store.save(&dataset)?;

    Ok(PipelineResult {
        merged_rows,
        cleaned_rows: dataset.records.len(),
        duplicates_removed,
        labels: dataset.labels,
        dropped_labels,
    })
}
