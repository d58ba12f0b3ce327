use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{EtlError, Result};
use crate::types::{CleanedDataset, CleanedRecord, LabelValuePolicy, MergedRecord};

/// Ordered label names for one dataset, fixed by the first row's packed
/// category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSchema {
    pub names: Vec<String>,
}

impl LabelSchema {
    /// Derive label names from a packed string. Each `;`-separated segment
    /// carries its value after the last `-`, so the name is everything
    /// before it.
    pub fn from_packed(packed: &str) -> Result<Self> {
        let mut names = Vec::new();
        for segment in packed.split(';') {
            let (name, _) = segment.rsplit_once('-').ok_or_else(|| EtlError::LabelFormat {
                row: 0,
                segment: segment.to_string(),
            })?;
            names.push(name.to_string());
        }
        Ok(Self { names })
    }

    /// Decode one row's packed string against this schema. The segment
    /// count must match the schema arity; values outside {0, 1} go through
    /// the given policy.
    fn decode_row(&self, row: usize, packed: &str, policy: LabelValuePolicy) -> Result<Vec<u8>> {
        let segments: Vec<&str> = packed.split(';').collect();
        if segments.len() != self.names.len() {
            return Err(EtlError::LabelArity {
                row,
                expected: self.names.len(),
                found: segments.len(),
            });
        }

        let mut values = Vec::with_capacity(segments.len());
        for (segment, name) in segments.iter().zip(&self.names) {
            let (_, digits) = segment.rsplit_once('-').ok_or_else(|| EtlError::LabelFormat {
                row,
                segment: segment.to_string(),
            })?;
            let value: i64 = digits.parse().map_err(|_| EtlError::LabelFormat {
                row,
                segment: segment.to_string(),
            })?;
            values.push(match value {
                0 => 0,
                1 => 1,
                other => match policy {
                    LabelValuePolicy::Clamp => 1,
                    LabelValuePolicy::Reject => {
                        return Err(EtlError::LabelValue {
                            row,
                            label: name.clone(),
                            value: other,
                        })
                    }
                },
            });
        }
        Ok(values)
    }
}

/// Decode every record's packed categories into binary label columns.
///
/// The schema comes from the first record; every later record must match
/// its arity or the run fails with a row-numbered error.
pub fn decode_labels(
    records: &[MergedRecord],
    policy: LabelValuePolicy,
) -> Result<CleanedDataset> {
    let first = records.first().ok_or(EtlError::EmptyDataset)?;
    let schema = LabelSchema::from_packed(&first.categories)?;

    let mut cleaned = Vec::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        let values = schema.decode_row(row, &record.categories, policy)?;
        cleaned.push(CleanedRecord {
            id: record.id.clone(),
            message: record.message.clone(),
            values,
        });
    }

    debug!(labels = schema.names.len(), rows = cleaned.len(), "Decoded category labels");
    Ok(CleanedDataset {
        labels: schema.names,
        records: cleaned,
    })
}

/// Drop label columns whose value is constant across every record. These
/// carry no signal for downstream models (in the disaster dataset this
/// removes `child_alone`, which never fires). Returns the dropped names.
pub fn drop_degenerate_labels(dataset: &mut CleanedDataset) -> Vec<String> {
    if dataset.records.is_empty() {
        return Vec::new();
    }

    let keep: Vec<bool> = (0..dataset.labels.len())
        .map(|i| {
            let first = dataset.records[0].values[i];
            dataset.records.iter().any(|r| r.values[i] != first)
        })
        .collect();

    let dropped: Vec<String> = dataset
        .labels
        .iter()
        .zip(&keep)
        .filter(|(_, kept)| !**kept)
        .map(|(name, _)| name.clone())
        .collect();
    if dropped.is_empty() {
        return dropped;
    }

    dataset.labels = dataset
        .labels
        .iter()
        .zip(&keep)
        .filter(|(_, kept)| **kept)
        .map(|(name, _)| name.clone())
        .collect();
    for record in &mut dataset.records {
        record.values = record
            .values
            .iter()
            .zip(&keep)
            .filter(|(_, kept)| **kept)
            .map(|(value, _)| *value)
            .collect();
    }

    info!(dropped = ?dropped, "Dropped constant label columns");
    dropped
}

/// Remove exact duplicates, keeping the first occurrence of each record.
/// Returns how many rows were removed.
pub fn dedup_records(dataset: &mut CleanedDataset) -> usize {
    let before = dataset.records.len();
    let mut seen = HashSet::new();
    dataset.records.retain(|record| seen.insert(record.clone()));
    before - dataset.records.len()
}
