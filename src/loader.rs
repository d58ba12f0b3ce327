use std::collections::HashMap;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::constants::{CATEGORIES_COLUMN, ID_COLUMN, MESSAGE_COLUMN};
use crate::error::{EtlError, Result};
use crate::types::MergedRecord;

/// A delimited file read into memory with every field kept as text.
#[derive(Debug)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a CSV file, trusting the header row and applying no type
    /// inference.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path.as_ref())?;
        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Index of a named column, or an error naming the column and file.
    fn column(&self, name: &str, file: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| EtlError::MissingColumn {
                column: name.to_string(),
                file: file.to_string(),
            })
    }
}

/// Read the messages and categories files and inner-join them on `id`.
///
/// Ids present in only one file are dropped. Duplicate ids join pairwise,
/// matching relational inner-join semantics; the cleaner's dedup collapses
/// the resulting copies.
pub fn load_and_merge(
    messages_path: impl AsRef<Path>,
    categories_path: impl AsRef<Path>,
) -> Result<Vec<MergedRecord>> {
    let messages = RawTable::read(&messages_path)?;
    let categories = RawTable::read(&categories_path)?;

    let msg_id = messages.column(ID_COLUMN, "messages")?;
    let msg_text = messages.column(MESSAGE_COLUMN, "messages")?;
    let cat_id = categories.column(ID_COLUMN, "categories")?;
    let cat_packed = categories.column(CATEGORIES_COLUMN, "categories")?;

    let mut by_id: HashMap<&str, Vec<&str>> = HashMap::new();
    for row in &categories.rows {
        by_id
            .entry(row[cat_id].as_str())
            .or_default()
            .push(row[cat_packed].as_str());
    }

    let mut merged = Vec::new();
    for row in &messages.rows {
        if let Some(packed_list) = by_id.get(row[msg_id].as_str()) {
            for packed in packed_list {
                merged.push(MergedRecord {
                    id: row[msg_id].clone(),
                    message: row[msg_text].clone(),
                    categories: (*packed).to_string(),
                });
            }
        }
    }

    debug!(
        messages = messages.rows.len(),
        categories = categories.rows.len(),
        merged = merged.len(),
        "Merged input tables"
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn inner_join_drops_unmatched_ids() {
        let dir = tempdir().unwrap();
        let messages = write_file(
            dir.path(),
            "messages.csv",
            "id,message,original\n1,need water,bezwen dlo\n2,storm coming,\n3,all clear,\n",
        );
        let categories = write_file(
            dir.path(),
            "categories.csv",
            "id,categories\n1,related-1;request-1\n3,related-0;request-0\n9,related-1;request-0\n",
        );

        let merged = load_and_merge(&messages, &categories).unwrap();
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(merged[0].message, "need water");
        assert_eq!(merged[0].categories, "related-1;request-1");
    }

    #[test]
    fn duplicate_ids_join_pairwise() {
        let dir = tempdir().unwrap();
        let messages = write_file(
            dir.path(),
            "messages.csv",
            "id,message,original\n1,need water,\n1,need water,\n",
        );
        let categories = write_file(
            dir.path(),
            "categories.csv",
            "id,categories\n1,related-1\n1,related-1\n",
        );

        let merged = load_and_merge(&messages, &categories).unwrap();
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn missing_key_column_is_a_named_error() {
        let dir = tempdir().unwrap();
        let messages = write_file(dir.path(), "messages.csv", "id,text\n1,need water\n");
        let categories = write_file(dir.path(), "categories.csv", "id,categories\n1,related-1\n");

        let err = load_and_merge(&messages, &categories).unwrap_err();
        match err {
            EtlError::MissingColumn { column, file } => {
                assert_eq!(column, "message");
                assert_eq!(file, "messages");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
