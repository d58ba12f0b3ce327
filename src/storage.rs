use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{EtlError, Result};
use crate::types::{CleanedDataset, CleanedRecord};

/// Storage seam for the cleaned dataset.
pub trait DatasetStore {
    /// Persist the dataset, fully replacing any previous contents.
    fn save(&self, dataset: &CleanedDataset) -> Result<()>;

    /// Read the entire persisted dataset back.
    fn fetch(&self) -> Result<CleanedDataset>;
}

/// File-backed SQLite store. The table name is the store file's stem, so
/// `data/raw/sqlite` holds a table named `sqlite`.
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn table_name(&self) -> Result<String> {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                EtlError::Config(format!(
                    "Store path '{}' has no usable file name",
                    self.path.display()
                ))
            })
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Connection::open(&self.path)?)
    }
}

impl DatasetStore for SqliteStore {
    fn save(&self, dataset: &CleanedDataset) -> Result<()> {
        let table = self.table_name()?;
        let mut conn = self.open()?;

        let mut columns = vec![
            "id TEXT NOT NULL".to_string(),
            "message TEXT NOT NULL".to_string(),
        ];
        columns.extend(
            dataset
                .labels
                .iter()
                .map(|label| format!("\"{}\" INTEGER NOT NULL", label)),
        );
        let create = format!("CREATE TABLE \"{}\" ({})", table, columns.join(", "));

        let placeholders: Vec<String> = (1..=dataset.labels.len() + 2)
            .map(|i| format!("?{}", i))
            .collect();
        let insert = format!(
            "INSERT INTO \"{}\" VALUES ({})",
            table,
            placeholders.join(", ")
        );

        let tx = conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS \"{}\"", table), [])?;
        tx.execute(&create, [])?;
        {
            let mut stmt = tx.prepare(&insert)?;
            for record in &dataset.records {
                let mut row: Vec<rusqlite::types::Value> =
                    Vec::with_capacity(dataset.labels.len() + 2);
                row.push(record.id.clone().into());
                row.push(record.message.clone().into());
                for value in &record.values {
                    row.push(rusqlite::types::Value::Integer(i64::from(*value)));
                }
                stmt.execute(rusqlite::params_from_iter(row))?;
            }
        }
        tx.commit()?;

        info!(table = %table, rows = dataset.records.len(), "Persisted cleaned dataset");
        Ok(())
    }

    fn fetch(&self) -> Result<CleanedDataset> {
        let table = self.table_name()?;
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM \"{}\"", table))?;

        // Columns after id and message are the label columns
        let labels: Vec<String> = stmt
            .column_names()
            .iter()
            .skip(2)
            .map(|name| name.to_string())
            .collect();

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let message: String = row.get(1)?;
            let mut values = Vec::with_capacity(labels.len());
            for i in 0..labels.len() {
                let value: i64 = row.get(2 + i)?;
                values.push(value as u8);
            }
            records.push(CleanedRecord {
                id,
                message,
                values,
            });
        }

        debug!(table = %table, rows = records.len(), "Fetched dataset");
        Ok(CleanedDataset { labels, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_dataset() -> CleanedDataset {
        CleanedDataset {
            labels: vec!["related".to_string(), "request".to_string()],
            records: vec![
                CleanedRecord {
                    id: "1".to_string(),
                    message: "need water".to_string(),
                    values: vec![1, 0],
                },
                CleanedRecord {
                    id: "2".to_string(),
                    message: "storm coming".to_string(),
                    values: vec![0, 1],
                },
            ],
        }
    }

    #[test]
    fn table_name_comes_from_file_stem() {
        assert_eq!(
            SqliteStore::new("data/raw/sqlite").table_name().unwrap(),
            "sqlite"
        );
        assert_eq!(
            SqliteStore::new("out/cleaned.db").table_name().unwrap(),
            "cleaned"
        );
    }

    #[test]
    fn save_then_fetch_round_trips() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("sqlite"));
        let dataset = sample_dataset();
        store.save(&dataset).unwrap();
        assert_eq!(store.fetch().unwrap(), dataset);
    }

    #[test]
    fn save_replaces_any_previous_table() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("sqlite"));
        store.save(&sample_dataset()).unwrap();

        let smaller = CleanedDataset {
            labels: vec!["related".to_string()],
            records: vec![CleanedRecord {
                id: "9".to_string(),
                message: "fire reported".to_string(),
                values: vec![1],
            }],
        };
        store.save(&smaller).unwrap();
        assert_eq!(store.fetch().unwrap(), smaller);
    }
}
