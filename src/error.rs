use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column '{column}' in the {file} file")]
    MissingColumn { column: String, file: String },

    #[error("Input contains no rows")]
    EmptyDataset,

    #[error("Row {row}: expected {expected} category segments, found {found}")]
    LabelArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: malformed category segment '{segment}'")]
    LabelFormat { row: usize, segment: String },

    #[error("Row {row}: label '{label}' has out-of-range value {value}")]
    LabelValue {
        row: usize,
        label: String,
        value: i64,
    },
}

pub type Result<T> = std::result::Result<T, EtlError>;
