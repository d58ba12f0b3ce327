/// File and column name constants shared across the pipeline stages.
/// The input files and the store live under the raw data directory.

// Fixed input/output file names under <root>/data/raw
pub const MESSAGES_FILE: &str = "disaster_messages.csv";
pub const CATEGORIES_FILE: &str = "disaster_categories.csv";
pub const DATABASE_FILE: &str = "sqlite";

// Column names the loader requires
pub const ID_COLUMN: &str = "id";
pub const MESSAGE_COLUMN: &str = "message";
pub const CATEGORIES_COLUMN: &str = "categories";

/// Environment variable overriding the project data root.
pub const ROOT_ENV_VAR: &str = "DISASTER_ETL_ROOT";
