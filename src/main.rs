use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

use disaster_etl::config::{DataPaths, EtlConfig};
use disaster_etl::logging;
use disaster_etl::pipeline::run_pipeline;
use disaster_etl::storage::{DatasetStore, SqliteStore};
use disaster_etl::types::LabelValuePolicy;

#[derive(Parser)]
#[command(name = "disaster_etl")]
#[command(about = "Disaster response message ETL pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Project root holding data/ and models/ (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ETL pipeline: load, clean, and persist the dataset
    Process {
        /// Override the messages CSV path
        #[arg(long)]
        messages: Option<PathBuf>,
        /// Override the categories CSV path
        #[arg(long)]
        categories: Option<PathBuf>,
        /// Override the output store path
        #[arg(long)]
        database: Option<PathBuf>,
        /// Fail on label values outside 0/1 instead of clamping them to 1
        #[arg(long)]
        reject_out_of_range: bool,
    },
    /// Read the persisted dataset back and report its shape
    Fetch {
        /// Override the store path
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = EtlConfig::load_or_default("config.toml")?;
    let root = config.resolve_root(cli.root.clone());
    let paths = DataPaths::from_root(&root);

    match cli.command {
        Commands::Process {
            messages,
            categories,
            database,
            reject_out_of_range,
        } => {
            let messages = messages.unwrap_or_else(|| paths.messages_csv());
            let categories = categories.unwrap_or_else(|| paths.categories_csv());
            let database = database.unwrap_or_else(|| paths.database());
            let policy = if reject_out_of_range {
                LabelValuePolicy::Reject
            } else {
                config.cleaning.label_value_policy
            };

            println!("🔄 Running ETL pipeline...");
            println!("   Messages:   {}", messages.display());
            println!("   Categories: {}", categories.display());
            println!("   Database:   {}", database.display());

            let store = SqliteStore::new(&database);
            match run_pipeline(&messages, &categories, policy, &store) {
                Ok(result) => {
                    println!("\n📊 Pipeline results:");
                    println!("   Merged rows:        {}", result.merged_rows);
                    println!("   Cleaned rows:       {}", result.cleaned_rows);
                    println!("   Duplicates removed: {}", result.duplicates_removed);
                    println!("   Labels kept:        {}", result.labels.len());
                    if !result.dropped_labels.is_empty() {
                        println!(
                            "   Dropped constant labels: {}",
                            result.dropped_labels.join(", ")
                        );
                    }
                    println!("\n✅ Cleaned data saved to database");
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Fetch { database } => {
            let database = database.unwrap_or_else(|| paths.database());
            let store = SqliteStore::new(&database);
            let dataset = store.fetch()?;

            println!(
                "📥 Fetched table '{}' from {}",
                store.table_name()?,
                database.display()
            );
            println!("   Rows:   {}", dataset.records.len());
            println!("   Labels: {}", dataset.labels.join(", "));
        }
    }
    Ok(())
}
