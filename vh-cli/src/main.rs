//! Vases d'Honneur CLI - inspect and exercise the church content store.
//!
//! Every invocation builds a freshly seeded in-memory store, runs one
//! command against it and prints the result. `script` applies a whole
//! session of operations in a single process.

mod commands;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use vh_core::config::{AppConfig, ConfigHandle};
use vh_core::constants::{APP_NAME, APP_VERSION};
use vh_core::error::VhResult;
use vh_core::logging;

/// Vases d'Honneur - content store for the church website.
#[derive(Parser)]
#[command(
    name = "vases",
    version,
    about = "Vases d'Honneur content store CLI",
    long_about = "A command-line interface over the Vases d'Honneur content store.\n\
                   Lists, filters and edits announcements, ministries, subscribers, events,\n\
                   sermons, gallery items and notifications."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List every record of a collection.
    List {
        /// Collection name (e.g. Announcement or announcements).
        collection: String,
        /// Sort field; prefix with '-' for descending.
        #[arg(short, long)]
        sort: Option<String>,
        /// Maximum number of records, applied after sorting.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// List records matching exact field values.
    Filter {
        /// Collection name.
        collection: String,
        /// Condition as field=value; repeat for AND. Values are parsed as JSON
        /// when possible (true, 3, null), otherwise taken as strings.
        #[arg(short, long = "where", value_name = "FIELD=VALUE", required = true)]
        conditions: Vec<String>,
        /// Sort field; prefix with '-' for descending.
        #[arg(short, long)]
        sort: Option<String>,
        /// Maximum number of records, applied after sorting.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Create a record from a JSON object.
    Create {
        /// Collection name.
        collection: String,
        /// Field values as a JSON object.
        #[arg(short, long)]
        json: String,
    },
    /// Merge fields into an existing record.
    Update {
        /// Collection name.
        collection: String,
        /// Record id.
        id: u64,
        /// Fields to overwrite, as a JSON object.
        #[arg(short, long)]
        json: String,
    },
    /// Delete a record.
    Delete {
        /// Collection name.
        collection: String,
        /// Record id.
        id: u64,
    },
    /// Show record counts and subscriber statistics.
    Stats {
        /// Reference day for the sign-up window (YYYY-MM-DD, default today).
        #[arg(long)]
        today: Option<String>,
    },
    /// Show the seed population.
    Seed {
        /// Only show this collection.
        collection: Option<String>,
    },
    /// Apply a JSON-lines file of operations to one store, in order.
    Script {
        /// Path to the script file ("-" for stdin).
        file: String,
        /// Stop at the first failing operation.
        #[arg(long)]
        stop_on_error: bool,
    },
}

#[tokio::main]
async fn main() -> VhResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from_file(std::path::Path::new(path))?,
        None => AppConfig::load_default()?,
    };

    // Initialize logging
    let level_override: Option<&str> = cli.verbose.then_some("debug");
    let _guard = match logging::init_from_config(&config, level_override) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_console_logging(level_override.unwrap_or(config.logging.level.as_str()));
            warn!("file logging unavailable, using console only: {e}");
            None
        }
    };

    let config_handle = ConfigHandle::new(config);

    info!("{} CLI v{}", APP_NAME, APP_VERSION);

    // Dispatch to command handlers
    match cli.command {
        Commands::List { collection, sort, limit } => {
            commands::records::list(config_handle, &collection, sort, limit, cli.format).await
        }
        Commands::Filter { collection, conditions, sort, limit } => {
            commands::records::filter(config_handle, &collection, &conditions, sort, limit, cli.format)
                .await
        }
        Commands::Create { collection, json } => {
            commands::records::create(config_handle, &collection, &json, cli.format).await
        }
        Commands::Update { collection, id, json } => {
            commands::records::update(config_handle, &collection, id, &json, cli.format).await
        }
        Commands::Delete { collection, id } => {
            commands::records::delete(config_handle, &collection, id, cli.format).await
        }
        Commands::Stats { today } => {
            commands::stats::run(config_handle, today, cli.format).await
        }
        Commands::Seed { collection } => {
            commands::seed::run(collection, cli.format)
        }
        Commands::Script { file, stop_on_error } => {
            commands::script::run(config_handle, &file, stop_on_error, cli.format).await
        }
    }
}
