//! Intake CLI
//!
//! Drives one instance of the site's intake form from a terminal. Each
//! invocation behaves like a page load: the saved draft is restored, the
//! command acts on the form, and the draft is kept for the next run.
//!
//! # Usage
//!
//! ```bash
//! intake fill name "Jane Doe"
//! intake fill email jane@example.com
//! intake validate
//! intake submit --field company=Acme
//! intake products --format yaml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod output;

/// Log filter when `RUST_LOG` is unset; stdout is reserved for command output
const DEFAULT_LOG_FILTER: &str = "warn";

fn log_filter(rust_log: Option<String>) -> EnvFilter {
    EnvFilter::new(rust_log.unwrap_or_else(|| DEFAULT_LOG_FILTER.into()))
}

#[derive(Parser)]
#[command(name = "intake")]
#[command(version)]
#[command(about = "Fill and submit the site's intake form", long_about = None)]
struct Cli {
    /// Site origin
    #[arg(long, env = "INTAKE_SERVER_URL")]
    server: Option<String>,

    /// Client configuration file (JSON)
    #[arg(long, env = "INTAKE_CLIENT_CONFIG")]
    config: Option<PathBuf>,

    /// Form schema file (JSON); defaults to the built-in intake form
    #[arg(long, env = "INTAKE_SCHEMA")]
    schema: Option<PathBuf>,

    /// Session storage file holding the draft
    #[arg(long, env = "INTAKE_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "json")]
    format: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type a value into a field
    Fill { name: String, value: String },
    /// Show fields, error flags and counters
    Show,
    /// Run the submit-time validation without sending
    Validate,
    /// Submit the form
    Submit {
        /// Extra `name=value` input before submitting
        #[arg(long = "field", short = 'F', value_parser = commands::parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Discard the saved draft
    Clear,
    /// Print the product catalog
    Products,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(log_filter(std::env::var("RUST_LOG").ok()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = config::Settings::resolve(
        cli.config.as_deref(),
        cli.server,
        cli.schema.as_deref(),
        cli.state_file,
    )?;

    match cli.command {
        Commands::Fill { name, value } => commands::fill(&settings, &name, &value, cli.format),
        Commands::Show => commands::show(&settings, cli.format),
        Commands::Validate => commands::validate(&settings, cli.format),
        Commands::Submit { fields } => commands::submit(&settings, fields, cli.format).await,
        Commands::Clear => commands::clear(&settings),
        Commands::Products => commands::products(&settings, cli.format).await,
    }
}
