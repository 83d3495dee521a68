//! # deepwatch CLI
//!
//! Command-line interface for instrumenting reads of JSON/YAML documents.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deepwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "deepwatch.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read paths of a document through a monitored view and report access
    Watch {
        /// Source document (.json, .yaml or .yml)
        file: PathBuf,

        /// Path to read, e.g. `bar[0].zoo.cat` (repeatable)
        #[arg(long = "read", short = 'r')]
        reads: Vec<String>,

        /// Print the monitor as JSON
        #[arg(long, conflicts_with = "untouched")]
        json: bool,

        /// Only list leaves that were never read
        #[arg(long)]
        untouched: bool,
    },

    /// Read one path through an intercepted view and print it as JSON
    View {
        /// Source document (.json, .yaml or .yml)
        file: PathBuf,

        /// Path to read
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Watch {
            file,
            reads,
            json,
            untouched,
        } => {
            let opts = commands::WatchOptions {
                reads,
                json,
                untouched,
            };
            commands::watch_document(&cli.config, &file, opts)
        }
        Commands::View { file, path } => commands::view_path(&file, &path),
    }
}
