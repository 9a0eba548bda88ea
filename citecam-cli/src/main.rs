//! CiteCam CLI - turn scanned ISBNs into citations, online or not

mod commands;

use anyhow::Result;
use citecam_core::{Config, ExportFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate the lookup timeout (whole seconds, at least 1)
fn parse_timeout(s: &str) -> Result<Duration, String> {
    citecam_core::config::parse_timeout(s).map_err(|e| e.to_string())
}

#[derive(Parser)]
#[command(name = "citecam")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the citation and pending lists
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Volumes endpoint used for lookups
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Lookup timeout in seconds
    #[arg(long, global = true, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate citations for one or more ISBNs
    Submit {
        /// ISBN-13 identifiers
        #[arg(required = true)]
        isbns: Vec<String>,
    },

    /// Translate stored ISBNs, then read ISBNs from stdin one per line
    Scan,

    /// Retry ISBNs stored while offline
    Drain,

    /// List saved citations
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List ISBNs waiting for a connection
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a citation by hand
    Add {
        /// Citation text
        text: String,

        /// Photo to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Edit the text or photo of a citation
    Edit {
        /// Position shown by `list`
        index: usize,

        /// Replacement text
        #[arg(long)]
        text: Option<String>,

        /// Replacement photo
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete a citation
    Remove {
        /// Position shown by `list`
        index: usize,
    },

    /// Export every citation
    Export {
        /// Output format (html, text)
        #[arg(short, long, default_value = "html")]
        format: ExportFormat,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Produce a mail draft addressed to CITECAM_MAIL_TO
        #[arg(long)]
        mail: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "citecam_cli=debug,citecam_core=debug"
    } else {
        "citecam_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(endpoint) = cli.endpoint {
        config.lookup_endpoint = endpoint;
    }
    if let Some(timeout) = cli.timeout {
        config.lookup_timeout = timeout;
    }

    let session = commands::Session::open(config).await?;

    match cli.command {
        Commands::Submit { isbns } => commands::submit(&session, &isbns).await,

        Commands::Scan => commands::scan(&session).await,

        Commands::Drain => commands::drain(&session).await,

        Commands::List { json } => commands::list(&session, json).await,

        Commands::Pending { json } => commands::pending(&session, json).await,

        Commands::Add { text, image } => commands::add(&session, &text, image.as_deref()).await,

        Commands::Edit { index, text, image } => {
            commands::edit(&session, index, text.as_deref(), image.as_deref()).await
        }

        Commands::Remove { index } => commands::remove(&session, index).await,

        Commands::Export {
            format,
            output,
            mail,
        } => commands::export(&session, format, output.as_deref(), mail).await,
    }
}
