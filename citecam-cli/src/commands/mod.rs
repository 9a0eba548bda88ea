//! CLI command implementations

mod citations;
mod drain;
mod export;
mod pending;
mod scan;
mod submit;

pub use citations::{add, edit, list, remove};
pub use drain::drain;
pub use export::export;
pub use pending::pending;
pub use scan::scan;
pub use submit::submit;

use anyhow::{Context, Result};
use citecam_core::{Config, GoogleBooksClient, LocalStorage, Notice, ResolutionPipeline};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Everything a command needs: configuration and a pipeline over the data directory
pub struct Session {
    pub config: Config,
    pub pipeline: Arc<ResolutionPipeline>,
}

impl Session {
    pub async fn open(config: Config) -> Result<Self> {
        let lookup = GoogleBooksClient::from_config(&config)?;
        let storage = LocalStorage::new(config.data_dir.clone());

        let pipeline = ResolutionPipeline::open(Arc::new(lookup), Arc::new(storage))
            .await
            .with_context(|| format!("Failed to load data from {}", config.data_dir.display()))?
            .with_lookup_timeout(config.resolution_timeout());

        tracing::debug!(
            data_dir = %config.data_dir.display(),
            endpoint = %config.lookup_endpoint,
            "session opened"
        );

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
        })
    }
}

/// Errors go to stderr, everything else to stdout
fn print_notice(notice: &Notice) {
    if notice.kind.is_error() {
        eprintln!("{} {}", notice.title, notice.message);
    } else {
        println!("{} {}", notice.title, notice.message);
    }
}

/// Print every notice already delivered to `rx`
fn flush_notices(rx: &mut broadcast::Receiver<Notice>) {
    loop {
        match rx.try_recv() {
            Ok(notice) => print_notice(&notice),
            Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                tracing::warn!(missed, "dropped notices");
            }
            Err(_) => break,
        }
    }
}
