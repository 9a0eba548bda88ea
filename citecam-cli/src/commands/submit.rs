//! Submit command implementation

use super::{flush_notices, Session};
use anyhow::{bail, Result};
use citecam_core::{CiteCamError, Resolution};

/// Resolve each identifier in turn, printing the notices it produces
pub async fn submit(session: &Session, isbns: &[String]) -> Result<()> {
    let mut rx = session.pipeline.subscribe();
    let mut invalid = 0;

    for raw in isbns {
        match session.pipeline.submit(raw).await {
            Ok(resolution) => {
                tracing::debug!(isbn = %raw, ?resolution, "submitted");
                if let Resolution::AlreadyResolving = resolution {
                    println!("{} is already being resolved", raw);
                }
            }
            Err(CiteCamError::InvalidIdentifier(e)) => {
                eprintln!("Invalid ISBN '{}': {}", raw, e);
                invalid += 1;
            }
            Err(e) => return Err(e.into()),
        }
        flush_notices(&mut rx);
    }

    if invalid > 0 {
        bail!("{} of {} identifiers were invalid", invalid, isbns.len());
    }

    Ok(())
}
