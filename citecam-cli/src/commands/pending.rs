//! Pending command implementation

use super::Session;
use anyhow::Result;

/// Print the identifiers waiting for a connection, oldest first
pub async fn pending(session: &Session, json: bool) -> Result<()> {
    let pending = session.pipeline.pending().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("No ISBNs waiting");
        return Ok(());
    }

    for entry in &pending {
        println!("{}  queued {}", entry.isbn, entry.queued_at.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}
