//! Scan command implementation
//!
//! Each line read from stdin is one scanned barcode. Submissions run on
//! background tasks so a slow lookup never holds up the next scan.

use super::{flush_notices, print_notice, Session};
use anyhow::{Context, Result};
use citecam_core::{CiteCamError, Isbn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

pub async fn scan(session: &Session) -> Result<()> {
    let mut rx = session.pipeline.subscribe();

    let report = super::drain::run_drain(session).await;
    flush_notices(&mut rx);
    if report.remaining > 0 {
        println!("{} ISBNs still waiting for a connection", report.remaining);
    }

    println!("Ready to scan, one ISBN per line (Ctrl-D to finish)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = Vec::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }

                if let Err(e) = Isbn::parse(raw) {
                    eprintln!("Invalid ISBN '{}': {}", raw, e);
                    continue;
                }

                tasks.push(session.pipeline.spawn_submit(raw));
            }
            notice = rx.recv() => match notice {
                Ok(notice) => print_notice(&notice),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "dropped notices");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    let mut failed = 0;
    for task in tasks {
        match task.await {
            Ok(Ok(_)) => {}
            Ok(Err(CiteCamError::InvalidIdentifier(_))) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, "submission failed");
                failed += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "submission task panicked");
                failed += 1;
            }
        }
    }
    flush_notices(&mut rx);

    if failed > 0 {
        anyhow::bail!("{} submissions failed", failed);
    }

    Ok(())
}
