//! Drain command implementation

use super::{flush_notices, Session};
use anyhow::Result;
use citecam_core::DrainReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Retry every queued identifier and print what happened
pub async fn drain(session: &Session) -> Result<()> {
    let mut rx = session.pipeline.subscribe();
    let report = run_drain(session).await;
    flush_notices(&mut rx);
    print_report(&report);
    Ok(())
}

/// One drain pass behind a spinner; nothing is shown when the queue is empty
pub(super) async fn run_drain(session: &Session) -> DrainReport {
    let queued = session.pipeline.pending().await.len();
    if queued == 0 {
        return DrainReport::default();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Translating {} stored ISBNs", queued));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report = session.pipeline.drain_pending().await;

    spinner.finish_and_clear();
    report
}

fn print_report(report: &DrainReport) {
    if report.settled() == 0 && report.remaining == 0 {
        println!("No stored ISBNs to translate");
        return;
    }

    println!("Drain complete:");
    println!("  Resolved:  {}", report.resolved.len());
    println!("  Rejected:  {}", report.rejected.len());
    println!("  Remaining: {}", report.remaining);
    if report.stopped_offline {
        println!("Still offline, remaining ISBNs stay queued");
    }
}
