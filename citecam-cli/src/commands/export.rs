//! Export command implementation

use super::{print_notice, Session};
use anyhow::{bail, Context, Result};
use citecam_core::{render_digest, ExportFormat, MailDraft};
use std::path::Path;

/// Render every citation as a digest, or as a mail draft with `mail`
pub async fn export(
    session: &Session,
    format: ExportFormat,
    output: Option<&Path>,
    mail: bool,
) -> Result<()> {
    let citations = session.pipeline.citations().await;

    let document = if mail {
        let recipient = session.config.mail_recipient.as_deref();
        let draft = match MailDraft::for_citations(recipient, &citations, format) {
            Ok(draft) => draft,
            Err(notice) => {
                print_notice(&notice);
                bail!("{}", notice.title);
            }
        };
        serde_json::to_string_pretty(&draft)?
    } else {
        render_digest(&citations, format)
    };

    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            tracing::info!(count = citations.len(), path = %path.display(), %format, "exported citations");
            println!("Exported {} citations to {}", citations.len(), path.display());
        }
        None => print!("{}", document),
    }

    Ok(())
}
