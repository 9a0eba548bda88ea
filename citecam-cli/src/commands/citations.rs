//! Citation list commands: list, add, edit, remove

use super::Session;
use anyhow::{bail, Context, Result};
use citecam_core::Citation;
use serde::Serialize;
use std::path::Path;

/// Citation as printed by `list --json`
#[derive(Serialize)]
struct CitationInfo<'a> {
    index: usize,
    id: String,
    text: &'a str,
    isbn: Option<String>,
    created_at: String,
    image_bytes: usize,
}

/// Print every saved citation
pub async fn list(session: &Session, json: bool) -> Result<()> {
    let citations = session.pipeline.citations().await;

    if json {
        let infos: Vec<CitationInfo> = citations
            .iter()
            .enumerate()
            .map(|(index, c)| CitationInfo {
                index,
                id: c.id().to_string(),
                text: c.display_text(),
                isbn: c.isbn().map(|i| i.to_string()),
                created_at: c.created_at().to_rfc3339(),
                image_bytes: c.image().map_or(0, <[u8]>::len),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    if citations.is_empty() {
        println!("No citations yet");
        return Ok(());
    }

    for (index, citation) in citations.iter().enumerate() {
        println!("[{}] {}", index, citation.display_text());
    }

    Ok(())
}

/// Add a citation typed in by the user
pub async fn add(session: &Session, text: &str, image: Option<&Path>) -> Result<()> {
    let image = image.map(read_image).transpose()?;
    let citation = Citation::new(text, image)?;

    let index = session
        .pipeline
        .add_citation(citation)
        .await
        .context("Failed to save citation")?;

    println!("Added citation [{}]", index);
    Ok(())
}

/// Change the text and/or photo of an existing citation
pub async fn edit(
    session: &Session,
    index: usize,
    text: Option<&str>,
    image: Option<&Path>,
) -> Result<()> {
    if text.is_none() && image.is_none() {
        bail!("Nothing to edit: pass --text and/or --image");
    }

    let image = image.map(read_image).transpose()?;

    session
        .pipeline
        .edit_citation(index, |citation| {
            if let Some(text) = text {
                citation.set_display_text(text)?;
            }
            if let Some(image) = image {
                citation.set_image(Some(image));
            }
            Ok(())
        })
        .await
        .with_context(|| format!("Failed to edit citation [{}]", index))?;

    tracing::info!(index, "citation updated");
    println!("Updated citation [{}]", index);
    Ok(())
}

/// Delete a citation
pub async fn remove(session: &Session, index: usize) -> Result<()> {
    let removed = session.pipeline.remove_citation(index).await?;
    println!("Removed: {}", removed.display_text());
    Ok(())
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read image: {}", path.display()))
}
