//! Output writing.
//!
//! Mirrors the result surface onto disk: content JSON files, one HTML
//! file per table, and the raw image payloads, each gated by the
//! corresponding `save_*` config flag.

use doxtract_core::{ProcessedDocument, ProcessingConfig, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Write the configured outputs for one processed document.
///
/// # Errors
/// Returns an error when a directory or file cannot be written.
pub fn save_outputs(
    doc: &ProcessedDocument,
    output_dir: &Path,
    config: &ProcessingConfig,
) -> Result<()> {
    fs::create_dir_all(output_dir)?;

    if config.save_content {
        fs::write(
            output_dir.join("content.json"),
            serde_json::to_string_pretty(&doc.content())?,
        )?;
        fs::write(
            output_dir.join("content_without_children.json"),
            serde_json::to_string_pretty(&doc.content_without_children())?,
        )?;
        if config.extract_toc {
            fs::write(
                output_dir.join("toc.json"),
                serde_json::to_string_pretty(&doc.toc)?,
            )?;
        }
    }

    if config.save_tables && !doc.tables.is_empty() {
        let tables_dir = output_dir.join("tables");
        fs::create_dir_all(&tables_dir)?;
        for (index, table) in doc.tables.iter().enumerate() {
            let filename = format!("table_{}.html", index + 1);
            fs::write(tables_dir.join(filename), &table.html)?;
        }
    }

    if config.save_images && !doc.images.is_empty() {
        let images_dir = output_dir.join("images");
        fs::create_dir_all(&images_dir)?;
        for image in &doc.images {
            fs::write(images_dir.join(&image.filename), &image.data)?;
        }
    }

    info!(
        "wrote outputs to {} ({} tables, {} images)",
        output_dir.display(),
        doc.tables.len(),
        doc.images.len()
    );
    Ok(())
}
