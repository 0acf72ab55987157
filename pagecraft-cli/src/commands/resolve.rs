//! Resolve command implementation

use anyhow::{Context, Result};
use pagecraft_core::{ContentResolver, RenderableContent};
use std::fs;

/// Resolve a JSON book record to the content a reader would render
pub fn resolve(input: &str, json: bool) -> Result<()> {
    let data = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;
    let record: serde_json::Value = serde_json::from_str(&data)
        .with_context(|| format!("{} is not valid JSON", input))?;

    let content = ContentResolver::new().resolve_json(&record);
    tracing::debug!(pdf = content.is_pdf(), "resolved {}", input);

    if json {
        println!("{}", serde_json::to_string_pretty(&content)?);
        return Ok(());
    }

    match content {
        RenderableContent::Pdf { uri } => println!("pdf: {}", uri),
        RenderableContent::Text { body } => {
            println!("text:");
            println!("{}", body);
        }
    }

    Ok(())
}
