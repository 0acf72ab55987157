//! Render command implementation

use anyhow::{Context, Result};
use pagecraft_core::generate::render_text_pdf;
use std::fs;
use std::path::Path;

/// Render a plain-text file to PDF the way generated books are rendered
pub fn render_pdf(input: &str, output: &str, title: Option<&str>) -> Result<()> {
    let input_path = Path::new(input);
    let body = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let title = match title {
        Some(title) => title.to_string(),
        None => input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Untitled")
            .to_string(),
    };

    let pdf = render_text_pdf(&title, &body).context("Failed to render PDF")?;
    fs::write(output, &pdf).with_context(|| format!("Failed to write output file: {}", output))?;

    tracing::info!(bytes = pdf.len(), "rendered '{}' -> {}", title, output);
    println!("Rendered '{}' -> {}", title, output);
    Ok(())
}
