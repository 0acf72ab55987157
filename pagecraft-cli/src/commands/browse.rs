//! Browse command implementation

use anyhow::Result;
use pagecraft_core::storage::DocumentStore;
use pagecraft_core::{BookCatalogGateway, StaticCatalog};
use std::sync::Arc;

/// List the built-in catalog for a category, most viewed first
///
/// Runs the catalog gateway over an empty store, so what it prints is exactly
/// what the server answers before any book has been stored.
pub async fn browse(category: &str, json: bool) -> Result<()> {
    let catalog = BookCatalogGateway::new(
        Arc::new(DocumentStore::in_memory()),
        Arc::new(StaticCatalog::seeded()),
    );
    let books = catalog.list_by_category(category).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books in category '{}'", category);
        return Ok(());
    }

    for book in &books {
        println!("{:>6} views  {} ({})", book.views, book.title, book.author);
        if let Some(pdf) = &book.pdf_file {
            println!("              {}", pdf);
        }
    }
    Ok(())
}
