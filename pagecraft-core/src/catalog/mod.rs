//! Read path for books
//!
//! [`BookCatalogGateway`] fronts the book store. List reads never fail: store
//! errors (and, for category listings, empty results) are answered from a
//! [`FallbackSource`]. Single-book reads have no fallback.

mod fallback;

pub use fallback::{FallbackSource, StaticCatalog};

use crate::error::{CatalogError, StoreError};
use crate::storage::{sort_by_views, BookStore};
use crate::types::{categories, Book, BookSummary, Category, CategoryInfo};
use std::sync::Arc;

/// How many books the trending list holds
pub const TRENDING_LIMIT: usize = 10;

#[derive(Clone)]
pub struct BookCatalogGateway {
    store: Arc<dyn BookStore>,
    fallback: Arc<dyn FallbackSource>,
    trending_limit: usize,
}

impl BookCatalogGateway {
    pub fn new(store: Arc<dyn BookStore>, fallback: Arc<dyn FallbackSource>) -> Self {
        Self {
            store,
            fallback,
            trending_limit: TRENDING_LIMIT,
        }
    }

    pub fn with_trending_limit(mut self, limit: usize) -> Self {
        self.trending_limit = limit;
        self
    }

    /// The constant category list
    pub fn categories(&self) -> Vec<CategoryInfo> {
        categories()
    }

    /// Books in a category, most viewed first, projected for list display
    ///
    /// `category` may be a stored value or a browse title. Unknown categories
    /// yield an empty list.
    pub async fn list_by_category(&self, category: &str) -> Vec<BookSummary> {
        let category: Category = match category.parse() {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, "listing unknown category");
                return Vec::new();
            }
        };

        let books = match self.store.list_by_category(category).await {
            Ok(books) if !books.is_empty() => books,
            Ok(_) => {
                tracing::debug!(%category, "store has no books, using fallback catalog");
                self.fallback_books(Some(category))
            }
            Err(e) => {
                tracing::warn!(%category, error = %e, "book store failed, using fallback catalog");
                self.fallback_books(Some(category))
            }
        };

        books.iter().map(BookSummary::from).collect()
    }

    /// Fetch one book and count the view
    ///
    /// Every successful call adds exactly one view, so repeated reads inflate
    /// the counter.
    pub async fn get_by_id(&self, id: &str) -> Result<Book, CatalogError> {
        match self.store.increment_views(id).await {
            Ok(book) => {
                tracing::debug!(book_id = id, views = book.views, "book viewed");
                Ok(book)
            }
            Err(StoreError::NotFound(_)) => Err(CatalogError::NotFound(id.to_string())),
            Err(e) => {
                tracing::error!(book_id = id, error = %e, "failed to fetch book");
                Err(CatalogError::Unavailable(e.to_string()))
            }
        }
    }

    /// Most viewed books store-wide
    pub async fn list_trending(&self) -> Vec<Book> {
        match self.store.top_by_views(self.trending_limit).await {
            Ok(books) => books,
            Err(e) => {
                tracing::warn!(error = %e, "book store failed, using fallback trending list");
                let mut books = self.fallback_books(None);
                books.truncate(self.trending_limit);
                books
            }
        }
    }

    fn fallback_books(&self, category: Option<Category>) -> Vec<Book> {
        let mut books = match category {
            Some(c) => self.fallback.books_in(c),
            None => self.fallback.all_books(),
        };
        sort_by_views(&mut books);
        books
    }
}
