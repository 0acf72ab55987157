//! Storage abstraction layer
//!
//! Books and users live in a document store behind [`BookStore`] and
//! [`UserStore`]; uploaded and generated files live in a [`BlobStorage`].
//! Every write is a single independent operation: there are no multi-document
//! transactions.

mod blob;
mod documents;

pub use blob::{
    content_addressed_name, discard, put_content_addressed, BlobStorage, LocalStorage,
    MemoryStorage, StoredBlob,
};
pub use documents::DocumentStore;

use crate::error::StoreError;
use crate::types::{Book, Category, User};
use async_trait::async_trait;

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Book collection
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new book
    async fn insert(&self, book: Book) -> StoreResult<Book>;

    /// Fetch a book by id
    async fn get(&self, id: &str) -> StoreResult<Option<Book>>;

    /// Add one to the view counter and return the updated book
    async fn increment_views(&self, id: &str) -> StoreResult<Book>;

    /// Books in a category, most viewed first
    async fn list_by_category(&self, category: Category) -> StoreResult<Vec<Book>>;

    /// Most viewed books store-wide
    async fn top_by_views(&self, limit: usize) -> StoreResult<Vec<Book>>;
}

/// User collection
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user; fails with `Conflict` if the username or email is taken
    async fn insert(&self, user: User) -> StoreResult<User>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Replace the stored password hash of the user with this email
    async fn update_password(&self, email: &str, password_hash: String) -> StoreResult<()>;
}

/// Sort books most viewed first, then by title for a stable order
pub(crate) fn sort_by_views(books: &mut [Book]) {
    books.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.title.cmp(&b.title)));
}
