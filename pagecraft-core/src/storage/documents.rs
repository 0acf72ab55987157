//! In-memory document store with an optional JSON snapshot on disk

use super::{sort_by_views, BookStore, StoreResult, UserStore};
use crate::error::StoreError;
use crate::types::{Book, Category, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Collections {
    #[serde(default)]
    books: HashMap<String, Book>,
    #[serde(default)]
    users: HashMap<String, User>,
}

impl Collections {
    /// Load collections from a JSON file; a missing file is an empty store
    async fn load(path: &Path) -> StoreResult<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }

    /// Save collections atomically: write a temp file, then rename over the target
    async fn save(&self, path: &Path) -> StoreResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

/// Book and user collections
///
/// Without a snapshot path the store is purely in-memory. With one, every
/// mutation is written to disk before it becomes visible, so a failed write
/// leaves the store unchanged.
pub struct DocumentStore {
    data: RwLock<Collections>,
    snapshot: Option<PathBuf>,
}

impl DocumentStore {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(Collections::default()),
            snapshot: None,
        }
    }

    /// Open a store backed by a JSON snapshot file
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let data = Collections::load(&path).await?;
        tracing::info!(
            path = %path.display(),
            books = data.books.len(),
            users = data.users.len(),
            "opened document store"
        );
        Ok(Self {
            data: RwLock::new(data),
            snapshot: Some(path),
        })
    }

    async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Collections) -> StoreResult<T> + Send,
    ) -> StoreResult<T> {
        let mut data = self.data.write().await;
        match &self.snapshot {
            None => mutate(&mut data),
            Some(path) => {
                let mut next = data.clone();
                let out = mutate(&mut next)?;
                next.save(path).await?;
                *data = next;
                Ok(out)
            }
        }
    }
}

#[async_trait]
impl BookStore for DocumentStore {
    async fn insert(&self, book: Book) -> StoreResult<Book> {
        self.commit(move |c| {
            if c.books.contains_key(&book.id) {
                return Err(StoreError::Conflict(format!("book {} exists", book.id)));
            }
            c.books.insert(book.id.clone(), book.clone());
            Ok(book)
        })
        .await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Book>> {
        Ok(self.data.read().await.books.get(id).cloned())
    }

    async fn increment_views(&self, id: &str) -> StoreResult<Book> {
        let id = id.to_string();
        self.commit(move |c| {
            let book = c
                .books
                .get_mut(&id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            book.views += 1;
            Ok(book.clone())
        })
        .await
    }

    async fn list_by_category(&self, category: Category) -> StoreResult<Vec<Book>> {
        let mut books: Vec<Book> = self
            .data
            .read()
            .await
            .books
            .values()
            .filter(|b| b.category == category)
            .cloned()
            .collect();
        sort_by_views(&mut books);
        Ok(books)
    }

    async fn top_by_views(&self, limit: usize) -> StoreResult<Vec<Book>> {
        let mut books: Vec<Book> = self.data.read().await.books.values().cloned().collect();
        sort_by_views(&mut books);
        books.truncate(limit);
        Ok(books)
    }
}

#[async_trait]
impl UserStore for DocumentStore {
    async fn insert(&self, user: User) -> StoreResult<User> {
        self.commit(move |c| {
            let taken = c
                .users
                .values()
                .any(|u| u.username == user.username || u.email == user.email);
            if taken {
                return Err(StoreError::Conflict(
                    "username or email already exists".to_string(),
                ));
            }
            c.users.insert(user.id.clone(), user.clone());
            Ok(user)
        })
        .await
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .data
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .data
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_password(&self, email: &str, password_hash: String) -> StoreResult<()> {
        let email = email.to_string();
        self.commit(move |c| {
            let user = c
                .users
                .values_mut()
                .find(|u| u.email == email)
                .ok_or_else(|| StoreError::NotFound(email.clone()))?;
            user.password_hash = password_hash;
            Ok(())
        })
        .await
    }
}
