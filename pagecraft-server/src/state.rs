//! Application state

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use pagecraft_core::generate::{GeminiClient, GenerationService, TextGenerator};
use pagecraft_core::mail::{LogMailer, Mailer, SmtpMailer};
use pagecraft_core::reset::{MemoryOtpStore, PasswordResetFlow};
use pagecraft_core::storage::{BlobStorage, BookStore, DocumentStore, LocalStorage};
use pagecraft_core::{AccountService, BookCatalogGateway, FallbackSource, StaticCatalog};
use std::path::PathBuf;
use std::sync::Arc;

/// URL path uploaded and generated files are served under
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub resets: PasswordResetFlow,
    pub catalog: BookCatalogGateway,
    pub generation: GenerationService,

    /// Write side of the book collection, for uploads
    pub books: Arc<dyn BookStore>,

    /// Uploaded covers and book files
    pub uploads: Arc<dyn BlobStorage>,

    /// Directory served at [`UPLOADS_ROUTE`]
    pub uploads_dir: PathBuf,
}

/// Backends an [`AppState`] is built from
pub struct Backends {
    pub documents: Arc<DocumentStore>,
    pub uploads_dir: PathBuf,
    pub mailer: Arc<dyn Mailer>,
    pub generator: Arc<dyn TextGenerator>,
    pub fallback: Arc<dyn FallbackSource>,
}

impl AppState {
    /// Create application state from configuration
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        tokio::fs::create_dir_all(config.uploads_dir())
            .await
            .with_context(|| format!("failed to create {}", config.uploads_dir().display()))?;

        let documents = Arc::new(
            DocumentStore::open(config.documents_path())
                .await
                .context("failed to open document store")?,
        );

        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(smtp) => {
                tracing::info!(host = %smtp.host, port = smtp.port, "using SMTP mailer");
                Arc::new(SmtpMailer::new(smtp.clone()).context("invalid SMTP configuration")?)
            }
            None => {
                tracing::warn!("SMTP is not configured, OTP codes will only be logged");
                Arc::new(LogMailer)
            }
        };

        let generator = Arc::new(
            GeminiClient::new(config.gemini.clone()).context("failed to build generation client")?,
        );

        Ok(Self::from_backends(Backends {
            documents,
            uploads_dir: config.uploads_dir(),
            mailer,
            generator,
            fallback: Arc::new(StaticCatalog::seeded()),
        }))
    }

    /// Wire services onto explicit backends
    pub fn from_backends(backends: Backends) -> Self {
        let Backends {
            documents,
            uploads_dir,
            mailer,
            generator,
            fallback,
        } = backends;

        let uploads: Arc<dyn BlobStorage> = Arc::new(LocalStorage::new(uploads_dir.clone()));
        let books: Arc<dyn BookStore> = documents.clone();

        Self {
            accounts: AccountService::new(documents.clone()),
            resets: PasswordResetFlow::new(Arc::new(MemoryOtpStore::new()), documents, mailer),
            catalog: BookCatalogGateway::new(books.clone(), fallback),
            generation: GenerationService::new(generator, books.clone(), uploads.clone(), UPLOADS_ROUTE),
            books,
            uploads,
            uploads_dir,
        }
    }

    /// Public URL of a stored upload
    pub fn upload_url(&self, name: &str) -> String {
        format!("{}/{}", UPLOADS_ROUTE, name)
    }
}
