//! End-to-end tests for pagecraft-core
//!
//! These tests wire the services together the way the server does and check
//! the paths a book or an account takes through them.
//!
//! ## Test Strategy
//!
//! 1. **Content pipeline**: books from every producer (generation, uploads,
//!    fallback catalog, bundled JSON) resolve to the expected rendering
//! 2. **Accounts**: signup, reset and login against a snapshot-backed store
//!    that is reopened between steps

use async_trait::async_trait;
use chrono::{DateTime, Duration};
use pagecraft_core::generate::{AiBookRequest, GenerationService, TextGenerator};
use pagecraft_core::mail::MemoryMailer;
use pagecraft_core::reset::{ManualClock, MemoryOtpStore, ResetState};
use pagecraft_core::storage::{BookStore, DocumentStore, MemoryStorage};
use pagecraft_core::{
    AccountService, Book, BookCatalogGateway, BookLength, Category, ContentResolver,
    GenerationError, PasswordResetFlow, RenderableContent, ResetError, Signup, StaticCatalog,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

struct FixedGenerator(&'static str);

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.0.to_string())
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

fn signup_form(password: &str) -> Signup {
    Signup {
        full_name: "Test Reader".to_string(),
        username: "reader".to_string(),
        email: "reader@example.com".to_string(),
        password: password.to_string(),
    }
}

// =============================================================================
// Content pipeline
// =============================================================================

#[tokio::test]
async fn test_generated_book_reads_as_pdf() {
    let store = Arc::new(DocumentStore::in_memory());
    let generation = GenerationService::new(
        Arc::new(FixedGenerator("Chapter one.")),
        store.clone(),
        Arc::new(MemoryStorage::new()),
        "/uploads",
    );
    let catalog = BookCatalogGateway::new(store.clone(), Arc::new(StaticCatalog::seeded()));

    let generated = generation
        .ai_book(AiBookRequest {
            title: "Night Sky".to_string(),
            length: Some(BookLength::Medium),
            topic: "stars".to_string(),
            keypoints: Vec::new(),
            tone: "Formal".to_string(),
            language: "English".to_string(),
        })
        .await
        .unwrap();

    let book = catalog.get_by_id(&generated.id).await.unwrap();
    assert_eq!(book.views, 1);
    assert_eq!(
        ContentResolver::new().resolve_book(&book),
        RenderableContent::pdf(generated.pdf_url)
    );

    // AI books are filed under Fiction, which has no fallback entries
    let fiction = catalog.list_by_category("Fiction").await;
    assert_eq!(fiction.len(), 1);
    assert_eq!(fiction[0].title, "Night Sky");
}

#[tokio::test]
async fn test_fallback_books_read_as_pdf() {
    let catalog = BookCatalogGateway::new(
        Arc::new(DocumentStore::in_memory()),
        Arc::new(StaticCatalog::seeded()),
    );
    let resolver = ContentResolver::new();

    for summary in catalog.list_by_category("Quran Stories").await {
        let record = serde_json::to_value(&summary).unwrap();
        let content = resolver.resolve_json(&record);
        assert!(content.is_pdf(), "{} should resolve to a PDF", summary.title);
    }
}

#[tokio::test]
async fn test_stored_text_book_reads_as_text() {
    let store = Arc::new(DocumentStore::in_memory());
    let book = store
        .insert(Book::new("Plain", "Author", "Just words.", Category::Children))
        .await
        .unwrap();
    let catalog = BookCatalogGateway::new(store, Arc::new(StaticCatalog::empty()));

    let fetched = catalog.get_by_id(&book.id).await.unwrap();
    assert_eq!(
        ContentResolver::new().resolve_book(&fetched),
        RenderableContent::text("Just words.")
    );
}

#[test]
fn test_bundled_asset_shapes() {
    let resolver = ContentResolver::new();

    let wrapped = json!({"title": "Asset", "content": {"text": "Wrapped body"}});
    assert_eq!(resolver.resolve_json(&wrapped), RenderableContent::text("Wrapped body"));

    let local_pdf = json!({"file": "assets/books/guide.PDF"});
    assert_eq!(
        resolver.resolve_json(&local_pdf),
        RenderableContent::pdf("assets/books/guide.PDF")
    );

    let nothing = json!({"title": "Empty", "content": ""});
    assert_eq!(
        resolver.resolve_json(&nothing),
        RenderableContent::text("No content available")
    );
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn test_password_reset_survives_store_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("documents.json");

    let store = Arc::new(DocumentStore::open(&path).await.unwrap());
    AccountService::new(store.clone())
        .signup(signup_form("oldpass"))
        .await
        .unwrap();

    let clock = Arc::new(ManualClock::new(
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    ));
    let mailer = Arc::new(MemoryMailer::new());
    let flow = PasswordResetFlow::new(
        Arc::new(MemoryOtpStore::with_clock(clock.clone())),
        store.clone(),
        mailer.clone(),
    );

    flow.request_reset("reader@example.com").await.unwrap();
    let code = mailer.last_code_for("reader@example.com").await.unwrap();
    clock.advance(Duration::minutes(4));
    let token = flow.verify_otp("reader@example.com", &code).await.unwrap();
    assert_eq!(flow.state("reader@example.com").await.unwrap(), ResetState::Verified);

    flow.reset_password("reader@example.com", &token, "newpass")
        .await
        .unwrap();
    drop(flow);
    drop(store);

    let reopened = Arc::new(DocumentStore::open(&path).await.unwrap());
    let accounts = AccountService::new(reopened);
    assert!(accounts.login("reader", "oldpass").await.is_err());
    let profile = accounts.login("reader", "newpass").await.unwrap();
    assert_eq!(profile.email, "reader@example.com");
}

#[tokio::test]
async fn test_expired_code_requires_new_request() {
    let store = Arc::new(DocumentStore::in_memory());
    AccountService::new(store.clone())
        .signup(signup_form("secret1"))
        .await
        .unwrap();

    let clock = Arc::new(ManualClock::new(
        DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    ));
    let mailer = Arc::new(MemoryMailer::new());
    let flow = PasswordResetFlow::new(
        Arc::new(MemoryOtpStore::with_clock(clock.clone())),
        store,
        mailer.clone(),
    );

    flow.request_reset("reader@example.com").await.unwrap();
    let stale = mailer.last_code_for("reader@example.com").await.unwrap();
    clock.advance(Duration::milliseconds(300_001));

    assert!(matches!(
        flow.verify_otp("reader@example.com", &stale).await,
        Err(ResetError::NotFoundOrExpired)
    ));
    assert_eq!(flow.state("reader@example.com").await.unwrap(), ResetState::None);

    flow.request_reset("reader@example.com").await.unwrap();
    let fresh = mailer.last_code_for("reader@example.com").await.unwrap();
    assert!(flow.verify_otp("reader@example.com", &fresh).await.is_ok());
}
