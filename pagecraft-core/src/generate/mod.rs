//! AI-assisted writing
//!
//! [`GenerationService`] turns user requests into prompts, sends them to a
//! [`TextGenerator`] and, for full books, stores a PDF rendition and a
//! [`Book`] record. A failed upstream call is surfaced as-is and never retried.

mod client;
pub mod pdf;
mod prompts;

pub use client::{GeminiClient, GeminiConfig, TextGenerator};
pub use pdf::render_text_pdf;

use crate::error::GenerationError;
use crate::storage::{BlobStorage, BookStore};
use crate::types::{Book, BookLength, Category};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Author recorded on generated books
pub const AI_AUTHOR: &str = "AI Generated";

/// A short story generated from a title
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedStory {
    pub title: String,
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

/// Chaptered content generated from a title and genre
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContent {
    pub title: String,
    pub genre: String,
    pub content: String,
}

/// Key points as sent by clients: a list, or one comma-separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Keypoints {
    List(Vec<String>),
    Text(String),
}

impl Keypoints {
    pub fn into_vec(self) -> Vec<String> {
        let items = match self {
            Keypoints::List(items) => items,
            Keypoints::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

impl Default for Keypoints {
    fn default() -> Self {
        Keypoints::List(Vec::new())
    }
}

/// Parameters for a full generated book
#[derive(Debug, Clone)]
pub struct AiBookRequest {
    pub title: String,
    pub length: Option<BookLength>,
    pub topic: String,
    pub keypoints: Vec<String>,
    pub tone: String,
    pub language: String,
}

/// The stored result of [`GenerationService::ai_book`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBook {
    pub id: String,
    pub title: String,
    pub content: String,
    pub pdf_url: String,
}

/// File name for a generated PDF: `<millis>-<title>.pdf`, whitespace runs
/// collapsed to `-` and anything unsafe in a path dropped
pub fn pdf_file_name(title: &str, at: DateTime<Utc>) -> String {
    let slug = title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("{}.pdf", at.timestamp_millis())
    } else {
        format!("{}-{}.pdf", at.timestamp_millis(), slug)
    }
}

fn required(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

#[derive(Clone)]
pub struct GenerationService {
    generator: Arc<dyn TextGenerator>,
    books: Arc<dyn BookStore>,
    files: Arc<dyn BlobStorage>,
    public_prefix: String,
}

impl GenerationService {
    /// `files` receives generated PDFs; `public_prefix` is the URL path they
    /// are served under
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        books: Arc<dyn BookStore>,
        files: Arc<dyn BlobStorage>,
        public_prefix: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            books,
            files,
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn story(&self, title: &str) -> Result<GeneratedStory, GenerationError> {
        let title = required(title)
            .ok_or_else(|| GenerationError::Validation("Title is required".into()))?;

        let content = self.generator.generate(&prompts::story(title)).await?;
        tracing::info!(title, model = self.generator.model_name(), "story generated");

        Ok(GeneratedStory {
            title: title.to_string(),
            content,
            generated_at: Utc::now(),
        })
    }

    pub async fn book_content(
        &self,
        title: &str,
        genre: Option<&str>,
    ) -> Result<GeneratedContent, GenerationError> {
        let title = required(title)
            .ok_or_else(|| GenerationError::Validation("Title is required".into()))?;
        let genre = genre.and_then(required).unwrap_or("story");

        let content = self
            .generator
            .generate(&prompts::book_content(title, Some(genre)))
            .await?;
        tracing::info!(title, genre, "book content generated");

        Ok(GeneratedContent {
            title: title.to_string(),
            genre: genre.to_string(),
            content,
        })
    }

    /// Generate a book, store its PDF and persist it as an AI book
    pub async fn ai_book(&self, request: AiBookRequest) -> Result<GeneratedBook, GenerationError> {
        let (title, topic, length) = match (
            required(&request.title),
            required(&request.topic),
            request.length,
        ) {
            (Some(title), Some(topic), Some(length)) => {
                (title.to_string(), topic.to_string(), length)
            }
            _ => {
                return Err(GenerationError::Validation(
                    "Title, length, and topic are required".into(),
                ))
            }
        };

        let content = self
            .generator
            .generate(&prompts::ai_book(&request, length))
            .await?;

        let pdf = {
            let title = title.clone();
            let body = content.clone();
            tokio::task::spawn_blocking(move || render_text_pdf(&title, &body))
                .await
                .map_err(|e| GenerationError::Render(format!("render task failed: {}", e)))??
        };

        let file_name = pdf_file_name(&title, Utc::now());
        self.files.write(&file_name, pdf).await?;
        let pdf_url = format!("{}/{}", self.public_prefix, file_name);

        let mut book = Book::new(&title, AI_AUTHOR, &content, Category::Fiction)
            .with_description(format!("AI-generated book about {}", topic))
            .with_pdf_file(&pdf_url);
        book.length = Some(length);
        book.topic = Some(topic);
        book.keypoints = request.keypoints;
        if let Some(tone) = required(&request.tone) {
            book.tone = tone.to_string();
        }
        if let Some(language) = required(&request.language) {
            book.language = language.to_string();
        }
        book.is_ai = true;

        let book = self.books.insert(book).await?;
        tracing::info!(book_id = %book.id, title = %book.title, %pdf_url, "AI book stored");

        Ok(GeneratedBook {
            id: book.id,
            title: book.title,
            content: book.content,
            pdf_url,
        })
    }

    /// A roughly 200-word section about a topic
    pub async fn section(&self, topic: &str) -> Result<String, GenerationError> {
        let topic = required(topic)
            .ok_or_else(|| GenerationError::Validation("promptTopic is required".into()))?;
        self.generator.generate(&prompts::section(topic)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DocumentStore, MemoryStorage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns canned text and records prompts
    struct CannedGenerator {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| GenerationError::Upstream("503 Service Unavailable".into()))
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    struct Fixture {
        service: GenerationService,
        generator: Arc<CannedGenerator>,
        books: Arc<DocumentStore>,
        files: Arc<MemoryStorage>,
    }

    fn fixture(generator: CannedGenerator) -> Fixture {
        let generator = Arc::new(generator);
        let books = Arc::new(DocumentStore::in_memory());
        let files = Arc::new(MemoryStorage::new());
        let service =
            GenerationService::new(generator.clone(), books.clone(), files.clone(), "/uploads/");
        Fixture {
            service,
            generator,
            books,
            files,
        }
    }

    fn request() -> AiBookRequest {
        AiBookRequest {
            title: "Deep  Sea Tales".to_string(),
            length: Some(BookLength::Short),
            topic: "the abyss".to_string(),
            keypoints: vec!["light".to_string(), "pressure".to_string()],
            tone: "Casual".to_string(),
            language: String::new(),
        }
    }

    #[test]
    fn test_pdf_file_name() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(pdf_file_name("My  First Book", at), "1700000000000-My-First-Book.pdf");
        assert_eq!(pdf_file_name("../etc/passwd", at), "1700000000000-etcpasswd.pdf");
        assert_eq!(pdf_file_name("   ", at), "1700000000000.pdf");
    }

    #[test]
    fn test_keypoints_accept_both_shapes() {
        let list: Keypoints = serde_json::from_str(r#"["a", " b ", ""]"#).unwrap();
        assert_eq!(list.into_vec(), vec!["a", "b"]);
        let text: Keypoints = serde_json::from_str(r#""one, two,,three ""#).unwrap();
        assert_eq!(text.into_vec(), vec!["one", "two", "three"]);
        assert!(Keypoints::default().into_vec().is_empty());
    }

    #[tokio::test]
    async fn test_story() {
        let f = fixture(CannedGenerator::replying("Once upon a time"));
        let story = f.service.story(" The Lost Key ").await.unwrap();
        assert_eq!(story.title, "The Lost Key");
        assert_eq!(story.content, "Once upon a time");
        assert!(f.generator.last_prompt().contains("\"The Lost Key\""));

        let json = serde_json::to_value(&story).unwrap();
        assert!(json.get("generatedAt").is_some());
    }

    #[tokio::test]
    async fn test_missing_title_is_validation_error() {
        let f = fixture(CannedGenerator::replying("x"));
        assert!(matches!(
            f.service.story("").await,
            Err(GenerationError::Validation(_))
        ));
        assert!(matches!(
            f.service.book_content("  ", None).await,
            Err(GenerationError::Validation(_))
        ));
        assert!(matches!(
            f.service.section("").await,
            Err(GenerationError::Validation(_))
        ));
        assert!(f.generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_book_content_genre_default() {
        let f = fixture(CannedGenerator::replying("# Chapter 1"));
        let content = f.service.book_content("Night", None).await.unwrap();
        assert_eq!(content.genre, "story");
        let content = f.service.book_content("Night", Some("mystery")).await.unwrap();
        assert_eq!(content.genre, "mystery");
        assert!(f.generator.last_prompt().contains("engaging mystery"));
    }

    #[tokio::test]
    async fn test_ai_book_stores_pdf_and_record() {
        let f = fixture(CannedGenerator::replying("Chapter one.\n\nChapter two."));
        let generated = f.service.ai_book(request()).await.unwrap();

        assert!(generated.pdf_url.starts_with("/uploads/"));
        assert!(generated.pdf_url.ends_with("-Deep-Sea-Tales.pdf"));
        let file_name = generated.pdf_url.trim_start_matches("/uploads/");
        let pdf = f.files.read(file_name).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let book = BookStore::get(f.books.as_ref(), &generated.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(book.author, AI_AUTHOR);
        assert_eq!(book.category, Category::Fiction);
        assert_eq!(book.description.as_deref(), Some("AI-generated book about the abyss"));
        assert_eq!(book.keypoints, vec!["light", "pressure"]);
        assert_eq!(book.length, Some(BookLength::Short));
        assert_eq!(book.tone, "Casual");
        assert_eq!(book.language, "English");
        assert_eq!(book.pdf_file.as_deref(), Some(generated.pdf_url.as_str()));
        assert!(book.is_ai);

        assert!(f.generator.last_prompt().contains("approximately 800 words"));
    }

    #[tokio::test]
    async fn test_ai_book_requires_fields() {
        let f = fixture(CannedGenerator::replying("x"));
        let mut missing_length = request();
        missing_length.length = None;
        assert!(matches!(
            f.service.ai_book(missing_length).await,
            Err(GenerationError::Validation(_))
        ));

        let mut missing_topic = request();
        missing_topic.topic = " ".to_string();
        assert!(matches!(
            f.service.ai_book(missing_topic).await,
            Err(GenerationError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_upstream_failure_stores_nothing() {
        let f = fixture(CannedGenerator::failing());
        assert!(matches!(
            f.service.ai_book(request()).await,
            Err(GenerationError::Upstream(_))
        ));
        assert!(f.books.top_by_views(10).await.unwrap().is_empty());
    }
}
