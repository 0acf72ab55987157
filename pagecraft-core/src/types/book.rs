//! The persisted Book entity and its list projection

use super::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Requested length of an AI-generated book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookLength {
    Short,
    Medium,
    Long,
}

impl BookLength {
    /// Approximate word count asked of the generator
    pub fn word_count(self) -> u32 {
        match self {
            BookLength::Short => 800,
            BookLength::Medium => 1200,
            BookLength::Long => 2000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookLength::Short => "Short",
            BookLength::Medium => "Medium",
            BookLength::Long => "Long",
        }
    }
}

impl fmt::Display for BookLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(BookLength::Short),
            "medium" => Ok(BookLength::Medium),
            "long" => Ok(BookLength::Long),
            other => Err(format!("unknown book length: {}", other)),
        }
    }
}

fn default_tone() -> String {
    "Formal".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

/// A stored book
///
/// `content` is always present once a book is persisted. `pdf_file` may be set
/// alongside it; renderers prefer the PDF.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content: String,
    pub category: Category,
    #[serde(default)]
    pub length: Option<BookLength>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub keypoints: Vec<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub pdf_file: Option<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(rename = "isAI", default)]
    pub is_ai: bool,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Create a new book with a fresh id and default tone/language
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            author: author.into(),
            description: None,
            content: content.into(),
            category,
            length: None,
            topic: None,
            keypoints: Vec::new(),
            tone: default_tone(),
            language: default_language(),
            cover_image: None,
            pdf_file: None,
            views: 0,
            is_ai: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cover_image(mut self, cover: impl Into<String>) -> Self {
        self.cover_image = Some(cover.into());
        self
    }

    pub fn with_pdf_file(mut self, pdf: impl Into<String>) -> Self {
        self.pdf_file = Some(pdf.into());
        self
    }

    pub fn with_views(mut self, views: u64) -> Self {
        self.views = views;
        self
    }

    /// Cover to display, falling back to the category image
    pub fn display_cover(&self) -> String {
        self.cover_image
            .clone()
            .unwrap_or_else(|| self.category.image_path().to_string())
    }
}

/// List-display projection of a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_image: String,
    pub views: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_file: Option<String>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            description: book.description.clone(),
            cover_image: book.display_cover(),
            views: book.views,
            pdf_file: book.pdf_file.clone(),
        }
    }
}
