//! Content resolution
//!
//! Book content reaches the reading view in several shapes: plain text from the
//! store, remote PDF links from the fallback catalog, JSON blobs from bundled
//! assets and wrapped text from AI generation. [`ContentResolver`] turns any of
//! them into exactly one [`RenderableContent`] by running a fixed, ordered rule
//! table. It never fails; a record with nothing usable resolves to a
//! placeholder text.

use crate::types::{Book, RenderableContent};
use serde_json::Value;

/// Body used when a record carries no usable content
pub const NO_CONTENT: &str = "No content available";

/// The fields of a book-like record the resolver looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentRecord {
    pub content: Option<Value>,
    pub file: Option<Value>,
    pub pdf_file: Option<Value>,
    pub pdf_url: Option<Value>,
    pub title: Option<String>,
}

impl ContentRecord {
    /// Build a record from arbitrary JSON
    ///
    /// Objects contribute their `content`, `file`, `pdfFile`, `pdfUrl` and
    /// `title` fields. Any other non-null value is treated as bare content.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let field = |name: &str| map.get(name).filter(|v| !v.is_null()).cloned();
                Self {
                    content: field("content"),
                    file: field("file"),
                    pdf_file: field("pdfFile"),
                    pdf_url: field("pdfUrl"),
                    title: map.get("title").and_then(Value::as_str).map(str::to_string),
                }
            }
            Value::Null => Self::default(),
            other => Self {
                content: Some(other.clone()),
                ..Self::default()
            },
        }
    }

    pub fn with_content(mut self, content: impl Into<Value>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<Value>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_pdf_file(mut self, pdf: impl Into<String>) -> Self {
        self.pdf_file = Some(Value::String(pdf.into()));
        self
    }

    pub fn with_pdf_url(mut self, pdf: impl Into<String>) -> Self {
        self.pdf_url = Some(Value::String(pdf.into()));
        self
    }
}

impl From<&Book> for ContentRecord {
    fn from(book: &Book) -> Self {
        Self {
            content: Some(Value::String(book.content.clone())),
            file: None,
            pdf_file: book.pdf_file.clone().map(Value::String),
            pdf_url: None,
            title: Some(book.title.clone()),
        }
    }
}

type Rule = fn(&ContentRecord) -> Option<RenderableContent>;

/// Resolution order; the first rule producing a value wins
const RULES: &[(&str, Rule)] = &[
    ("pdf_file", pdf_file_field),
    ("pdf_url", pdf_url_field),
    ("content_pdf_link", content_pdf_link),
    ("file_pdf_link", file_pdf_link),
    ("content_text", content_text),
    ("file_text", file_text),
    ("wrapped_text", wrapped_text),
    ("structured", structured),
];

/// Resolves book records into renderable content
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentResolver;

impl ContentResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a record
    pub fn resolve(&self, record: &ContentRecord) -> RenderableContent {
        for (name, rule) in RULES {
            if let Some(resolved) = rule(record) {
                tracing::trace!(rule = name, title = ?record.title, "resolved book content");
                return resolved;
            }
        }
        RenderableContent::text(NO_CONTENT)
    }

    /// Resolve arbitrary JSON (see [`ContentRecord::from_json`])
    pub fn resolve_json(&self, value: &Value) -> RenderableContent {
        self.resolve(&ContentRecord::from_json(value))
    }

    /// Resolve a stored book
    pub fn resolve_book(&self, book: &Book) -> RenderableContent {
        self.resolve(&ContentRecord::from(book))
    }
}

/// A present, non-empty string; whitespace still counts as content
fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn is_pdf_link(s: &str) -> bool {
    s.trim().to_ascii_lowercase().ends_with(".pdf")
}

fn pdf_file_field(record: &ContentRecord) -> Option<RenderableContent> {
    non_empty(record.pdf_file.as_ref()).map(RenderableContent::pdf)
}

fn pdf_url_field(record: &ContentRecord) -> Option<RenderableContent> {
    non_empty(record.pdf_url.as_ref()).map(RenderableContent::pdf)
}

fn content_pdf_link(record: &ContentRecord) -> Option<RenderableContent> {
    non_empty(record.content.as_ref())
        .filter(|s| is_pdf_link(s))
        .map(RenderableContent::pdf)
}

fn file_pdf_link(record: &ContentRecord) -> Option<RenderableContent> {
    non_empty(record.file.as_ref())
        .filter(|s| is_pdf_link(s))
        .map(RenderableContent::pdf)
}

fn content_text(record: &ContentRecord) -> Option<RenderableContent> {
    non_empty(record.content.as_ref()).map(RenderableContent::text)
}

fn file_text(record: &ContentRecord) -> Option<RenderableContent> {
    non_empty(record.file.as_ref()).map(RenderableContent::text)
}

/// Objects carrying their text one level down, as generation responses do
fn wrapped_text(record: &ContentRecord) -> Option<RenderableContent> {
    [record.content.as_ref(), record.file.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .find_map(|map| non_empty(map.get("text")).or_else(|| non_empty(map.get("content"))))
        .map(RenderableContent::text)
}

fn structured(record: &ContentRecord) -> Option<RenderableContent> {
    [record.content.as_ref(), record.file.as_ref()]
        .into_iter()
        .flatten()
        .find(|v| !v.is_null() && !v.is_string())
        .map(|v| {
            let body = serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
            RenderableContent::text(body)
        })
}
