//! Catalog handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::multipart::MultipartError;
use pagecraft_core::storage::{discard, put_content_addressed};
use pagecraft_core::{Book, BookSummary, Category, CategoryInfo};

/// Largest accepted upload file
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// The fixed category list
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryInfo>> {
    Json(state.catalog.categories())
}

/// Most viewed books
pub async fn trending_books(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.catalog.list_trending().await)
}

/// Books in one category, most viewed first
pub async fn books_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<BookSummary>> {
    Json(state.catalog.list_by_category(&category).await)
}

/// Fetch a single book; each call counts as a view
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.catalog.get_by_id(&id).await?))
}

struct UploadedFile {
    file_name: String,
    data: Vec<u8>,
}

#[derive(Default)]
struct UploadForm {
    title: String,
    author: String,
    description: String,
    category: String,
    cover_image: Option<UploadedFile>,
    book_file: Option<UploadedFile>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::new(e.status(), "Invalid upload").with_details(e.body_text())
}

async fn read_form(mut multipart: axum_extra::extract::Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "coverImage" | "bookFile" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "File too large"));
                }
                let file = Some(UploadedFile {
                    file_name,
                    data: data.to_vec(),
                });
                if name == "coverImage" {
                    form.cover_image = file;
                } else {
                    form.book_file = file;
                }
            }
            "title" | "author" | "description" | "category" => {
                let value = field.text().await.map_err(multipart_error)?.trim().to_string();
                match name.as_str() {
                    "title" => form.title = value,
                    "author" => form.author = value,
                    "description" => form.description = value,
                    _ => form.category = value,
                }
            }
            other => tracing::debug!(field = other, "ignoring unknown upload field"),
        }
    }

    Ok(form)
}

/// Upload a book: cover image plus book file, stored content-addressed
pub async fn upload_book(
    State(state): State<AppState>,
    multipart: axum_extra::extract::Multipart,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let form = read_form(multipart).await?;

    if form.title.is_empty() || form.author.is_empty() {
        return Err(ApiError::bad_request("Title and author are required"));
    }
    let category: Category = form
        .category
        .parse()
        .map_err(|e: String| ApiError::bad_request("Invalid category").with_details(e))?;
    let (cover, file) = match (form.cover_image, form.book_file) {
        (Some(cover), Some(file)) => (cover, file),
        _ => return Err(ApiError::bad_request("Both coverImage and bookFile are required")),
    };

    let uploads = state.uploads.as_ref();
    let cover = put_content_addressed(uploads, &cover.file_name, cover.data).await?;
    let file = match put_content_addressed(uploads, &file.file_name, file.data).await {
        Ok(file) => file,
        Err(e) => {
            discard(uploads, &[cover]).await;
            return Err(e.into());
        }
    };
    let file_url = state.upload_url(&file.name);

    // The stored file is the book's content; the resolver renders PDFs by link
    let mut book = Book::new(form.title, form.author, &file_url, category)
        .with_cover_image(state.upload_url(&cover.name));
    if !form.description.is_empty() {
        book = book.with_description(form.description);
    }
    if file.name.ends_with(".pdf") {
        book = book.with_pdf_file(&file_url);
    }

    let book = match state.books.insert(book).await {
        Ok(book) => book,
        Err(e) => {
            discard(uploads, &[cover, file]).await;
            return Err(e.into());
        }
    };
    tracing::info!(
        book_id = %book.id,
        title = %book.title,
        file = %file.name,
        reused = !file.created,
        "book uploaded"
    );

    Ok((StatusCode::CREATED, Json(book)))
}
