//! AI generation handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use pagecraft_core::generate::{
    AiBookRequest, GeneratedBook, GeneratedContent, GeneratedStory, Keypoints,
};
use pagecraft_core::BookLength;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoryRequest {
    pub title: String,
}

/// Generate a short story from a title
pub async fn generate_story(
    State(state): State<AppState>,
    Json(body): Json<StoryRequest>,
) -> Result<Json<GeneratedStory>, ApiError> {
    Ok(Json(state.generation.story(&body.title).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookContentRequest {
    pub title: String,
    pub genre: Option<String>,
}

/// Generate chaptered content for a title and genre
pub async fn generate_book_content(
    State(state): State<AppState>,
    Json(body): Json<BookContentRequest>,
) -> Result<Json<GeneratedContent>, ApiError> {
    let content = state
        .generation
        .book_content(&body.title, body.genre.as_deref())
        .await?;
    Ok(Json(content))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AiBookBody {
    pub title: String,
    pub length: Option<String>,
    pub topic: String,
    pub keypoints: Option<Keypoints>,
    pub tone: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct AiBookResponse {
    pub success: bool,
    pub book: GeneratedBook,
}

/// Generate a full book, render it to PDF and store it
pub async fn generate_ai_book(
    State(state): State<AppState>,
    Json(body): Json<AiBookBody>,
) -> Result<Json<AiBookResponse>, ApiError> {
    let length = match body.length.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(length) => Some(length.parse::<BookLength>().map_err(|e| {
            ApiError::bad_request("Length must be Short, Medium or Long").with_details(e)
        })?),
        None => None,
    };

    let book = state
        .generation
        .ai_book(AiBookRequest {
            title: body.title,
            length,
            topic: body.topic,
            keypoints: body.keypoints.map(Keypoints::into_vec).unwrap_or_default(),
            tone: body.tone,
            language: body.language,
        })
        .await?;

    Ok(Json(AiBookResponse {
        success: true,
        book,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionRequest {
    pub prompt_topic: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub success: bool,
    pub generated_content: String,
}

/// Generate one short section about a topic
pub async fn generate_ai_section(
    State(state): State<AppState>,
    Json(body): Json<SectionRequest>,
) -> Result<Json<SectionResponse>, ApiError> {
    let generated_content = state.generation.section(&body.prompt_topic).await?;
    Ok(Json(SectionResponse {
        success: true,
        generated_content,
    }))
}
