//! API routes

use crate::handlers;
use crate::state::{AppState, UPLOADS_ROUTE};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Room for the form fields around the two files of an upload
const UPLOAD_BODY_LIMIT: usize = 2 * handlers::MAX_UPLOAD_BYTES + 64 * 1024;

/// CORS policy from `PAGECRAFT_CORS_ORIGINS`: `*`, a comma-separated list,
/// or local development origins when unset
fn cors_layer(origins: Option<String>) -> CorsLayer {
    let allow_origin = match origins.as_deref().map(str::trim) {
        Some("*") => AllowOrigin::any(),
        Some(list) => AllowOrigin::list(
            list.split(',')
                .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ),
        None => AllowOrigin::list([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:8081"),
            HeaderValue::from_static("http://localhost:19006"),
            HeaderValue::from_static("http://127.0.0.1:8081"),
        ]),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(std::env::var("PAGECRAFT_CORS_ORIGINS").ok());

    let account_routes = Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/verify-otp", post(handlers::verify_otp))
        .route("/reset-password", post(handlers::reset_password));

    let catalog_routes = Router::new()
        .route("/categories", get(handlers::list_categories))
        .route("/trending-books", get(handlers::trending_books))
        .route("/books/category/:category", get(handlers::books_by_category))
        .route("/books/:id", get(handlers::get_book))
        .route(
            "/books",
            post(handlers::upload_book).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        );

    let generation_routes = Router::new()
        .route("/generate-story", post(handlers::generate_story))
        .route("/generate-book-content", post(handlers::generate_book_content))
        .route("/generate-ai-book", post(handlers::generate_ai_book))
        .route("/generate-ai-section", post(handlers::generate_ai_section));

    let uploads = ServeDir::new(&state.uploads_dir);

    Router::new()
        .merge(account_routes)
        .merge(catalog_routes)
        .nest("/api", generation_routes)
        .nest_service(UPLOADS_ROUTE, uploads)
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_variants_build() {
        let _ = cors_layer(None);
        let _ = cors_layer(Some("*".into()));
        let _ = cors_layer(Some("http://a.example, not a header\n, http://b.example".into()));
    }
}
