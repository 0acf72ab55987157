//! Pagecraft Core Library
//!
//! Domain logic for the Pagecraft ebook platform: the catalog read path with
//! its fallback source, the content resolver that decides how a book is
//! rendered, accounts and the OTP password-reset protocol, and AI-assisted
//! book generation. Persistence sits behind the traits in [`storage`], so the
//! server and tests choose their own backends.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod generate;
pub mod mail;
pub mod reset;
pub mod resolver;
pub mod storage;
pub mod types;

pub use auth::{AccountService, Signup};
pub use catalog::{BookCatalogGateway, FallbackSource, StaticCatalog};
pub use error::{
    AccountError, CatalogError, DeliveryError, GenerationError, ResetError, StoreError,
};
pub use generate::{GenerationService, TextGenerator};
pub use reset::PasswordResetFlow;
pub use resolver::{ContentRecord, ContentResolver};
pub use types::{
    Book, BookLength, BookSummary, Category, CategoryInfo, RenderableContent, User, UserProfile,
};
