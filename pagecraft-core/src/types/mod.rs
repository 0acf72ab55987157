//! Core domain types

mod book;
mod category;
mod content;
mod user;

pub use book::{Book, BookLength, BookSummary};
pub use category::{categories, Category, CategoryInfo};
pub use content::RenderableContent;
pub use user::{User, UserProfile};
