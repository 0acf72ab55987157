//! CLI command implementations

mod browse;
mod categories;
mod render;
mod resolve;

pub use browse::browse;
pub use categories::categories;
pub use render::render_pdf;
pub use resolve::resolve;
