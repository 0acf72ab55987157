use serde::{Deserialize, Serialize};

/// What the reading view renders: either a PDF handed to an external viewer
/// or a block of text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderableContent {
    Pdf { uri: String },
    Text { body: String },
}

impl RenderableContent {
    pub fn pdf(uri: impl Into<String>) -> Self {
        RenderableContent::Pdf { uri: uri.into() }
    }

    pub fn text(body: impl Into<String>) -> Self {
        RenderableContent::Text { body: body.into() }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, RenderableContent::Pdf { .. })
    }
}
