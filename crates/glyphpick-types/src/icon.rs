//! Normalized icon records.

use serde::{Deserialize, Serialize};

/// A single icon normalized from a raw catalog response.
///
/// Immutable once constructed. `svg_content` may be absent until the
/// catalog has been asked for the full vector data; `preview_url` points
/// at the catalog's rendered thumbnail when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconRecord {
    /// Catalog-assigned icon id.
    pub id: i64,

    /// Human-readable icon name.
    pub name: String,

    /// Inline SVG markup, if the catalog returned it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_content: Option<String>,

    /// URL of a rendered preview image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,

    /// CSS font class assigned by the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_class: Option<String>,

    /// Unicode code point string (e.g. "e601") for font usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unicode: Option<String>,

    /// Free-form tags attached by the catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl IconRecord {
    /// Create a record with just an id and name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            svg_content: None,
            preview_url: None,
            font_class: None,
            unicode: None,
            tags: Vec::new(),
        }
    }

    /// Attach inline SVG content.
    pub fn with_svg(mut self, svg: impl Into<String>) -> Self {
        self.svg_content = Some(svg.into());
        self
    }

    /// Attach a preview URL.
    pub fn with_preview_url(mut self, url: impl Into<String>) -> Self {
        self.preview_url = Some(url.into());
        self
    }

    /// Whether this icon carries SVG markup that can be saved to disk.
    pub fn has_svg(&self) -> bool {
        self.svg_content.as_deref().is_some_and(|s| !s.is_empty())
    }
}
