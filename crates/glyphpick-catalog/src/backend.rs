//! The catalog backend trait and its test double.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

use glyphpick_types::{IconRecord, SearchQuery};

use crate::error::{CatalogError, Result};

/// A raw icon as the catalog reports it, before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIcon {
    /// Catalog icon id.
    pub id: i64,
    /// Icon name (may be empty).
    #[serde(default)]
    pub name: String,
    /// CSS font class.
    #[serde(default)]
    pub font_class: Option<String>,
    /// Unicode code point string.
    #[serde(default)]
    pub unicode: Option<String>,
    /// Inline SVG markup.
    #[serde(default)]
    pub show_svg: Option<String>,
    /// Preview image URL.
    #[serde(default)]
    pub icon: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
}

impl From<RawIcon> for IconRecord {
    fn from(raw: RawIcon) -> Self {
        let mut record = IconRecord::new(raw.id, raw.name);
        record.font_class = raw.font_class;
        record.unicode = raw.unicode;
        record.svg_content = raw.show_svg.filter(|s| !s.is_empty());
        record.preview_url = raw.icon.filter(|s| !s.is_empty());
        if let Some(category) = raw.category.filter(|s| !s.is_empty()) {
            record.tags.push(category);
        }
        record
    }
}

/// One page of raw results from the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    /// Total matches across all pages, as reported by the catalog.
    pub total_count: u64,
    /// Raw icons on this page, in catalog order.
    pub icons: Vec<RawIcon>,
}

/// Fetches one page of results for a query from the external catalog.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Execute the query against the catalog.
    async fn search(&self, query: &SearchQuery) -> Result<CatalogPage>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &str;
}

/// In-memory catalog backend for tests.
///
/// Returns a fixed page (or a fixed failure) and counts how many times
/// it was called, so tests can assert the cache short-circuited.
pub struct MockCatalog {
    icons: Vec<RawIcon>,
    fail_with_code: Option<i64>,
    calls: AtomicUsize,
}

impl MockCatalog {
    /// A mock that returns the given raw icons on every call.
    pub fn with_icons(icons: Vec<RawIcon>) -> Self {
        Self {
            icons,
            fail_with_code: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock that returns `n` generated icons on every call.
    pub fn with_generated(n: i64) -> Self {
        Self::with_icons(
            (0..n)
                .map(|i| RawIcon {
                    id: i,
                    name: format!("icon-{i}"),
                    show_svg: Some(format!("<svg><!-- {i} --></svg>")),
                    ..Default::default()
                })
                .collect(),
        )
    }

    /// A mock that fails every call with the given upstream code.
    pub fn failing(code: i64) -> Self {
        Self {
            icons: Vec::new(),
            fail_with_code: Some(code),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `search` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogBackend for MockCatalog {
    async fn search(&self, _query: &SearchQuery) -> Result<CatalogPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(code) = self.fail_with_code {
            return Err(CatalogError::Upstream { code });
        }
        Ok(CatalogPage {
            total_count: self.icons.len() as u64,
            icons: self.icons.clone(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
