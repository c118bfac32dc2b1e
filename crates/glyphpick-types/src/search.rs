//! Search queries and result sets.

use serde::{Deserialize, Serialize};

use crate::icon::IconRecord;

/// Sort order accepted by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Catalog relevance ranking.
    #[default]
    Recommend,
    /// Most recently updated first.
    UpdatedAt,
}

impl SortOrder {
    /// Wire name used by the catalog API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Recommend => "recommend",
            SortOrder::UpdatedAt => "updated_at",
        }
    }

    /// Parse a sort order from its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommend" => Some(SortOrder::Recommend),
            "updated_at" => Some(SortOrder::UpdatedAt),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized catalog search query.
///
/// Two queries with identical normalized parameters produce identical
/// [`cache_key`](SearchQuery::cache_key)s, which is what makes the cache
/// layer deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search keyword.
    pub q: String,

    /// Sort order.
    #[serde(default)]
    pub sort: SortOrder,

    /// 1-based page number.
    pub page: u32,

    /// Results per page (catalog caps this at 100).
    pub page_size: u32,

    /// Optional icon-type filter (catalog `sType`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_filter: Option<String>,

    /// Optional fills filter (mono vs multicolor).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<String>,
}

impl SearchQuery {
    /// Create a query with default paging (page 1, 100 per page).
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into().trim().to_string(),
            sort: SortOrder::default(),
            page: 1,
            page_size: 100,
            style_filter: None,
            fills: None,
        }
    }

    /// Set the page number.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the sort order.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Deterministic cache key derived from the normalized parameter tuple.
    pub fn cache_key(&self) -> String {
        format!(
            "search:{}:{}:{}:{}:{}:{}",
            self.q,
            self.sort,
            self.page,
            self.page_size,
            self.style_filter.as_deref().unwrap_or(""),
            self.fills.as_deref().unwrap_or(""),
        )
    }
}

/// An ordered result set for one catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The keyword this result set answers.
    pub query: String,

    /// Page number the catalog was asked for.
    pub page: u32,

    /// Page size the catalog was asked for.
    pub page_size: u32,

    /// Total matches reported by the catalog (across all pages).
    pub total_count: u64,

    /// Normalized icons, in catalog order.
    pub icons: Vec<IconRecord>,
}

impl SearchResult {
    /// Number of icons in this result set.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether this result set is empty.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Slice this result set into a UI page.
    ///
    /// Pages are 1-based; an out-of-range page yields an empty slice with
    /// correct totals so the UI can still render its pager.
    pub fn paginate(&self, page: u32, page_size: u32) -> ResultsPage {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let start = ((page - 1) as usize).saturating_mul(page_size as usize);
        let end = start.saturating_add(page_size as usize).min(self.icons.len());
        let icons = if start < self.icons.len() {
            self.icons[start..end].to_vec()
        } else {
            Vec::new()
        };
        let total_pages = (self.icons.len() as u32).div_ceil(page_size).max(1);

        ResultsPage {
            count: icons.len(),
            icons,
            page,
            page_size,
            total_pages,
            total_count: self.total_count,
        }
    }
}

/// One UI page sliced out of a [`SearchResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsPage {
    /// Icons on this page.
    pub icons: Vec<IconRecord>,
    /// Number of icons on this page.
    pub count: usize,
    /// 1-based page number.
    pub page: u32,
    /// Page size used for slicing.
    pub page_size: u32,
    /// Total number of UI pages.
    pub total_pages: u32,
    /// Total matches reported by the catalog.
    pub total_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(n: i64) -> SearchResult {
        SearchResult {
            query: "home".into(),
            page: 1,
            page_size: 100,
            total_count: n as u64,
            icons: (0..n).map(|i| IconRecord::new(i, format!("icon-{i}"))).collect(),
        }
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let a = SearchQuery::new("home").with_page(2).with_page_size(20);
        let b = SearchQuery::new("home").with_page(2).with_page_size(20);
        assert_eq!(a.cache_key(), b.cache_key());

        let c = SearchQuery::new("home").with_page(3).with_page_size(20);
        assert_ne!(a.cache_key(), c.cache_key());
    }

    #[test]
    fn test_query_trims_keyword() {
        let q = SearchQuery::new("  arrow  ");
        assert_eq!(q.q, "arrow");
    }

    #[test]
    fn test_paginate_slices_in_order() {
        let result = result_with(35);
        let page = result.paginate(2, 15);
        assert_eq!(page.icons.len(), 15);
        assert_eq!(page.icons[0].id, 15);
        assert_eq!(page.total_pages, 3);

        let last = result.paginate(3, 15);
        assert_eq!(last.icons.len(), 5);
    }

    #[test]
    fn test_paginate_out_of_range() {
        let result = result_with(10);
        let page = result.paginate(9, 15);
        assert!(page.icons.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_count, 10);
    }

    #[test]
    fn test_sort_order_round_trip() {
        assert_eq!(SortOrder::from_name("updated_at"), Some(SortOrder::UpdatedAt));
        assert_eq!(SortOrder::from_name("bogus"), None);
        assert_eq!(SortOrder::Recommend.to_string(), "recommend");
    }
}
