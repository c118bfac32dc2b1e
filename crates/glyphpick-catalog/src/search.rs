//! Search orchestration over the catalog and the cache.

use std::sync::Arc;

use tracing::{debug, info};

use glyphpick_cache::TtlCache;
use glyphpick_types::{IconRecord, SearchQuery, SearchResult};

use crate::backend::CatalogBackend;
use crate::error::{CatalogError, Result};

/// Well-known cache key for the most recent result set.
///
/// The web picker has no query of its own; it renders whatever the agent
/// searched for last, which the orchestrator publishes under this key.
pub const LATEST_RESULT_KEY: &str = "search:latest";

/// Largest page size the catalog accepts.
const MAX_PAGE_SIZE: u32 = 100;

/// Cache-fronted search over a [`CatalogBackend`].
pub struct IconSearcher {
    backend: Arc<dyn CatalogBackend>,
    cache: Arc<TtlCache<SearchResult>>,
}

impl IconSearcher {
    /// Create a searcher over the given backend and cache.
    pub fn new(backend: Arc<dyn CatalogBackend>, cache: Arc<TtlCache<SearchResult>>) -> Self {
        Self { backend, cache }
    }

    /// The cache this searcher stores results in.
    pub fn cache(&self) -> &Arc<TtlCache<SearchResult>> {
        &self.cache
    }

    /// Search the catalog, serving from cache when possible.
    ///
    /// On a miss the raw catalog page is normalized into [`IconRecord`]s
    /// and cached under the query's deterministic key. Upstream failures
    /// propagate to the caller and are never cached, so the next attempt
    /// goes back to the catalog.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        validate(query)?;

        let key = query.cache_key();
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, count = hit.len(), "search served from cache");
            return Ok(hit);
        }

        let page = self.backend.search(query).await?;
        let icons: Vec<IconRecord> = page.icons.into_iter().map(IconRecord::from).collect();

        let result = SearchResult {
            query: query.q.clone(),
            page: query.page,
            page_size: query.page_size,
            total_count: page.total_count,
            icons,
        };

        self.cache.put(&key, result.clone());
        self.cache.put(LATEST_RESULT_KEY, result.clone());

        info!(
            backend = self.backend.name(),
            q = %query.q,
            count = result.len(),
            total = result.total_count,
            "catalog search completed"
        );
        Ok(result)
    }

    /// The most recently fetched result set, if still cached.
    pub fn latest_result(&self) -> Option<SearchResult> {
        self.cache.get(LATEST_RESULT_KEY)
    }
}

fn validate(query: &SearchQuery) -> Result<()> {
    if query.page < 1 {
        return Err(CatalogError::invalid_query("page must be >= 1"));
    }
    if query.page_size < 1 || query.page_size > MAX_PAGE_SIZE {
        return Err(CatalogError::invalid_query(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockCatalog;

    fn searcher_with(mock: Arc<MockCatalog>) -> IconSearcher {
        IconSearcher::new(mock, Arc::new(TtlCache::new()))
    }

    #[tokio::test]
    async fn test_identical_queries_hit_backend_once() {
        let mock = Arc::new(MockCatalog::with_generated(5));
        let searcher = searcher_with(Arc::clone(&mock));
        let query = SearchQuery::new("home");

        let first = searcher.search(&query).await.unwrap();
        let second = searcher.search(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_distinct_pages_are_distinct_entries() {
        let mock = Arc::new(MockCatalog::with_generated(5));
        let searcher = searcher_with(Arc::clone(&mock));

        searcher.search(&SearchQuery::new("home")).await.unwrap();
        searcher
            .search(&SearchQuery::new("home").with_page(2))
            .await
            .unwrap();

        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let mock = Arc::new(MockCatalog::failing(500));
        let searcher = searcher_with(Arc::clone(&mock));
        let query = SearchQuery::new("home");

        assert!(matches!(
            searcher.search(&query).await,
            Err(CatalogError::Upstream { code: 500 })
        ));
        assert!(searcher.search(&query).await.is_err());
        // Both attempts went to the backend; nothing was cached.
        assert_eq!(mock.calls(), 2);
        assert!(searcher.latest_result().is_none());
    }

    #[tokio::test]
    async fn test_latest_result_tracks_most_recent_search() {
        let mock = Arc::new(MockCatalog::with_generated(3));
        let searcher = searcher_with(mock);

        assert!(searcher.latest_result().is_none());
        let result = searcher.search(&SearchQuery::new("cart")).await.unwrap();
        assert_eq!(searcher.latest_result().unwrap(), result);
    }

    #[tokio::test]
    async fn test_query_validation() {
        let mock = Arc::new(MockCatalog::with_generated(1));
        let searcher = searcher_with(Arc::clone(&mock));

        let bad_page = SearchQuery::new("x").with_page(0);
        assert!(matches!(
            searcher.search(&bad_page).await,
            Err(CatalogError::InvalidQuery(_))
        ));

        let bad_size = SearchQuery::new("x").with_page_size(101);
        assert!(matches!(
            searcher.search(&bad_size).await,
            Err(CatalogError::InvalidQuery(_))
        ));

        // Validation failures never reach the backend.
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_normalization_applies_on_miss() {
        let mock = Arc::new(MockCatalog::with_generated(2));
        let searcher = searcher_with(mock);

        let result = searcher.search(&SearchQuery::new("x")).await.unwrap();
        assert!(result.icons.iter().all(|i| i.has_svg()));
        assert_eq!(result.icons[0].name, "icon-0");
    }
}
