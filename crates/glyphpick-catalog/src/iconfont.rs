//! iconfont.cn backend implementation.
//!
//! The catalog exposes a form-POST search endpoint that expects
//! browser-like headers and wraps its payload in a `{code, data}`
//! envelope; `code == 200` signals success.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use glyphpick_types::SearchQuery;

use crate::backend::{CatalogBackend, CatalogPage, RawIcon};
use crate::error::{CatalogError, Result};

/// Default search endpoint.
const DEFAULT_API_BASE: &str = "https://www.iconfont.cn/api/icon/search.json";

/// Default timeout for catalog requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Desktop-browser user agent; the catalog rejects obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the iconfont.cn backend.
#[derive(Debug, Clone)]
pub struct IconfontConfig {
    /// Search endpoint URL.
    pub api_url: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for IconfontConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl IconfontConfig {
    /// Create a config with default endpoint and timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom endpoint URL (useful for tests).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP backend for iconfont.cn.
pub struct IconfontBackend {
    client: Client,
    config: IconfontConfig,
}

impl IconfontBackend {
    /// Create a backend with the given configuration.
    pub fn new(config: IconfontConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Build the form body for a query.
    ///
    /// `t` and `ctoken` mimic what the catalog's own web client sends.
    fn form_fields(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);

        vec![
            ("q", query.q.clone()),
            ("sortType", query.sort.as_str().to_string()),
            ("page", query.page.to_string()),
            ("pageSize", query.page_size.to_string()),
            ("sType", query.style_filter.clone().unwrap_or_default()),
            ("fromCollection", "-1".to_string()),
            ("fills", query.fills.clone().unwrap_or_default()),
            ("t", millis.to_string()),
            ("ctoken", "null".to_string()),
        ]
    }
}

#[async_trait]
impl CatalogBackend for IconfontBackend {
    async fn search(&self, query: &SearchQuery) -> Result<CatalogPage> {
        debug!(q = %query.q, page = query.page, "querying iconfont catalog");

        let response = self
            .client
            .post(&self.config.api_url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json")
            .header(header::ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9,en;q=0.8")
            .header(header::REFERER, "https://www.iconfont.cn/")
            .header(header::ORIGIN, "https://www.iconfont.cn")
            .form(&Self::form_fields(query))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let envelope: ApiEnvelope =
            serde_json::from_str(&body).map_err(|e| CatalogError::decode(e.to_string()))?;

        if envelope.code != 200 {
            return Err(CatalogError::Upstream {
                code: envelope.code,
            });
        }

        let data = envelope.data.unwrap_or_default();
        Ok(CatalogPage {
            total_count: data.count,
            icons: data.icons,
        })
    }

    fn name(&self) -> &str {
        "iconfont"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    code: i64,
    #[serde(default)]
    data: Option<ApiData>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiData {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    icons: Vec<RawIcon>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_carry_query_params() {
        let query = SearchQuery::new("home").with_page(2).with_page_size(50);
        let fields = IconfontBackend::form_fields(&query);

        let lookup = |k: &str| {
            fields
                .iter()
                .find(|(key, _)| *key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(lookup("q"), Some("home"));
        assert_eq!(lookup("page"), Some("2"));
        assert_eq!(lookup("pageSize"), Some("50"));
        assert_eq!(lookup("sortType"), Some("recommend"));
        assert_eq!(lookup("fromCollection"), Some("-1"));
        assert_eq!(lookup("ctoken"), Some("null"));
    }

    #[test]
    fn test_envelope_parsing() {
        let body = r#"{
            "code": 200,
            "data": {
                "count": 2,
                "icons": [
                    {"id": 1, "name": "a", "show_svg": "<svg/>"},
                    {"id": 2, "name": "b"}
                ]
            }
        }"#;
        let envelope: ApiEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.code, 200);
        let data = envelope.data.unwrap();
        assert_eq!(data.count, 2);
        assert_eq!(data.icons.len(), 2);
        assert_eq!(data.icons[0].show_svg.as_deref(), Some("<svg/>"));
    }

    #[test]
    fn test_error_envelope() {
        let body = r#"{"code": 403}"#;
        let envelope: ApiEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.code, 403);
        assert!(envelope.data.is_none());
    }
}
