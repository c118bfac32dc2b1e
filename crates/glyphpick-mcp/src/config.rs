//! Runtime configuration for the glyphpick server.

use std::time::Duration;

/// Default web picker port.
pub const DEFAULT_WEB_PORT: u16 = 3000;

/// Default cache TTL (30 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Default catalog request timeout.
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(30);

/// Server configuration.
///
/// Defaults come from the environment; the CLI layers its flags on top
/// via the builder methods.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the web picker binds when started without an explicit port.
    pub web_port: u16,

    /// BCP 47 language tag for the picker page.
    pub language: String,

    /// TTL applied to cached search results.
    pub cache_ttl: Duration,

    /// Timeout for catalog HTTP requests.
    pub catalog_timeout: Duration,

    /// Start the web picker automatically on the first search.
    pub auto_start_web: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            web_port: DEFAULT_WEB_PORT,
            language: "en".to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
            auto_start_web: true,
        }
    }
}

impl ServerConfig {
    /// Create a config from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = env_parse::<u16>("GLYPHPICK_WEB_PORT") {
            config.web_port = port;
        }
        if let Ok(lang) = std::env::var("GLYPHPICK_LANGUAGE") {
            if !lang.is_empty() {
                config.language = lang;
            }
        }
        if let Some(secs) = env_parse::<u64>("GLYPHPICK_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parse::<u64>("GLYPHPICK_CATALOG_TIMEOUT_SECS") {
            config.catalog_timeout = Duration::from_secs(secs);
        }
        if let Some(auto) = env_parse::<bool>("GLYPHPICK_AUTO_START_WEB") {
            config.auto_start_web = auto;
        }

        config
    }

    /// Set the web picker port.
    pub fn with_web_port(mut self, port: u16) -> Self {
        self.web_port = port;
        self
    }

    /// Set the picker language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the catalog request timeout.
    pub fn with_catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = timeout;
        self
    }

    /// Enable or disable auto-starting the picker on first search.
    pub fn with_auto_start_web(mut self, enabled: bool) -> Self {
        self.auto_start_web = enabled;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}
