//! Connection settings, read from the environment or built in code.

use std::{env, time::Duration};

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_BASE_PATH: &str = "/api";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MIN_TIMEOUT_SECONDS: u64 = 3;

/// Connection settings for a [`NewsContext`](crate::NewsContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsConfig {
    /// Server origin, e.g. `https://news.example.com`.
    pub api_url: String,
    /// Prefix every endpoint lives under.
    pub base_path: String,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// Transport timeout per request.
    pub timeout: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            headers: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl NewsConfig {
    /// Defaults pointed at `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Read `NNEWS_API_URL`, `NNEWS_API_BASE_PATH`, `NNEWS_API_TOKEN` and
    /// `NNEWS_HTTP_TIMEOUT_SECONDS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`NewsConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(api_url) = read("NNEWS_API_URL") {
            config.api_url = api_url;
        }
        if let Some(base_path) = read("NNEWS_API_BASE_PATH") {
            config.base_path = base_path;
        }
        if let Some(token) = read("NNEWS_API_TOKEN") {
            config = config.with_bearer_token(token);
        }
        let timeout = read("NNEWS_HTTP_TIMEOUT_SECONDS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
            .max(MIN_TIMEOUT_SECONDS);
        config.timeout = Duration::from_secs(timeout);
        config
    }

    /// Add a header sent with every request, replacing one of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Send `Authorization: Bearer <token>`.
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let header = format!("Bearer {}", token.as_ref().trim());
        self.with_header("Authorization", header)
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `api_url` joined with `base_path`, without a trailing slash.
    pub fn endpoint_base(&self) -> String {
        let origin = self.api_url.trim().trim_end_matches('/');
        let path = self.base_path.trim().trim_matches('/');
        if path.is_empty() {
            origin.to_string()
        } else {
            format!("{origin}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("NNEWS_API_URL", "https://news.example.com/"),
            ("NNEWS_API_TOKEN", " abc "),
            ("NNEWS_HTTP_TIMEOUT_SECONDS", "1"),
            ("NNEWS_API_BASE_PATH", "  "),
        ]);
        let config = NewsConfig::from_lookup(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.endpoint_base(), "https://news.example.com/api");
        assert_eq!(config.headers, vec![("Authorization".to_string(), "Bearer abc".to_string())]);
        assert_eq!(config.timeout, Duration::from_secs(MIN_TIMEOUT_SECONDS));
    }

    #[test]
    fn empty_base_path_uses_the_origin() {
        let config = NewsConfig {
            base_path: "/".to_string(),
            ..NewsConfig::new("http://localhost:8080")
        };
        assert_eq!(config.endpoint_base(), "http://localhost:8080");
    }

    #[test]
    fn headers_replace_case_insensitively() {
        let config = NewsConfig::default()
            .with_header("x-tenant", "a")
            .with_header("X-Tenant", "b");
        assert_eq!(config.headers, vec![("X-Tenant".to_string(), "b".to_string())]);
    }
}
