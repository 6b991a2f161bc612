//! Configuration for dispatchers.

use std::time::Duration;

/// Environment variables consulted for a proxy URL, in priority order.
pub const PROXY_ENV_VARS: [&str; 6] = [
    "HTTPS_PROXY",
    "https_proxy",
    "HTTP_PROXY",
    "http_proxy",
    "ALL_PROXY",
    "all_proxy",
];

/// Configuration for a dispatcher's HTTP client.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Proxy URL to route through; `None` connects directly.
    pub proxy: Option<String>,
    /// Timeout for establishing connections.
    pub connect_timeout: Option<Duration>,
    /// How long idle pooled connections are kept.
    pub pool_idle_timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: Option<String>,
}

impl DispatcherConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::new()
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfigBuilder::new().build()
    }
}

/// Builder for `DispatcherConfig`.
pub struct DispatcherConfigBuilder {
    proxy: Option<String>,
    connect_timeout: Option<Duration>,
    pool_idle_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl DispatcherConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            proxy: None,
            connect_timeout: None,
            pool_idle_timeout: None,
            user_agent: None,
        }
    }

    /// Route requests through the given proxy URL.
    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy = Some(proxy_url.into());
        self
    }

    /// Use the proxy named by the environment, if any.
    pub fn proxy_from_env(self) -> Self {
        self.proxy_from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn proxy_from_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(proxy_url) = resolve_proxy_var(lookup) {
            self.proxy = Some(proxy_url);
        }
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set how long idle connections stay pooled.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DispatcherConfig {
        DispatcherConfig {
            proxy: self.proxy,
            connect_timeout: self.connect_timeout,
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(Duration::from_secs(90)),
            user_agent: self.user_agent,
        }
    }
}

impl Default for DispatcherConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Proxy URL from the first non-empty variable in [`PROXY_ENV_VARS`].
pub fn proxy_url_from_env() -> Option<String> {
    resolve_proxy_var(|name| std::env::var(name).ok())
}

pub(crate) fn resolve_proxy_var<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    PROXY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn builder_defaults() {
        let config = DispatcherConfig::builder().build();
        assert!(config.proxy.is_none());
        assert!(config.connect_timeout.is_none());
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(90));
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = DispatcherConfig::builder()
            .proxy("socks5://127.0.0.1:9050")
            .connect_timeout(Duration::from_secs(3))
            .pool_idle_timeout(Duration::from_secs(10))
            .user_agent("dispatch-test/1.0")
            .build();
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:9050"));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent.as_deref(), Some("dispatch-test/1.0"));
    }

    #[test]
    fn https_proxy_wins_over_http_proxy() {
        let vars: HashMap<&str, &str> = [
            ("HTTP_PROXY", "http://plain.example.com:3128"),
            ("https_proxy", "http://secure.example.com:3128"),
        ]
        .into_iter()
        .collect();
        let found = resolve_proxy_var(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(found.as_deref(), Some("http://secure.example.com:3128"));
    }

    #[test]
    fn blank_values_are_skipped() {
        let vars: HashMap<&str, &str> = [
            ("HTTPS_PROXY", "  "),
            ("all_proxy", "socks5://127.0.0.1:1080"),
        ]
        .into_iter()
        .collect();
        let found = resolve_proxy_var(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(found.as_deref(), Some("socks5://127.0.0.1:1080"));
    }

    #[test]
    fn nothing_set() {
        assert_eq!(resolve_proxy_var(|_| None), None);
    }

    #[test]
    fn builder_takes_proxy_from_lookup() {
        let config = DispatcherConfig::builder()
            .proxy_from_lookup(|name| {
                (name == "http_proxy").then(|| "http://proxy.example.com:8080".to_string())
            })
            .build();
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.example.com:8080"));
    }

    #[test]
    fn empty_lookup_keeps_explicit_proxy() {
        let config = DispatcherConfig::builder()
            .proxy("socks5://127.0.0.1:1080")
            .proxy_from_lookup(|_| None)
            .build();
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
    }
}
