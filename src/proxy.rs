//! Proxy URL classification.

use std::fmt;

use url::Url;

/// Port used for SOCKS proxies whose URL carries no port.
pub const DEFAULT_SOCKS_PORT: u16 = 1080;

/// SOCKS protocol version used for every `socks*` scheme.
pub const SOCKS_VERSION: u8 = 5;

/// Connection settings for a SOCKS proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocksConfig {
    /// Protocol version; always [`SOCKS_VERSION`], `socks4://` included.
    pub version: u8,
    /// Proxy host as written in the URL.
    pub host: String,
    /// Proxy port, [`DEFAULT_SOCKS_PORT`] when absent or zero.
    pub port: u16,
    /// Username, empty when the URL has none.
    pub user_id: String,
    /// Password, empty when the URL has none.
    pub password: String,
}

impl SocksConfig {
    fn from_url(url: &Url) -> Self {
        Self {
            version: SOCKS_VERSION,
            host: url.host_str().unwrap_or_default().to_string(),
            port: url.port().filter(|&p| p != 0).unwrap_or(DEFAULT_SOCKS_PORT),
            user_id: url.username().to_string(),
            password: url.password().unwrap_or_default().to_string(),
        }
    }

    /// Render as a `socks5h://` URL so the proxy resolves target hostnames.
    ///
    /// Credentials are written as stored, which for configs parsed from a URL
    /// means already percent-encoded.
    pub fn to_proxy_url(&self) -> String {
        let userinfo = match (self.user_id.is_empty(), self.password.is_empty()) {
            (true, true) => String::new(),
            (false, true) => format!("{}@", self.user_id),
            _ => format!("{}:{}@", self.user_id, self.password),
        };
        format!("socks5h://{}{}:{}", userinfo, self.host, self.port)
    }
}

/// How outbound requests reach the network through a proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyConfig {
    /// Tunnel through a SOCKS proxy.
    Socks(SocksConfig),
    /// Forward through an HTTP(S) proxy, built from the raw proxy string.
    Forward(String),
}

impl ProxyConfig {
    /// Classify a proxy URL.
    ///
    /// Any scheme starting with `socks` yields [`ProxyConfig::Socks`]. Every other
    /// scheme, and any string that does not parse as a URL, is kept verbatim as
    /// [`ProxyConfig::Forward`]; whether it is usable is decided when the
    /// dispatcher is built.
    pub fn from_proxy_url(proxy_url: &str) -> Self {
        match Url::parse(proxy_url) {
            Ok(url) if url.scheme().starts_with("socks") => {
                ProxyConfig::Socks(SocksConfig::from_url(&url))
            }
            _ => ProxyConfig::Forward(proxy_url.to_string()),
        }
    }

    /// Convert to a reqwest proxy covering all schemes.
    pub fn to_reqwest_proxy(&self) -> Result<reqwest::Proxy, reqwest::Error> {
        match self {
            ProxyConfig::Socks(socks) => reqwest::Proxy::all(socks.to_proxy_url()),
            ProxyConfig::Forward(raw) => reqwest::Proxy::all(raw.as_str()),
        }
    }
}

/// Displays the proxy route with credentials removed.
impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyConfig::Socks(socks) => {
                write!(f, "socks{}://{}:{}", socks.version, socks.host, socks.port)
            }
            ProxyConfig::Forward(raw) => match Url::parse(raw) {
                Ok(mut url) => {
                    let _ = url.set_username("");
                    let _ = url.set_password(None);
                    write!(f, "{}", url)
                }
                Err(_) => write!(f, "{}", raw),
            },
        }
    }
}
