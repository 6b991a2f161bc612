//! Outbound dispatchers and the process-wide dispatcher slot.

use crate::config::{self, DispatcherConfig};
use crate::error::FetchError;
use crate::fetch;
use crate::proxy::ProxyConfig;

use log::{debug, info, warn};
use parking_lot::RwLock;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;

/// A configured HTTP client and the proxy route it uses.
#[derive(Debug)]
pub struct Dispatcher {
    proxy: Option<ProxyConfig>,
    client: Result<Client, Arc<reqwest::Error>>,
}

impl Dispatcher {
    /// A dispatcher that connects directly, ignoring proxy environment variables.
    pub fn direct() -> Self {
        Self::from_config(&DispatcherConfig::default())
    }

    /// A dispatcher routing through `proxy_url`.
    ///
    /// Never fails here: if the proxy cannot be turned into a client, the error
    /// is returned by the first request made through this dispatcher.
    pub fn for_proxy(proxy_url: &str) -> Self {
        Self::from_config(&DispatcherConfig::builder().proxy(proxy_url).build())
    }

    /// A dispatcher built from a full configuration.
    pub fn from_config(config: &DispatcherConfig) -> Self {
        let proxy = config.proxy.as_deref().map(ProxyConfig::from_proxy_url);
        let client = build_client(config, proxy.as_ref()).map_err(Arc::new);

        if let Err(e) = &client {
            warn!(
                "Dispatcher for {} is unusable: {}",
                describe(proxy.as_ref()),
                e
            );
        }

        Self { proxy, client }
    }

    /// The proxy this dispatcher routes through, `None` when direct.
    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    /// The underlying client, or the error that prevented building it.
    pub fn client(&self) -> Result<&Client, FetchError> {
        self.client
            .as_ref()
            .map_err(|e| FetchError::Dispatcher(Arc::clone(e)))
    }

    /// GET `url` through this dispatcher, failing once `timeout` elapses.
    pub async fn fetch_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Response, FetchError> {
        let client = self.client()?;
        let request = client.get(url).build()?;
        fetch::execute_with_deadline(client, request, timeout).await
    }
}

fn build_client(
    config: &DispatcherConfig,
    proxy: Option<&ProxyConfig>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().pool_idle_timeout(config.pool_idle_timeout);

    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder = match proxy {
        Some(proxy) => builder.proxy(proxy.to_reqwest_proxy()?),
        None => builder.no_proxy(),
    };

    builder.build()
}

fn describe(proxy: Option<&ProxyConfig>) -> String {
    match proxy {
        Some(proxy) => proxy.to_string(),
        None => "direct".to_string(),
    }
}

/// Holds the active dispatcher. Installing replaces the previous one; the last
/// writer wins.
#[derive(Debug)]
pub struct DispatcherSlot {
    current: RwLock<Option<Arc<Dispatcher>>>,
}

impl DispatcherSlot {
    /// An empty slot. Reading it before anything is installed yields a direct dispatcher.
    pub const fn new() -> Self {
        Self {
            current: parking_lot::const_rwlock(None),
        }
    }

    /// Replace the active dispatcher.
    pub fn install(&self, dispatcher: Dispatcher) {
        let route = describe(dispatcher.proxy());
        let previous = self.current.write().replace(Arc::new(dispatcher));

        if let Some(previous) = previous {
            debug!("Replacing dispatcher {}", describe(previous.proxy()));
        }
        info!("Installed dispatcher: {}", route);
    }

    /// Pick a dispatcher for `proxy_url` and install it.
    pub fn set_proxy(&self, proxy_url: &str) {
        self.install(Dispatcher::for_proxy(proxy_url));
    }

    /// Install a dispatcher for the first proxy variable `lookup` yields, if any.
    pub(crate) fn set_proxy_from_lookup<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<String>,
    {
        match config::resolve_proxy_var(lookup) {
            Some(proxy_url) => {
                self.set_proxy(&proxy_url);
                true
            }
            None => false,
        }
    }

    /// The active dispatcher, installing a direct one if the slot is empty.
    pub fn current(&self) -> Arc<Dispatcher> {
        if let Some(dispatcher) = self.current.read().as_ref() {
            return Arc::clone(dispatcher);
        }

        let mut current = self.current.write();
        Arc::clone(current.get_or_insert_with(|| Arc::new(Dispatcher::direct())))
    }
}

impl Default for DispatcherSlot {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_DISPATCHER: DispatcherSlot = DispatcherSlot::new();

/// Install `dispatcher` as the process-wide default.
///
/// Concurrent callers are serialized by a lock, but which of them ends up
/// installed is unspecified: the last writer wins.
pub fn set_global_dispatcher(dispatcher: Dispatcher) {
    GLOBAL_DISPATCHER.install(dispatcher);
}

/// Route all subsequent process-wide requests through `proxy_url`.
///
/// `socks*` URLs get a SOCKS5 dispatcher; everything else, including strings
/// that do not parse as URLs, is handed to reqwest as a forwarding proxy.
/// This never fails: an unusable proxy surfaces on the first request.
pub fn set_global_proxy(proxy_url: &str) {
    GLOBAL_DISPATCHER.set_proxy(proxy_url);
}

/// Install a dispatcher for the proxy named in the environment, if there is one.
pub fn install_global_from_env() -> bool {
    GLOBAL_DISPATCHER.set_proxy_from_lookup(|name| std::env::var(name).ok())
}

/// The process-wide dispatcher.
pub fn global_dispatcher() -> Arc<Dispatcher> {
    GLOBAL_DISPATCHER.current()
}
