//! # reqwest-dispatch
//!
//! Outbound request helpers for reqwest.
//!
//! This library installs a process-wide dispatcher chosen from a proxy URL
//! (SOCKS5 for `socks*` schemes, a forwarding proxy otherwise), performs
//! fetches bounded by a deadline, and classifies URLs that point at private
//! or loopback addresses.

pub mod address;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fetch;
pub mod middleware;
pub mod proxy;
#[cfg(test)]
mod test_support;

pub use address::is_private_address;
pub use config::{proxy_url_from_env, DispatcherConfig, DispatcherConfigBuilder};
pub use dispatcher::{
    global_dispatcher, install_global_from_env, set_global_dispatcher, set_global_proxy, Dispatcher,
    DispatcherSlot,
};
pub use error::{FetchError, ETIMEDOUT};
pub use fetch::fetch_with_timeout;
pub use middleware::DispatchMiddleware;
pub use proxy::{ProxyConfig, SocksConfig};
