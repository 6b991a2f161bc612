//! Private address classification.
//!
//! Works on the literal host of a URL. Names are never resolved, so a public
//! looking hostname that resolves to a private address is not detected.

use url::{Host, Url};

/// Host prefixes treated as private, loopback or link-local.
const PRIVATE_PREFIXES: [&str; 5] = ["10.", "127.", "192.168.", "fc00:", "fe80:"];

/// Whether the host of `url` is a private, loopback or link-local address.
///
/// Returns `false` for anything that does not parse as a URL with a host.
pub fn is_private_address(url: &str) -> bool {
    let Ok(url) = Url::parse(url) else {
        return false;
    };

    match url.host() {
        Some(Host::Domain(domain)) => is_private_host(domain),
        Some(Host::Ipv4(ip)) => is_private_host(&ip.to_string()),
        Some(Host::Ipv6(ip)) => is_private_host(&ip.to_string()),
        None => false,
    }
}

fn is_private_host(host: &str) -> bool {
    host == "::1"
        || PRIVATE_PREFIXES.iter().any(|p| host.starts_with(p))
        || is_private_172_range(host)
}

/// 172.16.0.0/12
fn is_private_172_range(host: &str) -> bool {
    host.strip_prefix("172.")
        .and_then(|rest| rest.split_once('.'))
        .and_then(|(second_octet, _)| second_octet.parse::<u8>().ok())
        .is_some_and(|octet| (16..=31).contains(&octet))
}
