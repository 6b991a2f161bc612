//! Simple example of using reqwest-dispatch.

use reqwest_dispatch::{
    fetch_with_timeout, install_global_from_env, is_private_address, set_global_proxy,
    DispatchMiddleware,
};
use reqwest_middleware::ClientBuilder;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // An explicit proxy argument wins over HTTPS_PROXY and friends,
    // e.g. `socks5://127.0.0.1:1080` or `http://127.0.0.1:8080`.
    match std::env::args().nth(1) {
        Some(proxy_url) => set_global_proxy(&proxy_url),
        None => {
            if !install_global_from_env() {
                println!("No proxy configured, connecting directly");
            }
        }
    }

    let target = "https://httpbin.org/ip";
    if is_private_address(target) {
        println!("Refusing to fetch private address {}", target);
        return Ok(());
    }

    println!("Sending request...");
    let response = fetch_with_timeout(target, Duration::from_secs(10)).await?;
    println!("Status: {}", response.status());
    println!("Response: {}", response.text().await?);

    // The same dispatcher, reached through a middleware client.
    let client = ClientBuilder::new(reqwest::Client::new())
        .with(DispatchMiddleware::new().timeout(Duration::from_secs(10)))
        .build();
    let response = client.get(target).send().await?;
    println!("Middleware status: {}", response.status());

    Ok(())
}
