//! Deadline-bound requests.

use crate::dispatcher::global_dispatcher;
use crate::error::FetchError;

use log::warn;
use reqwest::{Client, Request, Response, Url};
use std::future::Future;
use std::time::Duration;
use tokio::time;

/// GET `url` through the process-wide dispatcher, failing once `timeout` elapses.
///
/// On timeout the error is [`FetchError::TimedOut`] (code `ETIMEDOUT`). Any other
/// failure keeps the original error as its source. The response is returned as
/// received; status codes are not inspected.
pub async fn fetch_with_timeout(url: &str, timeout: Duration) -> Result<Response, FetchError> {
    global_dispatcher().fetch_with_timeout(url, timeout).await
}

/// Execute `request`, abandoning it if no response arrives within `timeout`.
pub(crate) async fn execute_with_deadline(
    client: &Client,
    request: Request,
    timeout: Duration,
) -> Result<Response, FetchError> {
    let url = request.url().clone();
    with_deadline(&url, timeout, client.execute(request)).await
}

/// The deadline timer belongs to the returned future and is released on every exit.
async fn with_deadline<F, T>(url: &Url, timeout: Duration, request: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    match time::timeout(timeout, request).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(err)) => {
            warn!("Request to {} failed: {}", url, err);
            Err(FetchError::Transport(err))
        }
        Err(_) => {
            warn!(
                "Request to {} timed out after {}ms",
                url,
                timeout.as_millis()
            );
            Err(FetchError::TimedOut { timeout })
        }
    }
}
