//! Middleware implementation for reqwest.

use crate::dispatcher::{global_dispatcher, Dispatcher};
use crate::error::FetchError;
use crate::fetch;

use anyhow::anyhow;
use async_trait::async_trait;
use log::debug;
use reqwest_middleware::{Error, Middleware, Next, Result};
use std::sync::Arc;
use std::time::Duration;

/// Middleware that sends requests through a dispatcher instead of the wrapped client.
///
/// By default the process-wide dispatcher is looked up for every request, so a
/// later `set_global_proxy` takes effect immediately.
#[derive(Clone, Default)]
pub struct DispatchMiddleware {
    /// Dispatcher to use; `None` follows the global one.
    dispatcher: Option<Arc<Dispatcher>>,
    /// Deadline applied to each request.
    timeout: Option<Duration>,
}

impl DispatchMiddleware {
    /// Follow the process-wide dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always use `dispatcher`, whatever is installed globally.
    pub fn with_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher: Some(dispatcher),
            timeout: None,
        }
    }

    /// Fail requests that take longer than `timeout` with `ETIMEDOUT`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Middleware for DispatchMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        _extensions: &mut http::Extensions,
        _next: Next<'_>,
    ) -> Result<reqwest::Response> {
        let dispatcher = match &self.dispatcher {
            Some(dispatcher) => Arc::clone(dispatcher),
            None => global_dispatcher(),
        };
        let client = dispatcher.client().map_err(into_middleware_error)?;

        debug!("Dispatching {} {}", req.method(), req.url());

        match self.timeout {
            Some(timeout) => fetch::execute_with_deadline(client, req, timeout)
                .await
                .map_err(into_middleware_error),
            None => client.execute(req).await.map_err(Error::Reqwest),
        }
    }
}

fn into_middleware_error(err: FetchError) -> Error {
    match err {
        FetchError::Transport(e) => Error::Reqwest(e),
        other => Error::Middleware(anyhow!(other)),
    }
}
