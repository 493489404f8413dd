//! API client
//!
//! [`ApiClient`] owns a [`ClientConfig`] and a transport stack assembled from
//! it. Verb methods dispatch one request and project the response; paged
//! methods drive a [`Pager`](crate::pagination::Pager) until it runs out of
//! pages.
//!
//! ```rust,ignore
//! use apikit::{ApiClient, ClientConfig, RequestOptions};
//!
//! let client = ApiClient::new(
//!     ClientConfig::builder()
//!         .endpoint("https://api.example.com/v1")
//!         .access_token("...")
//!         .build(),
//! )?;
//!
//! let user = client.get("users/42", &RequestOptions::new()).await?;
//! let repos = client.get_paged("users/42/repos", &RequestOptions::new()).await?;
//! ```

mod dispatch;
mod facade;
mod login;
mod paged;
mod projector;

pub use facade::ApiWrapper;

use crate::config::ClientConfig;
use crate::entity::Wrapped;
use crate::error::Result;
use crate::http::{HttpClient, HttpRequest, HttpResponse, Logged, RateGate, Throttled, Transport};
use crate::types::{Method, RequestOptions};
use std::sync::Arc;
use tracing::debug;

/// Pre-send hook.
///
/// Runs after the URL and default headers are set and before the
/// `Content-Type` header and body are finalized. The hook may borrow
/// caller state for `'a`.
pub type RequestHook<'a> = dyn Fn(&mut HttpRequest) + Send + Sync + 'a;

/// Per-call overrides
#[derive(Clone, Copy, Default)]
pub struct Call<'a> {
    /// Return the raw response instead of projected data.
    ///
    /// Defaults to `false` for GET/DELETE and `true` for POST/PUT.
    pub raw: Option<bool>,
    /// Hook run on the outgoing request
    pub customize: Option<&'a RequestHook<'a>>,
}

impl<'a> Call<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the raw flag
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = Some(raw);
        self
    }

    /// Set the pre-send hook
    pub fn customize(mut self, hook: &'a RequestHook<'a>) -> Self {
        self.customize = Some(hook);
        self
    }
}

impl std::fmt::Debug for Call<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("raw", &self.raw)
            .field("customize", &self.customize.is_some())
            .finish()
    }
}

/// Result of a verb call
#[derive(Debug, Clone)]
pub enum Reply {
    /// The response as received
    Raw(HttpResponse),
    /// Payload wrapped by the entity factory; `None` for an absent payload
    Data(Option<Wrapped>),
}

impl Reply {
    pub fn is_raw(&self) -> bool {
        matches!(self, Reply::Raw(_))
    }

    /// Projected data, if this is not a raw reply
    pub fn data(&self) -> Option<&Wrapped> {
        match self {
            Reply::Data(data) => data.as_ref(),
            Reply::Raw(_) => None,
        }
    }

    pub fn into_data(self) -> Option<Wrapped> {
        match self {
            Reply::Data(data) => data,
            Reply::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&HttpResponse> {
        match self {
            Reply::Raw(response) => Some(response),
            Reply::Data(_) => None,
        }
    }

    pub fn into_raw(self) -> Option<HttpResponse> {
        match self {
            Reply::Raw(response) => Some(response),
            Reply::Data(_) => None,
        }
    }
}

/// Client for one REST API.
///
/// The transport stages (rate limiting, logging) are assembled once at
/// construction; later changes to `rate_limit` or `log_requests` through
/// [`config_mut`](Self::config_mut) do not rebuild them.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a client talking to the network
    pub fn new(config: ClientConfig) -> Result<Self> {
        let adapter = HttpClient::with_config(config.connection.http_config())?;
        Self::with_adapter(config, Arc::new(adapter))
    }

    /// Create a client sending through a caller-supplied adapter.
    ///
    /// The configured stages are layered over it: `Throttled(Logged(adapter))`.
    pub fn with_adapter(config: ClientConfig, adapter: Arc<dyn Transport>) -> Result<Self> {
        let mut transport = adapter;
        if config.log_requests {
            transport = Arc::new(Logged::new(transport));
        }
        if let Some(rate_limit) = &config.rate_limit {
            let period = rate_limit.period()?;
            debug!(
                "Throttling to {} requests per {:?}",
                rate_limit.limit, period
            );
            let gate = Arc::new(RateGate::new(rate_limit.limit, period));
            transport = Arc::new(Throttled::new(transport, gate));
        }
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Change the configuration between requests
    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    /// The assembled transport stack
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn is_json(&self) -> bool {
        self.config.is_json()
    }

    /// GET `path`, options as query parameters
    pub async fn get(&self, path: &str, options: &RequestOptions) -> Result<Reply> {
        self.call(Method::GET, path, options, Call::default()).await
    }

    /// POST `path`, options as the body
    pub async fn post(&self, path: &str, options: &RequestOptions) -> Result<Reply> {
        self.call(Method::POST, path, options, Call::default()).await
    }

    /// PUT `path`, options as the body
    pub async fn put(&self, path: &str, options: &RequestOptions) -> Result<Reply> {
        self.call(Method::PUT, path, options, Call::default()).await
    }

    /// DELETE `path`, options as query parameters
    pub async fn delete(&self, path: &str, options: &RequestOptions) -> Result<Reply> {
        self.call(Method::DELETE, path, options, Call::default()).await
    }

    /// Send one request with per-call overrides
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
        call: Call<'_>,
    ) -> Result<Reply> {
        let raw = call.raw.unwrap_or_else(|| method.default_raw());
        let response = self.dispatch(method, path, options, call.customize).await?;
        let pager = self.config.pager();
        Ok(projector::project(&self.config, pager.as_ref(), response, raw))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
