//! Transport abstraction
//!
//! A [`Transport`] sends one request and returns the decoded response.
//! Adapters talk to the network; stages such as
//! [`Throttled`](super::Throttled) and [`Logged`](super::Logged) wrap another
//! transport and add behavior in front of it.

use super::request::{HttpRequest, HttpResponse};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends HTTP requests.
///
/// Implementations report non-2xx responses as
/// [`Error::HttpStatus`](crate::Error::HttpStatus) and must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for the response
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).send(request).await
    }
}
