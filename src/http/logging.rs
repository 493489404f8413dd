//! Request/response logging with redaction
//!
//! [`Logged`] writes each request and response (line, headers, body) to
//! `tracing` at debug level. Passwords, access and refresh tokens, client
//! secrets and authorization headers are replaced by `[REMOVED]` before anything is
//! logged.

use super::request::{HttpRequest, HttpResponse, ResponseBody};
use super::transport::Transport;
use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::HeaderMap;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;

const REMOVED: &str = "[REMOVED]";

static FILTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // JSON content
        r#"(?i)("password"\s*:\s*")((?:[^"\\]|\\.)+)(")"#,
        r#"(?i)("(?:access|refresh)_?token"\s*:\s*")((?:[^"\\]|\\.)+)(")"#,
        // Headers and form fields
        r"(?i)(client[-_]secret[:=]\s*)([^&\s]+)()",
        r"(?i)(authorization:\s*)([^&\r\n]+)()",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Replace sensitive values in a log line
pub fn redact(text: &str) -> Cow<'_, str> {
    let mut redacted = Cow::Borrowed(text);
    for filter in FILTERS.iter() {
        if filter.is_match(&redacted) {
            let replaced = filter
                .replace_all(&redacted, format!("${{1}}{REMOVED}${{3}}"))
                .into_owned();
            redacted = Cow::Owned(replaced);
        }
    }
    redacted
}

/// Transport stage logging traffic through `tracing`
#[derive(Debug, Clone)]
pub struct Logged<T> {
    inner: T,
}

impl<T> Logged<T> {
    /// Wrap a transport
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for Logged<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!("request: {} {}", request.method, redact(request.url.as_str()));
        debug!("request headers:\n{}", redact(&format_headers(&request.headers)));
        if let Some(body) = &request.body {
            debug!("request body: {}", redact(body));
        }

        let result = self.inner.send(request).await;
        match &result {
            Ok(response) => {
                debug!("response: status {}", response.status);
                debug!(
                    "response headers:\n{}",
                    redact(&format_headers(&response.headers))
                );
                match &response.body {
                    ResponseBody::Empty => {}
                    ResponseBody::Json(value) => {
                        debug!("response body: {}", redact(&value.to_string()));
                    }
                    ResponseBody::Text(text) => debug!("response body: {}", redact(text)),
                }
            }
            Err(e) => debug!("request failed: {}", redact(&e.to_string())),
        }
        result
    }
}

/// One `Name: "value"` line per header; sensitive values are never printed
fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if value.is_sensitive() {
                REMOVED
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{name}: \"{value}\"")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
