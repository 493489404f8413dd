//! Request building and dispatch

use super::{ApiClient, RequestHook};
use crate::error::{Error, Result};
use crate::http::{redact, HttpRequest, HttpResponse};
use crate::types::{JsonValue, Method, RequestOptions};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::borrow::Cow;
use tracing::debug;
use url::Url;

impl ApiClient {
    /// Build a request and send it through the transport stack
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
        customize: Option<&RequestHook<'_>>,
    ) -> Result<HttpResponse> {
        let request = self.build_request(method, path, options, customize)?;
        debug!("{} {}", method, redact(request.url.as_str()));
        self.transport.send(request).await
    }

    /// Assemble the request for one call without sending it
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
        customize: Option<&RequestHook<'_>>,
    ) -> Result<HttpRequest> {
        let config = &self.config;
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .ok_or_else(|| Error::missing_field("endpoint"))?;

        let mut request = HttpRequest::new(method, build_url(endpoint, path)?);

        request.headers.insert(
            ACCEPT,
            header_value(&format!("{}; charset=utf-8", config.format.mime_type()))?,
        );
        request
            .headers
            .insert(USER_AGENT, header_value(&config.user_agent)?);
        config.credentials.apply(&mut request.headers)?;
        for (name, value) in &config.connection.headers {
            request.set_header(name, value)?;
        }

        if !method.has_body() {
            let mut pairs = Vec::new();
            for (key, value) in options {
                flatten_param(key.clone(), value, &mut pairs);
            }
            if !pairs.is_empty() {
                request.url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        if let Some(hook) = customize {
            hook(&mut request);
        }

        if !request.headers.contains_key(CONTENT_TYPE) {
            request
                .headers
                .insert(CONTENT_TYPE, header_value(&config.format.mime_type())?);
        }

        if method.has_body() && !options.is_empty() {
            request.body = Some(if config.is_json() {
                serde_json::to_string(options)?
            } else {
                form_encode(options)
            });
        }

        Ok(request)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::invalid_value("header", format!("{value:?}: {e}")))
}

/// Join `path` onto the endpoint.
///
/// The endpoint's own path is kept. The path component is percent-escaped:
/// existing `%XX` escapes are kept, any other `%` becomes `%25` and `#`
/// becomes `%23`. A query string after `?` is kept as given. Absolute URLs
/// are used as is.
fn build_url(endpoint: &str, path: &str) -> Result<Url> {
    if path.starts_with("http://") || path.starts_with("https://") {
        return Ok(Url::parse(path)?);
    }

    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };

    let mut url = Url::parse(endpoint)?;
    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&escape_lone_percent(&joined));
    url.set_query(query.filter(|q| !q.is_empty()));
    Ok(url)
}

/// Escape every `%` that does not start a `%XX` escape
fn escape_lone_percent(path: &str) -> Cow<'_, str> {
    let bytes = path.as_bytes();
    let hex = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_hexdigit);
    let lone = |i: usize| bytes[i] == b'%' && !(hex(i + 1) && hex(i + 2));
    if !(0..bytes.len()).any(lone) {
        return Cow::Borrowed(path);
    }

    let mut escaped = String::with_capacity(path.len() + 4);
    for (i, c) in path.char_indices() {
        if lone(i) {
            escaped.push_str("%25");
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

/// Query parameters for one option: arrays as `key[]`, objects as `key[sub]`
fn flatten_param(key: String, value: &JsonValue, pairs: &mut Vec<(String, String)>) {
    match value {
        JsonValue::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                flatten_param(key.clone(), item, pairs);
            }
        }
        JsonValue::Object(map) => {
            for (sub, item) in map {
                flatten_param(format!("{key}[{sub}]"), item, pairs);
            }
        }
        scalar => pairs.push((key, scalar_text(scalar))),
    }
}

/// `application/x-www-form-urlencoded` body: arrays repeat the key, objects
/// are sent as JSON text
fn form_encode(options: &RequestOptions) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in options {
        match value {
            JsonValue::Array(items) => {
                for item in items {
                    form.append_pair(key, &scalar_text(item));
                }
            }
            other => {
                form.append_pair(key, &scalar_text(other));
            }
        }
    }
    form.finish()
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
