//! Transport-level request and response values
//!
//! These are what travels through the transport stack. The dispatcher builds
//! an [`HttpRequest`], pre-send hooks may edit it, and adapters return an
//! [`HttpResponse`] whose body is already decoded.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static JSON_CONTENT_TYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bjson$").unwrap());

/// An outgoing HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL including query parameters
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Encoded request body
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request without headers or body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Get a header value as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set a header, replacing any previous value
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::invalid_value("header", format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_value("header", format!("{name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Add a query parameter
    pub fn add_query(&mut self, key: &str, value: &str) {
        self.url.query_pairs_mut().append_pair(key, value);
    }
}

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No content (or only whitespace)
    Empty,
    /// Body with a JSON content type
    Json(JsonValue),
    /// Any other body
    Text(String),
}

impl ResponseBody {
    /// Decode a body according to its content type.
    ///
    /// Bodies whose MIME type ends in `json` (`application/json`,
    /// `application/vnd.api+json`) are parsed; a malformed one is a decoding
    /// error.
    pub fn decode(content_type: Option<&str>, text: String) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(ResponseBody::Empty);
        }
        if content_type.is_some_and(is_json_content_type) {
            let value = serde_json::from_str(&text)
                .map_err(|e| Error::decode(format!("invalid JSON body: {e}")))?;
            return Ok(ResponseBody::Json(value));
        }
        Ok(ResponseBody::Text(text))
    }

    /// Body as JSON: empty is `null`, text becomes a JSON string
    pub fn to_json(&self) -> JsonValue {
        match self {
            ResponseBody::Empty => JsonValue::Null,
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Text(text) => JsonValue::String(text.clone()),
        }
    }

    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }
}

/// A completed HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body
    pub body: ResponseBody,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// 200 response with a JSON body
    pub fn json(value: JsonValue) -> Self {
        let mut response = Self::new(200, ResponseBody::Json(value));
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }

    /// Get a header value as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Check a `Content-Type` value against `\bjson$`, ignoring parameters
pub fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    JSON_CONTENT_TYPE.is_match(&mime.to_ascii_lowercase())
}
