//! Common types used throughout apikit
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query or body parameters for a single request, in insertion order
pub type RequestOptions = JsonObject;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl Method {
    /// Whether options travel in the request body rather than the query string
    pub fn has_body(self) -> bool {
        matches!(self, Method::POST | Method::PUT)
    }

    /// Default for the `raw` projection flag.
    ///
    /// GET and DELETE produce entities, POST and PUT hand back the response.
    pub fn default_raw(self) -> bool {
        self.has_body()
    }

    /// Upper-case method name
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Wire Format
// ============================================================================

/// Wire encoding of request and response bodies (`json`, `xml`, `html`, ...)
///
/// Drives the `Accept` and `Content-Type` headers and whether responses are
/// wrapped into entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Format(String);

impl Format {
    /// JSON, the default format
    pub fn json() -> Self {
        Self("json".to_string())
    }

    /// Create a format from its short name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Short name of the format
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Check if this is JSON
    pub fn is_json(&self) -> bool {
        self.0.eq_ignore_ascii_case("json")
    }

    /// MIME type, e.g. `application/json`
    pub fn mime_type(&self) -> String {
        format!("application/{}", self.0)
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::json()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Format {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_default_raw() {
        assert!(!Method::GET.default_raw());
        assert!(!Method::DELETE.default_raw());
        assert!(Method::POST.default_raw());
        assert!(Method::PUT.default_raw());
    }

    #[test]
    fn test_method_serde() {
        let method: Method = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(method, Method::DELETE);
        assert_eq!(method.to_string(), "DELETE");
        assert_eq!(reqwest::Method::from(Method::PUT), reqwest::Method::PUT);
    }

    #[test]
    fn test_format() {
        let format = Format::default();
        assert!(format.is_json());
        assert_eq!(format.mime_type(), "application/json");

        let html = Format::from("html");
        assert!(!html.is_json());
        assert_eq!(html.mime_type(), "application/html");

        let parsed: Format = serde_yaml::from_str("xml").unwrap();
        assert_eq!(parsed.name(), "xml");
    }
}
