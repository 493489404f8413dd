//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all pagers.

use super::strategies::{CursorPager, DefaultPager, OffsetPager, PageNumberPager};
use crate::types::{JsonValue, RequestOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Core trait for pagination strategies.
///
/// A pager is created for every paginated call and driven by the fetch loop:
///
/// ```text
/// while more_pages():
///     fetch(caller options + page_options())
///     emit(data(body))
///     next_page(body)
/// ```
pub trait Pager: Send {
    /// Whether another page should be fetched
    fn more_pages(&self) -> bool;

    /// Advance past the page just fetched.
    ///
    /// Called exactly once per page with the raw decoded body, after its data
    /// has been consumed, so envelope metadata (totals, tokens) is available.
    fn next_page(&mut self, body: &JsonValue);

    /// Extra query parameters for the next request
    fn page_options(&self) -> RequestOptions {
        RequestOptions::new()
    }

    /// Payload to wrap from a decoded body; `None` when absent
    fn data(&self, body: &JsonValue) -> Option<JsonValue> {
        non_null(body).cloned()
    }
}

/// Builds a fresh pager for a paginated call from the configured page size
#[derive(Clone)]
pub struct PagerFactory(Arc<dyn Fn(u32) -> Box<dyn Pager> + Send + Sync>);

impl PagerFactory {
    /// Wrap a constructor closure
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(u32) -> Box<dyn Pager> + Send + Sync + 'static,
    {
        Self(Arc::new(factory))
    }

    /// Create a pager
    pub fn build(&self, page_size: u32) -> Box<dyn Pager> {
        (self.0)(page_size)
    }
}

impl fmt::Debug for PagerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagerFactory").finish_non_exhaustive()
    }
}

/// Configuration for pagination behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationConfig {
    /// Everything comes back in a single response
    #[default]
    None,

    /// Page number pagination (`?page=2&per_page=50`)
    PageNumber {
        /// Query parameter name for page number
        #[serde(default = "default_page_param")]
        page_param: String,
        /// First page number (usually 0 or 1)
        #[serde(default = "default_start_page")]
        start_page: u32,
        /// Optional page size parameter name; filled with the configured page size
        #[serde(default)]
        page_size_param: Option<String>,
        /// Path to the total page count in the envelope
        #[serde(default)]
        total_pages_path: Option<String>,
        /// Path to the records in the envelope
        #[serde(default)]
        data_path: Option<String>,
    },

    /// Offset-based pagination (`?offset=100&limit=50`)
    Offset {
        /// Query parameter name for offset
        #[serde(default = "default_offset_param")]
        offset_param: String,
        /// Query parameter name for limit; filled with the configured page size
        #[serde(default = "default_limit_param")]
        limit_param: String,
        /// Path to the records in the envelope
        #[serde(default)]
        data_path: Option<String>,
    },

    /// Cursor-based pagination (`?cursor=abc123`)
    Cursor {
        /// Query parameter name for cursor
        cursor_param: String,
        /// Path to the next cursor in the envelope
        cursor_path: String,
        /// Path to the records in the envelope
        #[serde(default)]
        data_path: Option<String>,
    },

    /// A pager supplied in code
    #[serde(skip)]
    Custom(PagerFactory),
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_start_page() -> u32 {
    1
}

fn default_offset_param() -> String {
    "offset".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

impl PaginationConfig {
    /// Use a pager supplied in code
    pub fn custom<F>(factory: F) -> Self
    where
        F: Fn(u32) -> Box<dyn Pager> + Send + Sync + 'static,
    {
        Self::Custom(PagerFactory::new(factory))
    }

    /// Create page number pagination config
    pub fn page_number(page_param: impl Into<String>, start_page: u32) -> Self {
        Self::PageNumber {
            page_param: page_param.into(),
            start_page,
            page_size_param: None,
            total_pages_path: None,
            data_path: None,
        }
    }

    /// Create offset pagination config
    pub fn offset(offset_param: impl Into<String>, limit_param: impl Into<String>) -> Self {
        Self::Offset {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            data_path: None,
        }
    }

    /// Create cursor pagination config
    pub fn cursor(cursor_param: impl Into<String>, cursor_path: impl Into<String>) -> Self {
        Self::Cursor {
            cursor_param: cursor_param.into(),
            cursor_path: cursor_path.into(),
            data_path: None,
        }
    }

    /// Build the pager for one paginated call
    pub fn pager(&self, page_size: u32) -> Box<dyn Pager> {
        match self {
            Self::None => Box::new(DefaultPager::new()),
            Self::PageNumber {
                page_param,
                start_page,
                page_size_param,
                total_pages_path,
                data_path,
            } => {
                let mut pager = PageNumberPager::new(page_param.clone(), *start_page);
                if let Some(param) = page_size_param {
                    pager = pager.page_size(param.clone(), page_size);
                }
                if let Some(path) = total_pages_path {
                    pager = pager.total_pages(path.clone());
                }
                if let Some(path) = data_path {
                    pager = pager.data_path(path.clone());
                }
                Box::new(pager)
            }
            Self::Offset {
                offset_param,
                limit_param,
                data_path,
            } => {
                let mut pager =
                    OffsetPager::new(offset_param.clone(), limit_param.clone(), page_size);
                if let Some(path) = data_path {
                    pager = pager.data_path(path.clone());
                }
                Box::new(pager)
            }
            Self::Cursor {
                cursor_param,
                cursor_path,
                data_path,
            } => {
                let mut pager = CursorPager::new(cursor_param.clone(), cursor_path.clone());
                if let Some(path) = data_path {
                    pager = pager.data_path(path.clone());
                }
                Box::new(pager)
            }
            Self::Custom(factory) => factory.build(page_size),
        }
    }
}

/// Look up a dot-separated path (`$.meta.next` or `meta.next`) in a JSON value
pub fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = match current {
            JsonValue::Object(map) => map.get(part)?,
            JsonValue::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Payload of a body, optionally under a path; `null` counts as absent
pub(crate) fn select<'a>(body: &'a JsonValue, path: Option<&str>) -> Option<&'a JsonValue> {
    match path {
        Some(path) => extract_path(body, path).and_then(non_null),
        None => non_null(body),
    }
}

/// Number of records in a payload
pub(crate) fn record_count(data: Option<&JsonValue>) -> usize {
    match data {
        None => 0,
        Some(JsonValue::Array(items)) => items.len(),
        Some(_) => 1,
    }
}

fn non_null(value: &JsonValue) -> Option<&JsonValue> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}
