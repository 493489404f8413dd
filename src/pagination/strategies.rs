//! Pager implementations
//!
//! Each pager handles a specific pagination pattern.

use super::types::{extract_path, record_count, select, Pager};
use crate::types::{JsonValue, RequestOptions};

// ============================================================================
// Default Pager
// ============================================================================

/// Single request; all data arrives in one response
#[derive(Debug, Clone, Default)]
pub struct DefaultPager {
    page: u32,
}

impl DefaultPager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages fetched so far
    pub fn page(&self) -> u32 {
        self.page
    }
}

impl Pager for DefaultPager {
    fn more_pages(&self) -> bool {
        self.page < 1
    }

    fn next_page(&mut self, _body: &JsonValue) {
        self.page += 1;
    }
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination (e.g., traditional web pagination)
///
/// Uses page number parameter to paginate.
/// Common patterns:
/// - `?page=2`
/// - `?page=2&per_page=50`
///
/// Stops on an empty page, on a short page when the page size is known, or
/// once the envelope's total page count has been fetched.
#[derive(Debug, Clone)]
pub struct PageNumberPager {
    page_param: String,
    start_page: u32,
    page_size_param: Option<String>,
    page_size: u32,
    total_pages_path: Option<String>,
    data_path: Option<String>,
    page: u32,
    done: bool,
}

impl PageNumberPager {
    /// Create a new page number pager
    pub fn new(page_param: impl Into<String>, start_page: u32) -> Self {
        Self {
            page_param: page_param.into(),
            start_page,
            page_size_param: None,
            page_size: 0,
            total_pages_path: None,
            data_path: None,
            page: start_page,
            done: false,
        }
    }

    /// Send the page size with every request
    #[must_use]
    pub fn page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = Some(param.into());
        self.page_size = size;
        self
    }

    /// Read the total page count from the envelope
    #[must_use]
    pub fn total_pages(mut self, path: impl Into<String>) -> Self {
        self.total_pages_path = Some(path.into());
        self
    }

    /// Read records from a field of the envelope
    #[must_use]
    pub fn data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Page number of the next request
    pub fn current_page(&self) -> u32 {
        self.page
    }
}

impl Pager for PageNumberPager {
    fn more_pages(&self) -> bool {
        !self.done
    }

    fn next_page(&mut self, body: &JsonValue) {
        let count = record_count(select(body, self.data_path.as_deref()));
        let fetched = self.page - self.start_page + 1;

        let total_reached = self
            .total_pages_path
            .as_deref()
            .and_then(|path| extract_path(body, path))
            .and_then(as_u64)
            .is_some_and(|total| u64::from(fetched) >= total);
        let short_page = self.page_size_param.is_some() && count < self.page_size as usize;

        if count == 0 || total_reached || short_page {
            self.done = true;
        }
        self.page += 1;
    }

    fn page_options(&self) -> RequestOptions {
        let mut params = RequestOptions::new();
        params.insert(self.page_param.clone(), self.page.into());
        if let Some(param) = &self.page_size_param {
            params.insert(param.clone(), self.page_size.into());
        }
        params
    }

    fn data(&self, body: &JsonValue) -> Option<JsonValue> {
        select(body, self.data_path.as_deref()).cloned()
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination (e.g., SQL-style pagination)
///
/// Uses offset and limit parameters to paginate.
/// Common patterns:
/// - `?offset=100&limit=50`
/// - `?skip=100&take=50`
#[derive(Debug, Clone)]
pub struct OffsetPager {
    offset_param: String,
    limit_param: String,
    limit: u32,
    data_path: Option<String>,
    offset: u64,
    done: bool,
}

impl OffsetPager {
    /// Create a new offset pager
    pub fn new(offset_param: impl Into<String>, limit_param: impl Into<String>, limit: u32) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit,
            data_path: None,
            offset: 0,
            done: false,
        }
    }

    /// Read records from a field of the envelope
    #[must_use]
    pub fn data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Offset of the next request
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl Pager for OffsetPager {
    fn more_pages(&self) -> bool {
        !self.done
    }

    fn next_page(&mut self, body: &JsonValue) {
        let count = record_count(select(body, self.data_path.as_deref()));

        // A short page is the last one
        if count < self.limit as usize || count == 0 {
            self.done = true;
        }
        self.offset += count as u64;
    }

    fn page_options(&self) -> RequestOptions {
        let mut params = RequestOptions::new();
        params.insert(self.offset_param.clone(), self.offset.into());
        params.insert(self.limit_param.clone(), self.limit.into());
        params
    }

    fn data(&self, body: &JsonValue) -> Option<JsonValue> {
        select(body, self.data_path.as_deref()).cloned()
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Cursor-based pagination (e.g., Stripe, Slack)
///
/// Uses a cursor value from the response to fetch the next page.
/// Common patterns:
/// - `?starting_after=obj_123`
/// - `?cursor=abc123`
#[derive(Debug, Clone)]
pub struct CursorPager {
    cursor_param: String,
    cursor_path: String,
    data_path: Option<String>,
    cursor: Option<String>,
    done: bool,
}

impl CursorPager {
    /// Create a new cursor pager
    pub fn new(cursor_param: impl Into<String>, cursor_path: impl Into<String>) -> Self {
        Self {
            cursor_param: cursor_param.into(),
            cursor_path: cursor_path.into(),
            data_path: None,
            cursor: None,
            done: false,
        }
    }

    /// Read records from a field of the envelope
    #[must_use]
    pub fn data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Cursor sent with the next request
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

impl Pager for CursorPager {
    fn more_pages(&self) -> bool {
        !self.done
    }

    fn next_page(&mut self, body: &JsonValue) {
        let next = extract_path(body, &self.cursor_path).and_then(|value| match value {
            JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        });

        match next {
            Some(cursor) if self.cursor.as_deref() != Some(cursor.as_str()) => {
                self.cursor = Some(cursor);
            }
            // Missing, empty or repeated cursor
            _ => self.done = true,
        }
    }

    fn page_options(&self) -> RequestOptions {
        let mut params = RequestOptions::new();
        if let Some(cursor) = &self.cursor {
            params.insert(self.cursor_param.clone(), cursor.clone().into());
        }
        params
    }

    fn data(&self, body: &JsonValue) -> Option<JsonValue> {
        select(body, self.data_path.as_deref()).cloned()
    }
}

fn as_u64(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}
