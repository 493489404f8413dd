//! Pagination module
//!
//! Supports: single response, page number, offset, cursor, and custom pagers
//!
//! # Overview
//!
//! The pagination module provides a unified interface for handling different
//! API pagination patterns. A [`Pager`] tells the fetch loop whether another
//! page exists, which query parameters request it, and where the payload sits
//! inside each response envelope.

mod strategies;
mod types;

pub use strategies::{CursorPager, DefaultPager, OffsetPager, PageNumberPager};
pub use types::{extract_path, PaginationConfig, Pager, PagerFactory};
