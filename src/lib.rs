// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # apikit
//!
//! Building blocks for REST API client libraries.
//!
//! A concrete API wrapper supplies an endpoint, credentials and a pagination
//! strategy; apikit does the rest:
//!
//! - **Verb calls**: GET/POST/PUT/DELETE with default and credential headers
//! - **Pagination**: single response, page number, offset, cursor or custom pagers
//! - **Entities**: dynamic wrappers over JSON objects with lazy nested access
//! - **Rate limiting**: sliding-window throttle shared by concurrent callers
//! - **Logging**: request/response tracing with secrets redacted
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apikit::{ApiClient, ClientConfig, PaginationConfig, RequestOptions, Result};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .endpoint("https://api.example.com/v1")
//!         .access_token("...")
//!         .pagination(PaginationConfig::cursor("cursor", "meta.next"))
//!         .rate_limit(10, Duration::from_secs(1))
//!         .build();
//!     let client = ApiClient::new(config)?;
//!
//!     for item in client.get_paged("items", &RequestOptions::new()).await? {
//!         println!("{}", item.to_json());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ApiWrapper / ApiClient   get · post · put · delete · paged  │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌─────────────┬────────────────┴───────┬───────────┬──────────┐
//! │  Dispatch   │   Transport stack      │ Projector │  Pager   │
//! ├─────────────┼────────────────────────┼───────────┼──────────┤
//! │ URL, query  │ Throttled (RateGate)   │ data()    │ Default  │
//! │ headers     │ Logged (redaction)     │ Entity    │ Page no. │
//! │ body, hook  │ HttpClient (reqwest)   │ raw       │ Offset   │
//! │             │                        │           │ Cursor   │
//! └─────────────┴────────────────────────┴───────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and credential headers
pub mod auth;

/// Transport stack: adapter, rate limiting, logging
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Dynamic JSON entities
pub mod entity;

/// Client configuration
pub mod config;

/// API client, request dispatch and paged fetching
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use auth::Credentials;
pub use client::{ApiClient, ApiWrapper, Call, Reply, RequestHook};
pub use config::{ClientConfig, ConnectionOptions, RateLimitConfig};
pub use entity::{Entity, Wrapped};
pub use http::{HttpRequest, HttpResponse, RateGate, Transport};
pub use pagination::{PaginationConfig, Pager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
