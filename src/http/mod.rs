//! HTTP transport module
//!
//! Requests travel through a stack of [`Transport`] implementations:
//!
//! - **Adapter**: [`HttpClient`] sends requests over the network with reqwest
//! - **Rate limiting**: [`Throttled`] waits on a shared sliding-window [`RateGate`]
//! - **Logging**: [`Logged`] traces requests and responses with secrets redacted
//!
//! The client facade assembles the stack once from its configuration.

mod client;
mod logging;
mod rate_gate;
mod request;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use logging::{redact, Logged};
pub use rate_gate::{RateGate, Throttled};
pub use request::{is_json_content_type, HttpRequest, HttpResponse, ResponseBody};
pub use transport::Transport;
