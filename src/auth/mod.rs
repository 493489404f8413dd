//! Authentication module
//!
//! Supports: bearer tokens, client id / client secret headers, username and
//! password login
//!
//! [`Credentials`] are part of the client configuration and are applied to
//! every outgoing request as default headers. A login exchanges username and
//! password for a token through
//! [`ApiClient::api_auth`](crate::client::ApiClient::api_auth). Token refresh
//! belongs to the consuming API wrapper.

mod credentials;

pub use credentials::{Credentials, DEFAULT_TOKEN_TYPE};
