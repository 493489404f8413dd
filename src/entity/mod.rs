//! Entity module
//!
//! Dynamic wrappers over decoded JSON responses.
//!
//! # Overview
//!
//! API responses are handed to callers as [`Wrapped`] values produced by
//! [`Entity::create`]:
//! - an object becomes a single [`Entity`]
//! - an array of objects becomes a [`Wrapped::List`] of entities
//! - anything else passes through unchanged as [`Wrapped::Value`]
//! - `null` is absent (`None`)
//!
//! Nested objects and arrays stay raw until first accessed through
//! [`Entity::get`], which wraps them and caches the result so later accesses
//! and mutations go through the same instance.
//!
//! ```rust
//! use apikit::entity::Entity;
//! use serde_json::json;
//!
//! let mut user = Entity::create(json!({"name": "Ada", "address": {"city": "London"}}))
//!     .and_then(|w| w.into_entity())
//!     .unwrap();
//!
//! user.entity_mut("address").unwrap().set("city", "Paris");
//! assert_eq!(user.to_json(), r#"{"name":"Ada","address":{"city":"Paris"}}"#);
//! ```

mod object;
mod wrapped;

pub use object::Entity;
pub use wrapped::Wrapped;
