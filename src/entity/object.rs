//! Entity implementation

use super::wrapped::Wrapped;
use crate::error::Result;
use crate::types::{JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// A JSON object with attribute-style access.
///
/// `attributes` holds the raw decoded values and fixes the key order.
/// Attributes that have been accessed through [`Entity::get`] or replaced by
/// [`Entity::set`] with a wrapped value live in `wrapped` instead, and the raw
/// slot is left as a `null` placeholder. Serialization merges the two.
#[derive(Clone, Default)]
pub struct Entity {
    attributes: JsonObject,
    wrapped: HashMap<String, Wrapped>,
}

impl Entity {
    /// Wrap a decoded value.
    ///
    /// Objects become an [`Entity`], arrays starting with an object become a
    /// list of entities, `null` is absent, anything else passes through.
    pub fn create(value: JsonValue) -> Option<Wrapped> {
        match value {
            JsonValue::Null => None,
            other => Some(Wrapped::wrap(other)),
        }
    }

    /// Create an entity from an object
    pub fn new(attributes: JsonObject) -> Self {
        Self {
            attributes,
            wrapped: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Attribute names in their original order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Access an attribute, wrapping nested objects and arrays on first use.
    ///
    /// The wrapped value is cached, so repeated calls return the same
    /// instance and mutations made through it show up in [`Entity::to_value`].
    pub fn get(&mut self, key: &str) -> Option<&mut Wrapped> {
        if !self.wrapped.contains_key(key) {
            let raw = self.attributes.get_mut(key)?.take();
            self.wrapped.insert(key.to_string(), Wrapped::wrap(raw));
        }
        self.wrapped.get_mut(key)
    }

    /// Nested entity under `key`
    pub fn entity_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.get(key).and_then(Wrapped::as_entity_mut)
    }

    /// Nested list of entities under `key`
    pub fn list_mut(&mut self, key: &str) -> Option<&mut Vec<Wrapped>> {
        self.get(key).and_then(Wrapped::as_list_mut)
    }

    /// Current JSON value of an attribute without wrapping it
    pub fn value(&self, key: &str) -> Option<JsonValue> {
        match self.wrapped.get(key) {
            Some(wrapped) => Some(wrapped.to_value()),
            None => self.attributes.get(key).cloned(),
        }
    }

    /// String attribute
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.scalar(key).and_then(JsonValue::as_str)
    }

    /// Integer attribute
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.scalar(key).and_then(JsonValue::as_i64)
    }

    /// Floating point attribute
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.scalar(key).and_then(JsonValue::as_f64)
    }

    /// Boolean attribute
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.scalar(key).and_then(JsonValue::as_bool)
    }

    fn scalar(&self, key: &str) -> Option<&JsonValue> {
        match self.wrapped.get(key) {
            Some(wrapped) => wrapped.as_value(),
            None => self.attributes.get(key),
        }
    }

    /// Assign an attribute. New keys are appended, existing keys keep their position.
    ///
    /// Plain values are stored raw and get wrapped on next access like decoded data.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Wrapped>) {
        let key = key.into();
        match value.into() {
            Wrapped::Value(raw) => {
                self.wrapped.remove(&key);
                self.attributes.insert(key, raw);
            }
            wrapped => {
                self.attributes.insert(key.clone(), JsonValue::Null);
                self.wrapped.insert(key, wrapped);
            }
        }
    }

    /// Remove an attribute, returning its current JSON value
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        let raw = self.attributes.shift_remove(key)?;
        Some(match self.wrapped.remove(key) {
            Some(wrapped) => wrapped.into_value(),
            None => raw,
        })
    }

    /// Current attributes as a plain JSON object
    pub fn attributes(&self) -> JsonObject {
        self.attributes
            .iter()
            .map(|(key, raw)| {
                let value = match self.wrapped.get(key) {
                    Some(wrapped) => wrapped.to_value(),
                    None => raw.clone(),
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Current JSON representation
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.attributes())
    }

    /// Unwrap back into plain JSON
    pub fn into_value(self) -> JsonValue {
        let Self {
            attributes,
            mut wrapped,
        } = self;
        JsonValue::Object(
            attributes
                .into_iter()
                .map(|(key, raw)| {
                    let value = match wrapped.remove(&key) {
                        Some(w) => w.into_value(),
                        None => raw,
                    };
                    (key, value)
                })
                .collect(),
        )
    }

    /// Compact JSON text
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Deserialize into a typed view
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_value())?)
    }
}

impl From<JsonObject> for Entity {
    fn from(attributes: JsonObject) -> Self {
        Self::new(attributes)
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.attributes() == other.attributes()
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.to_value())
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
