//! Factory output: entity, list of entities, or pass-through value

use super::object::Entity;
use crate::types::JsonValue;
use serde::{Serialize, Serializer};

/// A decoded JSON value after wrapping
#[derive(Clone)]
pub enum Wrapped {
    /// A JSON object
    Entity(Entity),
    /// An array whose first element was an object, items created one by one
    List(Vec<Wrapped>),
    /// Scalars and arrays of scalars, unchanged
    Value(JsonValue),
}

impl Wrapped {
    /// Wrap a value found inside an entity or a list.
    ///
    /// Unlike [`Entity::create`], `null` is kept as a plain value.
    pub(crate) fn wrap(value: JsonValue) -> Self {
        match value {
            JsonValue::Object(map) => Wrapped::Entity(Entity::new(map)),
            JsonValue::Array(items) => entify(items),
            other => Wrapped::Value(other),
        }
    }

    /// Current JSON representation, including nested mutations
    pub fn to_value(&self) -> JsonValue {
        match self {
            Wrapped::Entity(entity) => entity.to_value(),
            Wrapped::List(items) => JsonValue::Array(items.iter().map(Wrapped::to_value).collect()),
            Wrapped::Value(value) => value.clone(),
        }
    }

    /// Unwrap back into plain JSON
    pub fn into_value(self) -> JsonValue {
        match self {
            Wrapped::Entity(entity) => entity.into_value(),
            Wrapped::List(items) => {
                JsonValue::Array(items.into_iter().map(Wrapped::into_value).collect())
            }
            Wrapped::Value(value) => value,
        }
    }

    /// Compact JSON text
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Wrapped::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            Wrapped::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Wrapped::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Wrapped]> {
        match self {
            Wrapped::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Wrapped>> {
        match self {
            Wrapped::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Wrapped>> {
        match self {
            Wrapped::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&JsonValue> {
        match self {
            Wrapped::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_value_mut(&mut self) -> Option<&mut JsonValue> {
        match self {
            Wrapped::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(JsonValue::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(JsonValue::as_i64)
    }

    /// Number of items for lists and arrays, 1 for anything else
    pub fn len(&self) -> usize {
        match self {
            Wrapped::List(items) => items.len(),
            Wrapped::Value(JsonValue::Array(items)) => items.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Arrays of objects become lists of entities; other arrays are left as they are
fn entify(items: Vec<JsonValue>) -> Wrapped {
    if matches!(items.first(), Some(JsonValue::Object(_))) {
        Wrapped::List(items.into_iter().map(Wrapped::wrap).collect())
    } else {
        Wrapped::Value(JsonValue::Array(items))
    }
}

impl PartialEq for Wrapped {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

impl std::fmt::Debug for Wrapped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Wrapped::Entity(entity) => std::fmt::Debug::fmt(entity, f),
            Wrapped::List(items) => f.debug_list().entries(items).finish(),
            Wrapped::Value(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for Wrapped {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Wrapped::Entity(entity) => entity.serialize(serializer),
            Wrapped::List(items) => serializer.collect_seq(items),
            Wrapped::Value(value) => value.serialize(serializer),
        }
    }
}

impl From<Entity> for Wrapped {
    fn from(entity: Entity) -> Self {
        Wrapped::Entity(entity)
    }
}

impl From<Vec<Wrapped>> for Wrapped {
    fn from(items: Vec<Wrapped>) -> Self {
        Wrapped::List(items)
    }
}

impl From<JsonValue> for Wrapped {
    fn from(value: JsonValue) -> Self {
        Wrapped::Value(value)
    }
}

impl From<&str> for Wrapped {
    fn from(value: &str) -> Self {
        Wrapped::Value(JsonValue::from(value))
    }
}

impl From<String> for Wrapped {
    fn from(value: String) -> Self {
        Wrapped::Value(JsonValue::from(value))
    }
}

impl From<i32> for Wrapped {
    fn from(value: i32) -> Self {
        Wrapped::Value(JsonValue::from(value))
    }
}

impl From<i64> for Wrapped {
    fn from(value: i64) -> Self {
        Wrapped::Value(JsonValue::from(value))
    }
}

impl From<u64> for Wrapped {
    fn from(value: u64) -> Self {
        Wrapped::Value(JsonValue::from(value))
    }
}

impl From<f64> for Wrapped {
    fn from(value: f64) -> Self {
        Wrapped::Value(JsonValue::from(value))
    }
}

impl From<bool> for Wrapped {
    fn from(value: bool) -> Self {
        Wrapped::Value(JsonValue::from(value))
    }
}
