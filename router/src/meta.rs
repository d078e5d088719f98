use serde_json::{Map, Value};

/**
Application-defined data attached to a route.

The router never interprets meta. Scopes merge their meta into every
route registered within them, with inner keys replacing outer ones.

```
use trillium_scoped_router::{Meta, Value};
let outer = Meta::new().with("requiresAuth", true).with("layout", "admin");
let inner = Meta::new().with("layout", "plain");
let merged = outer.merge(&inner);
assert_eq!(merged.get("requiresAuth"), Some(&Value::Bool(true)));
assert_eq!(merged.get("layout"), Some(&Value::from("plain")));
```
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta(Map<String, Value>);

impl Meta {
    /// empty meta
    pub fn new() -> Self {
        Self::default()
    }

    /// chainable setter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// sets `key` to `value`, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// retrieves the value under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// whether there are no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new meta with every key of `self`, overridden by the
    /// keys of `other`.
    #[must_use]
    pub fn merge(&self, other: &Meta) -> Meta {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Meta(merged)
    }

    /// borrows the underlying json object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Meta {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Only json objects carry keys; any other value becomes empty meta.
impl From<Value> for Meta {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl From<Meta> for Value {
    fn from(meta: Meta) -> Self {
        Value::Object(meta.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Meta {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.0, serializer)
    }
}
