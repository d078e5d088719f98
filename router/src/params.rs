use serde_json::{Map, Value};

/**
The parameters bound by a route match, in the order they appear in the
route pattern.

Wildcards are bound like any other parameter, under the name they were
declared with (or `"wildcard"` for a bare `*`).
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// an empty set of params
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves the value bound to `key`. If a pattern binds the same
    /// name twice, the later binding wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| &**v)
    }

    /// iterates over (key, value) pairs in pattern order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (&**k, &**v))
    }

    /// the number of bound params
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// whether nothing was bound
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts these params into a json object, suitable for passing
    /// back into [`crate::build_url`].
    pub fn to_json(&self) -> Map<String, Value> {
        self.iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    pub(crate) fn push(&mut self, key: &str, value: impl Into<String>) {
        self.0.push((key.to_string(), value.into()));
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
