//! qs-style query string serialization for [`Router::url_with`](crate::Router::url_with).
//! See [`stringify`] and [`QueryOptions`].

use serde_json::{Map, Value};

/// How arrays are written into a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ArrayFormat {
    /// `sort[]=a&sort[]=b`
    #[default]
    Brackets,
    /// `sort[0]=a&sort[1]=b`
    Indices,
    /// `sort=a&sort=b`
    Repeat,
    /// `sort=a,b`
    Comma,
}

/**
Query string serialization settings.

By default nested objects use bracket notation, arrays use
[`ArrayFormat::Brackets`], and keys and values are percent-encoded.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// write nested object keys as `a.b` instead of `a[b]`
    pub allow_dots: bool,
    /// percent-encode keys and values
    pub encode: bool,
    /// how arrays are written
    pub array_format: ArrayFormat,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            allow_dots: false,
            encode: true,
            array_format: ArrayFormat::Brackets,
        }
    }
}

/**
Serializes `query` into a query string, without the leading `?`.

Nulls are written as `key=`. Empty arrays and empty objects produce
nothing.

```
use trillium_scoped_router::{json, query, QueryOptions};
let options = QueryOptions { encode: false, ..QueryOptions::default() };
let query = json!({ "sort": ["-id", "name"], "filter": { "active": true } });
assert_eq!(
    query::stringify(query.as_object().unwrap(), &options),
    "sort[]=-id&sort[]=name&filter[active]=true"
);
```
*/
pub fn stringify(query: &Map<String, Value>, options: &QueryOptions) -> String {
    let mut pairs = Vec::new();
    for (key, value) in query {
        write_value(&mut pairs, key.clone(), value, options);
    }
    pairs.join("&")
}

fn write_value(pairs: &mut Vec<String>, key: String, value: &Value, options: &QueryOptions) {
    match value {
        Value::Array(values) => {
            if values.is_empty() {
                return;
            }

            if options.array_format == ArrayFormat::Comma && values.iter().all(is_scalar) {
                let joined = values
                    .iter()
                    .filter_map(scalar)
                    .collect::<Vec<_>>()
                    .join(",");
                pairs.push(pair(&key, &joined, options));
                return;
            }

            for (index, value) in values.iter().enumerate() {
                let key = match options.array_format {
                    ArrayFormat::Brackets => format!("{key}[]"),
                    ArrayFormat::Repeat => key.clone(),
                    ArrayFormat::Indices | ArrayFormat::Comma => format!("{key}[{index}]"),
                };
                write_value(pairs, key, value, options);
            }
        }

        Value::Object(map) => {
            for (child, value) in map {
                let key = if options.allow_dots {
                    format!("{key}.{child}")
                } else {
                    format!("{key}[{child}]")
                };
                write_value(pairs, key, value, options);
            }
        }

        scalar_value => {
            let text = scalar(scalar_value).unwrap_or_default();
            pairs.push(pair(&key, &text, options));
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn pair(key: &str, value: &str, options: &QueryOptions) -> String {
    if options.encode {
        format!("{}={}", encode(key), encode(value))
    } else {
        format!("{key}={value}")
    }
}

/// Percent-encodes everything except `A-Z a-z 0-9 - . _ ~`.
pub(crate) fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
        .replace("%7E", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw() -> QueryOptions {
        QueryOptions {
            encode: false,
            ..QueryOptions::default()
        }
    }

    fn stringify_json(value: Value, options: &QueryOptions) -> String {
        stringify(value.as_object().unwrap(), options)
    }

    #[test]
    fn scalars() {
        assert_eq!(
            stringify_json(json!({ "a": "b", "n": 42, "t": true, "f": 1.5 }), &raw()),
            "a=b&n=42&t=true&f=1.5"
        );
    }

    #[test]
    fn nulls_and_empties() {
        assert_eq!(
            stringify_json(json!({ "a": null, "b": [], "c": {}, "d": "" }), &raw()),
            "a=&d="
        );
    }

    #[test]
    fn nested_objects() {
        let query = json!({ "foo": { "bar": true, "baz": { "qux": 1 } } });
        assert_eq!(
            stringify_json(query.clone(), &raw()),
            "foo[bar]=true&foo[baz][qux]=1"
        );

        let dots = QueryOptions {
            allow_dots: true,
            ..raw()
        };
        assert_eq!(stringify_json(query, &dots), "foo.bar=true&foo.baz.qux=1");
    }

    #[test]
    fn array_formats() {
        let query = json!({ "sort": ["-id", "name"] });
        let with = |array_format| QueryOptions {
            array_format,
            ..raw()
        };

        assert_eq!(
            stringify_json(query.clone(), &with(ArrayFormat::Brackets)),
            "sort[]=-id&sort[]=name"
        );
        assert_eq!(
            stringify_json(query.clone(), &with(ArrayFormat::Indices)),
            "sort[0]=-id&sort[1]=name"
        );
        assert_eq!(
            stringify_json(query.clone(), &with(ArrayFormat::Repeat)),
            "sort=-id&sort=name"
        );
        assert_eq!(
            stringify_json(query, &with(ArrayFormat::Comma)),
            "sort=-id,name"
        );
    }

    #[test]
    fn objects_within_arrays() {
        let query = json!({ "items": [{ "id": 1 }, { "id": 2 }] });
        assert_eq!(
            stringify_json(query, &raw()),
            "items[][id]=1&items[][id]=2"
        );
    }

    #[test]
    fn encoding() {
        let query = json!({ "sort": ["-id"], "q": "a b&c~*" });
        assert_eq!(
            stringify_json(query, &QueryOptions::default()),
            "sort%5B%5D=-id&q=a%20b%26c~%2A"
        );
    }
}
