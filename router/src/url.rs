use crate::{
    pattern::compile,
    query::{self, ArrayFormat, QueryOptions},
    Result,
};
use serde_json::{Map, Value};

/**
Options for [`build_url`] and [`Router::url_with`](crate::Router::url_with):
the query to append and how to serialize it.

```
use trillium_scoped_router::{json, ArrayFormat, UrlOptions};
let options = UrlOptions::new()
    .with_query(json!({ "page": 2 }))
    .with_array_format(ArrayFormat::Indices)
    .with_encode(false);
assert_eq!(options.query().get("page"), Some(&json!(2)));
```
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlOptions {
    query: Map<String, Value>,
    query_options: QueryOptions,
}

impl UrlOptions {
    /// no query, default [`QueryOptions`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the query. Anything other than an object is treated as an
    /// empty query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<Value>) -> Self {
        self.query = match query.into() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// write nested query keys as `a.b` instead of `a[b]`
    #[must_use]
    pub fn with_allow_dots(mut self, allow_dots: bool) -> Self {
        self.query_options.allow_dots = allow_dots;
        self
    }

    /// percent-encode query keys and values. Enabled by default.
    #[must_use]
    pub fn with_encode(mut self, encode: bool) -> Self {
        self.query_options.encode = encode;
        self
    }

    /// how query arrays are written
    #[must_use]
    pub fn with_array_format(mut self, array_format: ArrayFormat) -> Self {
        self.query_options.array_format = array_format;
        self
    }

    /// replaces every query serialization setting
    #[must_use]
    pub fn with_query_options(mut self, query_options: QueryOptions) -> Self {
        self.query_options = query_options;
        self
    }

    /// the query that will be appended
    pub fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    /// the query serialization settings
    pub fn query_options(&self) -> &QueryOptions {
        &self.query_options
    }
}

/**
Renders `template` with `params` and appends the query from `options`.

When `params` is null, not an object, or an empty object, the
template's parameters are left in place. When the query is empty no
`?` is appended. A template is therefore returned unchanged when
neither is provided.

```
use trillium_scoped_router::{build_url, json, UrlOptions};
let url = build_url(
    "/orders/by/:userId/from/:providerName",
    &json!({ "userId": 42, "providerName": "provider-a" }),
    &UrlOptions::new()
        .with_query(json!({
            "q": 1032503,
            "sort": ["-id", "userId"],
            "foo": { "bar": true, "baz": false }
        }))
        .with_encode(false),
)
.unwrap();

assert_eq!(
    url,
    "/orders/by/42/from/provider-a?q=1032503&sort[]=-id&sort[]=userId&foo[bar]=true&foo[baz]=false"
);

assert_eq!(
    build_url("/users/:id", &json!(null), &UrlOptions::new()).unwrap(),
    "/users/:id"
);
```

# Errors

[`Error::Pattern`](crate::Error::Pattern) if the template cannot be
parsed, [`Error::MissingParameter`](crate::Error::MissingParameter) if
a parameter in the template has no value, and
[`Error::InvalidParameter`](crate::Error::InvalidParameter) if a value
cannot be written into a path.
*/
pub fn build_url(template: &str, params: &Value, options: &UrlOptions) -> Result<String> {
    let mut url = match params {
        Value::Object(params) if !params.is_empty() => compile(template)?.render(params)?,
        _ => template.to_string(),
    };

    if !options.query.is_empty() {
        let query = query::stringify(&options.query, &options.query_options);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
    }

    Ok(url)
}
