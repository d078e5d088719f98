use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};

/// the params key used for a wildcard that was declared without a name
pub const DEFAULT_WILDCARD: &str = "wildcard";

/// One `/`-delimited piece of a route pattern.
///
/// `/users/:id/files/*path` parses to
/// `[Static("users"), Param("id"), Static("files"), Wildcard("path")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// must match the request segment exactly
    Static(String),
    /// matches exactly one non-empty request segment
    Param(String),
    /// matches the remainder of the request path, including any `/`
    Wildcard(String),
}

impl PathSegment {
    /// the name this segment binds, if it binds one
    pub fn name(&self) -> Option<&str> {
        match self {
            PathSegment::Static(_) => None,
            PathSegment::Param(name) | PathSegment::Wildcard(name) => Some(name),
        }
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Static(text) => f.write_str(text),
            PathSegment::Param(name) => write!(f, ":{name}"),
            PathSegment::Wildcard(name) => write!(f, "*{name}"),
        }
    }
}

/// Removes a single trailing `/`. The empty path normalizes to `/`.
pub fn normalize(path: &str) -> &str {
    match path.strip_suffix('/').unwrap_or(path) {
        "" => "/",
        trimmed => trimmed,
    }
}

/// splits an already-normalized path into its segments. `/` has none.
pub(crate) fn segments(path: &str) -> Vec<&str> {
    match path.strip_prefix('/').unwrap_or(path) {
        "" => vec![],
        rest => rest.split('/').collect(),
    }
}

/// Parses a route pattern into its segments.
///
/// ```
/// use trillium_scoped_router::{parse, PathSegment};
/// assert_eq!(
///     parse("/files/:owner/*path").unwrap(),
///     vec![
///         PathSegment::Static("files".into()),
///         PathSegment::Param("owner".into()),
///         PathSegment::Wildcard("path".into()),
///     ]
/// );
/// assert!(parse("/files/*path/edit").is_err());
/// ```
pub fn parse(template: &str) -> Result<Vec<PathSegment>> {
    let parts = segments(normalize(template));
    let last = parts.len().saturating_sub(1);
    parts
        .into_iter()
        .enumerate()
        .map(|(index, part)| {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(Error::pattern(template, "parameter without a name"));
                }
                Ok(PathSegment::Param(name.to_string()))
            } else if let Some(name) = part.strip_prefix('*') {
                if index != last {
                    return Err(Error::pattern(
                        template,
                        "a wildcard must be the final segment",
                    ));
                }
                let name = if name.is_empty() { DEFAULT_WILDCARD } else { name };
                Ok(PathSegment::Wildcard(name.to_string()))
            } else {
                Ok(PathSegment::Static(part.to_string()))
            }
        })
        .collect()
}

/**
A parsed template that can be rendered back into a concrete path.

See [`compile`].
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    source: String,
    segments: Vec<PathSegment>,
}

/// Parses `template` once so that it can be rendered repeatedly with
/// [`CompiledTemplate::render`].
pub fn compile(template: &str) -> Result<CompiledTemplate> {
    Ok(CompiledTemplate {
        source: template.to_string(),
        segments: parse(template)?,
    })
}

impl CompiledTemplate {
    /// the template this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// the parsed segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /**
    Substitutes every parameter and wildcard with the value found
    under its name in `params`. Values are inserted without escaping.

    ```
    use serde_json::json;
    use trillium_scoped_router::compile;
    let template = compile("/orders/by/:userId/from/:providerName").unwrap();
    let params = json!({ "userId": 42, "providerName": "provider-a" });
    assert_eq!(
        template.render(params.as_object().unwrap()).unwrap(),
        "/orders/by/42/from/provider-a"
    );
    ```
    */
    pub fn render(&self, params: &Map<String, Value>) -> Result<String> {
        let mut path = String::with_capacity(self.source.len());
        for segment in &self.segments {
            let rendered = match segment {
                PathSegment::Static(text) => text.clone(),
                PathSegment::Param(name) => render_value(name, params.get(name), false)?,
                PathSegment::Wildcard(name) => render_value(name, params.get(name), true)?,
            };

            if rendered.is_empty() && matches!(segment, PathSegment::Wildcard(_)) {
                continue;
            }

            path.push('/');
            path.push_str(&rendered);
        }

        if path.is_empty() {
            path.push('/');
        }

        Ok(path)
    }
}

fn render_value(name: &str, value: Option<&Value>, wildcard: bool) -> Result<String> {
    match value {
        None | Some(Value::Null) => Err(Error::MissingParameter(name.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(values)) if wildcard => values
            .iter()
            .map(|value| render_value(name, Some(value), false))
            .collect::<Result<Vec<_>>>()
            .map(|parts| parts.join("/")),
        Some(_) => Err(Error::InvalidParameter(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, params: Value) -> Result<String> {
        compile(template)?.render(params.as_object().unwrap())
    }

    #[test]
    fn normalizes_trailing_slashes() {
        assert_eq!(normalize("/users/"), "/users");
        assert_eq!(normalize("/users"), "/users");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/users//"), "/users/");
    }

    #[test]
    fn parses_segments() {
        assert_eq!(parse("/").unwrap(), vec![]);
        assert_eq!(
            parse("/users/:id/").unwrap(),
            vec![
                PathSegment::Static("users".into()),
                PathSegment::Param("id".into())
            ]
        );
        assert_eq!(
            parse("/files/*").unwrap(),
            vec![
                PathSegment::Static("files".into()),
                PathSegment::Wildcard(DEFAULT_WILDCARD.into())
            ]
        );
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(matches!(
            parse("/files/*path/edit"),
            Err(Error::Pattern { .. })
        ));
        assert!(matches!(parse("/users/:"), Err(Error::Pattern { .. })));
    }

    #[test]
    fn renders_params_and_wildcards() {
        assert_eq!(render("/users/:id", json!({ "id": 1 })).unwrap(), "/users/1");
        assert_eq!(
            render("/files/*path", json!({ "path": "a/b/c.txt" })).unwrap(),
            "/files/a/b/c.txt"
        );
        assert_eq!(
            render("/files/*path", json!({ "path": ["a", "b", "c.txt"] })).unwrap(),
            "/files/a/b/c.txt"
        );
        assert_eq!(render("/files/*path", json!({ "path": "" })).unwrap(), "/files");
        assert_eq!(render("/", json!({ "unused": true })).unwrap(), "/");
        assert_eq!(
            render("/flags/:on", json!({ "on": false, "extra": 1 })).unwrap(),
            "/flags/false"
        );
    }

    #[test]
    fn render_errors() {
        assert_eq!(
            render("/users/:id", json!({ "user": 1 })),
            Err(Error::MissingParameter("id".into()))
        );
        assert_eq!(
            render("/users/:id", json!({ "id": null })),
            Err(Error::MissingParameter("id".into()))
        );
        assert_eq!(
            render("/users/:id", json!({ "id": [1, 2] })),
            Err(Error::InvalidParameter("id".into()))
        );
        assert_eq!(
            render("/users/:id", json!({ "id": { "nested": 1 } })),
            Err(Error::InvalidParameter("id".into()))
        );
    }
}
