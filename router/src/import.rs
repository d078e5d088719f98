use crate::{
    args::BoxedHandler,
    layer::{join_paths, RoutePrefix},
    Meta, Result, Router,
};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use trillium::Handler;

/**
One node of a declarative route tree, see [`Router::import`].

A record with a handler registers a route. A record without a handler
only groups its children. A record with neither is reported to the
[`Diagnostics`] sink and skipped.
*/
pub struct RouteRecord {
    method: String,
    path: String,
    handler: Option<BoxedHandler>,
    name: String,
    meta: Meta,
    children: Vec<RouteRecord>,
}

impl RouteRecord {
    /// a record for `path` with the get method and nothing else
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            method: String::from("get"),
            path: path.into(),
            handler: None,
            name: String::new(),
            meta: Meta::new(),
            children: vec![],
        }
    }

    /// chainable setter for the http method
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// chainable setter for the handler
    #[must_use]
    pub fn with_handler(mut self, handler: impl Handler) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// chainable setter for the route name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// chainable setter for the meta
    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// appends a child record
    #[must_use]
    pub fn with_child(mut self, child: RouteRecord) -> Self {
        self.children.push(child);
        self
    }

    /// appends several child records
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = RouteRecord>) -> Self {
        self.children.extend(children);
        self
    }

    /// the http method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// the path as written, absolute if it starts with `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// the route name, empty if unnamed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// this record's own meta
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// whether a handler was provided
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// the child records
    pub fn children(&self) -> &[RouteRecord] {
        &self.children
    }

    fn is_absolute(&self) -> bool {
        self.path.starts_with('/')
    }
}

impl Debug for RouteRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("method", &self.method)
            .field("path", &self.path)
            .field(
                "handler",
                &self.handler.as_ref().map(|handler| handler.name()),
            )
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("children", &self.children)
            .finish()
    }
}

/// Receives the records that an import skips.
pub trait Diagnostics {
    /// called for a record with neither a handler nor children
    fn omitted(&mut self, record: &RouteRecord);
}

/// The default [`Diagnostics`], which logs a warning for each skipped record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn omitted(&mut self, record: &RouteRecord) {
        log::warn!("omitting {record:?}, it has neither a handler nor children");
    }
}

impl<F> Diagnostics for F
where
    F: FnMut(&RouteRecord),
{
    fn omitted(&mut self, record: &RouteRecord) {
        self(record)
    }
}

impl Router {
    /**
    Registers a tree of [`RouteRecord`]s in order, logging skipped
    records. See [`Router::import_with`].

    ```
    use trillium_scoped_router::{Meta, RouteRecord, Router};
    let mut router = Router::new();
    router
        .import(
            [RouteRecord::new("/posts").with_children([
                RouteRecord::new("mine").with_name("MyPosts").with_handler("my posts"),
            ])],
            Meta::new(),
        )
        .unwrap();

    assert_eq!(router.url("MyPosts").unwrap(), "/posts/mine");
    ```
    */
    pub fn import(
        &mut self,
        records: impl IntoIterator<Item = RouteRecord>,
        default_meta: Meta,
    ) -> Result<&mut Self> {
        self.import_with(records, default_meta, &mut LogDiagnostics)
    }

    /**
    Registers a tree of [`RouteRecord`]s in order, reporting skipped
    records to `diagnostics`.

    A path starting with `/` is absolute: it starts over from the
    router's path prefix, and a handler record with an absolute path
    is named without any enclosing name. Any other path continues from
    the parent record's path. A record's meta is merged over the meta
    its parent passes down, starting from `default_meta`.

    Children are registered after their parent, with the parent's own
    name as their name prefix.

    # Errors

    Stops at the first record whose path is not a valid pattern.
    Records registered before it remain registered.
    */
    pub fn import_with(
        &mut self,
        records: impl IntoIterator<Item = RouteRecord>,
        default_meta: Meta,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<&mut Self> {
        let root = RoutePrefix {
            path: self.options().path_prefix().to_string(),
            meta: default_meta,
            ..RoutePrefix::default()
        };
        self.import_records(records, &root, diagnostics)?;
        Ok(self)
    }

    fn import_records(
        &mut self,
        records: impl IntoIterator<Item = RouteRecord>,
        parent: &RoutePrefix,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<()> {
        for mut record in records {
            if record.handler.is_none() && record.children.is_empty() {
                diagnostics.omitted(&record);
                continue;
            }

            let prefix = if record.is_absolute() {
                RoutePrefix {
                    path: self.options().path_prefix().to_string(),
                    name: String::new(),
                    meta: parent.meta.clone(),
                }
            } else {
                parent.clone()
            };

            if let Some(handler) = record.handler.take() {
                self.insert(
                    &record.method,
                    &record.name,
                    &record.path,
                    Arc::from(handler),
                    &record.meta,
                    &prefix,
                )?;
            }

            if !record.children.is_empty() {
                let children = RoutePrefix {
                    name: record.name,
                    path: join_paths(&prefix.path, &record.path),
                    meta: prefix.meta.merge(&record.meta),
                };
                self.import_records(record.children, &children, diagnostics)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_resets() {
        let mut router = Router::new();
        router
            .import(
                [RouteRecord::new("/metasyntactic")
                    .with_meta(Meta::new().with("message", "group"))
                    .with_children([
                        RouteRecord::new("foo").with_handler("foo"),
                        RouteRecord::new("ba")
                            .with_handler("ba")
                            .with_name("Ba")
                            .with_children([
                                RouteRecord::new("/r").with_name("Bar").with_handler("bar"),
                                RouteRecord::new("z").with_name("Baz").with_handler("baz"),
                            ]),
                    ])],
                Meta::new().with("requiresAuth", false),
            )
            .unwrap();

        assert_eq!(router.url("Ba").unwrap(), "/metasyntactic/ba");
        assert_eq!(router.url("Bar").unwrap(), "/r");
        assert_eq!(router.url("BaBaz").unwrap(), "/metasyntactic/ba/z");

        let foo = router.find("get", "/metasyntactic/foo").unwrap();
        assert_eq!(foo.meta().get("message").unwrap(), "group");
        assert_eq!(foo.meta().get("requiresAuth").unwrap(), false);
        assert!(router.find("get", "/metasyntactic").is_none());
    }

    #[test]
    fn reports_inert_records() {
        let mut omitted = vec![];
        let mut router = Router::new();
        router
            .import_with(
                [
                    RouteRecord::new("/nothing"),
                    RouteRecord::new("/something").with_handler("something"),
                ],
                Meta::new(),
                &mut |record: &RouteRecord| omitted.push(record.path().to_string()),
            )
            .unwrap();

        assert_eq!(omitted, vec![String::from("/nothing")]);
        assert!(router.has_route("/something"));
        assert!(!router.has_route("/nothing"));
    }

    #[test]
    fn methods_default_to_get() {
        let mut router = Router::new();
        router
            .import(
                [
                    RouteRecord::new("/items").with_handler("list"),
                    RouteRecord::new("/items")
                        .with_method("POST")
                        .with_handler("create"),
                ],
                Meta::new(),
            )
            .unwrap();

        assert_eq!(router.allowed_methods("/items"), vec!["get", "post"]);
    }
}
