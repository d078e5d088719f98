use crate::{
    args::{BoxedHandler, RouteArgs, RouteSpec},
    layer::{compose_name, join_paths, Layer, RoutePrefix, ScopeFn},
    url::{build_url, UrlOptions},
    Error, Meta, ResolvedRoute, Result, Route, RouteTree, RouterOptions, Value,
};
use std::{borrow::Cow, collections::BTreeMap, sync::Arc};
use trillium::{async_trait, Conn, Handler, Info, Upgrade};

/**
# The scoped router handler

Routes are registered through per-method functions, optionally within
nested, named [scopes](Router::scope). Named routes can be turned back
into urls with [`Router::url`] and [`Router::url_with`].

As a trillium handler, a `Router` runs the matched route's handler. A
request that matches no route passes through untouched, so the next
handler in the sequence runs. To reject unmatched requests with a 404
before other handlers run, see [`Resolve`](crate::Resolve).
*/
#[derive(Debug, Default)]
pub struct Router {
    options: RouterOptions,
    tree: RouteTree<Arc<Route>>,
    named_routes: BTreeMap<String, String>,
}

macro_rules! method {
    ($fn_name:ident, $method:ident) => {
        method!(
            $fn_name,
            $method,
            concat!(
                // yep, macro-generated doctests
                "Registers a handler for the ",
                stringify!($fn_name),
                " http method. See [`resolve`][crate::resolve] for the accepted argument shapes.

```
# use trillium::Conn;
# use trillium_scoped_router::Router;
let mut router = Router::new();
router.",
                stringify!($fn_name),
                "((\"/some/route\", |conn: Conn| async move {
  conn.ok(\"success\")
})).unwrap();

use trillium_testing::{TestConn, prelude::*};
let conn = TestConn::build(\"",
                stringify!($fn_name),
                "\", \"/some/route\", ()).on(&router);
assert_status!(conn, 200);
assert_not_handled!(TestConn::build(\"",
                stringify!($fn_name),
                "\", \"/other/route\", ()).on(&router));
```
"
            )
        );
    };
    ($fn_name:ident, $method:ident, $doc_comment:expr) => {
        #[doc = $doc_comment]
        pub fn $fn_name(&mut self, args: impl Into<RouteArgs<BoxedHandler>>) -> Result<&mut Self> {
            self.root().$method(args)?;
            Ok(self)
        }
    };
}

impl Router {
    /**
    Constructs a new Router with default [`RouterOptions`].

    ```
    # use trillium::Conn;
    # use trillium_scoped_router::Router;
    let mut router = Router::new();
    router
        .get(("/", |conn: Conn| async move { conn.ok("you have reached the index") }))
        .unwrap()
        .get(("/some/:param", |conn: Conn| async move { conn.ok("you have reached /some/:param") }))
        .unwrap()
        .post(("/", |conn: Conn| async move { conn.ok("post!") }))
        .unwrap();

    use trillium_testing::prelude::*;
    assert_ok!(get("/").on(&router), "you have reached the index");
    assert_ok!(get("/some/route").on(&router), "you have reached /some/:param");
    assert_ok!(post("/").on(&router), "post!");
    ```
    */
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new Router with the provided options.
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// the current options
    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Sets a path prefix for the root scope. Configure this before
    /// registering routes.
    #[must_use]
    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.options = self.options.with_path_prefix(path_prefix);
        self
    }

    /// Sets the separator placed between composed names.
    #[must_use]
    pub fn with_scope_separator(mut self, scope_separator: impl Into<String>) -> Self {
        self.options = self.options.with_scope_separator(scope_separator);
        self
    }

    /// Places inner names before outer names when composing.
    #[must_use]
    pub fn with_reverse_scope_naming(mut self, reverse_scope_naming: bool) -> Self {
        self.options = self.options.with_reverse_scope_naming(reverse_scope_naming);
        self
    }

    /**
    Another way to build a router, if you prefer registering routes
    inside a closure. The argument to the closure is the root
    [`Layer`].

    ```
    # use trillium::Conn;
    # use trillium_scoped_router::{scope_fn, Router};
    let router = Router::new()
        .with_scope_separator(".")
        .build(|router| {
            router.get(("Home", "/", "home"))?;
            router.scope(["Users".into(), "/users".into(), scope_fn(|users| {
                users.get(("Index", "/", "all users"))?;
                users.get(("View", "/:userId", |conn: Conn| async move {
                    conn.ok("one user")
                }))?;
                Ok(())
            })])?;
            Ok(())
        })
        .unwrap();

    assert_eq!(router.url("Users.Index").unwrap(), "/users");

    use trillium_testing::prelude::*;
    assert_ok!(get("/users/42").on(&router), "one user");
    ```
    */
    pub fn build(mut self, builder: impl FnOnce(&mut Layer<'_>) -> Result<()>) -> Result<Self> {
        builder(&mut self.root())?;
        Ok(self)
    }

    /// the root layer, whose path is the configured path prefix
    pub fn root(&mut self) -> Layer<'_> {
        Layer::root(self)
    }

    method!(get, get);
    method!(post, post);
    method!(put, put);
    method!(patch, patch);
    method!(delete, delete);
    method!(head, head);

    /// Registers a handler for an arbitrary http method.
    pub fn route(
        &mut self,
        method: &str,
        args: impl Into<RouteArgs<BoxedHandler>>,
    ) -> Result<&mut Self> {
        self.root().route(method, args)?;
        Ok(self)
    }

    /// Registers one handler for each of `methods`.
    pub fn methods(
        &mut self,
        methods: &[&str],
        args: impl Into<RouteArgs<BoxedHandler>>,
    ) -> Result<&mut Self> {
        self.root().methods(methods, args)?;
        Ok(self)
    }

    /**
    Appends the handler to all (get, post, put, delete, and patch) methods.

    ```
    # use trillium::Conn;
    # use trillium_scoped_router::Router;
    let mut router = Router::new();
    router.any(("/any", |conn: Conn| async move {
        let response = format!("you made a {} request to /any", conn.method());
        conn.ok(response)
    })).unwrap();

    use trillium_testing::prelude::*;
    assert_ok!(get("/any").on(&router), "you made a GET request to /any");
    assert_ok!(post("/any").on(&router), "you made a POST request to /any");
    assert_ok!(delete("/any").on(&router), "you made a DELETE request to /any");

    assert_not_handled!(get("/").on(&router));
    ```
    */
    pub fn any(&mut self, args: impl Into<RouteArgs<BoxedHandler>>) -> Result<&mut Self> {
        self.root().any(args)?;
        Ok(self)
    }

    /// Creates a scope under the root layer. See [`Layer::scope`].
    pub fn scope<'s>(&mut self, args: impl Into<RouteArgs<ScopeFn<'s>>>) -> Result<&mut Self> {
        self.root().scope(args)?;
        Ok(self)
    }

    /**
    Registers a resolved route under `prefix`.

    The path and the prefix path each lose one trailing `/` before
    being joined. A non-empty name is composed with the prefix name
    and recorded for url building, replacing any route previously
    registered under the same name. The route's meta is the prefix
    meta overridden by the route's own meta.

    # Errors

    Returns [`Error::Pattern`] if the joined path is not a valid
    pattern.
    */
    pub fn register(
        &mut self,
        method: &str,
        spec: RouteSpec<BoxedHandler>,
        prefix: &RoutePrefix,
    ) -> Result<&mut Self> {
        let RouteSpec {
            name,
            path,
            target,
            meta,
        } = spec;
        self.insert(method, &name, &path, Arc::from(target), &meta, prefix)?;
        Ok(self)
    }

    /// Registers the same handler for each of `methods`. See
    /// [`Router::register`].
    pub fn register_methods(
        &mut self,
        methods: &[&str],
        spec: RouteSpec<BoxedHandler>,
        prefix: &RoutePrefix,
    ) -> Result<&mut Self> {
        let RouteSpec {
            name,
            path,
            target,
            meta,
        } = spec;
        let handler: Arc<dyn Handler> = Arc::from(target);
        for method in methods {
            self.insert(method, &name, &path, Arc::clone(&handler), &meta, prefix)?;
        }
        Ok(self)
    }

    pub(crate) fn insert(
        &mut self,
        method: &str,
        name: &str,
        path: &str,
        handler: Arc<dyn Handler>,
        meta: &Meta,
        prefix: &RoutePrefix,
    ) -> Result<()> {
        let method = method.to_ascii_lowercase();
        let mut pattern = join_paths(&prefix.path, path);
        if pattern.is_empty() {
            pattern.push('/');
        }
        let name = (!name.is_empty()).then(|| compose_name(&self.options, &prefix.name, name));

        let route = Route {
            handler,
            meta: prefix.meta.merge(meta),
            method: method.clone(),
            pattern: pattern.clone(),
            name: name.clone(),
        };
        log::debug!("registering {route:?}");
        self.tree.define(&pattern)?.handle(&method, Arc::new(route));

        if let Some(name) = name {
            if let Some(previous) = self.named_routes.insert(name.clone(), pattern) {
                log::debug!("route name {name} previously referred to {previous}");
            }
        }

        Ok(())
    }

    /**
    If `name_or_path` starts with `/`, whether any route's pattern
    matches it, for any method. Otherwise, whether a route was
    registered with that name.

    ```
    # use trillium_scoped_router::Router;
    let mut router = Router::new();
    router.get(("Show", "/users/:id", "user")).unwrap();
    assert!(router.has_route("Show"));
    assert!(router.has_route("/users/12"));
    assert!(!router.has_route("/users"));
    assert!(!router.has_route("Index"));
    ```
    */
    pub fn has_route(&self, name_or_path: &str) -> bool {
        if name_or_path.starts_with('/') {
            self.tree.matches(name_or_path).is_some()
        } else {
            self.named_routes.contains_key(name_or_path)
        }
    }

    /// the path template registered under `name`
    pub fn named_route(&self, name: &str) -> Option<&str> {
        self.named_routes.get(name).map(String::as_str)
    }

    /// every (name, path template) pair, sorted by name
    pub fn named_routes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named_routes
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_str()))
    }

    /**
    Builds the url for a named route, with no params and no query.

    # Errors

    [`Error::NamedRouteNotFound`] if no route has that name. Without
    params, the template is returned verbatim.
    */
    pub fn url(&self, name: &str) -> Result<String> {
        self.url_with(name, &Value::Null, &UrlOptions::default())
    }

    /**
    Builds the url for a named route. See [`build_url`].

    ```
    # use trillium_scoped_router::{json, scope_fn, Router, UrlOptions};
    let mut router = Router::new();
    router.scope(["Users".into(), "/users".into(), scope_fn(|users| {
        users.get(("View", "/:userId", "user"))?;
        Ok(())
    })]).unwrap();

    let options = UrlOptions::new()
        .with_query(json!({ "sort": ["-id", "name"] }))
        .with_encode(false);
    assert_eq!(
        router.url_with("UsersView", &json!({ "userId": 42 }), &options).unwrap(),
        "/users/42?sort[]=-id&sort[]=name"
    );
    ```
    */
    pub fn url_with(&self, name: &str, params: &Value, options: &UrlOptions) -> Result<String> {
        let template = self
            .named_route(name)
            .ok_or_else(|| Error::NamedRouteNotFound(name.to_string()))?;
        build_url(template, params, options)
    }

    /// Looks up the route for `method` and `path`. A path that matches
    /// a pattern with no route for this method is not found.
    pub fn find(&self, method: &str, path: &str) -> Option<ResolvedRoute> {
        let (node, params) = self.tree.matches(path)?.into_parts();
        let route = node.payload(method)?;
        Some(ResolvedRoute {
            route: Arc::clone(route),
            params,
            router: self.id(),
        })
    }

    /**
    The lowercase methods registered for the pattern that `path`
    matches. Empty when no pattern matches.

    This is informational only: a request with any other method is
    not found, like a request for an unknown path.
    */
    pub fn allowed_methods(&self, path: &str) -> Vec<String> {
        self.tree
            .matches(path)
            .map(|found| found.node().allowed_methods().map(String::from).collect())
            .unwrap_or_default()
    }

    /// the handler-visible path for `path`, if the path prefix applies
    fn strip_path_prefix(&self, path: &str) -> Option<String> {
        let prefix = self.options.path_prefix();
        let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
        if prefix.is_empty() {
            return None;
        }

        match path.strip_prefix(prefix)? {
            "" => Some(String::from("/")),
            rest if rest.starts_with('/') => Some(rest.to_string()),
            _ => None,
        }
    }

    pub(crate) fn id(&self) -> usize {
        self as *const Router as usize
    }
}

#[async_trait]
impl Handler for Router {
    async fn run(&self, mut conn: Conn) -> Conn {
        let resolved = conn
            .state::<ResolvedRoute>()
            .filter(|resolved| resolved.router == self.id())
            .cloned()
            .or_else(|| self.find(conn.method().as_ref(), conn.path()));

        let Some(resolved) = resolved else {
            log::debug!("{} {} did not match any route", conn.method(), conn.path());
            return conn;
        };

        let route = Arc::clone(&resolved.route);
        log::debug!("running {} {}", route.method(), route.pattern());
        conn.insert_state(resolved.params.clone());
        conn.insert_state(resolved);

        let stripped = self.strip_path_prefix(conn.path());
        let has_path = stripped.is_some();
        if let Some(path) = stripped {
            conn.push_path(path);
        }

        let mut conn = route.handler().run(conn).await;
        if has_path {
            conn.pop_path();
        }
        conn
    }

    async fn init(&mut self, info: &mut Info) {
        for route in self.tree.payloads_mut() {
            let pattern = route.pattern.clone();
            match Arc::get_mut(route).and_then(|route| Arc::get_mut(&mut route.handler)) {
                Some(handler) => handler.init(info).await,
                None => log::warn!("not initializing the shared handler for {pattern}"),
            }
        }
    }

    async fn before_send(&self, conn: Conn) -> Conn {
        match self.find(conn.method().as_ref(), conn.path()) {
            Some(resolved) => resolved.route.handler().before_send(conn).await,
            None => conn,
        }
    }

    fn has_upgrade(&self, upgrade: &Upgrade) -> bool {
        self.find(upgrade.method().as_ref(), upgrade.path())
            .is_some_and(|resolved| resolved.route.handler().has_upgrade(upgrade))
    }

    async fn upgrade(&self, upgrade: Upgrade) {
        if let Some(resolved) = self.find(upgrade.method().as_ref(), upgrade.path()) {
            resolved.route.handler().upgrade(upgrade).await
        }
    }

    fn name(&self) -> Cow<'static, str> {
        format!("scoped router ({} named routes)", self.named_routes.len()).into()
    }
}
