use crate::{Params, ResolvedRoute, Value};
use trillium::Conn;

/**
Extends trillium::Conn with accessors for the matched route.
*/
pub trait RouterConnExt {
    /**
    Retrieves a captured param from the conn. Note that this will only
    be Some if the exact param is present in the matched route.

    Params are defined starting with a colon, but the colon is not
    needed when fetching the param. A wildcard declared as `*rest` is
    fetched as `rest`, and a bare `*` as `wildcard`.

    ```
    use trillium::{conn_unwrap, Conn};
    use trillium_scoped_router::{Router, RouterConnExt};

    let mut router = Router::new();
    router.get(("/pages/:page_name", |conn: Conn| async move {
        let page_name = conn_unwrap!(conn.param("page_name"), conn);
        let content = format!("you have reached the page named {}", page_name);
        conn.ok(content)
    })).unwrap();

    use trillium_testing::prelude::*;
    assert_ok!(
        get("/pages/trillium").on(&router),
        "you have reached the page named trillium"
    );
    ```
    */
    fn param<'a>(&'a self, param: &str) -> Option<&'a str>;

    /// Retrieves every captured param, in pattern order.
    ///
    /// ```
    /// use trillium::{conn_unwrap, Conn};
    /// use trillium_scoped_router::{Router, RouterConnExt};
    ///
    /// let mut router = Router::new();
    /// router.get(("/files/:owner/*path", |conn: Conn| async move {
    ///     let params = conn_unwrap!(conn.params(), conn);
    ///     let content = params
    ///         .iter()
    ///         .map(|(key, value)| format!("{key}={value}"))
    ///         .collect::<Vec<_>>()
    ///         .join(" ");
    ///     conn.ok(content)
    /// })).unwrap();
    ///
    /// use trillium_testing::prelude::*;
    /// assert_ok!(
    ///     get("/files/jbr/docs/readme.md").on(&router),
    ///     "owner=jbr path=docs/readme.md"
    /// );
    /// ```
    fn params(&self) -> Option<&Params>;

    /// Retrieves a value from the matched route's merged meta.
    fn route_meta(&self, key: &str) -> Option<&Value>;

    /// Retrieves the matched route and its params.
    /// ```
    /// use trillium::{conn_unwrap, Conn};
    /// use trillium_scoped_router::{Router, RouterConnExt};
    ///
    /// let mut router = Router::new();
    /// router.get(("PagesView", "/pages/:page_id", |conn: Conn| async move {
    ///     let resolved = conn_unwrap!(conn.resolved_route(), conn);
    ///     let content = format!(
    ///         "route was {} named {}",
    ///         resolved.route().pattern(),
    ///         resolved.route().name().unwrap_or_default()
    ///     );
    ///     conn.ok(content)
    /// })).unwrap();
    ///
    /// use trillium_testing::prelude::*;
    /// assert_ok!(
    ///     get("/pages/12345").on(&router),
    ///     "route was /pages/:page_id named PagesView"
    /// );
    /// ```
    fn resolved_route(&self) -> Option<&ResolvedRoute>;
}

impl RouterConnExt for Conn {
    fn param<'a>(&'a self, param: &str) -> Option<&'a str> {
        self.params().and_then(|params| params.get(param))
    }

    fn params(&self) -> Option<&Params> {
        self.state()
    }

    fn route_meta(&self, key: &str) -> Option<&Value> {
        self.resolved_route()
            .and_then(|resolved| resolved.meta().get(key))
    }

    fn resolved_route(&self) -> Option<&ResolvedRoute> {
        self.state()
    }
}
