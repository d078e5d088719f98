/*!
# Welcome to the `trillium-scoped-router` crate!

This router is built on a segment trie. Static segments take
precedence over `:params`, which take precedence over a trailing
`*wildcard`, and the matcher backtracks when a more specific branch
dead-ends.

Routes can be registered within nested scopes. A scope contributes a
path prefix, a name that is composed with the names of the routes in
it, and meta that every route in it inherits. Named routes can be
turned back into urls, with a query string.

```
use trillium::Conn;
use trillium_scoped_router::{scope_fn, Meta, Router, RouterConnExt};

let mut router = Router::new().with_scope_separator(".");
router
    .get(("Home", "/", "home"))
    .unwrap()
    .scope([
        "Users".into(),
        "/users".into(),
        scope_fn(|users| {
            users.get(("Index", "/", "all users"))?;
            users.get(("View", "/:userId", |conn: Conn| async move {
                let user_id = conn.param("userId").unwrap_or_default().to_string();
                conn.ok(format!("user {user_id}"))
            }))?;
            Ok(())
        }),
        Meta::new().with("requiresAuth", true).into(),
    ])
    .unwrap();

assert_eq!(router.url("Users.Index").unwrap(), "/users");

use trillium_testing::prelude::*;
assert_ok!(get("/users/42").on(&router), "user 42");
assert_ok!(get("/users").on(&router), "all users");
assert_not_handled!(get("/posts").on(&router));
```

## Pipeline steps

The [`Router`] handler runs the matched route and lets unmatched
requests through to the next handler. [`Resolve`] matches first and
halts unmatched requests with a 404, so that handlers in between can
act on the matched route's meta. See [`Resolve`] for an example.

## Declarative routes

A tree of [`RouteRecord`]s can be registered at once with
[`Router::import`].
*/
#![forbid(unsafe_code)]
#![warn(
    missing_copy_implementations,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

mod args;
mod error;
mod import;
mod layer;
mod meta;
mod options;
mod params;
mod pattern;
pub mod query;
mod resolve;
mod route;
mod router;
mod router_conn_ext;
mod tree;
mod url;

pub use args::{handler, resolve, BoxedHandler, RouteArg, RouteArgs, RouteSpec};
pub use error::{Error, Result};
pub use import::{Diagnostics, LogDiagnostics, RouteRecord};
pub use layer::{scope_fn, Layer, RoutePrefix, ScopeFn};
pub use meta::Meta;
pub use options::RouterOptions;
pub use params::Params;
pub use pattern::{compile, normalize, parse, CompiledTemplate, PathSegment, DEFAULT_WILDCARD};
pub use query::{ArrayFormat, QueryOptions};
pub use resolve::Resolve;
pub use route::{ResolvedRoute, Route};
pub use router::Router;
pub use router_conn_ext::RouterConnExt;
pub use serde_json::{json, Value};
pub use tree::{RouteBuilder, RouteNode, RouteTree, TreeMatch};
pub use url::{build_url, UrlOptions};
