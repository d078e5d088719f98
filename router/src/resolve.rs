use crate::Router;
use std::{borrow::Cow, sync::Arc};
use trillium::{async_trait, Conn, Handler};

/**
# The resolve step

Looks up the route for each request and stores the
[`ResolvedRoute`](crate::ResolvedRoute) in the conn's state. A request
that matches no route is halted with a 404, so no later handler runs.

Pair it with the same router as the handle step. Any handlers placed
between the two can read the matched route's meta through
[`RouterConnExt`](crate::RouterConnExt).

Sharing the router through an [`Arc`] means route handlers never see
[`Handler::init`]: the router only initializes its routes when it is
uniquely owned at startup. Keep handlers that depend on `init` in a
router that is not shared with a resolve step.

```
use std::sync::Arc;
use trillium::Conn;
use trillium_scoped_router::{Meta, Router, RouterConnExt};

let mut router = Router::new();
router
    .get(("Admin", "/admin", "secrets", Meta::new().with("requiresAuth", true)))
    .unwrap();
let router = Arc::new(router);

let handler = (
    router.resolver(),
    |conn: Conn| async move {
        let requires_auth = conn
            .route_meta("requiresAuth")
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        if requires_auth {
            conn.with_status(403).halt()
        } else {
            conn
        }
    },
    router,
);

use trillium_testing::prelude::*;
assert_status!(get("/admin").on(&handler), 403);
assert_status!(get("/missing").on(&handler), 404);
```
*/
#[derive(Debug, Clone)]
pub struct Resolve(Arc<Router>);

impl Resolve {
    /// Builds a resolve step for `router`.
    pub fn new(router: Arc<Router>) -> Self {
        Self(router)
    }

    /// the router this step resolves against
    pub fn router(&self) -> &Router {
        &self.0
    }
}

impl Router {
    /// Builds a [`Resolve`] step sharing this router.
    pub fn resolver(self: &Arc<Self>) -> Resolve {
        Resolve::new(Arc::clone(self))
    }
}

#[async_trait]
impl Handler for Resolve {
    async fn run(&self, conn: Conn) -> Conn {
        match self.0.find(conn.method().as_ref(), conn.path()) {
            Some(resolved) => {
                log::debug!(
                    "resolved {} {} to {}",
                    conn.method(),
                    conn.path(),
                    resolved.route().pattern()
                );
                conn.with_state(resolved)
            }

            None => {
                log::debug!("{} {} did not match any route", conn.method(), conn.path());
                conn.with_status(404).halt()
            }
        }
    }

    fn name(&self) -> Cow<'static, str> {
        "scoped router resolve step".into()
    }
}
