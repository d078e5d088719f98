use crate::{Meta, Params};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use trillium::Handler;

/// A registered route: one handler for one method at one pattern.
pub struct Route {
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) meta: Meta,
    pub(crate) method: String,
    pub(crate) pattern: String,
    pub(crate) name: Option<String>,
}

impl Route {
    /// the handler that runs when this route matches
    pub fn handler(&self) -> &dyn Handler {
        &*self.handler
    }

    /// this route's meta, merged with the meta of every enclosing scope
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// the lowercase http method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// the full pattern, including every scope prefix
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// the composed route name, if the route was named
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("handler", &self.handler.name())
            .field("meta", &self.meta)
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .finish()
    }
}

/**
The outcome of a successful lookup: the route and the params bound
while matching the request path.

This is placed in the conn's state by [`crate::Resolve`] and by the
[`crate::Router`] handler. See [`crate::RouterConnExt`].
*/
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub(crate) route: Arc<Route>,
    pub(crate) params: Params,
    pub(crate) router: usize,
}

impl ResolvedRoute {
    /// the matched route
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// the bound params
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// shortcut for the matched route's meta
    pub fn meta(&self) -> &Meta {
        &self.route.meta
    }
}
