use crate::{
    args::{resolve, BoxedHandler, RouteArg, RouteArgs, RouteSpec},
    Meta, Result, Router, RouterOptions,
};

/// the callback type accepted by [`Layer::scope`]
pub type ScopeFn<'s> = Box<dyn FnOnce(&mut Layer<'_>) -> Result<()> + 's>;

/**
Tags `scope` as the target argument of [`Layer::scope`].

```
use trillium_scoped_router::{scope_fn, Router};
let mut router = Router::new();
router
    .scope(["Users".into(), "/users".into(), scope_fn(|users| {
        users.get(("Index", "/", "all users"))?;
        users.get(("View", "/:userId", "one user"))?;
        Ok(())
    })])
    .unwrap();

assert_eq!(router.url("UsersIndex").unwrap(), "/users");
```
*/
pub fn scope_fn<'s>(scope: impl FnOnce(&mut Layer<'_>) -> Result<()> + 's) -> RouteArg<ScopeFn<'s>> {
    RouteArg::Target(Box::new(scope))
}

/**
The name, path and meta that a scope contributes to every route
registered within it.
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePrefix {
    /// the composed scope name, empty for an unnamed scope
    pub name: String,
    /// the full path of the scope, starting from the router root
    pub path: String,
    /// meta merged from every enclosing scope
    pub meta: Meta,
}

macro_rules! method {
    ($fn_name:ident, $method:literal) => {
        #[doc = concat!(
            "Registers a handler for the ",
            stringify!($fn_name),
            " http method within this scope. See [`resolve`][crate::resolve] for the accepted argument shapes."
        )]
        pub fn $fn_name(&mut self, args: impl Into<RouteArgs<BoxedHandler>>) -> Result<&mut Self> {
            self.route($method, args)
        }
    };
}

/**
# A registration scope

Every route registered through a layer has the layer's path prepended,
its name composed with the layer's name, and the layer's meta merged
beneath its own. The root layer of a [`Router`] starts from the
router's path prefix, with no name and no meta.

Layers only exist while routes are being registered.
*/
#[derive(Debug)]
pub struct Layer<'r> {
    router: &'r mut Router,
    prefix: RoutePrefix,
}

impl<'r> Layer<'r> {
    pub(crate) fn root(router: &'r mut Router) -> Self {
        let prefix = RoutePrefix {
            path: router.options().path_prefix().to_string(),
            ..RoutePrefix::default()
        };
        Self { router, prefix }
    }

    /// the full path of this layer
    pub fn path(&self) -> &str {
        &self.prefix.path
    }

    /// the composed name of this layer
    pub fn name(&self) -> &str {
        &self.prefix.name
    }

    /// the merged meta of this layer
    pub fn meta(&self) -> &Meta {
        &self.prefix.meta
    }

    /// Registers a handler for an arbitrary http method within this scope.
    pub fn route(
        &mut self,
        method: &str,
        args: impl Into<RouteArgs<BoxedHandler>>,
    ) -> Result<&mut Self> {
        self.router.register(method, resolve(args)?, &self.prefix)?;
        Ok(self)
    }

    /// Registers one handler for each of `methods` within this scope.
    pub fn methods(
        &mut self,
        methods: &[&str],
        args: impl Into<RouteArgs<BoxedHandler>>,
    ) -> Result<&mut Self> {
        self.router
            .register_methods(methods, resolve(args)?, &self.prefix)?;
        Ok(self)
    }

    /// Registers the handler for get, post, put, delete and patch.
    pub fn any(&mut self, args: impl Into<RouteArgs<BoxedHandler>>) -> Result<&mut Self> {
        self.methods(&["get", "post", "put", "delete", "patch"], args)
    }

    method!(get, "get");
    method!(post, "post");
    method!(put, "put");
    method!(patch, "patch");
    method!(delete, "delete");
    method!(head, "head");

    /**
    Creates a nested layer and runs the callback with it before
    returning. Accepts the same shapes as the verb methods, with the
    scope callback in place of the handler.
    */
    pub fn scope<'s>(&mut self, args: impl Into<RouteArgs<ScopeFn<'s>>>) -> Result<&mut Self> {
        let RouteSpec {
            name,
            path,
            target,
            meta,
        } = resolve(args)?;
        let prefix = RoutePrefix {
            name: compose_name(self.router.options(), &self.prefix.name, &name),
            path: join_paths(&self.prefix.path, &path),
            meta: self.prefix.meta.merge(&meta),
        };

        log::debug!("entering scope {:?} at {:?}", prefix.name, prefix.path);
        target(&mut Layer {
            router: &mut *self.router,
            prefix,
        })?;
        Ok(self)
    }
}

/// Joins a parent name and a child name according to the router's
/// scope naming options. An empty parent yields `name` unchanged;
/// otherwise the separator is always placed, even for an empty `name`.
pub(crate) fn compose_name(options: &RouterOptions, parent: &str, name: &str) -> String {
    match (parent, name) {
        ("", name) => name.to_string(),
        (parent, name) if options.reverse_scope_naming() => {
            format!("{name}{}{parent}", options.scope_separator())
        }
        (parent, name) => format!("{parent}{}{name}", options.scope_separator()),
    }
}

/// Concatenates two paths after removing one trailing `/` from each.
/// A missing leading `/` on a non-empty `path` is added.
pub(crate) fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() || path.starts_with('/') {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}/{path}")
    }
}
