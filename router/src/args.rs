use crate::{Error, Meta, Result};
use std::{
    borrow::Cow,
    fmt::{self, Debug, Formatter},
};
use trillium::Handler;

/// the handler type stored for routes registered through verb methods
pub type BoxedHandler = Box<dyn Handler>;

/**
One tagged positional argument to a verb method or to `scope`.

Text arguments are names or paths depending on their position. The
target is the handler (for verb methods) or the scope callback (for
`scope`).
*/
pub enum RouteArg<T> {
    /// a route name or a path
    Text(Cow<'static, str>),
    /// a handler or scope callback
    Target(T),
    /// meta for this route or scope
    Meta(Meta),
}

impl<T> Debug for RouteArg<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RouteArg::Text(text) => f.debug_tuple("Text").field(text).finish(),
            RouteArg::Target(_) => f.write_str("Target(..)"),
            RouteArg::Meta(meta) => f.debug_tuple("Meta").field(meta).finish(),
        }
    }
}

impl<T> From<&'static str> for RouteArg<T> {
    fn from(text: &'static str) -> Self {
        RouteArg::Text(Cow::Borrowed(text))
    }
}

impl<T> From<String> for RouteArg<T> {
    fn from(text: String) -> Self {
        RouteArg::Text(Cow::Owned(text))
    }
}

impl<T> From<Meta> for RouteArg<T> {
    fn from(meta: Meta) -> Self {
        RouteArg::Meta(meta)
    }
}

/// Tags `handler` as the target argument of a verb method.
pub fn handler(handler: impl Handler) -> RouteArg<BoxedHandler> {
    RouteArg::Target(Box::new(handler))
}

/**
An ordered argument list for a verb method or `scope`, see [`resolve`].

The common handler shapes convert from tuples. Every other shape can be
expressed as an array of [`RouteArg`]s:

```
use trillium_scoped_router::{handler, Meta, RouteArgs, BoxedHandler};
let _: RouteArgs<BoxedHandler> = ("/users", "users").into();
let _: RouteArgs<BoxedHandler> = ("Users", "/users", "users").into();
let _: RouteArgs<BoxedHandler> = ("Users", "/users", "users", Meta::new()).into();
let _: RouteArgs<BoxedHandler> = ["/users".into(), handler("users"), Meta::new().into()].into();
```
*/
pub struct RouteArgs<T>(Vec<RouteArg<T>>);

impl<T> Debug for RouteArgs<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

impl<T> From<Vec<RouteArg<T>>> for RouteArgs<T> {
    fn from(args: Vec<RouteArg<T>>) -> Self {
        Self(args)
    }
}

impl<T, const N: usize> From<[RouteArg<T>; N]> for RouteArgs<T> {
    fn from(args: [RouteArg<T>; N]) -> Self {
        Self(args.into())
    }
}

impl<H: Handler> From<(&str, H)> for RouteArgs<BoxedHandler> {
    fn from((path, h): (&str, H)) -> Self {
        Self(vec![path.to_string().into(), handler(h)])
    }
}

impl<H: Handler> From<(&str, &str, H)> for RouteArgs<BoxedHandler> {
    fn from((name, path, h): (&str, &str, H)) -> Self {
        Self(vec![name.to_string().into(), path.to_string().into(), handler(h)])
    }
}

impl<H: Handler> From<(&str, &str, H, Meta)> for RouteArgs<BoxedHandler> {
    fn from((name, path, h, meta): (&str, &str, H, Meta)) -> Self {
        Self(vec![
            name.to_string().into(),
            path.to_string().into(),
            handler(h),
            meta.into(),
        ])
    }
}

/// The resolved roles of a [`RouteArgs`] list.
#[derive(Debug)]
pub struct RouteSpec<T> {
    /// the route or scope name, empty when none was given
    pub name: String,
    /// the path, relative to the enclosing scope
    pub path: String,
    /// the handler or scope callback
    pub target: T,
    /// meta, empty when none was given
    pub meta: Meta,
}

impl<T> RouteSpec<T> {
    fn new(name: Cow<'static, str>, path: Cow<'static, str>, target: T, meta: Meta) -> Self {
        Self {
            name: name.into_owned(),
            path: path.into_owned(),
            target,
            meta,
        }
    }
}

/**
Infers the role of each argument from the number of arguments and
their tags:

| count | shape |
|-------|-------|
| 2 | path, target |
| 3 | path, target, meta |
| 3 | name, path, target |
| 4 | name, path, target, meta |

# Errors

[`Error::ArgumentCount`] for any other count, and
[`Error::ArgumentSequence`] when the tags do not fit a shape for that
count.
*/
pub fn resolve<T>(args: impl Into<RouteArgs<T>>) -> Result<RouteSpec<T>> {
    use RouteArg::{Meta as M, Target, Text};

    let args = match <[RouteArg<T>; 2]>::try_from(args.into().0) {
        Ok([Text(path), Target(target)]) => {
            return Ok(RouteSpec::new("".into(), path, target, Meta::new()))
        }
        Ok(_) => return Err(Error::ArgumentSequence),
        Err(args) => args,
    };

    let args = match <[RouteArg<T>; 3]>::try_from(args) {
        Ok([Text(path), Target(target), M(meta)]) => {
            return Ok(RouteSpec::new("".into(), path, target, meta))
        }
        Ok([Text(name), Text(path), Target(target)]) => {
            return Ok(RouteSpec::new(name, path, target, Meta::new()))
        }
        Ok(_) => return Err(Error::ArgumentSequence),
        Err(args) => args,
    };

    match <[RouteArg<T>; 4]>::try_from(args) {
        Ok([Text(name), Text(path), Target(target), M(meta)]) => {
            Ok(RouteSpec::new(name, path, target, meta))
        }
        Ok(_) => Err(Error::ArgumentSequence),
        Err(args) => Err(Error::ArgumentCount(args.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(n: u8) -> RouteArg<u8> {
        RouteArg::Target(n)
    }

    fn meta() -> Meta {
        Meta::new().with("requiresAuth", true)
    }

    #[test]
    fn path_and_target() {
        let spec = resolve(["/users".into(), target(1)]).unwrap();
        assert_eq!(spec.name, "");
        assert_eq!(spec.path, "/users");
        assert_eq!(spec.target, 1);
        assert!(spec.meta.is_empty());
    }

    #[test]
    fn path_target_and_meta() {
        let spec = resolve(["/users".into(), target(2), meta().into()]).unwrap();
        assert_eq!(spec.name, "");
        assert_eq!(spec.path, "/users");
        assert_eq!(spec.target, 2);
        assert_eq!(spec.meta, meta());
    }

    #[test]
    fn name_path_and_target() {
        let spec = resolve(["Users.Index".into(), "/users".into(), target(3)]).unwrap();
        assert_eq!(spec.name, "Users.Index");
        assert_eq!(spec.path, "/users");
        assert_eq!(spec.target, 3);
    }

    #[test]
    fn all_four() {
        let spec = resolve([
            "Users.Index".into(),
            String::from("/users").into(),
            target(4),
            meta().into(),
        ])
        .unwrap();
        assert_eq!(spec.name, "Users.Index");
        assert_eq!(spec.path, "/users");
        assert_eq!(spec.target, 4);
        assert_eq!(spec.meta, meta());
    }

    #[test]
    fn wrong_counts() {
        assert_eq!(
            resolve::<u8>(Vec::new()).unwrap_err(),
            Error::ArgumentCount(0)
        );
        assert_eq!(
            resolve([target(1)]).unwrap_err(),
            Error::ArgumentCount(1)
        );
        assert_eq!(
            resolve([
                "a".into(),
                "b".into(),
                target(1),
                meta().into(),
                meta().into()
            ])
            .unwrap_err(),
            Error::ArgumentCount(5)
        );
    }

    #[test]
    fn wrong_sequences() {
        assert_eq!(
            resolve([target(1), "/users".into()]).unwrap_err(),
            Error::ArgumentSequence
        );
        assert_eq!(
            resolve(["/users".into(), meta().into(), target(1)]).unwrap_err(),
            Error::ArgumentSequence
        );
        assert_eq!(
            resolve(["/users".into(), target(1), "name".into()]).unwrap_err(),
            Error::ArgumentSequence
        );
        assert_eq!(
            resolve(["a".into(), "b".into(), "c".into(), target(1)]).unwrap_err(),
            Error::ArgumentSequence
        );
    }

    #[test]
    fn tuples_tag_their_handler() {
        let spec = resolve::<BoxedHandler>(("Home", "/", "home")).unwrap();
        assert_eq!(spec.name, "Home");
        assert_eq!(spec.path, "/");
        assert_eq!(spec.target.name(), "home".name());
    }
}
