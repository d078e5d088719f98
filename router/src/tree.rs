use crate::{
    pattern::{normalize, parse, segments},
    Error, Params, PathSegment, Result,
};
use std::collections::{BTreeMap, HashMap};

/**
A prefix tree of route patterns, keyed by path segment.

Each node holds its static children by literal text, at most one
parameter child and at most one wildcard child, plus a payload per http
method. Methods are stored lowercase.

```
use trillium_scoped_router::RouteTree;
let mut tree = RouteTree::new();
tree.define("/users/:id").unwrap().handle("GET", "show user");
tree.define("/users/settings").unwrap().handle("get", "settings");

let found = tree.matches("/users/42").unwrap();
assert_eq!(found.node().payload("get"), Some(&"show user"));
assert_eq!(found.params().get("id"), Some("42"));

let found = tree.matches("/users/settings").unwrap();
assert_eq!(found.node().payload("GET"), Some(&"settings"));
assert!(found.params().is_empty());
```
*/
#[derive(Debug)]
pub struct RouteTree<T> {
    root: RouteNode<T>,
}

impl<T> Default for RouteTree<T> {
    fn default() -> Self {
        Self {
            root: RouteNode::default(),
        }
    }
}

/// one segment position in a [`RouteTree`]
#[derive(Debug)]
pub struct RouteNode<T> {
    statics: HashMap<String, RouteNode<T>>,
    param: Option<Box<Child<T>>>,
    wildcard: Option<Box<Child<T>>>,
    payloads: BTreeMap<String, T>,
}

#[derive(Debug)]
struct Child<T> {
    name: String,
    node: RouteNode<T>,
}

impl<T> Default for RouteNode<T> {
    fn default() -> Self {
        Self {
            statics: HashMap::new(),
            param: None,
            wildcard: None,
            payloads: BTreeMap::new(),
        }
    }
}

/// the terminal node of a defined pattern, see [`RouteTree::define`]
#[derive(Debug)]
pub struct RouteBuilder<'t, T> {
    node: &'t mut RouteNode<T>,
    pattern: String,
}

/// a successful structural match, see [`RouteTree::matches`]
#[derive(Debug)]
pub struct TreeMatch<'t, T> {
    node: &'t RouteNode<T>,
    params: Params,
}

impl<T> RouteTree<T> {
    /// builds an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /**
    Inserts the nodes for `pattern`, reusing any that already exist,
    and returns a builder for its terminal node.

    # Errors

    Returns [`Error::Pattern`] if the pattern is malformed, or if it
    names a parameter or wildcard differently than a pattern that was
    already defined at the same position.
    */
    pub fn define(&mut self, pattern: &str) -> Result<RouteBuilder<'_, T>> {
        let mut node = &mut self.root;
        for segment in parse(pattern)? {
            node = match segment {
                PathSegment::Static(text) => node.statics.entry(text).or_default(),
                PathSegment::Param(name) => child(&mut node.param, name, pattern)?,
                PathSegment::Wildcard(name) => child(&mut node.wildcard, name, pattern)?,
            };
        }

        Ok(RouteBuilder {
            node,
            pattern: normalize(pattern).to_string(),
        })
    }

    /**
    Finds the node for `path`, binding params along the way.

    At each position a static child is tried first, then the
    parameter child, then the wildcard child. A candidate only
    succeeds if it leads to a node with at least one payload;
    otherwise the next candidate at that position is tried.
    */
    pub fn matches(&self, path: &str) -> Option<TreeMatch<'_, T>> {
        let path = normalize(path);
        let mut params = Params::new();
        let node = self.root.find(&segments(path), &mut params)?;
        Some(TreeMatch { node, params })
    }

    pub(crate) fn payloads_mut(&mut self) -> Vec<&mut T> {
        let mut payloads = vec![];
        self.root.collect_payloads(&mut payloads);
        payloads
    }
}

fn child<'n, T>(
    slot: &'n mut Option<Box<Child<T>>>,
    name: String,
    pattern: &str,
) -> Result<&'n mut RouteNode<T>> {
    let child = slot.get_or_insert_with(|| {
        Box::new(Child {
            name: name.clone(),
            node: RouteNode::default(),
        })
    });

    if child.name != name {
        return Err(Error::pattern(
            pattern,
            format!("{name} conflicts with {} at the same position", child.name),
        ));
    }

    Ok(&mut child.node)
}

impl<T> RouteNode<T> {
    /// the payload registered for `method`, case-insensitively
    pub fn payload(&self, method: &str) -> Option<&T> {
        self.payloads.get(&method.to_ascii_lowercase())
    }

    /// the lowercase methods that have a payload at this node, sorted
    pub fn allowed_methods(&self) -> impl Iterator<Item = &str> {
        self.payloads.keys().map(String::as_str)
    }

    /// whether any method has been registered here
    pub fn is_terminal(&self) -> bool {
        !self.payloads.is_empty()
    }

    fn find<'t>(&'t self, segments: &[&str], params: &mut Params) -> Option<&'t Self> {
        let Some((first, rest)) = segments.split_first() else {
            if self.is_terminal() {
                return Some(self);
            }

            let wildcard = self.wildcard.as_deref().filter(|w| w.node.is_terminal())?;
            params.push(&wildcard.name, "");
            return Some(&wildcard.node);
        };

        if let Some(found) = self
            .statics
            .get(*first)
            .and_then(|child| child.find(rest, params))
        {
            return Some(found);
        }

        if let Some(param) = self.param.as_deref().filter(|_| !first.is_empty()) {
            params.push(&param.name, *first);
            if let Some(found) = param.node.find(rest, params) {
                return Some(found);
            }
            params.pop();
        }

        let wildcard = self.wildcard.as_deref().filter(|w| w.node.is_terminal())?;
        params.push(&wildcard.name, segments.join("/"));
        Some(&wildcard.node)
    }

    fn collect_payloads<'t>(&'t mut self, payloads: &mut Vec<&'t mut T>) {
        payloads.extend(self.payloads.values_mut());
        for child in self.statics.values_mut() {
            child.collect_payloads(payloads);
        }
        for child in [&mut self.param, &mut self.wildcard].into_iter().flatten() {
            child.node.collect_payloads(payloads);
        }
    }
}

impl<'t, T> RouteBuilder<'t, T> {
    /// Attaches `payload` under `method`, returning the payload it
    /// replaced, if any.
    pub fn handle(self, method: &str, payload: T) -> Option<T> {
        let method = method.to_ascii_lowercase();
        let previous = self.node.payloads.insert(method.clone(), payload);
        if previous.is_some() {
            log::warn!("replacing the existing {method} route for {}", self.pattern);
        }
        previous
    }

    /// the normalized pattern this builder was defined with
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl<'t, T> TreeMatch<'t, T> {
    /// the matched node
    pub fn node(&self) -> &'t RouteNode<T> {
        self.node
    }

    /// the params bound while matching
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// splits this match into its parts
    pub fn into_parts(self) -> (&'t RouteNode<T>, Params) {
        (self.node, self.params)
    }
}
