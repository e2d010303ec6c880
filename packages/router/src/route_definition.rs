//! Declarative route trees and their compiled form.
//!
//! A [`Route`] pairs a component reference with the path it is reachable at. Routes nest: a
//! child's path is matched against whatever its parent left unconsumed. The compiler turns the
//! declarations into [`CompiledRoute`]s once, when the router is built.

use std::collections::BTreeMap;

mod compiled;
mod fragment;

pub use compiled::*;
pub use fragment::*;

/// The path(s) a route is reachable at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutePath {
    /// A single path.
    Single(String),
    /// The same route, reachable at each of these paths. Earlier paths take precedence.
    Multiple(Vec<String>),
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        Self::Single(path.to_string())
    }
}

impl From<String> for RoutePath {
    fn from(path: String) -> Self {
        Self::Single(path)
    }
}

impl<S: Into<String>> From<Vec<S>> for RoutePath {
    fn from(paths: Vec<S>) -> Self {
        Self::Multiple(paths.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for RoutePath {
    fn from(paths: [S; N]) -> Self {
        Self::Multiple(paths.into_iter().map(Into::into).collect())
    }
}

/// A single route declaration.
///
/// `C` is whatever the rendering layer uses to refer to a component. The router never looks inside
/// it; it is cloned into every match.
///
/// ```rust
/// # use waypost_router::prelude::*;
/// let routes = vec![
///     Route::new("layout")
///         .path("/users")
///         .guard("require-login")
///         .auxiliary("sidebar", "user-menu")
///         .child(Route::new("user").path("/:id")),
///     Route::new("files").paths(["/files/*", "/documents/*"]),
///     Route::new("not-found").path("*"),
/// ];
/// assert!(RouteTable::new(&routes).is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Route<C> {
    pub(crate) component: C,
    pub(crate) path: Option<RoutePath>,
    pub(crate) children: Option<Vec<Route<C>>>,
    pub(crate) guards: Vec<C>,
    pub(crate) auxiliary: BTreeMap<String, C>,
}

impl<C> Route<C> {
    /// Create a route rendering `component`, without a path yet.
    pub fn new(component: C) -> Self {
        Self {
            component,
            path: None,
            children: None,
            guards: Vec::new(),
            auxiliary: BTreeMap::new(),
        }
    }

    /// Set the path (or paths) of the route.
    ///
    /// Literal segments must match exactly, `:name` captures one segment under `name` and a
    /// trailing `*` matches any remaining depth.
    pub fn path(self, path: impl Into<RoutePath>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }

    /// Make the route reachable at several paths.
    pub fn paths<S: Into<String>>(self, paths: impl IntoIterator<Item = S>) -> Self {
        Self {
            path: Some(RoutePath::Multiple(
                paths.into_iter().map(Into::into).collect(),
            )),
            ..self
        }
    }

    /// Add a nested route.
    pub fn child(mut self, child: Route<C>) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Add several nested routes.
    pub fn children(mut self, children: impl IntoIterator<Item = Route<C>>) -> Self {
        self.children.get_or_insert_with(Vec::new).extend(children);
        self
    }

    /// Wrap the rendered route in `guard`. The first guard added ends up outermost.
    pub fn guard(mut self, guard: C) -> Self {
        self.guards.push(guard);
        self
    }

    /// Add several guards, outermost first.
    pub fn guards(mut self, guards: impl IntoIterator<Item = C>) -> Self {
        self.guards.extend(guards);
        self
    }

    /// Add a named side-slot component, rendered alongside the route's own component.
    pub fn auxiliary(mut self, name: impl Into<String>, component: C) -> Self {
        self.auxiliary.insert(name.into(), component);
        self
    }

    /// The component this route renders.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// The declared path(s), if any.
    pub fn declared_path(&self) -> Option<&RoutePath> {
        self.path.as_ref()
    }
}
