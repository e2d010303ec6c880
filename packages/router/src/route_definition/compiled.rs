use std::collections::BTreeMap;

use super::{parse_path, PathFragment, Route, RoutePath};
use crate::{
    error::ConfigurationError,
    matcher::{match_route, MatchedFragment, MatchedRoute, Params},
};

/// A route declaration together with its parsed path.
///
/// A route declared with several paths compiles into one [`CompiledRoute`] per path, in
/// declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledRoute<C> {
    component: C,
    guards: Vec<C>,
    auxiliary: BTreeMap<String, C>,
    path: Option<String>,
    fragments: Vec<PathFragment>,
    contains_splat: bool,
    children: Option<Vec<CompiledRoute<C>>>,
}

impl<C: Clone> CompiledRoute<C> {
    fn new(
        route: &Route<C>,
        path: Option<&str>,
        fragments: Vec<PathFragment>,
        children: Option<Vec<CompiledRoute<C>>>,
    ) -> Self {
        Self {
            component: route.component.clone(),
            guards: route.guards.clone(),
            auxiliary: route.auxiliary.clone(),
            path: path.map(ToString::to_string),
            contains_splat: fragments.iter().any(PathFragment::is_splat),
            fragments,
            children,
        }
    }

    /// Build the matched level for this route.
    pub(crate) fn matched(
        &self,
        params: Params,
        splat: Option<String>,
        child: Option<MatchedFragment<C>>,
    ) -> MatchedFragment<C> {
        MatchedFragment {
            component: self.component.clone(),
            guards: self.guards.clone(),
            auxiliary: self.auxiliary.clone(),
            params,
            splat,
            child: child.map(Box::new),
        }
    }
}

impl<C> CompiledRoute<C> {
    /// The component this route renders.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// The guards wrapped around this route, outermost first.
    pub fn guards(&self) -> &[C] {
        &self.guards
    }

    /// The named side-slot components.
    pub fn auxiliary(&self) -> &BTreeMap<String, C> {
        &self.auxiliary
    }

    /// The path this entry was compiled from. [`None`] for pure layout routes.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The parsed path. Empty for routes that only group children.
    pub fn fragments(&self) -> &[PathFragment] {
        &self.fragments
    }

    /// Whether the path ends in a splat.
    pub fn contains_splat(&self) -> bool {
        self.contains_splat
    }

    /// The compiled children, if the route declared any.
    pub fn children(&self) -> Option<&[CompiledRoute<C>]> {
        self.children.as_deref()
    }
}

/// Compile a list of route declarations, recursing into children.
///
/// Fails on the first route that is misconfigured.
pub fn compile_routes<C: Clone>(
    routes: &[Route<C>],
) -> Result<Vec<CompiledRoute<C>>, ConfigurationError> {
    let mut compiled = Vec::with_capacity(routes.len());

    for route in routes {
        let children = route
            .children
            .as_deref()
            .map(compile_routes)
            .transpose()?;

        match &route.path {
            None => {
                if children.is_none() {
                    return Err(ConfigurationError::EmptyRoute);
                }
                compiled.push(CompiledRoute::new(route, None, Vec::new(), children));
            }
            Some(RoutePath::Single(path)) => {
                let fragments = parse_path(path)?;
                compiled.push(CompiledRoute::new(route, Some(path), fragments, children));
            }
            Some(RoutePath::Multiple(paths)) => {
                for path in paths {
                    let fragments = parse_path(path)?;
                    compiled.push(CompiledRoute::new(
                        route,
                        Some(path),
                        fragments,
                        children.clone(),
                    ));
                }
            }
        }
    }

    Ok(compiled)
}

/// A compiled, ready to match route table.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteTable<C> {
    routes: Vec<CompiledRoute<C>>,
}

impl<C: Clone> RouteTable<C> {
    /// Compile `routes` into a table.
    pub fn new(routes: &[Route<C>]) -> Result<Self, ConfigurationError> {
        Ok(Self {
            routes: compile_routes(routes)?,
        })
    }

    /// Match a location path against the table.
    pub fn at(&self, path: &str) -> Option<MatchedRoute<C>> {
        match_route(path, &self.routes)
    }
}

impl<C> RouteTable<C> {
    /// The top level compiled routes, in declaration order.
    pub fn routes(&self) -> &[CompiledRoute<C>] {
        &self.routes
    }

    /// The number of top level entries, after multi-path expansion.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes at all.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
