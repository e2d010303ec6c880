//! Resolving a location path against a compiled route table.
//!
//! Matching walks the table depth first and in declaration order. The first candidate that
//! structurally matches a level is committed to: if its children cannot consume the rest of the
//! path, the matcher moves on to that candidate's siblings, but it never reopens a decision taken
//! at a shallower level. Ambiguous trees are the route author's responsibility.

use std::collections::BTreeMap;

use crate::route_definition::{CompiledRoute, PathFragment, PATH_SEPARATOR};

/// Parameters captured by wildcard fragments, keyed by capture name.
pub type Params = BTreeMap<String, String>;

/// One matched level of a route tree.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedFragment<C> {
    pub(crate) component: C,
    pub(crate) guards: Vec<C>,
    pub(crate) auxiliary: BTreeMap<String, C>,
    pub(crate) params: Params,
    pub(crate) splat: Option<String>,
    pub(crate) child: Option<Box<MatchedFragment<C>>>,
}

impl<C> MatchedFragment<C> {
    /// The component to render at this level.
    pub fn component(&self) -> &C {
        &self.component
    }

    /// The guards to wrap this level in, outermost first.
    pub fn guards(&self) -> &[C] {
        &self.guards
    }

    /// The named side-slot components of this level.
    pub fn auxiliary(&self) -> &BTreeMap<String, C> {
        &self.auxiliary
    }

    /// The parameters captured at this level only.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The remainder of the path consumed by a splat at this level.
    pub fn splat(&self) -> Option<&str> {
        self.splat.as_deref()
    }

    /// The next, deeper matched level.
    pub fn child(&self) -> Option<&MatchedFragment<C>> {
        self.child.as_deref()
    }
}

/// A full chain of matched levels, root first, plus the path that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedRoute<C> {
    fragment: MatchedFragment<C>,
    path: String,
}

impl<C> MatchedRoute<C> {
    /// The outermost matched level.
    pub fn fragment(&self) -> &MatchedFragment<C> {
        &self.fragment
    }

    /// The location path this chain was matched from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Iterate over the matched levels from the root to the deepest one.
    pub fn levels(&self) -> impl Iterator<Item = &MatchedFragment<C>> {
        std::iter::successors(Some(&self.fragment), |level| level.child())
    }

    /// The number of matched levels.
    pub fn depth(&self) -> usize {
        self.levels().count()
    }

    /// The deepest matched level.
    pub fn leaf(&self) -> &MatchedFragment<C> {
        self.levels().last().unwrap_or(&self.fragment)
    }

    /// All captured parameters. Deeper levels override shallower ones on key collisions.
    pub fn params(&self) -> Params {
        self.levels().fold(Params::new(), |mut params, level| {
            params.extend(level.params.iter().map(|(k, v)| (k.clone(), v.clone())));
            params
        })
    }

    /// The splat value of the chain, if one of its levels matched a splat.
    pub fn splat(&self) -> Option<&str> {
        self.levels().find_map(MatchedFragment::splat)
    }
}

/// Match `path` against `routes`.
///
/// Returns [`None`] when nothing matches.
pub fn match_route<C: Clone>(path: &str, routes: &[CompiledRoute<C>]) -> Option<MatchedRoute<C>> {
    let segments: Vec<&str> = path
        .trim_matches(PATH_SEPARATOR)
        .split(PATH_SEPARATOR)
        .collect();

    match_fragment(&segments, routes).map(|fragment| MatchedRoute {
        fragment,
        path: path.to_string(),
    })
}

fn match_fragment<C: Clone>(
    segments: &[&str],
    routes: &[CompiledRoute<C>],
) -> Option<MatchedFragment<C>> {
    'candidates: for route in routes {
        let fragments = route.fragments();

        // layout route: consumes nothing and defers to its children
        if fragments.is_empty() {
            let child = route
                .children()
                .and_then(|children| match_fragment(segments, children));
            if let Some(child) = child {
                return Some(route.matched(Params::new(), None, Some(child)));
            }
            continue;
        }

        if !route.contains_splat()
            && route.children().is_none()
            && fragments.len() != segments.len()
        {
            continue;
        }

        let mut params = Params::new();
        for (index, fragment) in fragments.iter().enumerate() {
            match fragment {
                PathFragment::Splat => {
                    let rest = segments.get(index..).unwrap_or_default();
                    return Some(route.matched(params, Some(rest.join("/")), None));
                }
                PathFragment::Wildcard(key) => match segments.get(index) {
                    Some(value) => {
                        params.insert(key.clone(), (*value).to_string());
                    }
                    None => continue 'candidates,
                },
                PathFragment::Literal(text) => {
                    if segments.get(index).copied() != Some(text.as_str()) {
                        continue 'candidates;
                    }
                }
            }
        }

        let remaining = &segments[fragments.len()..];
        match route.children() {
            Some(children) => {
                if let Some(child) = match_fragment(remaining, children) {
                    return Some(route.matched(params, None, Some(child)));
                }
            }
            None if remaining.is_empty() => return Some(route.matched(params, None, None)),
            None => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::route_definition::{compile_routes, Route};

    fn table(routes: Vec<Route<&'static str>>) -> Vec<CompiledRoute<&'static str>> {
        compile_routes(&routes).unwrap()
    }

    fn components(matched: &MatchedRoute<&'static str>) -> Vec<&'static str> {
        matched.levels().map(|level| *level.component()).collect()
    }

    #[test]
    fn root_matches_root() {
        let routes = table(vec![Route::new("home").path("/")]);
        let matched = match_route("/", &routes).unwrap();
        assert_eq!(components(&matched), vec!["home"]);
        assert_eq!(matched.path(), "/");
    }

    #[test]
    fn length_mismatch_is_skipped() {
        let routes = table(vec![
            Route::new("short").path("/a"),
            Route::new("long").path("/a/b"),
        ]);
        let matched = match_route("/a/b", &routes).unwrap();
        assert_eq!(components(&matched), vec!["long"]);
        assert!(match_route("/a/b/c", &routes).is_none());
    }

    #[test]
    fn trailing_separators_are_ignored() {
        let routes = table(vec![Route::new("test").path("/test")]);
        assert!(match_route("/test/", &routes).is_some());
        assert!(match_route("test", &routes).is_some());
    }

    #[test]
    fn wildcard_capture() {
        let routes = table(vec![Route::new("user").path("/users/:id")]);
        let matched = match_route("/users/42", &routes).unwrap();
        assert_eq!(
            matched.params(),
            Params::from([("id".to_string(), "42".to_string())])
        );
        assert_eq!(matched.splat(), None);
    }

    #[test]
    fn splat_consumes_any_depth() {
        let routes = table(vec![Route::new("files").path("/files/*")]);

        let matched = match_route("/files/a/b/c", &routes).unwrap();
        assert_eq!(matched.splat(), Some("a/b/c"));
        assert!(matched.params().is_empty());

        let matched = match_route("/files", &routes).unwrap();
        assert_eq!(matched.splat(), Some(""));

        assert!(match_route("/other/a", &routes).is_none());
    }

    #[test]
    fn declaration_order_wins() {
        let wildcard_first = table(vec![
            Route::new("wildcard").path("/:page"),
            Route::new("about").path("/about"),
        ]);
        let literal_first = table(vec![
            Route::new("about").path("/about"),
            Route::new("wildcard").path("/:page"),
        ]);

        let a = match_route("/about", &wildcard_first).unwrap();
        let b = match_route("/about", &literal_first).unwrap();
        assert_eq!(components(&a), vec!["wildcard"]);
        assert_eq!(components(&b), vec!["about"]);
    }

    #[test]
    fn nested_routes_build_a_chain() {
        let routes = table(vec![Route::new("users").path("/users/:id").children([
            Route::new("profile").path("/profile"),
            Route::new("tab").path("/tabs/:tab"),
        ])]);

        let matched = match_route("/users/1/tabs/x", &routes).unwrap();
        assert_eq!(components(&matched), vec!["users", "tab"]);
        assert_eq!(matched.depth(), 2);
        assert_eq!(*matched.leaf().component(), "tab");
        assert_eq!(matched.fragment().params().len(), 1);
        assert_eq!(
            matched.params(),
            Params::from([
                ("id".to_string(), "1".to_string()),
                ("tab".to_string(), "x".to_string()),
            ])
        );
    }

    #[test]
    fn deeper_params_override_shallower_ones() {
        let routes = table(vec![Route::new("outer")
            .path("/:id")
            .child(Route::new("inner").path("/:id"))]);
        let matched = match_route("/1/2", &routes).unwrap();
        assert_eq!(matched.params().get("id").map(String::as_str), Some("2"));
        assert_eq!(
            matched.fragment().params().get("id").map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn parent_without_matching_child_falls_through_to_siblings() {
        let routes = table(vec![
            Route::new("parent")
                .path("/a")
                .child(Route::new("child").path("/b")),
            Route::new("sibling").path("/a/c"),
        ]);
        let matched = match_route("/a/c", &routes).unwrap();
        assert_eq!(components(&matched), vec!["sibling"]);
    }

    #[test]
    fn parent_with_children_does_not_match_its_own_path() {
        let routes = table(vec![Route::new("parent")
            .path("/a")
            .child(Route::new("index").path("/"))]);
        assert!(match_route("/a", &routes).is_none());
    }

    #[test]
    fn layout_routes_delegate_unconsumed_segments() {
        let routes = table(vec![
            Route::new("layout").children([Route::new("about").path("/about")]),
            Route::new("fallback").path("*"),
        ]);

        let matched = match_route("/about", &routes).unwrap();
        assert_eq!(components(&matched), vec!["layout", "about"]);
        assert!(matched.fragment().params().is_empty());

        let matched = match_route("/missing", &routes).unwrap();
        assert_eq!(components(&matched), vec!["fallback"]);
        assert_eq!(matched.splat(), Some("missing"));
    }

    #[test]
    fn first_successful_candidate_is_committed() {
        // the catch-all child makes `/docs` succeed, so the more specific sibling is never tried
        let routes = table(vec![
            Route::new("docs").path("/docs").children([
                Route::new("page").path("/:page/edit"),
                Route::new("catch-all").path("*"),
            ]),
            Route::new("guide").path("/docs/guide"),
        ]);

        let matched = match_route("/docs/guide", &routes).unwrap();
        assert_eq!(components(&matched), vec!["docs", "catch-all"]);
        assert_eq!(matched.splat(), Some("guide"));
    }

    #[test]
    fn failed_subtree_is_abandoned_as_a_whole() {
        // `/:section` consumes `docs` and then fails in every child, so the whole subtree is
        // dropped and the next top-level candidate starts again from the full path
        let routes = table(vec![
            Route::new("section").path("/:section").children([
                Route::new("x").path("/x").child(Route::new("deep").path("/deep")),
                Route::new("z").path("/z"),
            ]),
            Route::new("docs").path("/docs").child(Route::new("y").path("/y")),
        ]);

        let matched = match_route("/docs/x/deep", &routes).unwrap();
        assert_eq!(components(&matched), vec!["section", "x", "deep"]);

        let matched = match_route("/docs/y", &routes).unwrap();
        assert_eq!(components(&matched), vec!["docs", "y"]);
        assert!(matched.params().is_empty());

        assert!(match_route("/docs/x", &routes).is_none());
    }

    #[test]
    fn earlier_path_of_a_multi_path_route_wins() {
        let routes = table(vec![Route::new("page").paths(["/:slug", "/about"])]);
        let matched = match_route("/about", &routes).unwrap();
        assert_eq!(components(&matched), vec!["page"]);
        assert_eq!(
            matched.params(),
            Params::from([("slug".to_string(), "about".to_string())])
        );

        let routes = table(vec![Route::new("page").paths(["/about", "/:slug"])]);
        assert!(match_route("/about", &routes).unwrap().params().is_empty());
    }

    #[test]
    fn missing_segments_fail_instead_of_capturing() {
        let routes = table(vec![Route::new("parent")
            .path("/a/:id")
            .child(Route::new("child").path("*"))]);
        assert!(match_route("/a", &routes).is_none());
        assert!(match_route("/a/1", &routes).is_some());
    }
}
