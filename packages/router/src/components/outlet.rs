use std::collections::BTreeMap;

use crate::matcher::{MatchedFragment, MatchedRoute};

/// Turns matched levels into whatever node type a UI layer renders.
///
/// The router only decides *what* is nested inside *what*; implementors decide what a node is.
pub trait RouteRenderer<C> {
    /// The rendered output.
    type Node;

    /// Render `component` with its named auxiliaries and, unless this is the deepest matched
    /// level, the rendered child level.
    fn component(
        &mut self,
        component: &C,
        auxiliary: BTreeMap<String, Self::Node>,
        child: Option<Self::Node>,
    ) -> Self::Node;

    /// Render an auxiliary component. Auxiliaries never get children.
    fn auxiliary(&mut self, component: &C) -> Self::Node {
        self.component(component, BTreeMap::new(), None)
    }

    /// Wrap `inner` in `guard`.
    fn guard(&mut self, guard: &C, inner: Self::Node) -> Self::Node;
}

/// Render one matched level and everything below it.
///
/// Guards are folded from the last one inward, so the first declared guard is outermost.
pub fn render_fragment<C, R>(fragment: &MatchedFragment<C>, renderer: &mut R) -> R::Node
where
    R: RouteRenderer<C>,
{
    let child = fragment
        .child()
        .map(|child| render_fragment(child, renderer));

    let auxiliary = fragment
        .auxiliary()
        .iter()
        .map(|(name, component)| (name.clone(), renderer.auxiliary(component)))
        .collect();

    let rendered = renderer.component(fragment.component(), auxiliary, child);

    fragment
        .guards()
        .iter()
        .rev()
        .fold(rendered, |inner, guard| renderer.guard(guard, inner))
}

/// Render a full matched chain.
pub fn render_matched<C, R>(matched: &MatchedRoute<C>, renderer: &mut R) -> R::Node
where
    R: RouteRenderer<C>,
{
    render_fragment(matched.fragment(), renderer)
}

/// Render `matched`, or the `not_found` fallback when nothing matched.
pub fn render_or_not_found<C, R>(
    matched: Option<&MatchedRoute<C>>,
    renderer: &mut R,
    not_found: impl FnOnce(&mut R) -> R::Node,
) -> R::Node
where
    R: RouteRenderer<C>,
{
    match matched {
        Some(matched) => render_matched(matched, renderer),
        None => not_found(renderer),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::route_definition::{Route, RouteTable};

    /// Renders to a pseudo-markup string.
    struct Markup;

    impl RouteRenderer<&'static str> for Markup {
        type Node = String;

        fn component(
            &mut self,
            component: &&'static str,
            auxiliary: BTreeMap<String, String>,
            child: Option<String>,
        ) -> String {
            let props: String = auxiliary
                .iter()
                .map(|(name, node)| format!(" {name}={node}"))
                .collect();
            format!("<{component}{props}>{}</{component}>", child.unwrap_or_default())
        }

        fn guard(&mut self, guard: &&'static str, inner: String) -> String {
            format!("[{guard}]{inner}[/{guard}]")
        }
    }

    #[test]
    fn nests_levels_with_guards_and_auxiliaries() {
        let table = RouteTable::new(&[Route::new("layout")
            .path("/admin")
            .guards(["auth", "role"])
            .auxiliary("menu", "nav")
            .child(Route::new("page").path("/:id"))])
        .unwrap();

        let matched = table.at("/admin/1").unwrap();
        assert_eq!(
            render_matched(&matched, &mut Markup),
            "[auth][role]<layout menu=<nav></nav>><page></page></layout>[/role][/auth]"
        );
    }

    #[test]
    fn renders_the_fallback_without_a_match() {
        let table = RouteTable::new(&[Route::new("home").path("/")]).unwrap();
        let rendered = render_or_not_found(table.at("/missing").as_ref(), &mut Markup, |_| {
            "No route matched!".to_string()
        });
        assert_eq!(rendered, "No route matched!");
    }
}
