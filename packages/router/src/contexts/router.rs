use crate::{
    events::NavigationEvent,
    matcher::{MatchedRoute, Params},
    service::InitialState,
};

/// What the rendered tree knows about the current location.
///
/// This is the data behind the context accessors (`location_path`, `params`, `fragment`,
/// `splat`) of a UI layer. It only changes when a navigation is committed, not when the router
/// publishes it.
#[derive(Clone, Debug, PartialEq)]
pub struct RouterContext<C> {
    /// The committed location path.
    pub location_path: String,
    /// The committed parameters.
    pub params: Params,
    /// The committed `#fragment`.
    pub fragment: Option<String>,
    /// The committed splat value.
    pub splat: Option<String>,
    /// The committed match.
    pub matched_route: Option<MatchedRoute<C>>,
}

impl<C: Clone> From<&InitialState<C>> for RouterContext<C> {
    fn from(initial: &InitialState<C>) -> Self {
        Self {
            location_path: initial.location_path.clone(),
            params: initial.params.clone(),
            fragment: initial.fragment.clone(),
            splat: initial.splat.clone(),
            matched_route: initial.matched_route.clone(),
        }
    }
}

impl<C: Clone> From<&NavigationEvent<C>> for RouterContext<C> {
    fn from(event: &NavigationEvent<C>) -> Self {
        Self {
            location_path: event.location_path.clone(),
            params: event.params.clone(),
            fragment: event.fragment.clone(),
            splat: event.splat.clone(),
            matched_route: Some(event.matched_route.clone()),
        }
    }
}
