//! Events published by the router to its subscribers.

use crate::{
    matcher::{MatchedRoute, Params},
    navigation::Completion,
};

/// Something that happened in the router.
#[derive(Clone, Debug, PartialEq)]
pub enum RouterEvent<C> {
    /// The router moved to a new location.
    Navigation(NavigationEvent<C>),
    /// A collaborator started or finished committing a navigation to the UI.
    Transition {
        /// Whether a commit is currently in flight.
        is_transitioning: bool,
    },
}

/// The payload of [`RouterEvent::Navigation`].
///
/// The navigation's future resolves once someone calls [`NavigationEvent::complete`] (or
/// [`Completion::complete`] on a clone of [`NavigationEvent::completion`]).
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationEvent<C> {
    /// The full chain of matched routes.
    pub matched_route: MatchedRoute<C>,
    /// The flattened parameters of the chain.
    pub params: Params,
    /// The new location path, without the fragment.
    pub location_path: String,
    /// The `#fragment` of the target, including the marker.
    pub fragment: Option<String>,
    /// The splat value of the chain.
    pub splat: Option<String>,
    /// Resolves the navigation's future.
    pub completion: Completion,
}

impl<C> NavigationEvent<C> {
    /// Report the navigation as committed.
    pub fn complete(&self) -> bool {
        self.completion.complete()
    }
}
