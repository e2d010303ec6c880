//! History integration for the waypost router.
//!
//! The router never talks to a platform directly. It goes through a [`History`] provider, which
//! owns the current URL, the back/forward stacks and the notification that fires when the user
//! moves through those stacks from outside the router (the browser's `popstate`).

use std::rc::Rc;

mod memory;
pub use memory::*;

#[cfg(feature = "web")]
mod web;
#[cfg(feature = "web")]
pub use web::*;

/// An integration with some kind of navigation history.
///
/// The described behaviors mimic a web browser. Implementations that deviate from them should
/// document how.
pub trait History {
    /// Get the current route, as the path plus an optional `#fragment`.
    ///
    /// **Must start** with `/`. **Must _not_ contain** the prefix.
    ///
    /// ```rust
    /// # use waypost_history::{History, MemoryHistory};
    /// let history = MemoryHistory::default();
    /// assert_eq!(history.current_route(), "/");
    ///
    /// history.push(String::from("/path#top"));
    /// assert_eq!(history.current_route(), "/path#top");
    /// ```
    #[must_use]
    fn current_route(&self) -> String;

    /// Get the current path prefix of the URL.
    ///
    /// Only meant for applications that are not served from `/`. The provider strips the prefix
    /// from [`History::current_route`] and adds it back when pushing.
    fn current_prefix(&self) -> Option<String> {
        None
    }

    /// Check whether there is a previous page to navigate back to.
    ///
    /// If a [`History`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_back(&self) -> bool {
        true
    }

    /// Go back to a previous page.
    ///
    /// If the position actually changes, the registered [`History::updater`] callback must be
    /// invoked, just like a browser fires `popstate`. Doing nothing is fine when there is no
    /// previous page.
    fn go_back(&self);

    /// Check whether there is a future page to navigate forward to.
    ///
    /// If a [`History`] cannot know this, it should return [`true`].
    #[must_use]
    fn can_go_forward(&self) -> bool {
        true
    }

    /// Go forward to a future page. Notifies the updater like [`History::go_back`].
    fn go_forward(&self);

    /// Push a new entry and clear the forward stack.
    ///
    /// Must **not** invoke the updater: the router already knows about this navigation.
    fn push(&self, route: String);

    /// Replace the current entry, leaving the back and forward stacks untouched.
    ///
    /// Must **not** invoke the updater.
    fn replace(&self, route: String);

    /// Register the callback to run whenever the current entry changes from outside the router.
    ///
    /// Providers hold at most one callback; registering again replaces the previous one.
    #[allow(unused_variables)]
    fn updater(&self, callback: Rc<dyn Fn()>) {}

    /// Drop the callback registered with [`History::updater`], if any.
    fn remove_updater(&self) {}
}
