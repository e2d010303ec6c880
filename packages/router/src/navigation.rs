//! Types relating to navigation.

use std::{
    cell::RefCell,
    fmt,
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
};

use futures_channel::oneshot;
use http::StatusCode;

/// The navigation target that walks one step back through the history.
pub const BACK: &str = "back";

pub(crate) const FRAGMENT_MARKER: char = '#';

/// Options for [`Router::navigate`](crate::prelude::Router::navigate).
///
/// ```rust
/// # use waypost_router::prelude::*;
/// let options = NavigateOptions::default().replace(true).defer_publish(true);
/// assert!(options.update_history);
/// assert!(!options.force);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigateOptions {
    /// Navigate even if the target is the current location.
    pub force: bool,
    /// Push (or replace) a history entry. Disabled when reacting to the history itself.
    pub update_history: bool,
    /// Publish the navigation event on the next tick instead of synchronously.
    pub defer_publish: bool,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            force: false,
            update_history: true,
            defer_publish: false,
            replace: false,
        }
    }
}

impl NavigateOptions {
    /// Set [`NavigateOptions::force`].
    pub fn force(self, force: bool) -> Self {
        Self { force, ..self }
    }

    /// Set [`NavigateOptions::update_history`].
    pub fn update_history(self, update_history: bool) -> Self {
        Self {
            update_history,
            ..self
        }
    }

    /// Set [`NavigateOptions::defer_publish`].
    pub fn defer_publish(self, defer_publish: bool) -> Self {
        Self {
            defer_publish,
            ..self
        }
    }

    /// Set [`NavigateOptions::replace`].
    pub fn replace(self, replace: bool) -> Self {
        Self { replace, ..self }
    }
}

/// Split a url into its path and its trailing `#fragment`.
///
/// The fragment starts at the first `#` that is followed by no further `/`.
pub(crate) fn split_fragment(url: &str) -> (&str, Option<&str>) {
    url.match_indices(FRAGMENT_MARKER)
        .map(|(index, _)| index)
        .find(|&index| !url[index..].contains('/'))
        .map_or((url, None), |index| (&url[..index], Some(&url[index..])))
}

pub(crate) type Resolve = Box<dyn FnOnce(bool)>;

/// The handle a subscriber uses to tell the router that a navigation was committed.
///
/// Cloning shares the handle: whichever clone calls [`Completion::complete`] first resolves the
/// navigation, later calls do nothing. A navigation whose completion is never called stays
/// pending forever. There is no timeout.
#[derive(Clone)]
pub struct Completion {
    resolve: Rc<RefCell<Option<Resolve>>>,
}

impl Completion {
    pub(crate) fn new(resolve: Resolve) -> Self {
        Self {
            resolve: Rc::new(RefCell::new(Some(resolve))),
        }
    }

    /// Resolve the navigation with `true`. Returns `false` if it was already resolved.
    pub fn complete(&self) -> bool {
        let resolve = self.resolve.borrow_mut().take();
        match resolve {
            Some(resolve) => {
                resolve(true);
                true
            }
            None => false,
        }
    }

    /// Whether [`Completion::complete`] has been called.
    pub fn is_completed(&self) -> bool {
        self.resolve.borrow().is_none()
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("completed", &self.is_completed())
            .finish()
    }
}

impl PartialEq for Completion {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.resolve, &other.resolve)
    }
}

enum NavigationState {
    Ready(Option<bool>),
    Waiting(oneshot::Receiver<bool>),
    Orphaned,
}

/// The result of [`Router::navigate`](crate::prelude::Router::navigate).
///
/// Resolves to whether a navigation actually happened. It resolves exactly once: either right
/// away (nothing to do, or no route matched) or when a subscriber completes the published event.
/// If the completion is dropped without being called, the future never resolves.
#[must_use = "navigation results are only reported through the future"]
pub struct Navigation {
    state: NavigationState,
}

impl Navigation {
    pub(crate) fn resolved(value: bool) -> Self {
        Self {
            state: NavigationState::Ready(Some(value)),
        }
    }

    pub(crate) fn channel() -> (Self, Resolve) {
        let (tx, rx) = oneshot::channel();
        let resolve: Resolve = Box::new(move |value| {
            // the caller may have dropped the future, nobody to tell
            let _ = tx.send(value);
        });
        (
            Self {
                state: NavigationState::Waiting(rx),
            },
            resolve,
        )
    }
}

impl Future for Navigation {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        let polled = match &mut this.state {
            NavigationState::Ready(value) => {
                return match value.take() {
                    Some(value) => Poll::Ready(value),
                    None => Poll::Pending,
                }
            }
            NavigationState::Waiting(rx) => Pin::new(rx).poll(cx),
            NavigationState::Orphaned => return Poll::Pending,
        };

        match polled {
            Poll::Ready(Ok(value)) => {
                this.state = NavigationState::Ready(None);
                Poll::Ready(value)
            }
            Poll::Ready(Err(oneshot::Canceled)) => {
                this.state = NavigationState::Orphaned;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl fmt::Debug for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            NavigationState::Ready(Some(value)) => return write!(f, "Navigation(Ready({value}))"),
            NavigationState::Ready(None) => "Finished",
            NavigationState::Waiting(_) => "Waiting",
            NavigationState::Orphaned => "Orphaned",
        };
        write!(f, "Navigation({state})")
    }
}

/// Signal that a non-interactive render should answer with a redirect.
///
/// This is control flow rather than a failure: the host catches it and turns it into a
/// `307 Temporary Redirect` response pointing at [`Redirect::target`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("307 - Temporary Redirect to `{target}`")]
pub struct Redirect {
    target: String,
}

impl Redirect {
    /// The status every redirect is answered with.
    pub const STATUS: StatusCode = StatusCode::TEMPORARY_REDIRECT;

    pub(crate) fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// The kind tag hosts use to tell redirects apart from real errors.
    pub fn kind(&self) -> &'static str {
        "redirect"
    }

    /// Always [`StatusCode::TEMPORARY_REDIRECT`].
    pub fn status(&self) -> StatusCode {
        Self::STATUS
    }

    /// Where to redirect to.
    pub fn target(&self) -> &str {
        &self.target
    }
}
