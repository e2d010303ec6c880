use std::{fmt, rc::Rc};

use waypost_history::History;

use crate::scheduler::Scheduler;

/// How the router is being run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderMode {
    /// A live application with a navigable history.
    #[default]
    Interactive,
    /// A one-shot render without history (e.g. on the server). Navigation becomes a redirect.
    NonInteractive,
}

/// Global configuration options for the router.
///
/// This implements [`Default`] and follows the builder pattern, so you can use it like this:
/// ```rust
/// # use waypost_router::prelude::*;
/// let cfg = RouterConfig::default().path("/users/42").non_interactive();
/// assert_eq!(cfg.render_mode(), RenderMode::NonInteractive);
/// ```
#[derive(Default, Clone)]
pub struct RouterConfig {
    pub(crate) path: Option<String>,
    pub(crate) mode: RenderMode,
    pub(crate) history: Option<Rc<dyn History>>,
    pub(crate) scheduler: Option<Rc<dyn Scheduler>>,
}

impl RouterConfig {
    /// The path to start at.
    ///
    /// Required when rendering non-interactively. Otherwise defaults to the current route of the
    /// history.
    pub fn path(self, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }

    /// Set the [`RenderMode`]. Defaults to [`RenderMode::Interactive`].
    pub fn mode(self, mode: RenderMode) -> Self {
        Self { mode, ..self }
    }

    /// Shorthand for [`RenderMode::NonInteractive`].
    pub fn non_interactive(self) -> Self {
        self.mode(RenderMode::NonInteractive)
    }

    /// The history to drive. Ignored when rendering non-interactively.
    ///
    /// Defaults to a browser history with the `web` feature, an in-memory history otherwise.
    pub fn history(self, history: Rc<dyn History>) -> Self {
        Self {
            history: Some(history),
            ..self
        }
    }

    /// Where deferred publishes run.
    ///
    /// Defaults to a zero-delay timeout with the `web` feature. Otherwise the router keeps its own
    /// [`TickQueue`], drained with [`Router::run_pending`].
    ///
    /// [`TickQueue`]: crate::prelude::TickQueue
    /// [`Router::run_pending`]: crate::prelude::Router::run_pending
    pub fn scheduler(self, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler: Some(scheduler),
            ..self
        }
    }
}

impl RouterConfig {
    /// The configured starting path.
    pub fn starting_path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The configured [`RenderMode`].
    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("history", &self.history.is_some())
            .field("scheduler", &self.scheduler.is_some())
            .finish()
    }
}
