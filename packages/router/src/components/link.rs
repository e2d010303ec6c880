use std::{fmt, rc::Rc};

use regex::Regex;

use crate::{
    navigation::{NavigateOptions, Navigation, Redirect},
    service::Router,
};

/// What decides whether a link is active.
#[derive(Clone, Debug)]
pub enum LinkPattern {
    /// Compared with the current path like the link target would be.
    Path(String),
    /// Tested against the current path.
    Regex(Regex),
}

impl From<&str> for LinkPattern {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<Regex> for LinkPattern {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}

/// Keyboard modifiers held during a click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    /// Control was held.
    pub ctrl: bool,
    /// Meta (command) was held.
    pub meta: bool,
}

/// What a link click turned into.
#[derive(Debug)]
pub enum LinkClick {
    /// A modifier was held; let the platform open the link its own way.
    PassThrough,
    /// The link is disabled (or has no target); the default action was suppressed.
    Suppressed,
    /// The router is navigating.
    Navigating(Navigation),
}

/// The state behind an anchor that navigates through the router.
///
/// ```rust
/// # use waypost_router::prelude::*;
/// let link = Link::new("/users").class("nav");
/// assert!(link.is_active("/users/42"));
/// assert_eq!(link.class_names("/users/42"), "nav active");
/// assert!(!Link::new("/users").exact(true).is_active("/users/42"));
/// ```
#[derive(Clone, Default)]
pub struct Link {
    to: Option<String>,
    disabled: bool,
    exact: bool,
    pattern: Option<LinkPattern>,
    class: Option<String>,
    on_click: Option<Rc<dyn Fn()>>,
    stop_propagation: bool,
}

impl Link {
    /// A link to `to`.
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: Some(to.into()),
            ..Self::default()
        }
    }

    /// A link without a target. Never active, never navigates.
    pub fn without_target() -> Self {
        Self::default()
    }

    /// Disable navigation on click.
    pub fn disabled(self, disabled: bool) -> Self {
        Self { disabled, ..self }
    }

    /// Only be active when the current path equals the target (or pattern) exactly.
    pub fn exact(self, exact: bool) -> Self {
        Self { exact, ..self }
    }

    /// Decide activity with `pattern` instead of the target.
    pub fn pattern(self, pattern: impl Into<LinkPattern>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..self
        }
    }

    /// Base css classes.
    pub fn class(self, class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..self
        }
    }

    /// Run `callback` on every unmodified click, before navigating. Disabled links still run it.
    pub fn on_click(self, callback: impl Fn() + 'static) -> Self {
        Self {
            on_click: Some(Rc::new(callback)),
            ..self
        }
    }

    /// Ask the platform to stop the click from bubbling once the link has handled it.
    pub fn stop_propagation(self, stop_propagation: bool) -> Self {
        Self {
            stop_propagation,
            ..self
        }
    }

    /// Whether a handled click should stop propagating. Modified clicks are never handled, so
    /// this does not apply to [`LinkClick::PassThrough`].
    pub fn stops_propagation(&self) -> bool {
        self.stop_propagation
    }

    /// The target, used as the anchor's `href`.
    pub fn href(&self) -> Option<&str> {
        self.to.as_deref()
    }

    /// Whether the link points at (a prefix of) `path`.
    pub fn is_active(&self, path: &str) -> bool {
        let target = match &self.pattern {
            Some(LinkPattern::Regex(regex)) => return regex.is_match(path),
            Some(LinkPattern::Path(pattern)) => pattern.as_str(),
            None => match &self.to {
                Some(to) => to.as_str(),
                None => return false,
            },
        };

        if self.exact {
            path == target
        } else {
            path.starts_with(target)
        }
    }

    /// The base classes plus `active` and `disabled` as they apply.
    pub fn class_names(&self, path: &str) -> String {
        let mut classes: Vec<&str> = self.class.as_deref().into_iter().collect();
        if self.is_active(path) {
            classes.push("active");
        }
        if self.disabled {
            classes.push("disabled");
        }
        classes.join(" ")
    }

    /// Handle a click on the link.
    ///
    /// Modified clicks are left alone. Otherwise the [`Link::on_click`] callback runs first, then
    /// the router navigates unless the link is disabled or has no target.
    ///
    /// # Errors
    /// Forwards the [`Redirect`] of a non-interactive router.
    pub fn click<C: Clone + 'static>(
        &self,
        router: &Router<C>,
        modifiers: ClickModifiers,
    ) -> Result<LinkClick, Redirect> {
        if modifiers.ctrl || modifiers.meta {
            return Ok(LinkClick::PassThrough);
        }
        if let Some(on_click) = &self.on_click {
            on_click();
        }
        match (&self.to, self.disabled) {
            (Some(to), false) => router
                .navigate(to.as_str(), NavigateOptions::default())
                .map(LinkClick::Navigating),
            _ => Ok(LinkClick::Suppressed),
        }
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("to", &self.to)
            .field("disabled", &self.disabled)
            .field("exact", &self.exact)
            .field("pattern", &self.pattern)
            .field("class", &self.class)
            .field("on_click", &self.on_click.is_some())
            .field("stop_propagation", &self.stop_propagation)
            .finish()
    }
}
