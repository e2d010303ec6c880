use std::{cell::RefCell, rc::Rc};

use gloo::events::EventListener;
use tracing::error;
use wasm_bindgen::JsValue;
use web_sys::{window, Window};

use crate::History;

/// A [`History`] that integrates with a browser via the [History API](https://developer.mozilla.org/en-US/docs/Web/API/History_API).
///
/// # Prefix
/// This [`History`] supports a prefix, which can be used for web apps that aren't located at the
/// root of their domain. The prefix is stripped from [`History::current_route`] and prepended when
/// pushing or replacing.
pub struct WebHistory {
    history: web_sys::History,
    listener_navigation: RefCell<Option<EventListener>>,
    prefix: Option<String>,
    window: Window,
}

impl WebHistory {
    /// Create a new [`WebHistory`].
    ///
    /// Returns [`None`] outside of a browser (no `window`, or no access to its `history`).
    pub fn new(prefix: Option<String>) -> Option<Self> {
        let window = window()?;
        let history = match window.history() {
            Ok(history) => history,
            Err(err) => {
                error!("`window` has no access to `history`: {err:?}");
                return None;
            }
        };

        Some(Self {
            history,
            listener_navigation: RefCell::new(None),
            prefix,
            window,
        })
    }

    fn full_path(&self, route: &str) -> String {
        match &self.prefix {
            None => route.to_string(),
            Some(prefix) => format!("{prefix}{route}"),
        }
    }
}

fn or_log(result: Result<(), JsValue>, action: &str) {
    if let Err(err) = result {
        error!("failed to {action}: {err:?}");
    }
}

impl History for WebHistory {
    fn current_route(&self) -> String {
        let location = self.window.location();
        let path = location.pathname().unwrap_or_else(|_| String::from("/"));
        let hash = location.hash().unwrap_or_default();

        let path = match &self.prefix {
            Some(prefix) => path
                .strip_prefix(prefix.as_str())
                .map(ToString::to_string)
                .unwrap_or(path),
            None => path,
        };
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };

        format!("{path}{hash}")
    }

    fn current_prefix(&self) -> Option<String> {
        self.prefix.clone()
    }

    fn go_back(&self) {
        or_log(self.history.back(), "go back");
    }

    fn go_forward(&self) {
        or_log(self.history.forward(), "go forward");
    }

    fn push(&self, route: String) {
        let path = self.full_path(&route);
        or_log(
            self.history
                .push_state_with_url(&JsValue::NULL, "", Some(&path)),
            "push state",
        );
    }

    fn replace(&self, route: String) {
        let path = self.full_path(&route);
        or_log(
            self.history
                .replace_state_with_url(&JsValue::NULL, "", Some(&path)),
            "replace state",
        );
    }

    fn updater(&self, callback: Rc<dyn Fn()>) {
        let listener = EventListener::new(&self.window, "popstate", move |_| (*callback)());
        *self.listener_navigation.borrow_mut() = Some(listener);
    }

    fn remove_updater(&self) {
        // dropping the listener detaches it from the window
        self.listener_navigation.borrow_mut().take();
    }
}
