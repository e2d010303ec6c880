use std::{cell::RefCell, rc::Rc};

use crate::History;

struct MemoryHistoryState {
    current: String,
    history: Vec<String>,
    future: Vec<String>,
}

/// A [`History`] provider that stores all navigation information in memory.
///
/// Moving back or forward invokes the registered updater synchronously, which makes this provider
/// a faithful stand-in for a browser in tests and non-web targets.
pub struct MemoryHistory {
    state: RefCell<MemoryHistoryState>,
    base_path: Option<String>,
    updater: RefCell<Option<Rc<dyn Fn()>>>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::with_initial_path("/")
    }
}

impl MemoryHistory {
    /// Create a [`MemoryHistory`] starting at `path`.
    ///
    /// ```rust
    /// # use waypost_history::{History, MemoryHistory};
    /// let history = MemoryHistory::with_initial_path("/users/42");
    /// assert_eq!(history.current_route(), "/users/42");
    /// assert_eq!(history.can_go_back(), false);
    /// ```
    pub fn with_initial_path(path: impl ToString) -> Self {
        Self {
            state: MemoryHistoryState {
                current: path.to_string(),
                history: Vec::new(),
                future: Vec::new(),
            }
            .into(),
            base_path: None,
            updater: RefCell::new(None),
        }
    }

    /// Set the base path for the history.
    ///
    /// ```rust
    /// # use waypost_history::*;
    /// let history = MemoryHistory::default().with_prefix("/my-app");
    /// assert_eq!(history.current_prefix(), Some("/my-app".to_string()));
    /// ```
    pub fn with_prefix(mut self, prefix: impl ToString) -> Self {
        self.base_path = Some(prefix.to_string());
        self
    }

    /// Whether a router (or anyone else) is currently listening for history changes.
    pub fn has_updater(&self) -> bool {
        self.updater.borrow().is_some()
    }

    /// The number of entries behind the current one.
    pub fn back_len(&self) -> usize {
        self.state.borrow().history.len()
    }

    fn notify(&self) {
        // the callback usually reads the history back, so no borrow may be held here
        let callback = self.updater.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl History for MemoryHistory {
    fn current_prefix(&self) -> Option<String> {
        self.base_path.clone()
    }

    fn current_route(&self) -> String {
        self.state.borrow().current.clone()
    }

    fn can_go_back(&self) -> bool {
        !self.state.borrow().history.is_empty()
    }

    fn go_back(&self) {
        let moved = {
            let mut write = self.state.borrow_mut();
            match write.history.pop() {
                Some(last) => {
                    let old = std::mem::replace(&mut write.current, last);
                    write.future.push(old);
                    true
                }
                None => false,
            }
        };

        if moved {
            self.notify();
        } else {
            tracing::trace!("memory history has no previous entry");
        }
    }

    fn can_go_forward(&self) -> bool {
        !self.state.borrow().future.is_empty()
    }

    fn go_forward(&self) {
        let moved = {
            let mut write = self.state.borrow_mut();
            match write.future.pop() {
                Some(next) => {
                    let old = std::mem::replace(&mut write.current, next);
                    write.history.push(old);
                    true
                }
                None => false,
            }
        };

        if moved {
            self.notify();
        }
    }

    fn push(&self, new: String) {
        let mut write = self.state.borrow_mut();
        // don't push the same route twice
        if write.current == new {
            return;
        }
        let old = std::mem::replace(&mut write.current, new);
        write.history.push(old);
        write.future.clear();
    }

    fn replace(&self, path: String) {
        let mut write = self.state.borrow_mut();
        write.current = path;
    }

    fn updater(&self, callback: Rc<dyn Fn()>) {
        *self.updater.borrow_mut() = Some(callback);
    }

    fn remove_updater(&self) {
        self.updater.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn back_and_forward_move_between_entries() {
        let history = MemoryHistory::default();
        history.push("/a".into());
        history.push("/b".into());
        assert_eq!(history.back_len(), 2);

        history.go_back();
        assert_eq!(history.current_route(), "/a");
        assert!(history.can_go_forward());

        history.go_forward();
        assert_eq!(history.current_route(), "/b");
        assert!(!history.can_go_forward());
    }

    #[test]
    fn push_clears_the_future() {
        let history = MemoryHistory::default();
        history.push("/a".into());
        history.go_back();
        history.push("/c".into());
        assert!(!history.can_go_forward());
        assert_eq!(history.back_len(), 1);
    }

    #[test]
    fn pushing_the_current_route_is_ignored() {
        let history = MemoryHistory::with_initial_path("/a");
        history.push("/a".into());
        assert!(!history.can_go_back());
    }

    #[test]
    fn replace_keeps_stacks() {
        let history = MemoryHistory::default();
        history.push("/a".into());
        history.replace("/b".into());
        assert_eq!(history.current_route(), "/b");
        assert_eq!(history.back_len(), 1);
    }

    #[test]
    fn only_moves_notify_the_updater() {
        let history = Rc::new(MemoryHistory::default());
        let calls = Rc::new(Cell::new(0));
        history.updater(Rc::new({
            let calls = calls.clone();
            move || calls.set(calls.get() + 1)
        }));

        history.push("/a".into());
        history.replace("/b".into());
        assert_eq!(calls.get(), 0);

        // nothing to go forward to
        history.go_forward();
        assert_eq!(calls.get(), 0);

        history.go_back();
        history.go_forward();
        assert_eq!(calls.get(), 2);

        history.remove_updater();
        assert!(!history.has_updater());
        history.go_back();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn updater_can_read_the_history() {
        let history = Rc::new(MemoryHistory::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        history.updater(Rc::new({
            let history = Rc::downgrade(&history);
            let seen = seen.clone();
            move || {
                if let Some(history) = history.upgrade() {
                    seen.borrow_mut().push(history.current_route());
                }
            }
        }));

        history.push("/a".into());
        history.go_back();
        assert_eq!(*seen.borrow(), vec!["/".to_string()]);
    }
}
