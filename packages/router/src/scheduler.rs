//! Deferring work to the next turn of the event loop.

use std::{cell::RefCell, collections::VecDeque};

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks on a later tick.
///
/// The router defers publishing through this when asked to (see
/// [`NavigateOptions::defer_publish`](crate::prelude::NavigateOptions::defer_publish)).
pub trait Scheduler {
    /// Run `task` once, after the current call stack has unwound.
    fn defer(&self, task: Task);
}

/// A first-in, first-out queue of deferred tasks, drained by whoever drives the event loop.
#[derive(Default)]
pub struct TickQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl TickQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run everything queued so far, plus whatever those tasks queue in turn.
    ///
    /// Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// The number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl Scheduler for TickQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Defers tasks with a zero-delay browser timeout.
#[cfg(feature = "web")]
#[derive(Default, Clone, Copy)]
pub struct TimeoutScheduler;

#[cfg(feature = "web")]
impl Scheduler for TimeoutScheduler {
    fn defer(&self, task: Task) {
        gloo::timers::callback::Timeout::new(0, task).forget();
    }
}
