use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use crate::{
    contexts::RouterContext,
    events::RouterEvent,
    navigation::Completion,
    service::{Router, Unsubscribe},
};

struct Pending<C> {
    context: RouterContext<C>,
    completion: Completion,
}

/// Commits published navigations to a [`RouterContext`].
///
/// A UI layer subscribes one of these to the router, re-renders from [`TransitionManager::context`]
/// and calls [`TransitionManager::commit`] once the new tree is in place. Every commit resolves
/// the navigation's future. While a commit is outstanding the manager publishes
/// `Transition { is_transitioning: true }`, and `false` once it is done.
///
/// If a second navigation arrives before the first is committed, the first one is superseded
/// and its future never resolves.
pub struct TransitionManager<C: Clone + 'static> {
    router: Router<C>,
    context: Rc<RefCell<RouterContext<C>>>,
    pending: Rc<RefCell<Option<Pending<C>>>>,
    subscription: Option<Unsubscribe<C>>,
}

impl<C: Clone + 'static> TransitionManager<C> {
    /// Subscribe a new manager to `router`, starting from its initial state.
    pub fn new(router: &Router<C>) -> Self {
        let context = Rc::new(RefCell::new(RouterContext::from(router.initial())));
        let pending: Rc<RefCell<Option<Pending<C>>>> = Rc::new(RefCell::new(None));

        let subscription = router.subscribe({
            let pending = pending.clone();
            let weak = router.downgrade();
            move |event| {
                let RouterEvent::Navigation(navigation) = event else {
                    return;
                };
                let superseded = pending.borrow_mut().replace(Pending {
                    context: RouterContext::from(navigation),
                    completion: navigation.completion.clone(),
                });
                if superseded.is_none() {
                    if let Some(router) = weak.upgrade() {
                        router.publish(RouterEvent::Transition {
                            is_transitioning: true,
                        });
                    }
                }
            }
        });

        Self {
            router: router.clone(),
            context,
            pending,
            subscription: Some(subscription),
        }
    }

    /// The committed context.
    pub fn context(&self) -> Ref<'_, RouterContext<C>> {
        self.context.borrow()
    }

    /// Whether a published navigation is waiting to be committed.
    pub fn is_transitioning(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Commit the pending navigation, if any, and resolve its future.
    pub fn commit(&self) -> bool {
        let pending = self.pending.borrow_mut().take();
        let Some(Pending {
            context,
            completion,
        }) = pending
        else {
            return false;
        };

        *self.context.borrow_mut() = context;
        completion.complete();
        self.router.publish(RouterEvent::Transition {
            is_transitioning: false,
        });
        true
    }
}

impl<C: Clone + 'static> Drop for TransitionManager<C> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
