use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use tracing::{debug, error, trace, warn};
use waypost_history::{History, MemoryHistory};

use crate::{
    error::RouterError,
    events::{NavigationEvent, RouterEvent},
    matcher::{MatchedRoute, Params},
    navigation::{split_fragment, Completion, NavigateOptions, Navigation, Redirect, Resolve, BACK},
    route_definition::{Route, RouteTable},
    router_cfg::{RenderMode, RouterConfig},
    scheduler::{Scheduler, TickQueue},
};

/// A subscriber callback.
pub type EventHandler<C> = Rc<dyn Fn(&RouterEvent<C>)>;

struct Subscription<C> {
    id: u64,
    handler: EventHandler<C>,
}

/// What the router resolved at construction time.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialState<C> {
    /// The initial match. [`None`] if the starting path matched nothing; render a "not found"
    /// fallback in that case.
    pub matched_route: Option<MatchedRoute<C>>,
    /// The starting path, without its fragment.
    pub location_path: String,
    /// The flattened parameters of the initial match.
    pub params: Params,
    /// The `#fragment` of the starting location.
    pub fragment: Option<String>,
    /// The splat value of the initial match.
    pub splat: Option<String>,
}

struct RouterState<C> {
    location_path: String,
    params: Params,
    splat: Option<String>,
    matched_route: Option<MatchedRoute<C>>,
}

struct RouterInner<C> {
    routes: RouteTable<C>,
    mode: RenderMode,
    history: Option<Rc<dyn History>>,
    scheduler: Rc<dyn Scheduler>,
    tick_queue: Option<Rc<TickQueue>>,
    state: RefCell<RouterState<C>>,
    subscriptions: RefCell<Vec<Subscription<C>>>,
    next_subscription_id: Cell<u64>,
    back_resolve: RefCell<Option<Resolve>>,
    initial: InitialState<C>,
}

/// The navigation engine.
///
/// Owns the current location, keeps the [`History`] in sync with it and tells subscribers about
/// every navigation. Cloning gives another handle to the same router; the history listener is
/// removed once the last handle is dropped.
///
/// Everything here is single threaded. Overlapping [`Router::navigate`] calls are allowed, but
/// the current location is last-write-wins: callers that need ordering must await each
/// navigation before starting the next.
pub struct Router<C> {
    inner: Rc<RouterInner<C>>,
}

impl<C> Clone for Router<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A [`Router`] handle that does not keep the router alive.
pub struct WeakRouter<C> {
    inner: Weak<RouterInner<C>>,
}

impl<C> Clone for WeakRouter<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C> WeakRouter<C> {
    /// Get the router back, if it is still alive.
    pub fn upgrade(&self) -> Option<Router<C>> {
        self.inner.upgrade().map(|inner| Router { inner })
    }
}

/// Removes a subscription registered with [`Router::subscribe`].
///
/// Dropping it without calling [`Unsubscribe::unsubscribe`] keeps the subscription.
pub struct Unsubscribe<C> {
    router: Weak<RouterInner<C>>,
    id: u64,
}

impl<C> Unsubscribe<C> {
    /// The id the subscription was registered under.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        match self.router.upgrade() {
            Some(router) => router.unsubscribe(self.id),
            None => false,
        }
    }
}

#[cfg(feature = "web")]
fn default_history() -> Rc<dyn History> {
    match waypost_history::WebHistory::new(None) {
        Some(history) => Rc::new(history),
        None => {
            warn!("no browser history available, falling back to an in-memory history");
            Rc::new(MemoryHistory::default())
        }
    }
}

#[cfg(not(feature = "web"))]
fn default_history() -> Rc<dyn History> {
    Rc::new(MemoryHistory::default())
}

#[cfg(feature = "web")]
fn default_scheduler() -> (Rc<dyn Scheduler>, Option<Rc<TickQueue>>) {
    (Rc::new(crate::scheduler::TimeoutScheduler), None)
}

#[cfg(not(feature = "web"))]
fn default_scheduler() -> (Rc<dyn Scheduler>, Option<Rc<TickQueue>>) {
    let queue = Rc::new(TickQueue::new());
    let scheduler: Rc<dyn Scheduler> = queue.clone();
    (scheduler, Some(queue))
}

fn owned_parts(url: &str) -> (String, Option<String>) {
    let (path, fragment) = split_fragment(url);
    (path.to_string(), fragment.map(ToString::to_string))
}

impl<C: Clone + 'static> Router<C> {
    /// Compile `routes` and create a router for them.
    ///
    /// ```rust
    /// # use waypost_router::prelude::*;
    /// let routes = [Route::new("home").path("/"), Route::new("user").path("/users/:id")];
    /// let router = Router::new(&routes, RouterConfig::default().path("/users/7")).unwrap();
    ///
    /// let initial = router.initial();
    /// assert_eq!(initial.location_path, "/users/7");
    /// assert_eq!(initial.params.get("id").map(String::as_str), Some("7"));
    /// ```
    pub fn new(routes: &[Route<C>], config: RouterConfig) -> Result<Self, RouterError> {
        Self::with_table(RouteTable::new(routes)?, config)
    }

    /// Create a router for an already compiled table.
    pub fn with_table(routes: RouteTable<C>, config: RouterConfig) -> Result<Self, RouterError> {
        let RouterConfig {
            path,
            mode,
            history,
            scheduler,
        } = config;

        let history = match mode {
            RenderMode::Interactive => Some(history.unwrap_or_else(default_history)),
            RenderMode::NonInteractive => None,
        };

        let (location_path, fragment) = match (path, &history) {
            (Some(path), _) => owned_parts(&path),
            (None, Some(history)) => owned_parts(&history.current_route()),
            (None, None) => return Err(RouterError::MissingStartingPath),
        };

        let matched_route = routes.at(&location_path);
        if matched_route.is_none() {
            error!("Tried to navigate to {location_path}, no route was matched!");
        }
        let params = matched_route
            .as_ref()
            .map(MatchedRoute::params)
            .unwrap_or_default();
        let splat = matched_route
            .as_ref()
            .and_then(MatchedRoute::splat)
            .map(ToString::to_string);

        let (scheduler, tick_queue) = match scheduler {
            Some(scheduler) => (scheduler, None),
            None => default_scheduler(),
        };

        let inner = Rc::new(RouterInner {
            routes,
            mode,
            history,
            scheduler,
            tick_queue,
            state: RefCell::new(RouterState {
                location_path: location_path.clone(),
                params: params.clone(),
                splat: splat.clone(),
                matched_route: matched_route.clone(),
            }),
            subscriptions: RefCell::new(Vec::new()),
            next_subscription_id: Cell::new(0),
            back_resolve: RefCell::new(None),
            initial: InitialState {
                matched_route,
                location_path,
                params,
                fragment,
                splat,
            },
        });

        if let Some(history) = &inner.history {
            let router = Rc::downgrade(&inner);
            history.updater(Rc::new(move || {
                if let Some(router) = router.upgrade() {
                    router.on_history_change();
                }
            }));
        }

        Ok(Self { inner })
    }

    /// Navigate to `url`.
    ///
    /// The returned [`Navigation`] resolves to `false` right away if there is nothing to do
    /// (no target, the current location without [`NavigateOptions::force`], or no matching
    /// route). Otherwise the router updates its state, syncs the history and publishes a
    /// [`RouterEvent::Navigation`]; the future resolves to `true` once a subscriber completes that
    /// event, and never if nobody does.
    ///
    /// The target [`BACK`] goes back through the history instead. Its future resolves when the
    /// navigation triggered by the history change is completed. Only one such request is kept:
    /// a second one issued before the first resolves leaves the first pending forever.
    ///
    /// # Errors
    /// When rendering non-interactively, any target becomes a [`Redirect`] and nothing else
    /// happens.
    pub fn navigate<'a>(
        &self,
        url: impl Into<Option<&'a str>>,
        options: NavigateOptions,
    ) -> Result<Navigation, Redirect> {
        let url = url.into();

        if self.inner.mode == RenderMode::NonInteractive {
            return match url {
                Some(target) => {
                    debug!("redirecting to {target}");
                    Err(Redirect::new(target))
                }
                None => Ok(Navigation::resolved(false)),
            };
        }

        let (navigation, resolve) = Navigation::channel();
        self.inner.start(url, options, resolve);
        Ok(navigation)
    }

    /// Register `handler` for every published event, after all existing subscribers.
    pub fn subscribe(&self, handler: impl Fn(&RouterEvent<C>) + 'static) -> Unsubscribe<C> {
        let id = self.inner.subscribe(Rc::new(handler));
        Unsubscribe {
            router: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Hand `event` to every subscriber, in subscription order.
    ///
    /// A panicking handler propagates to the caller and the remaining handlers are skipped.
    pub fn publish(&self, event: RouterEvent<C>) {
        self.inner.publish(&event);
    }

    /// Run the deferred publishes queued on the router's own [`TickQueue`].
    ///
    /// Does nothing when a scheduler was configured explicitly.
    pub fn run_pending(&self) -> usize {
        self.inner
            .tick_queue
            .as_ref()
            .map_or(0, |queue| queue.run_pending())
    }
}

impl<C: Clone> Router<C> {
    /// The state resolved at construction.
    pub fn initial(&self) -> &InitialState<C> {
        &self.inner.initial
    }

    /// The current location path.
    pub fn location_path(&self) -> String {
        self.inner.state.borrow().location_path.clone()
    }

    /// The flattened parameters of the current match.
    pub fn params(&self) -> Params {
        self.inner.state.borrow().params.clone()
    }

    /// The splat value of the current match.
    pub fn splat(&self) -> Option<String> {
        self.inner.state.borrow().splat.clone()
    }

    /// The current match, [`None`] only if the starting path never matched and nothing has been
    /// navigated to since.
    pub fn matched_route(&self) -> Option<MatchedRoute<C>> {
        self.inner.state.borrow().matched_route.clone()
    }
}

impl<C> Router<C> {
    /// The compiled route table.
    pub fn routes(&self) -> &RouteTable<C> {
        &self.inner.routes
    }

    /// Whether the router drives a history.
    pub fn is_interactive(&self) -> bool {
        self.inner.mode == RenderMode::Interactive
    }

    /// The history the router drives, if interactive.
    pub fn history(&self) -> Option<Rc<dyn History>> {
        self.inner.history.clone()
    }

    /// The number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    /// Whether a [`BACK`] navigation is waiting for the history to report back.
    pub fn has_pending_back(&self) -> bool {
        self.inner.back_resolve.borrow().is_some()
    }

    /// A handle that does not keep the router alive.
    pub fn downgrade(&self) -> WeakRouter<C> {
        WeakRouter {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<C: Clone + 'static> RouterInner<C> {
    fn start(self: &Rc<Self>, url: Option<&str>, options: NavigateOptions, resolve: Resolve) {
        let Some(url) = url else {
            resolve(false);
            return;
        };

        if url == self.state.borrow().location_path && !options.force {
            trace!("already at {url}");
            resolve(false);
            return;
        }

        if url == BACK {
            self.go_back(resolve);
            return;
        }

        let (path, fragment) = split_fragment(url);
        let Some(matched_route) = self.routes.at(path) else {
            error!("Tried to navigate to {url}, no route was matched!");
            resolve(false);
            return;
        };

        if options.update_history {
            if let Some(history) = &self.history {
                if options.replace {
                    history.replace(url.to_string());
                } else {
                    history.push(url.to_string());
                }
            }
        }

        let params = matched_route.params();
        let splat = matched_route.splat().map(ToString::to_string);
        {
            let mut state = self.state.borrow_mut();
            state.location_path = path.to_string();
            state.params = params.clone();
            state.splat = splat.clone();
            state.matched_route = Some(matched_route.clone());
        }
        debug!("navigated to {url}");

        let event = RouterEvent::Navigation(NavigationEvent {
            matched_route,
            params,
            location_path: path.to_string(),
            fragment: fragment.map(ToString::to_string),
            splat,
            completion: Completion::new(resolve),
        });

        if options.defer_publish {
            let router = Rc::downgrade(self);
            self.scheduler.defer(Box::new(move || {
                if let Some(router) = router.upgrade() {
                    router.publish(&event);
                }
            }));
        } else {
            self.publish(&event);
        }
    }

    fn go_back(&self, resolve: Resolve) {
        let previous = self.back_resolve.borrow_mut().replace(resolve);
        if previous.is_some() {
            // TODO: reject the newer request instead of orphaning the older one once callers can
            // observe a rejection
            warn!("a previous `back` navigation was still pending and will never resolve");
        }
        drop(previous);

        debug!("navigating back");
        if let Some(history) = &self.history {
            history.go_back();
        }
    }

    /// The history moved on its own (back/forward buttons, or our own `go_back`).
    fn on_history_change(self: &Rc<Self>) {
        let Some(history) = &self.history else {
            return;
        };
        let route = history.current_route();

        let router = Rc::downgrade(self);
        self.start(
            Some(route.as_str()),
            NavigateOptions::default().update_history(false),
            Box::new(move |navigated| {
                if let Some(router) = router.upgrade() {
                    router.resolve_back(navigated);
                }
            }),
        );
    }
}

impl<C> RouterInner<C> {
    fn resolve_back(&self, navigated: bool) {
        let resolve = self.back_resolve.borrow_mut().take();
        if let Some(resolve) = resolve {
            resolve(navigated);
        }
    }

    fn subscribe(&self, handler: EventHandler<C>) -> u64 {
        let id = self.next_subscription_id.get() + 1;
        self.next_subscription_id.set(id);
        self.subscriptions
            .borrow_mut()
            .push(Subscription { id, handler });
        trace!("subscription {id} added");
        id
    }

    fn unsubscribe(&self, id: u64) -> bool {
        let mut subscriptions = self.subscriptions.borrow_mut();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        trace!("subscription {id} removed");
        subscriptions.len() != before
    }

    fn publish(&self, event: &RouterEvent<C>) {
        // handlers may subscribe, unsubscribe or navigate while we iterate
        let handlers: Vec<EventHandler<C>> = self
            .subscriptions
            .borrow()
            .iter()
            .map(|subscription| subscription.handler.clone())
            .collect();

        for handler in handlers {
            handler(event);
        }
    }
}

impl<C> Drop for RouterInner<C> {
    fn drop(&mut self) {
        if let Some(history) = &self.history {
            history.remove_updater();
        }
    }
}

impl<C> fmt::Debug for Router<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Router")
            .field("mode", &self.inner.mode)
            .field("location_path", &state.location_path)
            .field("params", &state.params)
            .field("splat", &state.splat)
            .field("subscribers", &self.inner.subscriptions.borrow().len())
            .finish()
    }
}
