//! Navigation lifecycle
//!
//! Every navigation runs `Idle → Resolving → AwaitingHook → Committed`:
//!
//! 1. the location is resolved against the [`RouteTable`];
//! 2. the registered hook receives a [`NavigationEvent`];
//! 3. the hook calls [`Proceed::proceed`], which commits the navigation.
//!
//! Only one navigation is in flight at a time. Starting another while the hook
//! has not proceeded yields [`RouterError::NavigationInProgress`]. A hook that
//! drops its [`Proceed`] token without calling it stalls the router until
//! [`Proceed::abort`] is used instead.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{Result, RouterError};
use crate::route::{Params, ResolvedRoute, RouteDefinition};
use crate::table::RouteTable;

/// Title used when the target route has none
pub const DEFAULT_TITLE: &str = "Vue App";

/// Where a navigation currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    /// Nothing committed yet
    Idle,
    /// Matching the requested location
    Resolving,
    /// Waiting for the hook to proceed
    AwaitingHook,
    /// The last navigation completed
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMove {
    Push,
    Back,
    Forward,
}

#[derive(Debug)]
struct Pending {
    id: u64,
    to: ResolvedRoute,
    kind: HistoryMove,
    title: String,
}

#[derive(Debug)]
struct RouterState {
    phase: NavigationPhase,
    current: Option<ResolvedRoute>,
    pending: Option<Pending>,
    // href of the navigation whose hook is executing right now
    hook_running: Option<String>,
    back: Vec<ResolvedRoute>,
    forward: Vec<ResolvedRoute>,
    next_id: u64,
}

impl RouterState {
    fn new() -> Self {
        Self {
            phase: NavigationPhase::Idle,
            current: None,
            pending: None,
            hook_running: None,
            back: Vec::new(),
            forward: Vec::new(),
            next_id: 1,
        }
    }

    fn settled_phase(&self) -> NavigationPhase {
        if self.current.is_some() {
            NavigationPhase::Committed
        } else {
            NavigationPhase::Idle
        }
    }

    fn commit(&mut self, pending: Pending) {
        let Pending { id, to, kind, title } = pending;
        let from = self.current.take();

        match kind {
            HistoryMove::Push => {
                self.back.extend(from.clone());
                self.forward.clear();
            }
            HistoryMove::Back => {
                self.back.pop();
                self.forward.extend(from.clone());
            }
            HistoryMove::Forward => {
                self.forward.pop();
                self.back.extend(from.clone());
            }
        }

        info!(
            navigation = id,
            from = from.as_ref().map(|r| r.name()).unwrap_or("-"),
            to = %to.name(),
            path = %to.path(),
            %title,
            "navigation committed"
        );

        self.current = Some(to);
        self.phase = NavigationPhase::Committed;
    }
}

/// One-shot continuation handed to the navigation hook
///
/// Consuming it with [`proceed`](Self::proceed) commits the navigation;
/// [`abort`](Self::abort) cancels it and keeps the previous route current.
#[must_use = "a navigation stays pending until `proceed` or `abort` is called"]
pub struct Proceed {
    state: Weak<RefCell<RouterState>>,
    id: u64,
}

impl Proceed {
    /// Commits the navigation
    pub fn proceed(self) {
        self.finish(true);
    }

    /// Cancels the navigation
    ///
    /// Nothing is recorded in history and the previous route stays current.
    pub fn abort(self) {
        self.finish(false);
    }

    fn finish(self, commit: bool) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.borrow_mut();

        let pending = match state.pending.take() {
            Some(pending) if pending.id == self.id => pending,
            other => {
                state.pending = other;
                return;
            }
        };

        if commit {
            state.commit(pending);
        } else {
            warn!(navigation = pending.id, to = %pending.to.name(), "navigation aborted");
            state.phase = state.settled_phase();
        }
    }
}

impl fmt::Debug for Proceed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proceed").field("id", &self.id).finish()
    }
}

/// Handed to the hook once per navigation attempt
#[derive(Debug)]
pub struct NavigationEvent {
    /// The route committed before this navigation, if any
    pub from: Option<ResolvedRoute>,
    /// The route being navigated to
    pub to: ResolvedRoute,
    /// Continuation that completes the navigation
    pub proceed: Proceed,
    default_title: Arc<str>,
}

impl NavigationEvent {
    /// Title of the target route, or the router's default title when the
    /// route has none or an empty one
    pub fn title(&self) -> &str {
        title_or_default(&self.to, &self.default_title)
    }

    /// Commits the navigation
    pub fn proceed(self) {
        self.proceed.proceed();
    }

    /// Cancels the navigation
    pub fn abort(self) {
        self.proceed.abort();
    }
}

fn title_or_default<'a>(route: &'a ResolvedRoute, default: &'a str) -> &'a str {
    route
        .title()
        .filter(|title| !title.is_empty())
        .unwrap_or(default)
}

type NavigationHook = Box<dyn FnMut(NavigationEvent)>;

/// Holds the hook while it runs
///
/// On drop the hook goes back into its slot and the router stops counting
/// the hook as running. A hook that panics cancels its navigation.
struct HookGuard<'a> {
    router: &'a Router,
    hook: Option<NavigationHook>,
    id: u64,
}

impl Drop for HookGuard<'_> {
    fn drop(&mut self) {
        if let Some(hook) = self.hook.take() {
            if let Ok(mut slot) = self.router.hook.try_borrow_mut() {
                if slot.is_none() {
                    *slot = Some(hook);
                }
            }
        }

        let Ok(mut state) = self.router.state.try_borrow_mut() else {
            return;
        };
        state.hook_running = None;

        let unwound = std::thread::panicking()
            && state.pending.as_ref().is_some_and(|p| p.id == self.id);
        if unwound {
            state.pending = None;
            state.phase = state.settled_phase();
            warn!(navigation = self.id, "navigation hook panicked, navigation cancelled");
        }
    }
}

/// Navigation front end over a shared [`RouteTable`]
///
/// Cloning a `Router` yields another handle to the same navigation state.
///
/// # Examples
///
/// ```
/// use kino_router::{kino_routes, NavigationPhase, Router};
///
/// let router = Router::from_definitions(kino_routes()).unwrap();
///
/// // the hook may keep the token and proceed later
/// let parked = std::rc::Rc::new(std::cell::RefCell::new(None));
/// let slot = parked.clone();
/// router.before_each(move |event| {
///     *slot.borrow_mut() = Some(event.proceed);
/// });
///
/// router.navigate("/top").unwrap();
/// assert_eq!(router.phase(), NavigationPhase::AwaitingHook);
/// assert!(router.navigate("/contact").is_err());
///
/// parked.borrow_mut().take().unwrap().proceed();
/// assert_eq!(router.current().unwrap().name(), "top-movies");
/// ```
#[derive(Clone)]
pub struct Router {
    table: Arc<RouteTable>,
    default_title: Arc<str>,
    state: Rc<RefCell<RouterState>>,
    hook: Rc<RefCell<Option<NavigationHook>>>,
}

impl Router {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            default_title: Arc::from(DEFAULT_TITLE),
            state: Rc::new(RefCell::new(RouterState::new())),
            hook: Rc::new(RefCell::new(None)),
        }
    }

    /// Registers the definitions and builds a router over them
    pub fn from_definitions<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = RouteDefinition>,
    {
        Ok(Self::new(Arc::new(RouteTable::new(definitions)?)))
    }

    /// Sets the title used for routes without one
    pub fn with_default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Arc::from(title.into());
        self
    }

    /// Registers the hook run before every navigation completes
    ///
    /// Replaces a previously registered hook. Without a hook navigations
    /// commit immediately.
    pub fn before_each<F>(&self, hook: F)
    where
        F: FnMut(NavigationEvent) + 'static,
    {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }

    /// Navigates to a location
    ///
    /// Returns the resolved target; it is current once the hook proceeds.
    #[instrument(skip(self))]
    pub fn navigate(&self, location: &str) -> Result<ResolvedRoute> {
        self.begin(location, HistoryMove::Push)
    }

    /// Navigates to a named route, substituting `params` into its pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use kino_router::{kino_routes, Router, RouterError};
    /// use std::collections::HashMap;
    ///
    /// let router = Router::from_definitions(kino_routes()).unwrap();
    ///
    /// let err = router.navigate_to_name("player-page", &HashMap::new()).unwrap_err();
    /// assert!(matches!(err, RouterError::MissingParameter { .. }));
    ///
    /// let params = HashMap::from([("kp_id".to_string(), "7".to_string())]);
    /// let resolved = router.navigate_to_name("player-page", &params).unwrap();
    /// assert_eq!(resolved.path(), "/movie/7");
    /// ```
    #[instrument(skip(self, params))]
    pub fn navigate_to_name(&self, name: &str, params: &Params) -> Result<ResolvedRoute> {
        self.ensure_idle()?;
        let href = self.table.url_for(name, params)?;
        self.begin(&href, HistoryMove::Push)
    }

    /// [`navigate_to_name`](Self::navigate_to_name) with parameter tuples
    pub fn navigate_to_name_params(
        &self,
        name: &str,
        params: &[(&str, &str)],
    ) -> Result<ResolvedRoute> {
        let params: Params = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.navigate_to_name(name, &params)
    }

    /// Navigates to the previous history entry
    #[instrument(skip(self))]
    pub fn back(&self) -> Result<ResolvedRoute> {
        self.ensure_idle()?;
        let href = self
            .state
            .borrow()
            .back
            .last()
            .map(ResolvedRoute::href)
            .ok_or(RouterError::NothingToNavigate)?;
        self.begin(&href, HistoryMove::Back)
    }

    /// Navigates to the next history entry
    #[instrument(skip(self))]
    pub fn forward(&self) -> Result<ResolvedRoute> {
        self.ensure_idle()?;
        let href = self
            .state
            .borrow()
            .forward
            .last()
            .map(ResolvedRoute::href)
            .ok_or(RouterError::NothingToNavigate)?;
        self.begin(&href, HistoryMove::Forward)
    }

    fn ensure_idle(&self) -> Result<()> {
        let state = self.state.borrow();
        let busy = state
            .pending
            .as_ref()
            .map(|p| p.to.href())
            .or_else(|| state.hook_running.clone());

        match busy {
            Some(pending) => {
                warn!(%pending, "navigation rejected, another one is in progress");
                Err(RouterError::NavigationInProgress { pending })
            }
            None => Ok(()),
        }
    }

    fn begin(&self, location: &str, kind: HistoryMove) -> Result<ResolvedRoute> {
        self.ensure_idle()?;

        let event = {
            let mut state = self.state.borrow_mut();
            state.phase = NavigationPhase::Resolving;
            let to = self.table.resolve(location);

            let id = state.next_id;
            state.next_id += 1;
            state.pending = Some(Pending {
                id,
                to: to.clone(),
                kind,
                title: title_or_default(&to, &self.default_title).to_string(),
            });
            state.hook_running = Some(to.href());
            state.phase = NavigationPhase::AwaitingHook;

            NavigationEvent {
                from: state.current.clone(),
                to,
                proceed: Proceed {
                    state: Rc::downgrade(&self.state),
                    id,
                },
                default_title: Arc::clone(&self.default_title),
            }
        };
        let to = event.to.clone();

        self.run_hook(event);

        Ok(to)
    }

    fn run_hook(&self, event: NavigationEvent) {
        // Taken out for the call so the hook may use this router freely
        let mut guard = HookGuard {
            router: self,
            hook: self.hook.borrow_mut().take(),
            id: event.proceed.id,
        };
        match guard.hook.as_mut() {
            Some(hook) => hook(event),
            None => event.proceed(),
        }
    }

    /// The last committed route
    pub fn current(&self) -> Option<ResolvedRoute> {
        self.state.borrow().current.clone()
    }

    pub fn phase(&self) -> NavigationPhase {
        self.state.borrow().phase
    }

    /// Target of the navigation awaiting its hook, if any
    pub fn pending(&self) -> Option<ResolvedRoute> {
        self.state.borrow().pending.as_ref().map(|p| p.to.clone())
    }

    pub fn can_go_back(&self) -> bool {
        !self.state.borrow().back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.state.borrow().forward.is_empty()
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    pub fn default_title(&self) -> &str {
        &self.default_title
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("state", &self.state.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router_with_stalled_hook() -> Router {
        let router = Router::from_definitions(vec![
            RouteDefinition::new("/", "home", "MovieSearch").with_title(""),
            RouteDefinition::new("/top", "top-movies", "TopMovies").with_title("Топ фильмов"),
            RouteDefinition::new("/:pathMatch(.*)*", "NotFound", "NotFound"),
        ])
        .unwrap();
        // keep every navigation pending
        router.before_each(|event| std::mem::forget(event.proceed));
        router
    }

    fn pending_title(router: &Router) -> String {
        router.state.borrow().pending.as_ref().unwrap().title.clone()
    }

    #[test]
    fn test_commit_title_is_the_applied_title() {
        let router = router_with_stalled_hook();
        router.navigate("/top").unwrap();
        assert_eq!(pending_title(&router), "Топ фильмов");
    }

    #[test]
    fn test_commit_title_falls_back_to_default() {
        let router = router_with_stalled_hook().with_default_title("Кино");
        router.navigate("/").unwrap();
        assert_eq!(pending_title(&router), "Кино");
    }

    #[test]
    fn test_hook_running_cleared_after_hook() {
        let router = router_with_stalled_hook();
        router.navigate("/top").unwrap();
        assert!(router.state.borrow().hook_running.is_none());
        assert!(router.hook.borrow().is_some());
    }
}
