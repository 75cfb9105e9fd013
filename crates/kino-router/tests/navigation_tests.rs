//! Integration tests for the navigation lifecycle
//!
//! Covers:
//! - Title side effects through the presentation context
//! - Deferred and aborted hooks
//! - Rejection of concurrent navigations
//! - Named navigation
//! - History (back / forward)

use kino_router::*;
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Routes router events to the test harness output
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn router_with_titles() -> (Router, Rc<RefCell<DocumentTitle>>) {
    init_tracing();
    let router = Router::from_definitions(kino_routes()).unwrap();
    let document = Rc::new(RefCell::new(DocumentTitle::new()));
    router.before_each(title_hook(document.clone()));
    (router, document)
}

/// Router whose hook parks the proceed token instead of calling it
fn router_with_parked_hook() -> (Router, Rc<RefCell<Vec<Proceed>>>) {
    init_tracing();
    let router = Router::from_definitions(kino_routes()).unwrap();
    let parked: Rc<RefCell<Vec<Proceed>>> = Rc::new(RefCell::new(Vec::new()));
    let slot = parked.clone();
    router.before_each(move |event| slot.borrow_mut().push(event.proceed));
    (router, parked)
}

// ============================================================================
// Title side effect
// ============================================================================

#[test]
fn test_title_applied_once_per_navigation() {
    let (router, document) = router_with_titles();

    router.navigate("/top").unwrap();
    router.navigate("/movie/42").unwrap();
    router.navigate("/missing").unwrap();

    assert_eq!(
        document.borrow().applied(),
        ["Топ фильмов", "Просмотр фильма", "404 - Страница не найдена"]
    );
    assert_eq!(router.current().unwrap().name(), "NotFound");
    assert_eq!(router.phase(), NavigationPhase::Committed);
}

#[test]
fn test_default_title_for_untitled_route() {
    let router = Router::from_definitions(vec![
        RouteDefinition::new("/", "home", "MovieSearch"),
        RouteDefinition::new("/:pathMatch(.*)*", "NotFound", "NotFound"),
    ])
    .unwrap();
    let document = Rc::new(RefCell::new(DocumentTitle::new()));
    router.before_each(title_hook(document.clone()));

    router.navigate("/").unwrap();
    assert_eq!(document.borrow().current(), Some(DEFAULT_TITLE));

    let router = router.with_default_title("Кино");
    router.navigate("/x").unwrap();
    assert_eq!(document.borrow().current(), Some("Кино"));
}

#[test]
fn test_empty_title_falls_back_to_default() {
    let router = Router::from_definitions(vec![
        RouteDefinition::new("/", "home", "MovieSearch").with_title(""),
        RouteDefinition::new("/:pathMatch(.*)*", "NotFound", "NotFound"),
    ])
    .unwrap();
    let document = Rc::new(RefCell::new(DocumentTitle::new()));
    router.before_each(title_hook(document.clone()));

    router.navigate("/").unwrap();
    assert_eq!(document.borrow().current(), Some(DEFAULT_TITLE));
}

#[test]
fn test_event_carries_from_and_to() {
    let router = Router::from_definitions(kino_routes()).unwrap();
    let seen: Rc<RefCell<Vec<(Option<String>, String)>>> = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    router.before_each(move |event| {
        log.borrow_mut().push((
            event.from.as_ref().map(|r| r.name().to_string()),
            event.to.name().to_string(),
        ));
        event.proceed();
    });

    router.navigate("/").unwrap();
    router.navigate("/contact").unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            (None, "home".to_string()),
            (Some("home".to_string()), "ContactsPage".to_string()),
        ]
    );
}

#[test]
fn test_without_hook_navigation_commits_immediately() {
    let router = Router::from_definitions(kino_routes()).unwrap();
    assert_eq!(router.phase(), NavigationPhase::Idle);
    assert!(router.current().is_none());

    router.navigate("/top").unwrap();
    assert_eq!(router.phase(), NavigationPhase::Committed);
    assert_eq!(router.current().unwrap().name(), "top-movies");
}

// ============================================================================
// Deferred hooks and concurrency
// ============================================================================

#[test]
fn test_second_navigation_rejected_while_pending() {
    let (router, parked) = router_with_parked_hook();

    let target = router.navigate("/movie/42").unwrap();
    assert_eq!(target.name(), "player-page");
    assert_eq!(router.phase(), NavigationPhase::AwaitingHook);
    assert!(router.current().is_none());
    assert_eq!(router.pending().unwrap().path(), "/movie/42");

    let err = router.navigate("/top").unwrap_err();
    assert_eq!(
        err,
        RouterError::NavigationInProgress {
            pending: "/movie/42".to_string()
        }
    );
    assert!(err.is_recoverable());

    let err = router.navigate_to_name("home", &HashMap::new()).unwrap_err();
    assert!(matches!(err, RouterError::NavigationInProgress { .. }));

    parked.borrow_mut().pop().unwrap().proceed();
    assert_eq!(router.phase(), NavigationPhase::Committed);
    assert_eq!(router.current().unwrap().name(), "player-page");

    // retry succeeds once the previous navigation committed
    router.navigate("/top").unwrap();
    assert_eq!(router.pending().unwrap().name(), "top-movies");
}

#[test]
fn test_abort_keeps_previous_route() {
    let (router, parked) = router_with_parked_hook();

    router.navigate("/top").unwrap();
    parked.borrow_mut().pop().unwrap().proceed();

    router.navigate("/contact").unwrap();
    parked.borrow_mut().pop().unwrap().abort();

    assert_eq!(router.phase(), NavigationPhase::Committed);
    assert_eq!(router.current().unwrap().name(), "top-movies");
    assert!(router.pending().is_none());
    assert!(!router.can_go_back());
}

#[test]
fn test_abort_of_first_navigation_returns_to_idle() {
    let (router, parked) = router_with_parked_hook();

    router.navigate("/top").unwrap();
    parked.borrow_mut().pop().unwrap().abort();

    assert_eq!(router.phase(), NavigationPhase::Idle);
    assert!(router.current().is_none());
}

#[test]
fn test_hook_cannot_start_nested_navigation() {
    let router = Router::from_definitions(kino_routes()).unwrap();
    let nested: Rc<RefCell<Option<Result<ResolvedRoute>>>> = Rc::new(RefCell::new(None));
    let handle = router.clone();
    let outcome = nested.clone();
    router.before_each(move |event| {
        event.proceed();
        if outcome.borrow().is_none() {
            *outcome.borrow_mut() = Some(handle.navigate("/contact"));
        }
    });

    router.navigate("/top").unwrap();

    assert!(matches!(
        nested.borrow().as_ref(),
        Some(Err(RouterError::NavigationInProgress { .. }))
    ));
    assert_eq!(router.current().unwrap().name(), "top-movies");
}

#[test]
fn test_hook_can_be_replaced() {
    let (router, document) = router_with_titles();
    router.navigate("/top").unwrap();

    let other = Rc::new(RefCell::new(DocumentTitle::new()));
    router.before_each(title_hook(other.clone()));
    router.navigate("/contact").unwrap();

    assert_eq!(document.borrow().applied().len(), 1);
    assert_eq!(other.borrow().current(), Some("Контакты"));
}

#[test]
fn test_panicking_hook_cancels_its_navigation() {
    let (router, _document) = router_with_titles();
    router.navigate("/").unwrap();

    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    router.before_each(move |event| {
        counter.set(counter.get() + 1);
        if event.to.name() == "top-movies" {
            panic!("hook failed");
        }
        event.proceed();
    });

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| router.navigate("/top")));
    assert!(outcome.is_err());
    assert!(router.pending().is_none());
    assert_eq!(router.phase(), NavigationPhase::Committed);
    assert_eq!(router.current().unwrap().name(), "home");

    // the same hook keeps running
    router.navigate("/contact").unwrap();
    assert_eq!(calls.get(), 2);
    assert_eq!(router.current().unwrap().name(), "ContactsPage");
}

#[test]
fn test_proceed_after_router_dropped_is_harmless() {
    let (router, parked) = router_with_parked_hook();
    router.navigate("/top").unwrap();
    drop(router);

    parked.borrow_mut().pop().unwrap().proceed();
}

// ============================================================================
// Named navigation
// ============================================================================

#[test]
fn test_navigate_to_name() {
    let (router, document) = router_with_titles();

    let err = router.navigate_to_name("player-page", &HashMap::new()).unwrap_err();
    assert!(matches!(err, RouterError::MissingParameter { .. }));
    assert!(document.borrow().applied().is_empty());

    let resolved = router.navigate_to_name_params("player-page", &[("kp_id", "7")]).unwrap();
    assert_eq!(resolved.path(), "/movie/7");
    assert_eq!(resolved.param("kp_id"), Some("7"));
    assert_eq!(document.borrow().current(), Some("Просмотр фильма"));
}

#[test]
fn test_navigate_to_unknown_name() {
    let router = Router::from_definitions(kino_routes()).unwrap();
    assert_eq!(
        router.navigate_to_name("settings", &HashMap::new()).unwrap_err(),
        RouterError::UnknownRoute("settings".to_string())
    );
    assert_eq!(router.phase(), NavigationPhase::Idle);
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_back_and_forward() {
    let (router, document) = router_with_titles();

    assert_eq!(router.back().unwrap_err(), RouterError::NothingToNavigate);

    router.navigate("/").unwrap();
    router.navigate("/top").unwrap();
    router.navigate("/movie/42?t=10").unwrap();
    assert!(router.can_go_back());
    assert!(!router.can_go_forward());

    let back = router.back().unwrap();
    assert_eq!(back.name(), "top-movies");
    assert!(router.can_go_forward());

    router.back().unwrap();
    assert_eq!(router.current().unwrap().name(), "home");
    assert!(!router.can_go_back());

    let forward = router.forward().unwrap();
    assert_eq!(forward.name(), "top-movies");
    let forward = router.forward().unwrap();
    assert_eq!(forward.query(), Some("t=10"));
    assert_eq!(router.forward().unwrap_err(), RouterError::NothingToNavigate);

    assert_eq!(
        document.borrow().applied().last().map(String::as_str),
        Some("Просмотр фильма")
    );
    assert_eq!(document.borrow().applied().len(), 7);
}

#[test]
fn test_new_navigation_clears_forward_stack() {
    let (router, _document) = router_with_titles();

    router.navigate("/").unwrap();
    router.navigate("/top").unwrap();
    router.back().unwrap();
    assert!(router.can_go_forward());

    router.navigate("/contact").unwrap();
    assert!(!router.can_go_forward());
}

#[test]
fn test_aborted_back_keeps_stacks() {
    let router = Router::from_definitions(kino_routes()).unwrap();
    router.navigate("/").unwrap();
    router.navigate("/top").unwrap();

    router.before_each(|event| event.abort());
    router.back().unwrap();

    assert_eq!(router.current().unwrap().name(), "top-movies");
    assert!(router.can_go_back());
    assert!(!router.can_go_forward());
}
