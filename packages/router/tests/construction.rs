use std::rc::Rc;

use futures::FutureExt;
use http::StatusCode;
use pretty_assertions::assert_eq;
use waypost_router::prelude::*;

type Component = &'static str;

fn routes() -> Vec<Route<Component>> {
    vec![
        Route::new("home").path("/"),
        Route::new("user")
            .path("/users/:id")
            .guard("auth")
            .children([Route::new("tab").path("/:tab")]),
        Route::new("files").path("/files/*"),
    ]
}

#[test]
fn misplaced_splat_is_rejected() {
    let routes = [Route::new("broken").path("/a/*/b")];
    let error = Router::new(&routes, RouterConfig::default().path("/")).unwrap_err();
    assert_eq!(
        error,
        RouterError::Configuration(ConfigurationError::SplatNotLast {
            path: "/a/*/b".to_string()
        })
    );
    assert!(error.to_string().contains("/a/*/b"));
}

#[test]
fn nested_misplaced_splat_is_rejected() {
    let routes = [Route::new("parent")
        .path("/parent")
        .child(Route::new("child").path("/*/x"))];
    let result = Router::new(&routes, RouterConfig::default().path("/"));
    assert!(matches!(
        result,
        Err(RouterError::Configuration(
            ConfigurationError::SplatNotLast { .. }
        ))
    ));
}

#[test]
fn pathless_leaf_is_rejected() {
    let routes = [Route::new("nowhere")];
    let result = Router::new(&routes, RouterConfig::default().path("/"));
    assert!(matches!(
        result,
        Err(RouterError::Configuration(ConfigurationError::EmptyRoute))
    ));
}

#[test]
fn initial_state_comes_from_the_history() {
    let history = Rc::new(MemoryHistory::with_initial_path("/users/7/posts#latest"));
    let router = Router::new(&routes(), RouterConfig::default().history(history)).unwrap();

    let initial = router.initial();
    assert_eq!(initial.location_path, "/users/7/posts");
    assert_eq!(initial.fragment.as_deref(), Some("#latest"));
    assert_eq!(initial.params.get("id").map(String::as_str), Some("7"));
    assert_eq!(initial.params.get("tab").map(String::as_str), Some("posts"));

    let matched = initial.matched_route.as_ref().unwrap();
    let components: Vec<Component> = matched.levels().map(|level| *level.component()).collect();
    assert_eq!(components, vec!["user", "tab"]);
    assert_eq!(matched.fragment().guards(), &["auth"]);
    assert_eq!(router.location_path(), "/users/7/posts");
}

#[test]
fn explicit_path_wins_over_the_history() {
    let history = Rc::new(MemoryHistory::with_initial_path("/users/7/posts"));
    let router = Router::new(
        &routes(),
        RouterConfig::default().history(history.clone()).path("/files/a/b"),
    )
    .unwrap();

    assert_eq!(router.initial().location_path, "/files/a/b");
    assert_eq!(router.initial().splat.as_deref(), Some("a/b"));
    assert!(router.initial().params.is_empty());
    // the history is left where it was
    assert_eq!(history.current_route(), "/users/7/posts");
}

#[test]
fn unmatched_starting_path_is_not_fatal() {
    let router = Router::new(&routes(), RouterConfig::default().path("/missing")).unwrap();

    let initial = router.initial();
    assert_eq!(initial.location_path, "/missing");
    assert_eq!(initial.matched_route, None);
    assert!(initial.params.is_empty());
    assert_eq!(router.matched_route(), None);
}

#[test]
fn interactive_router_listens_to_its_history() {
    let history = Rc::new(MemoryHistory::default());
    let router = Router::new(&routes(), RouterConfig::default().history(history.clone())).unwrap();

    assert!(router.is_interactive());
    assert!(router.history().is_some());
    assert!(history.has_updater());
    assert_eq!(router.initial().location_path, "/");
}

#[test]
fn routes_can_be_compiled_ahead_of_time() {
    let table = RouteTable::new(&routes()).unwrap();
    assert_eq!(table.len(), 3);

    let router = Router::with_table(table, RouterConfig::default().path("/")).unwrap();
    assert_eq!(router.routes().len(), 3);
    assert_eq!(
        router.matched_route().map(|matched| *matched.leaf().component()),
        Some("home")
    );
}

#[test]
fn non_interactive_requires_a_starting_path() {
    let result = Router::new(&routes(), RouterConfig::default().non_interactive());
    assert!(matches!(result, Err(RouterError::MissingStartingPath)));
}

#[test]
fn non_interactive_navigation_redirects() {
    let router = Router::new(
        &routes(),
        RouterConfig::default().non_interactive().path("/users/1/info"),
    )
    .unwrap();
    assert!(!router.is_interactive());
    assert!(router.history().is_none());

    let redirect = router
        .navigate("/files/report.pdf", NavigateOptions::default())
        .unwrap_err();
    assert_eq!(redirect.kind(), "redirect");
    assert_eq!(redirect.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(redirect.target(), "/files/report.pdf");
    assert_eq!(
        redirect.to_string(),
        "307 - Temporary Redirect to `/files/report.pdf`"
    );

    // nothing moved
    assert_eq!(router.location_path(), "/users/1/info");

    // even going back or to the current location redirects
    assert!(router.navigate(BACK, NavigateOptions::default()).is_err());
    assert!(router
        .navigate("/users/1/info", NavigateOptions::default())
        .is_err());

    let nowhere = router
        .navigate(None::<&str>, NavigateOptions::default())
        .unwrap();
    assert_eq!(nowhere.now_or_never(), Some(false));
}
