//! Runtime resolver tests against a served catalog
//!
//! Each navigation loads the catalog over HTTP, as the deployed site does.

use std::sync::Arc;
use std::time::Duration;

use extcat_core::{
    CatalogFetcher, NavigationOutcome, ResolverState, RouteLayout, RuntimeResolver, SiteConfig,
};
use pretty_assertions::assert_eq;
use tests::{catalogs, config_for};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(config: &SiteConfig) -> RuntimeResolver {
    let fetcher = Arc::new(CatalogFetcher::new(config).unwrap());
    RuntimeResolver::new(fetcher, config.layout())
}

async fn serve_catalog() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogs::alpha_beta()))
        .mount(&server)
        .await;
    server
}

fn settled(outcome: NavigationOutcome) -> ResolverState {
    match outcome {
        NavigationOutcome::Applied(state) => state,
        other => panic!("expected Applied, got {:?}", other),
    }
}

#[tokio::test]
async fn test_path_and_query_forms_resolve_same_descriptor() {
    let server = serve_catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let resolver = resolver_for(&config_for(dir.path(), &format!("{}/servers.json", server.uri())));

    let by_path = settled(resolver.navigate("/extensions/detail/alpha").await);
    let by_query = settled(resolver.navigate("/extensions/detail?id=alpha").await);

    match (&by_path, &by_query) {
        (
            ResolverState::Found { descriptor: a, .. },
            ResolverState::Found { descriptor: b, .. },
        ) => {
            assert_eq!(a, b);
            assert_eq!(a.name, "Alpha");
            assert_eq!(a.command.as_deref(), Some("npx alpha-mcp"));
        }
        other => panic!("expected two Found states, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_url_and_mixed_case_key() {
    let server = serve_catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let resolver = resolver_for(&config_for(dir.path(), &format!("{}/servers.json", server.uri())));

    let state = settled(
        resolver
            .navigate("https://site.example/extensions/detail?id=Beta")
            .await,
    );

    match state {
        ResolverState::Found { descriptor, .. } => assert!(descriptor.is_builtin),
        other => panic!("expected Found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let server = serve_catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let resolver = resolver_for(&config_for(dir.path(), &format!("{}/servers.json", server.uri())));

    let state = settled(resolver.navigate("/extensions/detail/gamma").await);

    assert!(matches!(
        state,
        ResolverState::NotFound { ref key, .. } if key == "gamma"
    ));
    assert_eq!(resolver.state(), state);
}

#[tokio::test]
async fn test_fetch_failure_is_distinct_from_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));
    config.fetch.attempts = 1;
    let resolver = resolver_for(&config);

    let state = settled(resolver.navigate("/extensions/detail/alpha").await);

    match state {
        ResolverState::FetchFailed { message, .. } => assert!(message.contains("503")),
        other => panic!("expected FetchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_subscribers_see_settled_state() {
    let server = serve_catalog().await;
    let dir = tempfile::tempdir().unwrap();
    let resolver = resolver_for(&config_for(dir.path(), &format!("{}/servers.json", server.uri())));
    let mut rx = resolver.subscribe();
    assert_eq!(*rx.borrow(), ResolverState::Idle);

    resolver.navigate("/extensions/detail/alpha").await;

    rx.changed().await.unwrap();
    let state = rx.borrow_and_update().clone();
    assert!(state.is_settled());
    assert_eq!(state.navigation(), Some(1));
}

#[tokio::test]
async fn test_slow_older_navigation_does_not_override_newer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalogs::alpha_beta())
                .set_delay(Duration::from_millis(500)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogs::alpha_beta()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));
    let resolver = Arc::new(resolver_for(&config));

    let first = {
        let resolver = Arc::clone(&resolver);
        tokio::spawn(async move { resolver.navigate("/extensions/detail/alpha").await })
    };

    // The first navigation's request is in flight before the second starts
    while server.received_requests().await.unwrap_or_default().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = resolver.navigate("/extensions/detail/beta").await;
    let first = first.await.unwrap();

    assert!(matches!(second, NavigationOutcome::Applied(_)));
    assert_eq!(first, NavigationOutcome::Superseded { navigation: 1 });
    match resolver.state() {
        ResolverState::Found { descriptor, navigation } => {
            assert_eq!(navigation, 2);
            assert_eq!(descriptor.id, "beta");
        }
        other => panic!("expected Found for beta, got {:?}", other),
    }
}

#[test]
fn test_default_layout_detail_forms() {
    let layout = RouteLayout::default();
    assert_eq!(layout.detail_path("alpha"), "/extensions/detail/alpha");
    assert_eq!(layout.detail_query_path("alpha"), "/extensions/detail?id=alpha");
}
