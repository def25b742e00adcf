//! Remote fetch behavior against a mock catalog endpoint

use extcat_core::{CatalogError, CatalogFetcher, CatalogSource};
use pretty_assertions::assert_eq;
use tests::{catalogs, config_for, init_test_tracing, write_local_snapshot};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog_url(server: &MockServer) -> String {
    format!("{}/servers.json", server.uri())
}

#[tokio::test]
async fn test_fetch_remote_success() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogs::alpha_beta()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &catalog_url(&server));
    let raw = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap();

    assert_eq!(raw.entries.len(), 2);
    assert_eq!(raw.entries[0]["name"], "Alpha");
    assert_eq!(
        raw.source,
        CatalogSource::Remote {
            url: catalog_url(&server)
        }
    );
}

#[tokio::test]
async fn test_empty_array_is_a_valid_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &catalog_url(&server));
    let raw = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap();

    assert!(raw.entries.is_empty());
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogs::alpha_beta()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &catalog_url(&server));
    let raw = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap();

    assert_eq!(raw.entries.len(), 2);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), &catalog_url(&server));
    config.fetch.attempts = 3;

    let err = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap_err();
    match err {
        CatalogError::Fetch { origin, message } => {
            assert_eq!(origin, catalog_url(&server));
            assert!(message.contains("after 3 attempts"), "message: {}", message);
        }
        other => panic!("expected Fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &catalog_url(&server));
    let err = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap_err();

    assert_eq!(err.kind(), "fetch");
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_non_array_body_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"servers": []})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &catalog_url(&server));
    let err = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap_err();

    assert!(matches!(err, CatalogError::Fetch { .. }));
}

#[tokio::test]
async fn test_invalid_json_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &catalog_url(&server));
    let err = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap_err();

    assert!(matches!(err, CatalogError::Fetch { .. }));
}

#[tokio::test]
async fn test_local_snapshot_preferred_over_remote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogs::numbered(5)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), &catalog_url(&server));
    config.fetch.prefer_local = true;
    write_local_snapshot(&config, &catalogs::alpha_beta());

    let raw = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap();

    assert_eq!(raw.entries.len(), 2);
    assert!(matches!(raw.source, CatalogSource::LocalSnapshot { .. }));
}

#[tokio::test]
async fn test_missing_local_snapshot_falls_through_to_remote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogs::numbered(3)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), &catalog_url(&server));
    config.fetch.prefer_local = true;

    let raw = CatalogFetcher::new(&config).unwrap().fetch().await.unwrap();

    assert_eq!(raw.entries.len(), 3);
    assert!(matches!(raw.source, CatalogSource::Remote { .. }));
}
