//! Builds that must abort without partial output

use extcat_core::{CatalogError, SiteBuilder};
use serde_json::json;
use tests::{config_for, file_names};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn build_with(body: serde_json::Value) -> (tempfile::TempDir, extcat_core::SiteConfig, CatalogError) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));
    let err = SiteBuilder::new(config.clone())
        .unwrap()
        .build()
        .await
        .unwrap_err();
    (dir, config, err)
}

#[tokio::test]
async fn test_missing_required_field_aborts_build() {
    let (_dir, config, err) = build_with(json!([
        {"name": "Alpha", "description": "A", "link": "https://x/a"},
        {"name": "Broken", "description": "no link"}
    ]))
    .await;

    match err {
        CatalogError::Schema { location, message } => {
            assert_eq!(location, "entry #1");
            assert!(message.contains("link"), "message: {}", message);
        }
        other => panic!("expected Schema error, got {:?}", other),
    }
    assert!(file_names(&config.detail_out_dir()).is_empty());
    assert!(!config.out_dir.join("routes.json").exists());
}

#[tokio::test]
async fn test_duplicate_id_aborts_build() {
    let (_dir, config, err) = build_with(json!([
        {"name": "GitHub", "description": "A", "link": "https://x/a"},
        {"name": "github", "description": "B", "link": "https://x/b"}
    ]))
    .await;

    match err {
        CatalogError::DuplicateId { id, first, second } => {
            assert_eq!(id, "github");
            assert_eq!((first, second), (0, 1));
        }
        other => panic!("expected DuplicateId, got {:?}", other),
    }
    assert!(file_names(&config.detail_out_dir()).is_empty());
}

#[tokio::test]
async fn test_unreachable_catalog_aborts_build() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), "http://127.0.0.1:9/servers.json");
    config.fetch.attempts = 1;

    let err = SiteBuilder::new(config.clone())
        .unwrap()
        .build()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "fetch");
    assert!(!config.out_dir.exists());
}

#[tokio::test]
async fn test_unwritable_output_is_io_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tests::catalogs::alpha_beta()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));
    // A regular file where the output directory should be
    std::fs::write(&config.out_dir, b"not a directory").unwrap();

    let err = SiteBuilder::new(config).unwrap().build().await.unwrap_err();

    assert!(matches!(err, CatalogError::Io { .. }));
}
