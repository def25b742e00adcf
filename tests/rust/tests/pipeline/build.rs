//! Successful builds and their outputs

use extcat_core::{RouteManifest, SiteBuilder};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tests::{catalogs, config_for, file_names, write_local_snapshot};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

async fn serve(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/servers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_build_alpha_beta() {
    let server = serve(catalogs::alpha_beta()).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));

    let report = SiteBuilder::new(config.clone()).unwrap().build().await.unwrap();

    assert_eq!(report.descriptors, 2);
    assert_eq!(report.detail_routes, 2);
    assert_eq!(report.listing_routes, 1);
    assert_eq!(report.files_written, 2);
    assert_eq!(
        file_names(&config.detail_out_dir()),
        vec!["alpha.json".to_string(), "beta.json".to_string()]
    );

    let manifest: RouteManifest = serde_json::from_value(read_json(&report.manifest_file)).unwrap();
    let paths: Vec<&str> = manifest.routes.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/extensions",
            "/extensions/detail/alpha",
            "/extensions/detail/beta"
        ]
    );
}

#[tokio::test]
async fn test_exported_files_carry_defaults() {
    let server = serve(catalogs::alpha_beta()).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));

    SiteBuilder::new(config.clone()).unwrap().build().await.unwrap();

    let beta = read_json(&config.detail_out_dir().join("beta.json"));
    assert_eq!(
        beta,
        json!({
            "id": "beta",
            "name": "Beta",
            "description": "Builtin extension",
            "command": null,
            "is_builtin": true,
            "link": "https://github.com/example/beta",
            "githubStars": 0,
            "installation_notes": null,
            "environmentVariables": []
        })
    );

    let alpha = read_json(&config.detail_out_dir().join("alpha.json"));
    assert_eq!(alpha["command"], "npx alpha-mcp");
    assert_eq!(alpha["githubStars"], 120);
    assert_eq!(alpha["environmentVariables"][0]["name"], "ALPHA_TOKEN");
    assert_eq!(alpha["environmentVariables"][0]["required"], true);
}

#[tokio::test]
async fn test_listing_file_in_catalog_order() {
    let server = serve(catalogs::alpha_beta()).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));

    let report = SiteBuilder::new(config.clone()).unwrap().build().await.unwrap();

    assert_eq!(report.listing_file, config.out_dir.join("extensions.json"));
    let listing = read_json(&report.listing_file);
    let ids: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn test_empty_catalog_builds_listing_only() {
    let server = serve(json!([])).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));

    let report = SiteBuilder::new(config.clone()).unwrap().build().await.unwrap();

    assert_eq!(report.descriptors, 0);
    assert_eq!(report.detail_routes, 0);
    assert_eq!(report.listing_routes, 1);
    assert_eq!(report.files_written, 0);
    assert!(file_names(&config.detail_out_dir()).is_empty());
    assert_eq!(std::fs::read(&report.listing_file).unwrap(), b"[]\n");
}

#[tokio::test]
async fn test_rebuild_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), "http://127.0.0.1:9/servers.json");
    config.fetch.prefer_local = true;
    write_local_snapshot(&config, &catalogs::numbered(40));

    let builder = SiteBuilder::new(config.clone()).unwrap();
    builder.build().await.unwrap();
    let first: Vec<Vec<u8>> = file_names(&config.detail_out_dir())
        .iter()
        .map(|name| std::fs::read(config.detail_out_dir().join(name)).unwrap())
        .collect();
    let first_manifest = std::fs::read(config.out_dir.join("routes.json")).unwrap();

    let report = builder.build().await.unwrap();
    let second: Vec<Vec<u8>> = file_names(&config.detail_out_dir())
        .iter()
        .map(|name| std::fs::read(config.detail_out_dir().join(name)).unwrap())
        .collect();

    assert_eq!(report.files_written, 40);
    assert_eq!(report.stale_removed, 0);
    assert_eq!(first, second);
    assert_eq!(
        first_manifest,
        std::fs::read(config.out_dir.join("routes.json")).unwrap()
    );
}

#[tokio::test]
async fn test_custom_route_base() {
    let server = serve(catalogs::alpha_beta()).await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path(), &format!("{}/servers.json", server.uri()));
    config.route_base = "/docs/extensions/".to_string();

    let report = SiteBuilder::new(config.clone()).unwrap().build().await.unwrap();

    assert_eq!(
        config.detail_out_dir(),
        config.out_dir.join("docs/extensions/detail")
    );
    assert!(config.detail_out_dir().join("alpha.json").exists());
    assert_eq!(
        report.listing_file,
        config.out_dir.join("docs/extensions.json")
    );
}
