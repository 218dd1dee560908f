//! Integration tests for loading the location list over HTTP.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test.

use pretty_assertions::assert_eq;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bonqr::{LocationRegistry, error::LoadError, locations::LocationSource};

const BODY: &str = r#"[
    {"name": "Main Street", "bon": "123", "operator": "456", "maps": "https://maps.example/main"}
]"#;

#[tokio::test]
async fn test_loads_from_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
        .mount(&server)
        .await;

    let source = LocationSource::parse(&format!("{}/locations.json", server.uri()));
    let registry = LocationRegistry::load(&source).await.unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.find("Main Street").unwrap().operator, "456");
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = LocationSource::parse(&format!("{}/locations.json", server.uri()));
    let err = LocationRegistry::load(&source).await.unwrap_err();

    assert!(matches!(err, LoadError::Status { status: 404 }));
    assert_eq!(err.to_string(), "failed to load locations (404)");
}

#[tokio::test]
async fn test_malformed_body_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let source = LocationSource::parse(&server.uri());
    let (registry, err) = LocationRegistry::load_or_empty(&source).await;

    assert!(registry.is_empty());
    assert!(matches!(err, Some(LoadError::Malformed(_))));
}

#[tokio::test]
async fn test_unreachable_url() {
    // Port 9 (discard) on localhost is not expected to accept HTTP
    let source = LocationSource::parse("http://127.0.0.1:9/locations.json");
    let err = LocationRegistry::load(&source).await.unwrap_err();
    assert!(matches!(err, LoadError::Unreachable { .. }));
}

#[tokio::test]
async fn test_loads_from_file() {
    let dir = std::env::temp_dir().join(format!("bonqr-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let file_path = dir.join("locations.json");
    std::fs::File::create(&file_path)
        .unwrap()
        .write_all(BODY.as_bytes())
        .unwrap();

    let source = LocationSource::parse(file_path.to_str().unwrap());
    let registry = LocationRegistry::load(&source).await.unwrap();
    assert_eq!(registry.first().unwrap().name, "Main Street");

    std::fs::remove_dir_all(&dir).unwrap();
}
