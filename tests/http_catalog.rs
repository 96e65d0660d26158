use medi_search::api::client::HttpCatalog;
use medi_search::api::{Catalog, LookupError};
use medi_search::config::ClientConfig;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog_for(server: &MockServer) -> HttpCatalog {
    let config = ClientConfig {
        http_timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    }
    .with_api_base(server.uri());
    HttpCatalog::new(config).expect("client")
}

#[tokio::test]
async fn lookup_sends_query_and_limit_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "para cet"))
        .and(query_param("limit", "8"))
        .and(header("cache-control", "no-store"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "para cet",
            "hits": [
                {"id": 1, "brand_name": "Paracip", "manufacturer": "Cipla", "mrp_inr": 12.5, "salt_signature": "PCM500"},
                {"brand_name": "Calpol", "salts": ["Paracetamol"]},
                {"brand_name": "Dolo 650", "salt_signature": ""}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = catalog_for(&server)
        .lookup("para cet", 8)
        .await
        .expect("lookup");
    let names: Vec<_> = hits.iter().map(|c| c.display_name.as_str()).collect();
    assert_eq!(names, vec!["Paracip", "Calpol", "Dolo 650"]);
    assert_eq!(hits[0].usable_signature(), Some("PCM500"));
    assert_eq!(hits[0].organization.as_deref(), Some("Cipla"));
    assert_eq!(hits[1].aux_tags, vec!["Paracetamol"]);
    assert_eq!(hits[2].usable_signature(), None);
}

#[tokio::test]
async fn non_success_status_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = catalog_for(&server)
        .lookup("dolo", 8)
        .await
        .expect_err("503 should fail");
    assert!(matches!(err, LookupError::Status { status: 503, .. }), "{err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = catalog_for(&server)
        .lookup("dolo", 8)
        .await
        .expect_err("html should fail");
    assert!(matches!(err, LookupError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn resolve_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(path("/resolve"))
        .and(query_param("name", "Paracetamol"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"brand_name": "Paracetamol", "salt_signature": "SIG999"}
        ])))
        .mount(&server)
        .await;

    let hit = catalog_for(&server)
        .resolve_signature("Paracetamol")
        .await
        .expect("resolve")
        .expect("match");
    assert_eq!(hit.usable_signature(), Some("SIG999"));
}

#[tokio::test]
async fn resolve_accepts_wrapped_items() {
    let server = MockServer::start().await;
    Mock::given(path("/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"brand_name": "Crocin", "salt_signature": "SIG123"}]
        })))
        .mount(&server)
        .await;

    let hit = catalog_for(&server)
        .resolve_signature("Crocin")
        .await
        .expect("resolve")
        .expect("match");
    assert_eq!(hit.display_name, "Crocin");
    assert_eq!(hit.usable_signature(), Some("SIG123"));
}

#[tokio::test]
async fn resolve_with_no_items_is_none() {
    let server = MockServer::start().await;
    Mock::given(path("/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let hit = catalog_for(&server)
        .resolve_signature("Nothing")
        .await
        .expect("resolve");
    assert!(hit.is_none());
}

#[tokio::test]
async fn resolve_decodes_backend_matches_body() {
    let server = MockServer::start().await;
    Mock::given(path("/resolve"))
        .and(query_param("name", "Crocin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{
                "id": 1,
                "brand_name": "Crocin",
                "salt_signature": "SIG1",
                "discontinued": false,
                "salts": [{"salt_pos": 1, "salt_name": "Paracetamol"}]
            }]
        })))
        .mount(&server)
        .await;

    let hit = catalog_for(&server)
        .resolve_signature("Crocin")
        .await
        .expect("resolve")
        .expect("match");
    assert_eq!(hit.usable_signature(), Some("SIG1"));
    assert_eq!(hit.aux_tags, vec!["Paracetamol"]);
}

#[tokio::test]
async fn resolve_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(path("/resolve"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "No brand found"})),
        )
        .mount(&server)
        .await;

    let hit = catalog_for(&server)
        .resolve_signature("Nothing")
        .await
        .expect("404 is a miss, not an error");
    assert!(hit.is_none());
}

#[tokio::test]
async fn lookup_not_found_is_still_an_error() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = catalog_for(&server)
        .lookup("dolo", 8)
        .await
        .expect_err("404 on search should fail");
    assert!(matches!(err, LookupError::Status { status: 404, .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let config = ClientConfig {
        http_timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    }
    .with_api_base("http://127.0.0.1:1");
    let err = HttpCatalog::new(config)
        .expect("client")
        .lookup("dolo", 8)
        .await
        .expect_err("nothing listens on port 1");
    assert!(matches!(err, LookupError::Transport { .. }), "{err:?}");
}
