//! MusicBrainz client tests against a mock server
//!
//! Request shape (query, fmt, limit, User-Agent), response mapping, and
//! failures downgraded to an empty candidate list.

use serde_json::json;
use tunemeta_common::config::CatalogConfig;
use tunemeta_svc::models::{Release, Tag};
use tunemeta_svc::services::{CatalogError, CatalogGateway, MusicBrainzClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> MusicBrainzClient {
    let config = CatalogConfig {
        base_url: format!("{}/ws/2/recording", server.uri()),
        user_agent: "tunemeta-test/1.0".to_string(),
        requests_per_second: 100,
        timeout_secs: 5,
    };
    MusicBrainzClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_search_request_shape_and_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ws/2/recording"))
        .and(query_param("query", r#"recording:"Lithium" AND artist:"Nirvana""#))
        .and(query_param("fmt", "json"))
        .and(query_param("limit", "20"))
        .and(header("user-agent", "tunemeta-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": "2024-01-01T00:00:00.000Z",
            "count": 1,
            "recordings": [{
                "id": "rec-1",
                "title": "Lithium",
                "length": 257000,
                "tags": [{ "count": 2, "name": "grunge" }],
                "releases": [
                    { "id": "rel-1", "title": "Nevermind", "date": "1991-09-24" },
                    { "id": "rel-2", "title": "Live at Reading" }
                ]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let candidates = client_for(&server).search("Lithium", "Nirvana").await;

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].duration_ms, Some(257_000));
    assert_eq!(candidates[0].tags, vec![Tag::new("grunge")]);
    assert_eq!(candidates[0].releases[0], Release::new("Nevermind", "1991-09-24"));
    assert_eq!(candidates[0].releases[1].date, None);
}

#[tokio::test]
async fn test_quotes_in_input_are_escaped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("query", r#"recording:"Say \"Hi\"" AND artist:"A&B""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "recordings": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let candidates = client_for(&server).search(r#"Say "Hi""#, "A&B").await;
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn test_server_error_becomes_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let direct = client.search_recordings("Lithium", "Nirvana").await;
    assert!(matches!(direct, Err(CatalogError::ApiError(503, _))));

    assert!(client.search("Lithium", "Nirvana").await.is_empty());
}

#[tokio::test]
async fn test_malformed_payload_becomes_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let direct = client.search_recordings("Lithium", "Nirvana").await;
    assert!(matches!(direct, Err(CatalogError::ParseError(_))));

    assert!(client.search("Lithium", "Nirvana").await.is_empty());
}

#[tokio::test]
async fn test_missing_recordings_field_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0 })))
        .mount(&server)
        .await;

    assert!(client_for(&server).search("Lithium", "Nirvana").await.is_empty());
}

#[tokio::test]
async fn test_unreachable_catalog_becomes_empty() {
    let config = CatalogConfig {
        // Reserved port, nothing listens there
        base_url: "http://127.0.0.1:9/ws/2/recording".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let client = MusicBrainzClient::new(&config).unwrap();

    assert!(client.search("Lithium", "Nirvana").await.is_empty());
}
