//! Integration tests using wiremock to simulate the bookshelf backend.

use bookshelf_client::metadata::RequestMetadata;
use bookshelf_client::{Client, Error, Resource};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client_for(mock_server: &MockServer) -> Client {
    init_tracing();
    Client::builder()
        .base_url(format!("{}/api", mock_server.uri()))
        .unwrap()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_get_book_returns_payload_unchanged() {
    let mock_server = MockServer::start().await;
    let book = json!({"id": "42", "title": "Dune"});

    Mock::given(method("GET"))
        .and(path("/api/books/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&book))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.books().get("42").await.unwrap();

    assert_eq!(response.data, book);
    assert_eq!(response.status.as_u16(), 200);
}

#[tokio::test]
async fn test_create_category_posts_exact_record() {
    let mock_server = MockServer::start().await;
    let created = json!({"id": "7", "title": "New"});

    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .and(body_json(json!({"title": "New"})))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .categories()
        .create(&json!({"title": "New"}))
        .await
        .unwrap();

    assert_eq!(response.data, created);
    assert_eq!(response.status.as_u16(), 201);
}

#[tokio::test]
async fn test_delete_author_sends_no_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/authors/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.authors().delete("3").await.unwrap();

    assert_eq!(response.status.as_u16(), 204);
    assert!(response.raw_body.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_delete_accepts_non_json_acknowledgement() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/books/9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Deleted"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.books().delete(9).await.unwrap();

    assert_eq!(response.raw_body, "Deleted");
}

#[tokio::test]
async fn test_update_puts_record_to_member_path() {
    let mock_server = MockServer::start().await;
    let record = json!({"name": "Ursula K. Le Guin", "nationality": "US"});

    Mock::given(method("PUT"))
        .and(path("/api/authors/12"))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12,
            "name": "Ursula K. Le Guin",
            "nationality": "US"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.authors().update(12, &record).await.unwrap();

    assert_eq!(response.data["id"], 12);
}

#[tokio::test]
async fn test_list_every_collection() {
    let mock_server = MockServer::start().await;

    for (collection, payload) in [
        ("/api/books", json!([{"id": 1, "title": "Dune"}])),
        ("/api/authors", json!([{"id": 2, "name": "Herbert"}])),
        ("/api/categories", json!({"results": [], "count": 0})),
    ] {
        Mock::given(method("GET"))
            .and(path(collection))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let (books, authors, categories) = (client.books(), client.authors(), client.categories());
    let (books, authors, categories) =
        tokio::join!(books.list(), authors.list(), categories.list());

    assert_eq!(books.unwrap().data[0]["title"], "Dune");
    assert_eq!(authors.unwrap().data[0]["name"], "Herbert");
    // Collection payloads are passed through whatever their shape.
    assert_eq!(categories.unwrap().data["count"], 0);
}

#[tokio::test]
async fn test_list_nationalities() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/authors/nationalities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["AR", "ES", "US"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.authors().list_nationalities().await.unwrap();

    assert_eq!(response.data, json!(["AR", "ES", "US"]));
}

#[tokio::test]
async fn test_get_missing_record_is_http_status_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.books().get(404).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert_eq!(err.body(), Some("Not found"));
    assert!(err.is_not_found());
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.books().create(&json!({"title": "X"})).await;

    match result {
        Err(Error::HttpStatus { status, body, .. }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        _ => panic!("Expected HttpStatus, got {:?}", result),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    init_tracing();
    // Nothing listens on port 1.
    let client = Client::builder()
        .base_url("http://127.0.0.1:1/api")
        .unwrap()
        .build()
        .unwrap();

    let err = client.books().list().await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
    assert!(err.is_transport());
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_invalid_json_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/categories/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.categories().get(1).await;

    match result {
        Err(Error::Deserialization { status, body, .. }) => {
            assert_eq!(status.as_u16(), 200);
            assert_eq!(body, "invalid json");
        }
        _ => panic!("Expected Deserialization, got {:?}", result),
    }
}

#[tokio::test]
async fn test_id_is_percent_encoded_as_one_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/books/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a/b"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.books().get("a/b").await.unwrap();

    assert_eq!(response.data["id"], "a/b");
}

#[tokio::test]
async fn test_dot_ids_never_reach_the_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let books = client.books();

    for id in ["..", ".", ""] {
        let err = books.delete(id).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "got {:?}", err);

        let err = books.get(id).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "got {:?}", err);

        let err = books.update(id, &json!({"title": "X"})).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "got {:?}", err);
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_generic_verbs() {
    let mock_server = MockServer::start().await;
    let stats = json!({"books": 3});

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&stats))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/stats/rebuild"))
        .and(body_json(json!({"full": true})))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"queued": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/settings/theme"))
        .and(body_json(json!("dark")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("dark")))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/settings/theme"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let response = client.get::<serde_json::Value>("/stats").await.unwrap();
    assert_eq!(response.data, stats);

    let response = client
        .post::<_, serde_json::Value>("/stats/rebuild", &json!({"full": true}))
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 202);
    assert_eq!(response.data["queued"], true);

    let response = client
        .put::<_, String>("settings/theme", "dark")
        .await
        .unwrap();
    assert_eq!(response.data, "dark");

    // An empty 204 body decodes as `()`.
    let response = client.delete::<()>("/settings/theme").await.unwrap();
    assert_eq!(response.status.as_u16(), 204);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    assert!(requests[3].body.is_empty());
}

#[tokio::test]
async fn test_per_request_header_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/books/1"))
        .and(header("content-type", "application/merge-patch+json"))
        .and(header("x-request-id", "abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "title": "Dune"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let metadata = RequestMetadata::new(Method::PUT, "/books")
        .segment(1)
        .with_header("Content-Type", "application/merge-patch+json")
        .unwrap()
        .with_header("X-Request-Id", "abc-123")
        .unwrap();

    let response = client
        .call::<_, serde_json::Value>(metadata, Some(&json!({"title": "Dune"})))
        .await
        .unwrap();
    assert_eq!(response.data["title"], "Dune");

    let requests = mock_server.received_requests().await.unwrap();
    let content_types: Vec<_> = requests[0]
        .headers
        .get_all("content-type")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(content_types, vec!["application/merge-patch+json"]);
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/books"))
        .and(header("content-type", "application/json"))
        .and(header("accept-language", "es"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    init_tracing();
    // Header set before the base URL still applies.
    let client = Client::builder()
        .default_header("Accept-Language", "es")
        .unwrap()
        .base_url(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();

    let response = client.books().list().await.unwrap();
    assert_eq!(response.data, json!([]));
}

#[tokio::test]
async fn test_typed_custom_resource() {
    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Publisher {
        id: Option<u32>,
        name: String,
    }

    struct Publishers;

    impl Resource for Publishers {
        const COLLECTION: &'static str = "publishers";
        type Record = Publisher;
        type Collection = Vec<Publisher>;
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/publishers"))
        .and(body_json(json!({"id": null, "name": "Ace"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5, "name": "Ace"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/publishers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 5, "name": "Ace"}])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let publishers = client.resource::<Publishers>();

    let created = publishers
        .create(&Publisher {
            id: None,
            name: "Ace".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(created.data.id, Some(5));

    let listed = publishers.list().await.unwrap();
    assert_eq!(listed.data, vec![created.into_data()]);
}

#[tokio::test]
async fn test_clones_share_configuration() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    let clone = client.clone();

    assert_eq!(client.config().base_url(), clone.config().base_url());
    assert_eq!(clone.config().base_url().path(), "/api");
}

#[test]
fn test_build_without_base_url_fails() {
    let result = Client::builder().build();
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_invalid_default_header_fails() {
    let result = Client::builder().default_header("bad header", "x");
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_base_url_from_env() {
    let var = "BOOKSHELF_CLIENT_IT_BASE_URL";
    std::env::set_var(var, "http://127.0.0.1:8001/api");

    let client = Client::builder()
        .base_url_from_env(var)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(client.config().base_url().port(), Some(8001));

    assert!(matches!(
        Client::builder().base_url_from_env("BOOKSHELF_CLIENT_IT_MISSING"),
        Err(Error::Configuration(_))
    ));
}
