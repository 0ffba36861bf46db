//! End-to-end tests of the `reqwest` transport against a mock HTTP server.
//!
//! The client is blocking, so every client call runs on a blocking thread
//! while the mock server lives on the test runtime.

use contentful_management::{
    ApiErrorKind, Client, ClientError, Configuration, ResponseObject, TransportError,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn configuration(server: &MockServer) -> Configuration {
    Configuration {
        secure: false,
        api_url: server.address().to_string(),
        ..Configuration::default()
    }
}

async fn run_blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_space_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1"))
        .and(header("authorization", "Bearer secret"))
        .and(header(
            "content-type",
            "application/vnd.contentful.management.v1+json",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": {"type": "Space", "id": "space1", "version": 2},
            "name": "Blog"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let configuration = configuration(&server);
    let response = run_blocking(move || {
        let client = Client::new("secret", configuration)?;
        client.spaces().find("space1")
    })
    .await
    .unwrap();

    let resource = response.resource().unwrap();
    assert_eq!(resource.id(), Some("space1"));
    assert_eq!(resource.version(), Some(2));
    assert_eq!(resource.attribute("name"), Some(&json!("Blog")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_entry_sends_body_and_content_type_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/spaces/space1/entries"))
        .and(header("x-contentful-content-type", "post"))
        .and(body_json(json!({"fields": {"title": {"en-US": "Hello"}}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sys": {"type": "Entry", "id": "e1", "version": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let configuration = configuration(&server);
    let response = run_blocking(move || {
        let client = Client::new("secret", configuration)?;
        client
            .entries("space1")
            .create("post", json!({"title": {"en-US": "Hello"}}))
    })
    .await
    .unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.resource().unwrap().id(), Some("e1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_publish_sends_version_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/spaces/space1/entries/e1/published"))
        .and(header("x-contentful-version", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": {"type": "Entry", "id": "e1", "version": 8, "publishedVersion": 7}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let configuration = configuration(&server);
    let response = run_blocking(move || {
        let client = Client::new("secret", configuration)?;
        client.entries("space1").publish("e1", 7)
    })
    .await
    .unwrap();

    let resource = response.resource().unwrap();
    assert_eq!(resource.sys.published_version, Some(7));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_status_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/entries/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "sys": {"type": "Error", "id": "NotFound"},
            "message": "The resource could not be found.",
            "requestId": "abc"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/entries/busy"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let configuration = configuration(&server);
    let (missing, busy) = run_blocking(move || {
        let client = Client::new("secret", configuration)?;
        let entries = client.entries("space1");
        Ok::<_, ClientError>((entries.find("missing")?, entries.find("busy")?))
    })
    .await
    .unwrap();

    let error = missing.error().unwrap();
    assert_eq!(error.kind, ApiErrorKind::NotFound);
    assert_eq!(error.request_id.as_deref(), Some("abc"));

    let ResponseObject::Error(error) = busy.object else {
        panic!("expected an error object");
    };
    assert_eq!(error.kind, ApiErrorKind::ServiceUnavailable);
    assert_eq!(error.message, "upstream unavailable");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_preload_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": {"type": "Space", "id": "space1"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1/content_types"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": {"type": "Array"},
            "total": 1,
            "skip": 0,
            "limit": 1000,
            "items": [{
                "sys": {"type": "ContentType", "id": "post"},
                "name": "Post",
                "displayField": "title",
                "fields": [{"id": "title", "name": "Title", "type": "Symbol", "required": true}]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let configuration = Configuration {
        dynamic_entries: vec!["space1".to_string()],
        ..configuration(&server)
    };
    let keys = run_blocking(move || {
        let client = Client::new("secret", configuration)?;
        Ok::<_, ClientError>(client.dynamic_entry_keys())
    })
    .await
    .unwrap();

    assert_eq!(keys, vec!["post".to_string()]);
}

async fn accept_encoding_on_wire(gzip_encoded: bool) -> Option<String> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaces/space1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sys": {"type": "Space", "id": "space1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let configuration = Configuration {
        gzip_encoded,
        ..configuration(&server)
    };
    run_blocking(move || {
        let client = Client::new("secret", configuration)?;
        client.spaces().find("space1")
    })
    .await
    .unwrap();

    let received = server.received_requests().await.unwrap();
    received[0]
        .headers
        .get("accept-encoding")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_accept_encoding_follows_gzip_setting() {
    assert_eq!(accept_encoding_on_wire(true).await.as_deref(), Some("gzip"));
    assert_eq!(accept_encoding_on_wire(false).await, None);
}

#[test]
fn test_unreachable_host_is_a_transport_error() {
    let configuration = Configuration {
        secure: false,
        api_url: "127.0.0.1:1".to_string(),
        ..Configuration::default()
    };
    let client = Client::new("secret", configuration).unwrap();

    let result = client.spaces().all();
    assert!(matches!(
        result,
        Err(ClientError::Transport(TransportError::HttpError(_)))
    ));
}
