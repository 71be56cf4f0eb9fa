//! `HttpTransport` against a one-shot HTTP server on a local socket.

use resource_store::transport::{JSON_API, JSON_API_ATOMIC};
use resource_store::{
    AtomicRequest, HttpTransport, Operation, Query, ResourceKey, StoreActor, StoreClient,
    StoreError, Transport,
};
use serde_json::{json, Map};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

resource_store::resource_model! {
    pub struct Modem: "modems" {
        attributes {
            uuid: String => "uuid",
            name: String => "name",
        }
        has_one {}
        has_many {}
    }
}

/// Accepts one connection, answers with `response` and yields the raw request.
async fn serve_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/v1/", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&raw[..end]).to_lowercase();
                if raw.len() >= end + 4 + content_length(&head) {
                    break;
                }
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (base_url, handle)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

fn reply(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn store(base_url: &str) -> StoreClient {
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(base_url));
    let (actor, store) = StoreActor::new(16, transport);
    tokio::spawn(actor.run());
    store
}

fn save_request() -> AtomicRequest {
    let mut attributes = Map::new();
    attributes.insert("name".into(), json!("X65"));
    AtomicRequest::new(vec![Operation::update("modems", "1", attributes)])
}

#[tokio::test]
async fn find_encodes_query_under_base_path() {
    let body = json!({
        "data": [{ "type": "modems", "id": "1", "attributes": { "uuid": "m-1", "name": "X55" } }]
    })
    .to_string();
    let (base_url, server) = serve_once(reply("200 OK", JSON_API, &body)).await;
    let store = store(&base_url);

    let query = Query::new()
        .filter("uuid", "m-1")
        .limit(1)
        .include(["combos", "combos.lteComponents"]);
    let modems = store.find::<Modem>(&query, None).await.unwrap();

    assert_eq!(modems.len(), 1);
    assert_eq!(modems[0].name().await.unwrap().as_deref(), Some("X55"));

    let raw = server.await.unwrap();
    let request_line = raw.lines().next().unwrap();
    assert!(request_line.starts_with("GET /v1/modems?"), "{request_line}");
    assert!(request_line.contains("filter%5Buuid%5D=m-1"), "{request_line}");
    assert!(request_line.contains("page%5Blimit%5D=1"), "{request_line}");
    assert!(
        request_line.contains("include=combos%2Ccombos.lteComponents"),
        "{request_line}"
    );
    assert!(raw.to_lowercase().contains(&format!("accept: {JSON_API}")));
}

#[tokio::test]
async fn atomic_post_forwards_headers_and_body() {
    let body = json!({
        "atomic:results": [{
            "data": { "type": "modems", "id": "1", "attributes": { "uuid": "m-1", "name": "X65" } }
        }]
    })
    .to_string();
    let (base_url, server) = serve_once(reply("200 OK", JSON_API_ATOMIC, &body)).await;
    let store = store(&base_url);

    let keys = store.submit_atomic(&save_request(), "secret").await.unwrap();

    assert_eq!(keys, vec![ResourceKey::new("modems", "1")]);
    let raw = server.await.unwrap();
    let lower = raw.to_lowercase();
    assert!(raw.starts_with("POST /v1/operations HTTP/1.1"), "{raw}");
    assert!(lower.contains("x-auth-token: secret"));
    assert!(lower.contains(&format!("content-type: {}", JSON_API_ATOMIC.to_lowercase())));
    assert!(lower.contains(&format!("accept: {}", JSON_API_ATOMIC.to_lowercase())));
    assert!(raw.contains(r#""atomic:operations""#));
}

#[tokio::test]
async fn no_content_merges_nothing() {
    let (base_url, server) =
        serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string()).await;
    let store = store(&base_url);

    let keys = store.submit_atomic(&save_request(), "secret").await.unwrap();

    assert!(keys.is_empty());
    assert_eq!(store.len().await.unwrap(), 0);
    server.await.unwrap();
}

#[tokio::test]
async fn plain_text_rejection_keeps_status() {
    let (base_url, server) = serve_once(reply("403 Forbidden", "text/plain", "Forbidden")).await;
    let store = store(&base_url);

    let result = store.submit_atomic(&save_request(), "secret").await;

    assert!(matches!(result, Err(StoreError::Status(403))), "{result:?}");
    assert_eq!(store.len().await.unwrap(), 0);
    server.await.unwrap();
}

#[tokio::test]
async fn html_not_found_on_read_keeps_status() {
    let (base_url, server) =
        serve_once(reply("404 Not Found", "text/html", "<html>Not Found</html>")).await;
    let store = store(&base_url);

    let result = store.find::<Modem>(&Query::new(), None).await;

    assert!(matches!(result, Err(StoreError::Status(404))), "{result:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn malformed_success_body_is_a_transport_error() {
    let (base_url, server) = serve_once(reply("200 OK", "text/plain", "not json")).await;
    let store = store(&base_url);

    let result = store.find::<Modem>(&Query::new(), None).await;

    assert!(matches!(result, Err(StoreError::Transport(_))), "{result:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn direct_send_joins_paths_without_double_slash() {
    let (base_url, server) = serve_once(reply("404 Not Found", "text/plain", "nope")).await;
    let transport = HttpTransport::new(base_url);

    let response = transport
        .send(resource_store::ApiRequest::get("/devices"))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, None);
    let raw = server.await.unwrap();
    assert!(raw.starts_with("GET /v1/devices HTTP/1.1"), "{raw}");
}
