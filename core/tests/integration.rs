//! Every client entry point against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Lambdog` through
//! `UreqTransport` over real HTTP. The `echo` function reflects the request
//! back, so assertions cover what actually went over the wire.

use futures::executor::block_on;
use lambdog::{Lambdog, LambdogError, RequestOptions, UreqTransport};
use mock_server::Echo;
use serde_json::{json, Value};

fn start_server() -> Lambdog {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    Lambdog::new(UreqTransport::new(&format!("http://{addr}")))
}

fn echo(data: Value) -> Echo {
    serde_json::from_value(data).unwrap()
}

#[test]
fn function_lifecycle() {
    let client = start_server();

    // Step 1: bare invoke returns the full envelope.
    let envelope = block_on(client.invoke("echo", RequestOptions::new())).unwrap();
    assert_eq!(envelope.status, 200);
    assert_eq!(envelope.status_text, "OK");
    assert_eq!(envelope.headers.get("content-type"), Some("application/json"));
    let seen: Echo = envelope.json().unwrap();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, "/.netlify/functions/echo");

    // Step 2: get fills placeholders and appends the query.
    let options = RequestOptions::new().param("q", "a&b").param("id", "user 1");
    let seen = echo(block_on(client.get("echo/:id", options)).unwrap());
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, "/.netlify/functions/echo/user%201");
    assert_eq!(seen.query.as_deref(), Some("q=a%26b"));

    // Step 3: post sends JSON.
    let seen = echo(block_on(client.post("echo", &json!({ "title": "Buy milk" }), RequestOptions::new())).unwrap());
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(body, json!({ "title": "Buy milk" }));

    // Step 4: put and patch hit placeholder paths.
    let options = RequestOptions::new().param("id", 7);
    let seen = echo(block_on(client.put("echo/todos/:id", &json!({ "done": true }), options.clone())).unwrap());
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.path, "/.netlify/functions/echo/todos/7");
    let seen = echo(block_on(client.patch("echo/todos/:id", &json!({ "done": false }), options.clone())).unwrap());
    assert_eq!(seen.method, "PATCH");
    assert_eq!(seen.body, r#"{"done":false}"#);

    // Step 5: delete.
    let seen = echo(block_on(client.delete("echo/todos/:id", options)).unwrap());
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.body, "");

    // Step 6: non-JSON content type is sent raw.
    let options = RequestOptions::new()
        .header("content-type", "text/plain")
        .data("this is plain text");
    let envelope = block_on(client.invoke("echo", options)).unwrap();
    let seen: Echo = envelope.json().unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.content_type.as_deref(), Some("text/plain"));
    assert_eq!(seen.body, "this is plain text");

    // Step 7: byte payloads are sent unchanged.
    let options = RequestOptions::new()
        .header("content-type", "application/octet-stream")
        .data(b"id,qty\n1,\x02".to_vec());
    let seen = echo(block_on(client.invoke("echo", options)).unwrap().into_data());
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(seen.body, "id,qty\n1,\u{2}");

    // Step 8: request takes the name from options.
    let options = RequestOptions::new().function_name("hello").param("name", "Ada");
    let envelope = block_on(client.request(options)).unwrap();
    assert_eq!(envelope.data, Value::String("hello, Ada".to_string()));
    assert!(envelope.headers.get("content-type").unwrap().starts_with("text/plain"));

    // Step 9: head resolves with the (empty) text body.
    let data = block_on(client.head("hello", RequestOptions::new())).unwrap();
    assert_eq!(data, Value::String(String::new()));

    // Step 10: failing function surfaces its body text.
    let err = block_on(client.post("fail", &json!({}), RequestOptions::new())).unwrap_err();
    assert_eq!(err.to_string(), "function crashed");
    assert_eq!(err.status(), Some(500));

    // Step 11: unknown function is a 404 status error.
    let err = block_on(client.get("nope", RequestOptions::new())).unwrap_err();
    assert!(matches!(err, LambdogError::Status { status: 404, .. }));
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Lambdog::new(UreqTransport::new(&format!("http://{addr}")));
    let err = block_on(client.get("echo", RequestOptions::new())).unwrap_err();
    assert!(matches!(err, LambdogError::Transport(_)));
}

#[tokio::test]
async fn ureq_transport_does_not_block_the_executor() {
    // Server and client share one current-thread runtime: a transport that
    // blocked while polled would never let the server answer.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));

    let client = Lambdog::new(UreqTransport::new(&format!("http://{addr}")));
    let data = client
        .get("hello", RequestOptions::new().param("name", "executor"))
        .await
        .unwrap();
    assert_eq!(data, Value::String("hello, executor".to_string()));
}
