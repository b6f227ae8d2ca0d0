//! End-to-end dispatch against the live mock server.
//!
//! # Design
//! Starts the echo server on a random port and drives `RestClient` through a
//! `Transport` backed by ureq. The server reflects what it received, so each
//! test checks the request exactly as it went over the wire.

use std::sync::{Arc, Mutex};

use futures::FutureExt;
use mock_server::Echo;
use restcall_core::{
    transforms, ApiError, Body, ConfigOptions, Headers, HttpMethod, HttpResponse, RequestOptions,
    ResponseFuture, RestClient, Routed, Transport,
};
use serde_json::{json, Value};

/// Runs each request on tokio's blocking pool with a shared ureq agent.
///
/// ureq's status-as-error behavior is off so 4xx/5xx responses come back as
/// data and reach the routing pipeline.
#[derive(Clone)]
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, url: &str, options: RequestOptions) -> ResponseFuture {
        let agent = self.agent.clone();
        let url = url.to_string();
        async move {
            tokio::task::spawn_blocking(move || execute(&agent, &url, options))
                .await
                .map_err(ApiError::transport)?
        }
        .boxed()
    }
}

fn with_headers<B>(mut request: ureq::RequestBuilder<B>, headers: &Headers) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    request
}

fn execute(agent: &ureq::Agent, url: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_vec(&options.body).map_err(|e| ApiError::Serialization(e.to_string()))?;
    let headers = &options.headers;

    let result = match options.method {
        HttpMethod::Get => with_headers(agent.get(url), headers).call(),
        HttpMethod::Head => with_headers(agent.head(url), headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(url), headers).call(),
        HttpMethod::Options => with_headers(agent.options(url), headers).call(),
        HttpMethod::Post => with_headers(agent.post(url), headers)
            .content_type("application/json")
            .send(&body[..]),
        HttpMethod::Patch => with_headers(agent.patch(url), headers)
            .content_type("application/json")
            .send(&body[..]),
        HttpMethod::Put => with_headers(agent.put(url), headers)
            .content_type("application/json")
            .send(&body[..]),
    };
    let mut response = result.map_err(ApiError::transport)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
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

    format!("http://{addr}")
}

fn client() -> RestClient {
    RestClient::with_config(
        Arc::new(UreqTransport::new()),
        ConfigOptions::new().base_url(start_server()),
    )
}

fn object(value: Value) -> Body {
    match value {
        Value::Object(map) => map,
        _ => panic!("not an object"),
    }
}

/// Decode the echo carried in a routed `json_body` value.
fn echo_of(routed: Option<Routed>) -> Echo {
    let value = routed.and_then(Routed::into_value).expect("transformed value");
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn post_sends_method_url_and_body() {
    let routed = client()
        .post("/users", Some(object(json!({"name": "a"}))))
        .transform(transforms::json_body())
        .dispatch()
        .unwrap()
        .await
        .unwrap();

    let echo = echo_of(routed);
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.path, "/users");
    assert_eq!(echo.query, None);
    assert_eq!(echo.body, json!({"name": "a"}));
}

#[tokio::test]
async fn segments_and_queries_are_encoded_on_the_wire() {
    let routed = client()
        .get("/items")
        .segment("a b")
        .segment("c/d")
        .query("q", "1 2")
        .query("q", "x&y")
        .transform(transforms::json_body())
        .dispatch()
        .unwrap()
        .await
        .unwrap();

    let echo = echo_of(routed);
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/items/a%20b/c%2Fd");
    assert_eq!(echo.query.as_deref(), Some("q=1%202&q=x%26y"));
}

#[tokio::test]
async fn repeated_headers_arrive_in_order() {
    let routed = client()
        .delete("/items/1")
        .header("X-Tag", "a")
        .header("X-Tag", "b")
        .transform(transforms::json_body())
        .dispatch()
        .unwrap()
        .await
        .unwrap();

    let echo = echo_of(routed);
    assert_eq!(echo.method, "DELETE");
    assert_eq!(echo.header_values("x-tag"), vec!["a", "b"]);
}

#[tokio::test]
async fn every_verb_reaches_the_server() {
    let client = client();
    let builders = [
        (client.get("/v"), "GET"),
        (client.delete("/v"), "DELETE"),
        (client.options("/v"), "OPTIONS"),
        (client.post("/v", None), "POST"),
        (client.patch("/v", Some(object(json!({"p": 1})))), "PATCH"),
        (client.put("/v", Some(object(json!({"p": 2})))), "PUT"),
    ];
    for (builder, method) in builders {
        let routed = builder
            .transform(transforms::json_body())
            .dispatch()
            .unwrap()
            .await
            .unwrap();
        assert_eq!(echo_of(routed).method, method);
    }

    let head = client.head("/v").dispatch().unwrap().await.unwrap();
    let response = head.as_ref().and_then(Routed::as_response).expect("raw response");
    assert_eq!(response.status, 200);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Type"), Some("application/json"));
}

#[tokio::test]
async fn default_callback_sees_transformed_error_status() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut client = client();
    client.config(
        ConfigOptions::new()
            .default_transform(transforms::status_and_body())
            .default_callback(Arc::new(move |routed: Routed| sink.lock().unwrap().push(routed))),
    );

    let out = client.get("/status/404").dispatch().unwrap().await.unwrap();

    assert!(out.is_none());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Routed::Value(json!({"status": 404, "ok": false, "body": {"status": 404}}))]
    );
}

#[tokio::test]
async fn connection_failure_surfaces_as_transport_error() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);

    let client = RestClient::with_config(
        Arc::new(UreqTransport::new()),
        ConfigOptions::new().base_url(format!("http://{addr}")),
    );
    let err = client.get("/x").dispatch().unwrap().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
}
