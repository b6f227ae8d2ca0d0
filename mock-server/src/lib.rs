use axum::{
    body::Bytes,
    extract::Path,
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// What the server saw, reflected back to the caller.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl Echo {
    /// All values sent under `name` (lower-case), in arrival order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/status/{code}", any(status))
        .fallback(echo)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::debug!(%addr, "mock server accepting connections");
    }
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    Json(Echo {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: parse_body(&body),
    })
}

async fn status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(json!({ "status": status.as_u16() })))
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_null() {
        assert_eq!(parse_body(b""), Value::Null);
    }

    #[test]
    fn json_body_is_parsed() {
        assert_eq!(parse_body(br#"{"name":"a"}"#), json!({"name": "a"}));
    }

    #[test]
    fn non_json_body_is_kept_as_text() {
        assert_eq!(parse_body(b"plain text"), json!("plain text"));
    }

    #[test]
    fn header_values_keeps_order() {
        let echo = Echo {
            method: "GET".to_string(),
            path: "/".to_string(),
            query: None,
            headers: vec![
                ("x-tag".to_string(), "a".to_string()),
                ("accept".to_string(), "*/*".to_string()),
                ("x-tag".to_string(), "b".to_string()),
            ],
            body: Value::Null,
        };
        assert_eq!(echo.header_values("x-tag"), vec!["a", "b"]);
        assert!(echo.header_values("x-missing").is_empty());
    }

    #[test]
    fn echo_roundtrips_through_json() {
        let echo = Echo {
            method: "POST".to_string(),
            path: "/users".to_string(),
            query: Some("q=1".to_string()),
            headers: Vec::new(),
            body: json!({"name": "a"}),
        };
        let text = serde_json::to_string(&echo).unwrap();
        let back: Echo = serde_json::from_str(&text).unwrap();
        assert_eq!(back, echo);
    }
}
