//! Response routing: transform first, then callback.
//!
//! # Design
//! A completed exchange produces one value that is threaded through two
//! optional stages. The transform turns the raw `HttpResponse` into a JSON
//! value; the callback consumes whatever the transform produced (or the raw
//! response when there is no transform). A callback returns nothing, so once
//! one has run the pipeline yields `None`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::http::HttpResponse;

/// Turns a raw response into a value before the callback sees it.
pub type ResponseTransform = Arc<dyn Fn(HttpResponse) -> Value + Send + Sync>;

/// Final consumer of a routed response.
pub type ResultCallback = Arc<dyn Fn(Routed) + Send + Sync>;

/// The value flowing between the routing stages.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// No transform ran; this is the transport's response.
    Response(HttpResponse),
    /// Output of the response transform.
    Value(Value),
}

impl Routed {
    pub fn as_response(&self) -> Option<&HttpResponse> {
        match self {
            Routed::Response(r) => Some(r),
            Routed::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Routed::Value(v) => Some(v),
            Routed::Response(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Routed::Value(v) => Some(v),
            Routed::Response(_) => None,
        }
    }
}

/// The two routing stages captured from a builder at dispatch time.
#[derive(Clone, Default)]
pub struct Pipeline {
    pub transform: Option<ResponseTransform>,
    pub callback: Option<ResultCallback>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("transform", &self.transform.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl Pipeline {
    pub fn route(&self, response: HttpResponse) -> Option<Routed> {
        tracing::trace!(
            status = response.status,
            transform = self.transform.is_some(),
            callback = self.callback.is_some(),
            "routing response"
        );
        let transformed = match &self.transform {
            Some(transform) => Routed::Value(transform(response)),
            None => Routed::Response(response),
        };
        match &self.callback {
            Some(callback) => {
                callback(transformed);
                None
            }
            None => Some(transformed),
        }
    }
}

/// Ready-made response transforms.
pub mod transforms {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::ResponseTransform;
    use crate::http::HttpResponse;

    /// The body parsed as JSON. A body that is not JSON becomes a JSON
    /// string holding the raw text; an empty body becomes `null`.
    pub fn json_body() -> ResponseTransform {
        Arc::new(|response: HttpResponse| parse_body(&response.body))
    }

    /// `{"status": <u16>, "ok": <2xx>, "body": <json_body>}`.
    pub fn status_and_body() -> ResponseTransform {
        Arc::new(|response: HttpResponse| {
            json!({
                "status": response.status,
                "ok": response.is_success(),
                "body": parse_body(&response.body),
            })
        })
    }

    fn parse_body(body: &str) -> Value {
        if body.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    }
}
