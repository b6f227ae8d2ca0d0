//! Fluent accumulator for a single HTTP call.
//!
//! # Design
//! `RequestBuilder` owns everything it collects. Setters take `self` and
//! return it, so a request is written as one chain ending in `dispatch`.
//! `dispatch` consumes the builder: the URL is assembled, options are handed
//! to the transport, and the transport's future is mapped through the
//! routing pipeline. No task is spawned and nothing blocks; the caller
//! drives the returned future.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::{FutureExt, TryFutureExt};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{Body, Headers, HttpMethod, RequestOptions};
use crate::routing::{Pipeline, ResponseTransform, ResultCallback, Routed};
use crate::transport::Transport;
use crate::url::assemble_url;

/// Future returned by `RequestBuilder::dispatch`.
///
/// Resolves to `Some(value)` when no callback consumed the routed value and
/// to `None` once a callback has run. Transport errors come through as-is.
pub type Dispatch = BoxFuture<'static, Result<Option<Routed>, ApiError>>;

/// Seed values for a new builder.
#[derive(Clone)]
pub struct BuilderOptions {
    pub url: String,
    pub transport: Arc<dyn Transport>,
    pub method: HttpMethod,
    pub default_transform: Option<ResponseTransform>,
    pub default_callback: Option<ResultCallback>,
}

/// A single HTTP request under construction.
#[derive(Clone, Default)]
pub struct RequestBuilder {
    url: String,
    segments: Vec<String>,
    queries: Vec<(String, String)>,
    headers: Headers,
    method: Option<HttpMethod>,
    body: Body,
    transport: Option<Arc<dyn Transport>>,
    transform: Option<ResponseTransform>,
    callback: Option<ResultCallback>,
}

impl RequestBuilder {
    /// An empty builder. Method and transport must be set before dispatch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: BuilderOptions) -> Self {
        Self {
            url: options.url,
            method: Some(options.method),
            transport: Some(options.transport),
            transform: options.default_transform,
            callback: options.default_callback,
            ..Self::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.queries.push((name.into(), value.into()));
        self
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Append a path segment. Encoding happens when the URL is assembled.
    pub fn segment(mut self, path: impl Into<String>) -> Self {
        self.segments.push(path.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Shallow-merge `partial` into the body; same-named keys are replaced.
    pub fn merge_body(mut self, partial: Body) -> Self {
        self.body.extend(partial);
        self
    }

    /// Serialize `value` and merge it into the body. The value must
    /// serialize to a JSON object; `null` merges nothing.
    pub fn merge_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, ApiError> {
        match serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))? {
            Value::Object(map) => Ok(self.merge_body(map)),
            Value::Null => Ok(self),
            other => Err(ApiError::Serialization(format!(
                "request body must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn callback(mut self, callback: ResultCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn transform(mut self, transform: ResponseTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn http_method(&self) -> Option<HttpMethod> {
        self.method
    }

    /// The URL `dispatch` would send to, given the current state.
    pub fn assembled_url(&self) -> String {
        assemble_url(&self.url, &self.segments, &self.queries)
    }

    /// Assemble the request and hand it to the transport.
    ///
    /// Fails immediately when the transport or the method is missing.
    pub fn dispatch(self) -> Result<Dispatch, ApiError> {
        let transport = self.transport.ok_or(ApiError::MissingTransport)?;
        let method = self.method.ok_or(ApiError::MissingMethod)?;
        let url = assemble_url(&self.url, &self.segments, &self.queries);

        let path = url.split_once('?').map_or(url.as_str(), |(path, _)| path);
        tracing::debug!(
            %method,
            url = %path,
            queries = self.queries.len(),
            headers = self.headers.len(),
            body_keys = self.body.len(),
            "dispatching request"
        );

        let options = RequestOptions {
            method,
            headers: self.headers,
            body: self.body,
        };
        let pipeline = Pipeline {
            transform: self.transform,
            callback: self.callback,
        };

        Ok(transport
            .send(&url, options)
            .map_ok(move |response| pipeline.route(response))
            .boxed())
    }
}

impl fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("url", &self.url)
            .field("segments", &self.segments)
            .field("queries", &self.queries)
            .field("headers", &self.headers)
            .field("method", &self.method)
            .field("body", &self.body)
            .field("transport", &self.transport.is_some())
            .field("transform", &self.transform.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
