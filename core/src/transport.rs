//! The capability a builder needs to put a request on the wire.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::ApiError;
use crate::http::{HttpResponse, RequestOptions};

/// Future returned by a transport. Awaiting it yields the raw response;
/// dropping it abandons the exchange.
pub type ResponseFuture = BoxFuture<'static, Result<HttpResponse, ApiError>>;

/// Sends a fully assembled request.
///
/// Connection reuse, TLS, redirects and timeouts belong to the
/// implementation. Failures should be reported as `ApiError::Transport`.
pub trait Transport: Send + Sync {
    fn send(&self, url: &str, options: RequestOptions) -> ResponseFuture;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, url: &str, options: RequestOptions) -> ResponseFuture {
        (**self).send(url, options)
    }
}
