//! Error types for the request builder and its transports.
//!
//! # Design
//! Configuration mistakes (no transport, no method) are reported the moment
//! `dispatch` is called, before anything reaches the network. Transport
//! failures are created by the transport itself and travel back through the
//! dispatch future exactly as the transport produced them.

use thiserror::Error;

/// Errors surfaced by `RequestBuilder::dispatch`, the transports, and the
/// helpers that serialize request bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `dispatch` was called on a builder that has no transport.
    #[error("request has no transport configured")]
    MissingTransport,

    /// `dispatch` was called on a builder that has no HTTP method.
    #[error("request has no HTTP method configured")]
    MissingMethod,

    /// A method name could not be parsed into `HttpMethod`.
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// A configuration option name is not recognized.
    #[error("unknown configuration key: {0}")]
    UnknownConfigKey(String),

    /// A body value could not be turned into a JSON object.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport failed to complete the exchange.
    #[error("transport failed: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ApiError {
    /// Wrap an arbitrary error raised by a transport implementation.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ApiError::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// A transport failure with no underlying error value.
    pub fn transport_msg(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
            source: None,
        }
    }
}
