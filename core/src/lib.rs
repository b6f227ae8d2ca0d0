//! Fluent HTTP request builder over an injected transport.
//!
//! # Overview
//! `RestClient` hands out one `RequestBuilder` per HTTP verb, seeded from a
//! small global configuration (base URL, default transform, default
//! callback). The builder collects URL, path segments, query parameters,
//! headers and a JSON body, then `dispatch` assembles the final URL and
//! passes everything to a `Transport`. When the transport's future resolves,
//! the response runs through the optional transform and then the optional
//! callback.
//!
//! # Design
//! - The crate performs no I/O. A `Transport` does the network exchange and
//!   returns a boxed future; the builder only maps that future.
//! - URL assembly is a pure function in `url`, so it can be tested alone.
//! - Configuration is copied into each builder when it is created.

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod transport;
pub mod url;

pub use builder::{BuilderOptions, Dispatch, RequestBuilder};
pub use client::RestClient;
pub use config::{ConfigKey, ConfigOptions, ConfigStore, ConfigValue};
pub use error::ApiError;
pub use http::{Body, Headers, HttpMethod, HttpResponse, RequestOptions};
pub use routing::{transforms, Pipeline, ResponseTransform, ResultCallback, Routed};
pub use transport::{ResponseFuture, Transport};
pub use url::{assemble_url, encode_component};
