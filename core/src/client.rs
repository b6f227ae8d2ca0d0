//! Verb factories that hand out pre-seeded request builders.
//!
//! # Design
//! `RestClient` holds a transport and a `ConfigStore`. Each factory call
//! snapshots the current configuration into a fresh `RequestBuilder`:
//! base URL prefixed, method fixed, default transform and callback copied.
//! The client itself keeps no per-request state.

use std::fmt;
use std::sync::Arc;

use crate::builder::{BuilderOptions, RequestBuilder};
use crate::config::{ConfigOptions, ConfigStore};
use crate::http::{Body, HttpMethod};
use crate::transport::Transport;

/// Entry point for building requests against one transport.
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    config: ConfigStore,
}

impl RestClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, ConfigOptions::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, options: ConfigOptions) -> Self {
        Self {
            transport,
            config: ConfigStore::new(options),
        }
    }

    /// Merge `options` into the global configuration. Builders created
    /// before this call are unaffected.
    pub fn config(&mut self, options: ConfigOptions) {
        self.config.update(options);
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.config
    }

    /// A builder for `method` on `url`, seeded from the configuration.
    pub fn request(&self, method: HttpMethod, url: &str) -> RequestBuilder {
        RequestBuilder::from_options(BuilderOptions {
            url: self.config.resolve_url(url),
            transport: self.transport.clone(),
            method,
            default_transform: self.config.default_transform(),
            default_callback: self.config.default_callback(),
        })
    }

    fn request_with_body(&self, method: HttpMethod, url: &str, body: Option<Body>) -> RequestBuilder {
        let builder = self.request(method, url);
        match body {
            Some(body) => builder.merge_body(body),
            None => builder,
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(HttpMethod::Get, url)
    }

    pub fn head(&self, url: &str) -> RequestBuilder {
        self.request(HttpMethod::Head, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(HttpMethod::Delete, url)
    }

    pub fn options(&self, url: &str) -> RequestBuilder {
        self.request(HttpMethod::Options, url)
    }

    pub fn post(&self, url: &str, body: Option<Body>) -> RequestBuilder {
        self.request_with_body(HttpMethod::Post, url, body)
    }

    pub fn patch(&self, url: &str, body: Option<Body>) -> RequestBuilder {
        self.request_with_body(HttpMethod::Patch, url, body)
    }

    pub fn put(&self, url: &str, body: Option<Body>) -> RequestBuilder {
        self.request_with_body(HttpMethod::Put, url, body)
    }
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient").field("config", &self.config).finish()
    }
}
