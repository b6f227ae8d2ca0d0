//! Global defaults used to seed new request builders.
//!
//! # Design
//! `ConfigStore` holds at most one value per `ConfigKey`. `update` merges:
//! keys present in the update overwrite, absent keys keep their old value.
//! Builders copy what they need at creation time, so later updates never
//! reach builders that already exist.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;
use crate::routing::{ResponseTransform, ResultCallback};

/// Environment variable read by `ConfigOptions::from_env`.
pub const BASE_URL_ENV: &str = "RESTCALL_BASE_URL";

/// Names of the recognized configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    BaseUrl,
    DefaultTransform,
    DefaultCallback,
}

impl FromStr for ConfigKey {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseUrl" | "base_url" => Ok(ConfigKey::BaseUrl),
            "defaultTransform" | "default_transform" => Ok(ConfigKey::DefaultTransform),
            "defaultCallback" | "default_callback" => Ok(ConfigKey::DefaultCallback),
            other => Err(ApiError::UnknownConfigKey(other.to_string())),
        }
    }
}

/// A stored configuration value.
#[derive(Clone)]
pub enum ConfigValue {
    BaseUrl(String),
    Transform(ResponseTransform),
    Callback(ResultCallback),
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::BaseUrl(url) => f.debug_tuple("BaseUrl").field(url).finish(),
            ConfigValue::Transform(_) => f.write_str("Transform(..)"),
            ConfigValue::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// A partial set of options. `None` fields are left alone by `update`.
#[derive(Clone, Default)]
pub struct ConfigOptions {
    pub base_url: Option<String>,
    pub default_transform: Option<ResponseTransform>,
    pub default_callback: Option<ResultCallback>,
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn default_transform(mut self, transform: ResponseTransform) -> Self {
        self.default_transform = Some(transform);
        self
    }

    pub fn default_callback(mut self, callback: ResultCallback) -> Self {
        self.default_callback = Some(callback);
        self
    }

    /// Options taken from the process environment. Only the base URL can be
    /// configured this way.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV).ok(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ConfigOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOptions")
            .field("base_url", &self.base_url)
            .field("default_transform", &self.default_transform.is_some())
            .field("default_callback", &self.default_callback.is_some())
            .finish()
    }
}

/// Merge-updatable holder of the global defaults.
#[derive(Clone, Default, Debug)]
pub struct ConfigStore {
    options: ConfigOptions,
}

impl ConfigStore {
    pub fn new(options: ConfigOptions) -> Self {
        Self { options }
    }

    /// Overwrite the keys set in `partial`; keep the rest.
    pub fn update(&mut self, partial: ConfigOptions) {
        if let Some(url) = partial.base_url {
            self.options.base_url = Some(url);
        }
        if let Some(transform) = partial.default_transform {
            self.options.default_transform = Some(transform);
        }
        if let Some(callback) = partial.default_callback {
            self.options.default_callback = Some(callback);
        }
        tracing::debug!(options = ?self.options, "configuration updated");
    }

    pub fn get(&self, key: ConfigKey) -> Option<ConfigValue> {
        match key {
            ConfigKey::BaseUrl => self.options.base_url.clone().map(ConfigValue::BaseUrl),
            ConfigKey::DefaultTransform => self
                .options
                .default_transform
                .clone()
                .map(ConfigValue::Transform),
            ConfigKey::DefaultCallback => self
                .options
                .default_callback
                .clone()
                .map(ConfigValue::Callback),
        }
    }

    /// Lookup by option name. Unknown names are simply absent.
    pub fn get_named(&self, name: &str) -> Option<ConfigValue> {
        name.parse::<ConfigKey>().ok().and_then(|key| self.get(key))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.options.base_url.as_deref()
    }

    pub fn default_transform(&self) -> Option<ResponseTransform> {
        self.options.default_transform.clone()
    }

    pub fn default_callback(&self) -> Option<ResultCallback> {
        self.options.default_callback.clone()
    }

    /// `base_url + url` when a non-empty base URL is set, `url` otherwise.
    pub fn resolve_url(&self, url: &str) -> String {
        match self.base_url() {
            Some(base) if !base.is_empty() => format!("{base}{url}"),
            _ => url.to_string(),
        }
    }
}
