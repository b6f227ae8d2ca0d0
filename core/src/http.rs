//! HTTP data types exchanged between the builder and a transport.
//!
//! # Design
//! These types describe requests and responses as plain data. The builder
//! produces a URL plus `RequestOptions`; the transport performs the I/O and
//! hands back an `HttpResponse`. All fields use owned types so values can be
//! moved into `'static` futures without lifetime concerns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Ordered header multimap. Repeated names are kept in insertion order.
pub type Headers = Vec<(String, String)>;

/// Request body. Keys are unique; merging overwrites shallowly.
pub type Body = Map<String, Value>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Delete,
    Options,
    Post,
    Patch,
    Put,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Post,
        HttpMethod::Patch,
        HttpMethod::Put,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
        }
    }

    /// Methods whose facade factory accepts a body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Patch | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ApiError::UnknownMethod(s.to_string()))
    }
}

/// Everything a transport needs besides the URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Body,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after the exchange completes, then routed
/// through the builder's transform and callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value for `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert_eq!("OPTIONS".parse::<HttpMethod>().unwrap(), HttpMethod::Options);
        let err = "TRACE".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, ApiError::UnknownMethod(ref m) if m == "TRACE"));
    }

    #[test]
    fn method_serializes_upper_case() {
        assert_eq!(serde_json::to_value(HttpMethod::Delete).unwrap(), "DELETE");
        let m: HttpMethod = serde_json::from_str(r#""HEAD""#).unwrap();
        assert_eq!(m, HttpMethod::Head);
    }

    #[test]
    fn only_post_patch_put_carry_a_body() {
        let with_body: Vec<_> = HttpMethod::ALL.into_iter().filter(HttpMethod::has_body).collect();
        assert_eq!(with_body, vec![HttpMethod::Post, HttpMethod::Patch, HttpMethod::Put]);
    }

    #[test]
    fn response_header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 204,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "text/plain".to_string()),
            ],
            body: String::new(),
        };
        assert!(response.is_success());
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }
}
