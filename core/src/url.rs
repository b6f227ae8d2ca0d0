//! URL assembly: path segments first, then the query string.
//!
//! Each segment and each query name/value is percent-encoded on its own,
//! using the URI-component rules: only `A-Z a-z 0-9 - _ . ! ~ * ' ( )` pass
//! through unchanged. The base URL itself is never re-encoded.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode one URI component. Total over all inputs.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Build the final URL from a base, ordered path segments and ordered query
/// pairs. Duplicate query names are all emitted.
pub fn assemble_url(url: &str, segments: &[String], queries: &[(String, String)]) -> String {
    let mut out = url.to_string();

    if !segments.is_empty() {
        if !out.ends_with('/') {
            out.push('/');
        }
        for segment in segments {
            out.push_str(&encode_component(segment));
            out.push('/');
        }
        strip_last(&mut out, '/');
    }

    if queries.is_empty() {
        return out;
    }

    strip_last(&mut out, '/');
    out.push('?');
    for (name, value) in queries {
        out.push_str(&encode_component(name));
        out.push('=');
        out.push_str(&encode_component(value));
        out.push('&');
    }
    strip_last(&mut out, '&');
    out
}

fn strip_last(s: &mut String, c: char) {
    if s.ends_with(c) {
        s.pop();
    }
}
