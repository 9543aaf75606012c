//! Canonicalization of inbound requests.
//!
//! # Responsibilities
//! - Percent-decode the path
//! - Pick the parameter source by method (raw body vs decoded query)
//! - Normalize blank query values
//! - Keep only headers some registered pattern mentions
//!
//! Registration patterns never pass through here: the builder on
//! `RequestPattern` keeps every header the caller supplies.

use std::collections::{BTreeMap, BTreeSet};

use axum::http::{request::Parts, HeaderMap, Method};
use percent_encoding::percent_decode_str;
use url::form_urlencoded;

use crate::pattern::request_pattern::{ParamValue, Parameters, RequestPattern};

/// POST and PUT match on their raw body instead of query parameters.
pub fn is_body_carrying(method: &Method) -> bool {
    method == Method::POST || method == Method::PUT
}

/// Percent-decode a request path so it compares with registered, unencoded paths.
///
/// `+` stays literal; only query strings use it for spaces.
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Decode a raw query string into the per-name multimap.
pub fn parse_query(query: Option<&str>) -> Parameters {
    let mut map: BTreeMap<String, Vec<ParamValue>> = BTreeMap::new();
    if let Some(query) = query {
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            map.entry(name.into_owned())
                .or_default()
                .push(ParamValue::from_raw(value));
        }
    }
    Parameters::Query(map)
}

/// Turns inbound requests into `RequestPattern`s comparable with registered ones.
#[derive(Debug, Clone, Copy)]
pub struct Canonicalizer<'a> {
    registered_headers: &'a BTreeSet<String>,
}

impl<'a> Canonicalizer<'a> {
    /// `registered_headers` holds the lowercased header names used by any stub.
    pub fn new(registered_headers: &'a BTreeSet<String>) -> Self {
        Self { registered_headers }
    }

    /// Canonicalize request head plus the fully buffered body.
    pub fn canonicalize(&self, parts: &Parts, body: &[u8]) -> RequestPattern {
        let parameters = if is_body_carrying(&parts.method) {
            Parameters::Body(String::from_utf8_lossy(body).into_owned())
        } else {
            parse_query(parts.uri.query())
        };

        RequestPattern::from_parts(
            decode_path(parts.uri.path()),
            parameters,
            self.filter_headers(&parts.headers),
        )
    }

    /// Collect every value of every registered header name, one pair per value.
    pub fn filter_headers(&self, headers: &HeaderMap) -> Vec<(String, String)> {
        let mut kept = Vec::new();
        for name in self.registered_headers {
            for value in headers.get_all(name.as_str()) {
                kept.push((
                    name.clone(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                ));
            }
        }
        kept
    }
}
