//! The `RequestPattern` value and its canonical key.
//!
//! Every constructor and builder keeps the pattern in canonical form, so the
//! derived `PartialEq`/`Hash` and the composed `PatternKey` always agree.

use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamValue {
    /// The parameter is present but its value is blank (`?x` or `?x=`).
    Absent,
    /// A non-blank value, kept verbatim.
    Value(String),
}

impl ParamValue {
    /// Normalize a raw value: anything blank after trimming becomes `Absent`.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            Self::Absent
        } else {
            Self::Value(raw)
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Value(v) => Some(v),
        }
    }
}

/// The part of a request matched besides path and headers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parameters {
    /// Decoded query parameters. Names are ordered; values keep arrival order per name.
    Query(BTreeMap<String, Vec<ParamValue>>),
    /// Raw body text of a body-carrying request, never decomposed.
    Body(String),
}

impl Default for Parameters {
    fn default() -> Self {
        Self::Query(BTreeMap::new())
    }
}

impl Parameters {
    /// Canonical text token: a sorted query string, or the raw body.
    pub fn canonical(&self) -> String {
        match self {
            Self::Query(map) => canonical_query(map),
            Self::Body(raw) => raw.clone(),
        }
    }
}

/// Serialize query parameters sorted by name, values in their per-name arrival order.
///
/// Absent values are written as a bare name (`x`), present ones as `x=value`.
pub fn canonical_query(map: &BTreeMap<String, Vec<ParamValue>>) -> String {
    let mut out = String::new();
    for (name, values) in map {
        for value in values {
            if !out.is_empty() {
                out.push('&');
            }
            out.extend(form_urlencoded::byte_serialize(name.as_bytes()));
            if let ParamValue::Value(v) = value {
                out.push('=');
                out.extend(form_urlencoded::byte_serialize(v.as_bytes()));
            }
        }
    }
    out
}

/// Hashable canonical form of a `RequestPattern`.
///
/// Path, parameters and headers are composed into one percent-encoded string,
/// so two patterns are equal iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternKey(String);

impl PatternKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The matching key shared by registered stubs and inbound requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestPattern {
    path: String,
    parameters: Parameters,
    headers: Vec<(String, String)>,
}

impl RequestPattern {
    /// A pattern matching `path` with no query parameters and no headers.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            parameters: Parameters::default(),
            headers: Vec::new(),
        }
    }

    /// Build a pattern from already-extracted parts, normalizing the headers.
    pub fn from_parts<I, N, V>(path: impl Into<String>, parameters: Parameters, headers: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let mut headers: Vec<(String, String)> = headers
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.into()))
            .collect();
        headers.sort();
        Self {
            path: path.into(),
            parameters,
            headers,
        }
    }

    /// Expect a query parameter value. Repeat the call for multi-valued parameters.
    ///
    /// Replaces a previously set body match.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Parameters::Body(_) = self.parameters {
            self.parameters = Parameters::default();
        }
        if let Parameters::Query(map) = &mut self.parameters {
            map.entry(name.into())
                .or_default()
                .push(ParamValue::from_raw(value));
        }
        self
    }

    /// Match the raw body of a POST or PUT instead of query parameters.
    #[must_use]
    pub fn body(mut self, raw: impl Into<String>) -> Self {
        self.parameters = Parameters::Body(raw.into());
        self
    }

    /// Expect a request header. Repeat the call for multi-valued headers.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .push((name.as_ref().to_ascii_lowercase(), value.into()));
        self.headers.sort();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Header pairs, sorted by (name, value).
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header_names(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(|(name, _)| name.as_str())
    }

    /// The name-sorted query string, or the raw body for body matches.
    pub fn canonical_parameters(&self) -> String {
        self.parameters.canonical()
    }

    /// Compose the canonical lookup key.
    pub fn key(&self) -> PatternKey {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("path", &self.path);
        match &self.parameters {
            Parameters::Query(map) => serializer.append_pair("query", &canonical_query(map)),
            Parameters::Body(raw) => serializer.append_pair("body", raw),
        };
        for (name, value) in &self.headers {
            serializer.append_pair(&format!("h.{name}"), value);
        }
        PatternKey(serializer.finish())
    }
}

impl fmt::Display for RequestPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_collapse_to_absent() {
        assert_eq!(ParamValue::from_raw(""), ParamValue::Absent);
        assert_eq!(ParamValue::from_raw("   "), ParamValue::Absent);
        assert_eq!(ParamValue::from_raw("foo"), ParamValue::Value("foo".into()));

        let bare = RequestPattern::new("/q").param("x", "");
        let spaced = RequestPattern::new("/q").param("x", " ");
        let valued = RequestPattern::new("/q").param("x", "foo");
        assert_eq!(bare, spaced);
        assert_ne!(bare, valued);
    }

    #[test]
    fn test_parameter_order_across_names_is_irrelevant() {
        let a = RequestPattern::new("/users").param("id", "1").param("sort", "asc");
        let b = RequestPattern::new("/users").param("sort", "asc").param("id", "1");
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_per_name_value_order_is_preserved() {
        let a = RequestPattern::new("/tags").param("t", "x").param("t", "y");
        let b = RequestPattern::new("/tags").param("t", "y").param("t", "x");
        assert_ne!(a, b);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_header_order_is_irrelevant() {
        let a = RequestPattern::new("/items")
            .header("X-Tenant", "a")
            .header("Accept", "text/plain")
            .header("X-Tenant", "b");
        let b = RequestPattern::new("/items")
            .header("x-tenant", "b")
            .header("x-tenant", "a")
            .header("accept", "text/plain");
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_eq!(
            a.headers(),
            &[
                ("accept".to_string(), "text/plain".to_string()),
                ("x-tenant".to_string(), "a".to_string()),
                ("x-tenant".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_parts_sorts_headers() {
        let built = RequestPattern::from_parts(
            "/items",
            Parameters::default(),
            vec![("X-B", "2"), ("X-A", "1")],
        );
        let chained = RequestPattern::new("/items").header("x-a", "1").header("x-b", "2");
        assert_eq!(built, chained);
    }

    #[test]
    fn test_path_is_case_sensitive_and_not_normalized() {
        assert_ne!(RequestPattern::new("/Users"), RequestPattern::new("/users"));
        assert_ne!(RequestPattern::new("/users/"), RequestPattern::new("/users"));
    }

    #[test]
    fn test_canonical_query() {
        let pattern = RequestPattern::new("/search")
            .param("q", "a b&c")
            .param("flag", "")
            .param("page", "2");
        assert_eq!(pattern.canonical_parameters(), "flag&page=2&q=a+b%26c");
    }

    #[test]
    fn test_body_and_query_never_collide() {
        let body = RequestPattern::new("/echo").body("id=42");
        let query = RequestPattern::new("/echo").param("id", "42");
        assert_eq!(body.canonical_parameters(), query.canonical_parameters());
        assert_ne!(body, query);
        assert_ne!(body.key(), query.key());
    }

    #[test]
    fn test_param_after_body_switches_to_query() {
        let pattern = RequestPattern::new("/echo").body("hello").param("id", "1");
        assert_eq!(pattern, RequestPattern::new("/echo").param("id", "1"));
    }

    #[test]
    fn test_key_components_cannot_bleed_into_each_other() {
        let a = RequestPattern::new("/a&query=x");
        let b = RequestPattern::new("/a").param("x", "");
        assert_ne!(a.key(), b.key());
    }
}
