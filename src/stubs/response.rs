//! Canned responses and their pre-rendered wire form.
//!
//! A `StubResponse` is validated and rendered into a `PreparedResponse` once,
//! at registration, so a bad status or unknown charset fails the test author's
//! `register` call instead of surfacing as a broken response later.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use encoding_rs::Encoding;
use serde::Serialize;

use crate::stubs::RegistrationError;

/// Character encoding used when none is given.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// The response returned for a matching request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResponse {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
    content_type: Option<String>,
    encoding: String,
}

impl StubResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
            content_type: None,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    /// A response whose body is `value` serialized as JSON.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(status, serde_json::to_string(value)?).with_content_type("application/json"))
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the character encoding label (`UTF-8`, `Shift_JIS`, `ISO-8859-1`, ...).
    #[must_use]
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    /// Add a response header. Repeated names are sent as separate header lines.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Validate and render into the form written on every hit.
    pub fn prepare(&self) -> Result<PreparedResponse, RegistrationError> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|_| RegistrationError::InvalidStatus(self.status))?;

        let encoding = Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| RegistrationError::UnknownEncoding(self.encoding.clone()))?;
        // UTF-16 labels encode as UTF-8; the declared charset follows the bytes.
        let (body, written_as, _) = encoding.encode(&self.body);

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let invalid = || RegistrationError::InvalidResponseHeader {
                name: name.clone(),
                value: value.clone(),
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            headers.append(header_name, header_value);
        }

        if let Some(content_type) = &self.content_type {
            if headers.contains_key(header::CONTENT_TYPE) {
                return Err(RegistrationError::ConflictingContentType(content_type.clone()));
            }
            let rendered = if content_type.to_ascii_lowercase().contains("charset=") {
                content_type.clone()
            } else {
                format!("{content_type}; charset={}", written_as.name())
            };
            let value = HeaderValue::from_str(&rendered)
                .map_err(|_| RegistrationError::InvalidContentType(content_type.clone()))?;
            headers.insert(header::CONTENT_TYPE, value);
        }

        Ok(PreparedResponse {
            status,
            headers,
            body: Bytes::from(body.into_owned()),
        })
    }
}

/// A validated response, cheap to clone into each reply.
#[derive(Debug, Clone)]
pub struct PreparedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl PreparedResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn render(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}
