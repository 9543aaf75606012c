//! Stub registration and lookup.
//!
//! # Responsibilities
//! - Validate and store (pattern, response) pairs keyed by `PatternKey`
//! - Last registration for an equal pattern wins
//! - Seal into an immutable `StubTable` the running server reads from
//!
//! # Design Decisions
//! - Lookup is one hashed access on the composed key, never a scan
//! - The sealed table is shared via `Arc` and never mutated, so concurrent
//!   request handlers need no lock
//! - Registered header names are collected once, at seal time

use std::collections::{BTreeSet, HashMap};

use axum::http::HeaderName;

use crate::pattern::{PatternKey, RequestPattern};
use crate::stubs::response::{PreparedResponse, StubResponse};
use crate::stubs::RegistrationError;

/// A registered (pattern, response) pair.
#[derive(Debug, Clone)]
pub struct Stub {
    pattern: RequestPattern,
    response: StubResponse,
    prepared: PreparedResponse,
}

impl Stub {
    /// Validate both halves of a registration.
    pub fn new(pattern: RequestPattern, response: StubResponse) -> Result<Self, RegistrationError> {
        validate_pattern(&pattern)?;
        let prepared = response.prepare()?;
        Ok(Self {
            pattern,
            response,
            prepared,
        })
    }

    pub fn pattern(&self) -> &RequestPattern {
        &self.pattern
    }

    pub fn response(&self) -> &StubResponse {
        &self.response
    }

    pub fn prepared(&self) -> &PreparedResponse {
        &self.prepared
    }
}

fn validate_pattern(pattern: &RequestPattern) -> Result<(), RegistrationError> {
    let path = pattern.path();
    if path.is_empty() {
        return Err(RegistrationError::EmptyPath);
    }
    if !path.starts_with('/') {
        return Err(RegistrationError::RelativePath(path.to_string()));
    }
    for name in pattern.header_names() {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(RegistrationError::InvalidHeaderName(name.to_string()));
        }
    }
    Ok(())
}

/// Mutable registry the test fixture fills before starting the server.
#[derive(Debug, Default, Clone)]
pub struct StubRegistry {
    stubs: HashMap<PatternKey, Stub>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stub, replacing any stub with an equal pattern.
    pub fn register(
        &mut self,
        pattern: RequestPattern,
        response: StubResponse,
    ) -> Result<(), RegistrationError> {
        let stub = Stub::new(pattern, response)?;
        let key = stub.pattern.key();

        tracing::info!(
            path = %stub.pattern.path(),
            parameters = %stub.pattern.canonical_parameters(),
            headers = ?stub.pattern.headers(),
            status = stub.response.status(),
            "Stub registered"
        );

        if self.stubs.insert(key, stub).is_some() {
            tracing::debug!("Replaced stub with an equal pattern");
        }
        Ok(())
    }

    pub fn lookup(&self, pattern: &RequestPattern) -> Option<&Stub> {
        self.stubs.get(&pattern.key())
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }

    /// Drop every registered stub.
    pub fn clear(&mut self) {
        self.stubs.clear();
    }

    /// Freeze the current stubs into a read-only table.
    pub fn seal(&self) -> StubTable {
        let header_names = self
            .stubs
            .values()
            .flat_map(|stub| stub.pattern.header_names())
            .map(str::to_string)
            .collect();
        StubTable {
            stubs: self.stubs.clone(),
            header_names,
        }
    }
}

/// Immutable view of the registry held by the running server.
#[derive(Debug, Default)]
pub struct StubTable {
    stubs: HashMap<PatternKey, Stub>,
    header_names: BTreeSet<String>,
}

impl StubTable {
    pub fn lookup(&self, pattern: &RequestPattern) -> Option<&Stub> {
        self.stubs.get(&pattern.key())
    }

    /// Lowercased header names mentioned by at least one stub.
    pub fn header_names(&self) -> &BTreeSet<String> {
        &self.header_names
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}
