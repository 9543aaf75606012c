//! The mock server fixture a test owns.
//!
//! # Responsibilities
//! - Collect stub registrations before start
//! - Bind the configured host and port, serve until stopped
//! - Compose URLs pointing at the server

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::{validate_config, MockServerConfig, ValidationError};
use crate::http::{build_router, Dispatcher};
use crate::lifecycle::shutdown::Shutdown;
use crate::pattern::RequestPattern;
use crate::stubs::{RegistrationError, StubRegistry, StubResponse};

/// Transport failures surfaced by `start` and `stop`.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0:?}")]
    InvalidConfig(Vec<ValidationError>),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serve task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// State held only while the server is running.
#[derive(Debug)]
struct Running {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<std::io::Result<()>>,
}

/// An in-process HTTP server answering registered request patterns.
///
/// ```no_run
/// use stub_server::{MockServer, MockServerConfig, RequestPattern, StubResponse};
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let mut server = MockServer::new(MockServerConfig::ephemeral());
/// server.register(
///     RequestPattern::new("/users").param("id", "42"),
///     StubResponse::new(200, r#"{"id":42}"#).with_content_type("application/json"),
/// )?;
/// server.start().await?;
///
/// let body = reqwest::get(server.url("/users?id=42")).await?.text().await?;
/// assert_eq!(body, r#"{"id":42}"#);
///
/// server.stop().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockServer {
    config: MockServerConfig,
    registry: StubRegistry,
    running: Option<Running>,
}

impl MockServer {
    pub fn new(config: MockServerConfig) -> Self {
        Self {
            config,
            registry: StubRegistry::new(),
            running: None,
        }
    }

    pub fn config(&self) -> &MockServerConfig {
        &self.config
    }

    /// Register a stub. Refused while the server is running.
    pub fn register(
        &mut self,
        pattern: RequestPattern,
        response: StubResponse,
    ) -> Result<(), RegistrationError> {
        if self.running.is_some() {
            return Err(RegistrationError::ServerRunning);
        }
        self.registry.register(pattern, response)
    }

    pub fn stub_count(&self) -> usize {
        self.registry.len()
    }

    /// Drop all stubs so the fixture can be reused. Refused while running.
    pub fn reset(&mut self) -> Result<(), RegistrationError> {
        if self.running.is_some() {
            return Err(RegistrationError::ServerRunning);
        }
        self.registry.clear();
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Address actually bound, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    /// Bind and start serving. A running server is stopped first.
    ///
    /// Returns once the socket is accepting connections.
    pub async fn start(&mut self) -> Result<SocketAddr, ServerError> {
        if self.running.is_some() {
            tracing::debug!("Server already running, restarting");
            self.stop().await?;
        }

        validate_config(&self.config).map_err(ServerError::InvalidConfig)?;

        let listener = &self.config.listener;
        let tcp = TcpListener::bind((listener.host.as_str(), listener.port))
            .await
            .map_err(|source| ServerError::Bind {
                addr: listener.authority(),
                source,
            })?;
        let local_addr = tcp.local_addr()?;

        let stubs = Arc::new(self.registry.seal());
        let stub_count = stubs.len();
        let dispatcher = Dispatcher::new(stubs, self.config.limits.max_body_bytes);
        let app = build_router(dispatcher, &self.config.limits);

        let shutdown = Shutdown::new();
        let signal = shutdown.signalled();
        let task = tokio::spawn(async move {
            axum::serve(tcp, app).with_graceful_shutdown(signal).await
        });

        tracing::info!(address = %local_addr, stubs = stub_count, "Mock server started");

        self.running = Some(Running {
            local_addr,
            shutdown,
            task,
        });
        Ok(local_addr)
    }

    /// Stop accepting connections and release the port. No-op when not running.
    ///
    /// In-flight requests are allowed to finish.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        running.shutdown.trigger();
        running.task.await??;

        tracing::info!(address = %running.local_addr, "Mock server stopped");
        Ok(())
    }

    /// `http://host:port` for the configured host and the bound port.
    pub fn base_url(&self) -> String {
        let port = self
            .local_addr()
            .map_or(self.config.listener.port, |addr| addr.port());
        format!("http://{}:{}", self.config.listener.host, port)
    }

    /// Absolute URL for `path`; a single leading slash is optional.
    pub fn url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url(), path)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            tracing::debug!(address = %running.local_addr, "Mock server dropped while running");
            running.shutdown.trigger();
        }
    }
}
