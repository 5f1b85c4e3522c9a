//! Module client adapter.
//!
//! [`ModuleClient`] is the seam to the daemon modules' control endpoints.
//! It is injected explicitly wherever needed, so runs against a live suite,
//! a different area, or a mock client compose the same way.
//!
//! [`ClientAdapter`] wraps a client and never fails: every transport
//! outcome is folded into a [`ModuleState`] with the appropriate
//! [`FetchStatus`] and observed latency.

use crate::state::{FetchStatus, ModuleState};
use async_trait::async_trait;
use lsrd_types::{Area, ModuleKind, ModuleSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Control ports default to `CTRL_PORT_BASE + 1 + module index`.
pub const CTRL_PORT_BASE: u16 = 7760;

/// A failed snapshot fetch, before it is folded into a [`FetchStatus`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The module did not answer in time.
    #[error("fetch timed out")]
    Timeout,

    /// The module's endpoint could not be reached.
    #[error("module unreachable: {0}")]
    Unreachable(#[source] io::Error),

    /// A response arrived but was not a valid snapshot for the module.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl FetchError {
    /// The fetch status this error maps to.
    pub const fn status(&self) -> FetchStatus {
        match self {
            FetchError::Timeout => FetchStatus::Timeout,
            FetchError::Unreachable(_) => FetchStatus::Unreachable,
            FetchError::Protocol(_) => FetchStatus::ProtocolError,
        }
    }
}

impl From<io::Error> for FetchError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => FetchError::Timeout,
            io::ErrorKind::UnexpectedEof => {
                FetchError::Protocol("connection closed mid-response".to_string())
            }
            _ => FetchError::Unreachable(err),
        }
    }
}

/// One snapshot query per call; the transport behind this trait is free to
/// be TCP, a unix socket, or a test double.
#[async_trait]
pub trait ModuleClient: Send + Sync {
    /// Fetches one module's snapshot for an area.
    async fn fetch(&self, module: ModuleKind, area: &Area) -> Result<ModuleSnapshot, FetchError>;
}

#[derive(Serialize)]
struct SnapshotRequest<'a> {
    module: ModuleKind,
    area: &'a str,
}

/// Production client: newline-delimited JSON over TCP, one connection per
/// query. Requests carry `{module, area}`; the response line is the
/// snapshot.
#[derive(Debug, Clone)]
pub struct TcpModuleClient {
    endpoints: BTreeMap<ModuleKind, SocketAddr>,
}

impl TcpModuleClient {
    /// Creates a client with explicit per-module endpoints.
    pub fn new(endpoints: BTreeMap<ModuleKind, SocketAddr>) -> Self {
        Self { endpoints }
    }

    /// Creates a client pointed at the default local control ports.
    pub fn localhost() -> Self {
        let endpoints = ModuleKind::ALL
            .iter()
            .enumerate()
            .map(|(i, &module)| {
                let port = CTRL_PORT_BASE + 1 + i as u16;
                (module, SocketAddr::from(([127, 0, 0, 1], port)))
            })
            .collect();
        Self { endpoints }
    }

    /// Overrides one module's endpoint.
    pub fn with_endpoint(mut self, module: ModuleKind, addr: SocketAddr) -> Self {
        self.endpoints.insert(module, addr);
        self
    }
}

#[async_trait]
impl ModuleClient for TcpModuleClient {
    async fn fetch(&self, module: ModuleKind, area: &Area) -> Result<ModuleSnapshot, FetchError> {
        let addr = self.endpoints.get(&module).ok_or_else(|| {
            FetchError::Protocol(format!("no control endpoint configured for {}", module))
        })?;

        let mut stream = TcpStream::connect(addr).await?;
        debug!(%module, %area, %addr, "connected to module control endpoint");

        let request = SnapshotRequest {
            module,
            area: area.as_str(),
        };
        let mut line = serde_json::to_string(&request)
            .map_err(|e| FetchError::Protocol(format!("encoding request: {}", e)))?;
        line.push('\n');
        stream.write_all(line.as_bytes()).await?;

        let mut reader = BufReader::new(stream);
        let mut response = String::new();
        let n = reader.read_line(&mut response).await?;
        if n == 0 {
            return Err(FetchError::Protocol(
                "connection closed before response".to_string(),
            ));
        }

        let snapshot: ModuleSnapshot = serde_json::from_str(response.trim_end())
            .map_err(|e| FetchError::Protocol(format!("decoding snapshot: {}", e)))?;
        Ok(snapshot)
    }
}

/// Wraps a [`ModuleClient`] into the never-failing fetch contract:
/// exactly one remote call per invocation, every outcome expressed as a
/// [`ModuleState`].
#[derive(Clone)]
pub struct ClientAdapter {
    client: Arc<dyn ModuleClient>,
}

impl ClientAdapter {
    /// Creates an adapter over any client implementation.
    pub fn new(client: Arc<dyn ModuleClient>) -> Self {
        Self { client }
    }

    /// Fetches one module's state, bounded by `timeout`.
    pub async fn fetch(&self, module: ModuleKind, area: Area, timeout: Duration) -> ModuleState {
        let started = Instant::now();
        let outcome = tokio::time::timeout(timeout, self.client.fetch(module, &area)).await;
        let latency = started.elapsed();

        match outcome {
            Ok(Ok(snapshot)) if snapshot.kind() == module => {
                debug!(%module, %area, latency_ms = latency.as_millis() as u64, "snapshot fetched");
                ModuleState::ok(module, area, snapshot, latency)
            }
            Ok(Ok(snapshot)) => {
                warn!(
                    %module, %area, got = %snapshot.kind(),
                    "module answered with a snapshot for a different module"
                );
                ModuleState::failed(module, area, FetchStatus::ProtocolError, latency)
            }
            Ok(Err(err)) => {
                debug!(%module, %area, error = %err, "snapshot fetch failed");
                ModuleState::failed(module, area, err.status(), latency)
            }
            Err(_elapsed) => {
                debug!(%module, %area, timeout_ms = timeout.as_millis() as u64, "snapshot fetch timed out");
                ModuleState::failed(module, area, FetchStatus::Timeout, latency)
            }
        }
    }
}
