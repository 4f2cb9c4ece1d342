//! Log Query Client Layer
//!
//! This module provides the fetch gateway between the viewer and the
//! log query endpoint.
//!
//! - **HttpLogsClient**: issues `GET /api/logs` from the browser
//!
//! The refresh controller only sees the `LogsClient` trait, so it can be
//! driven by an in-memory client in tests.

mod http;

pub use http::HttpLogsClient;

use async_trait::async_trait;
use heimdall_shared::{LogEntry, QuerySpec};

/// Why a fetch produced no entries
///
/// All three kinds end up in the same `error` view state; `Display` is the
/// cause shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Network unreachable, DNS failure, CORS rejection, ...
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    /// The body was not the expected JSON
    #[error("invalid response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Message for the error panel
    pub fn user_message(&self) -> String {
        format!("Query failed ({}).", self)
    }
}

/// Trait for log query implementations
#[async_trait(?Send)]
pub trait LogsClient {
    /// Run one query; no retries
    async fn fetch_logs(&self, query: &QuerySpec) -> Result<Vec<LogEntry>, FetchError>;
}
