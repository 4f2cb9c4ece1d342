//! HTTP Log Client
//!
//! Queries the log endpoint served next to the viewer.

use gloo_net::http::Request;
use heimdall_shared::{LogEntry, LogsResponse, QuerySpec, ViewerConfig};

use super::{FetchError, LogsClient};

/// Client for the `/api/logs` endpoint
#[derive(Debug, Clone)]
pub struct HttpLogsClient {
    /// Query server origin; empty for same origin
    base_url: String,

    /// Endpoint path
    logs_path: String,
}

impl HttpLogsClient {
    /// Create a new client
    pub fn new(base_url: &str, logs_path: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            logs_path: logs_path.to_string(),
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(&config.base_url, &config.logs_path)
    }

    fn url_for(&self, query: &QuerySpec) -> String {
        query.request_url(&self.base_url, &self.logs_path)
    }
}

#[async_trait::async_trait(?Send)]
impl LogsClient for HttpLogsClient {
    async fn fetch_logs(&self, query: &QuerySpec) -> Result<Vec<LogEntry>, FetchError> {
        let url = self.url_for(query);
        tracing::debug!("GET {}", url);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        // The body is only read for successful responses.
        let body = if response.ok() {
            response.text().await.map_err(|e| e.to_string())
        } else {
            Ok(String::new())
        };

        decode_response(response.ok(), response.status(), body)
    }
}

/// Turn a settled response into entries
///
/// A non-2xx status wins over whatever the body holds; a body that could not
/// be read is a transport failure, one that could not be parsed a decode
/// failure.
fn decode_response(
    ok: bool,
    status: u16,
    body: Result<String, String>,
) -> Result<Vec<LogEntry>, FetchError> {
    if !ok {
        return Err(FetchError::HttpStatus { status });
    }

    let body = body.map_err(FetchError::Transport)?;
    LogsResponse::from_json(&body)
        .map(LogsResponse::into_entries)
        .map_err(|e| FetchError::Decode(e.to_string()))
}
