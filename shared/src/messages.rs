//! API message types for communication between the viewer and the query server
//!
//! These types are used for:
//! - The `/api/logs` response body
//! - The query parameters sent with every refresh
//!
//! Log entries come from an eBPF collector and are frequently partial, so every
//! field decodes leniently: a missing, null or mistyped value becomes `None`
//! instead of failing the whole response.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Path of the log query endpoint, relative to the viewer's origin
pub const LOGS_PATH: &str = "/api/logs";

/// Number of entries requested per refresh
pub const DEFAULT_LIMIT: u32 = 200;

/// Epoch values above this are milliseconds, below it seconds
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Format an instant the way the query server expects it
///
/// Always UTC with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`.
pub fn canonical_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A single HTTP request observed by the collector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the request was observed
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// HTTP method (e.g., "GET")
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Request path
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Response status code; `None` when the collector saw no response
    #[serde(default, deserialize_with = "lenient_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Request duration in nanoseconds
    #[serde(default, deserialize_with = "lenient_duration", skip_serializing_if = "Option::is_none")]
    pub duration_ns: Option<u64>,

    /// Kubernetes namespace of the serving pod
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Serving pod name
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,

    /// Node the pod runs on
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

impl LogEntry {
    /// Duration in milliseconds, if known
    pub fn duration_ms(&self) -> Option<f64> {
        self.duration_ns.map(|ns| ns as f64 / 1e6)
    }

    /// Whether the response was a client or server error
    pub fn is_error(&self) -> bool {
        self.status.is_some_and(|status| status >= 400)
    }
}

/// Response body of `GET /api/logs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogsResponse {
    /// Matching entries, newest first as returned by the server.
    /// Absent or null decodes to an empty list.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub entries: Vec<LogEntry>,
}

impl LogsResponse {
    /// Parse a response body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

/// Canonical query sent to the log endpoint
///
/// `from <= to` is not checked here; the server swaps an inverted range itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Start of the time window
    pub from: Option<DateTime<Utc>>,

    /// End of the time window
    pub to: Option<DateTime<Utc>>,

    /// Upper-cased HTTP method filter
    pub method: Option<String>,

    /// Status code filter, passed through as entered
    pub status: Option<String>,

    /// Namespace filter
    pub namespace: Option<String>,

    /// Pod filter
    pub pod: Option<String>,

    /// Path filter
    pub path: Option<String>,

    /// Maximum number of entries to return
    pub limit: u32,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            method: None,
            status: None,
            namespace: None,
            pod: None,
            path: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QuerySpec {
    /// Query parameters in wire order; unset filters are left out
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(8);

        if let Some(from) = &self.from {
            pairs.push(("from", canonical_instant(from)));
        }
        if let Some(to) = &self.to {
            pairs.push(("to", canonical_instant(to)));
        }

        let filters = [
            ("method", &self.method),
            ("status", &self.status),
            ("namespace", &self.namespace),
            ("pod", &self.pod),
            ("path", &self.path),
        ];
        for (key, value) in filters {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }

        pairs.push(("limit", self.limit.to_string()));
        pairs
    }

    /// URL-encoded query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Full request URL for this query
    pub fn request_url(&self, base_url: &str, path: &str) -> String {
        format!(
            "{}{}?{}",
            base_url.trim_end_matches('/'),
            path,
            self.to_query_string()
        )
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|epoch| {
            if epoch > EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            }
        }),
        _ => None,
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    let status = non_negative_integer(Value::deserialize(deserializer)?);
    // The collector reports 0 for events it never saw a response for.
    Ok(status
        .filter(|status| *status != 0)
        .and_then(|status| u16::try_from(status).ok()))
}

fn lenient_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(non_negative_integer(Value::deserialize(deserializer)?))
}

fn non_negative_integer(value: Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_entries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LogEntry>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect()),
        other => Err(D::Error::custom(format!(
            "expected `entries` to be an array, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_full_entry() {
        let body = r#"{
            "entries": [{
                "timestamp": "2024-05-01T10:00:03.123456789Z",
                "method": "GET",
                "path": "/healthz",
                "status": 200,
                "duration_ns": 1500000,
                "namespace": "default",
                "pod": "api-7d9f",
                "node": "worker-1",
                "pid": 4242,
                "payload": "ignored"
            }]
        }"#;

        let entries = LogsResponse::from_json(body).unwrap().into_entries();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.method.as_deref(), Some("GET"));
        assert_eq!(entry.status, Some(200));
        assert_eq!(entry.duration_ns, Some(1_500_000));
        assert_eq!(entry.duration_ms(), Some(1.5));
        assert_eq!(
            entry.timestamp.map(|ts| canonical_instant(&ts)).as_deref(),
            Some("2024-05-01T10:00:03.123Z")
        );
        assert!(!entry.is_error());
    }

    #[test]
    fn test_decode_degrades_bad_fields() {
        let body = r#"{
            "entries": [
                {"timestamp": "yesterday", "status": "503", "duration_ns": -5, "method": 7},
                {"status": 0, "duration_ns": "2500", "pod": null},
                42
            ]
        }"#;

        let entries = LogsResponse::from_json(body).unwrap().into_entries();
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].timestamp, None);
        assert_eq!(entries[0].status, Some(503));
        assert_eq!(entries[0].duration_ns, None);
        assert_eq!(entries[0].method, None);
        assert!(entries[0].is_error());

        assert_eq!(entries[1].status, None);
        assert_eq!(entries[1].duration_ns, Some(2500));
        assert_eq!(entries[1].pod, None);

        assert_eq!(entries[2], LogEntry::default());
    }

    #[test]
    fn test_decode_epoch_timestamps() {
        let body = r#"{"entries": [{"timestamp": 1714557603}, {"timestamp": 1714557603123}]}"#;
        let entries = LogsResponse::from_json(body).unwrap().into_entries();

        let seconds = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 3).unwrap();
        assert_eq!(entries[0].timestamp, Some(seconds));
        assert_eq!(
            entries[1].timestamp,
            Some(seconds + chrono::Duration::milliseconds(123))
        );
    }

    #[test]
    fn test_missing_or_null_entries_is_empty() {
        assert!(LogsResponse::from_json("{}").unwrap().entries.is_empty());
        assert!(LogsResponse::from_json(r#"{"entries": null, "total": 3}"#)
            .unwrap()
            .entries
            .is_empty());
    }

    #[test]
    fn test_malformed_bodies_fail() {
        assert!(LogsResponse::from_json("<html>bad gateway</html>").is_err());
        assert!(LogsResponse::from_json(r#"{"entries": "nope"}"#).is_err());
    }

    #[test]
    fn test_query_string_omits_unset_filters() {
        let query = QuerySpec {
            from: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 45, 0).unwrap()),
            to: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
            method: Some("POST".to_string()),
            path: Some("/api/v1/orders".to_string()),
            ..QuerySpec::default()
        };

        assert_eq!(
            query.to_query_string(),
            "from=2024-05-01T09%3A45%3A00.000Z&to=2024-05-01T10%3A00%3A00.000Z\
             &method=POST&path=%2Fapi%2Fv1%2Forders&limit=200"
        );
    }

    #[test]
    fn test_limit_always_present() {
        let query = QuerySpec::default();
        assert_eq!(query.to_query_pairs(), vec![("limit", "200".to_string())]);
        assert_eq!(
            query.request_url("http://localhost:8080/", LOGS_PATH),
            "http://localhost:8080/api/logs?limit=200"
        );
    }
}
