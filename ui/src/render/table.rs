//! Request table rows
//!
//! Rows are plain strings so the view only has to place them.

use chrono::{DateTime, TimeZone, Utc};
use heimdall_shared::LogEntry;

/// Shown for any field the entry did not carry
pub const PLACEHOLDER: &str = "-";

/// Most rows the table ever shows
pub const MAX_ROWS: usize = 200;

/// Colour class of the status column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusBadge {
    Ok,
    Warn,
    Err,
    #[default]
    Unknown,
}

impl StatusBadge {
    pub fn for_status(status: Option<u16>) -> Self {
        match status {
            Some(code) if code >= 500 => StatusBadge::Err,
            Some(code) if code >= 400 => StatusBadge::Warn,
            Some(_) => StatusBadge::Ok,
            None => StatusBadge::Unknown,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            StatusBadge::Ok => "badge ok",
            StatusBadge::Warn => "badge warn",
            StatusBadge::Err => "badge err",
            StatusBadge::Unknown => "badge none",
        }
    }
}

/// One rendered table row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub time: String,
    pub method: String,
    pub path: String,
    pub status: String,
    pub badge: StatusBadge,
    pub duration: String,
    pub namespace: String,
    pub pod: String,
    pub node: String,
}

impl TableRow {
    pub fn from_entry<Tz>(entry: &LogEntry, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            time: entry
                .timestamp
                .as_ref()
                .map(|ts| format_time_of_day(ts, tz))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            method: text_or_placeholder(entry.method.as_deref()),
            path: text_or_placeholder(entry.path.as_deref()),
            status: entry
                .status
                .map(|status| status.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            badge: StatusBadge::for_status(entry.status),
            duration: entry
                .duration_ms()
                .map(format_duration_ms)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            namespace: text_or_placeholder(entry.namespace.as_deref()),
            pod: text_or_placeholder(entry.pod.as_deref()),
            node: text_or_placeholder(entry.node.as_deref()),
        }
    }
}

/// Rows for the first [`MAX_ROWS`] entries, in input order
pub fn table_rows<Tz>(entries: &[LogEntry], tz: &Tz) -> Vec<TableRow>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    entries
        .iter()
        .take(MAX_ROWS)
        .map(|entry| TableRow::from_entry(entry, tz))
        .collect()
}

/// Milliseconds below one second, seconds above
pub fn format_duration_ms(ms: f64) -> String {
    if !ms.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if ms >= 1000.0 {
        format!("{:.2} s", ms / 1000.0)
    } else {
        format!("{:.1} ms", ms)
    }
}

/// `HH:MM:SS` in the given zone
pub fn format_time_of_day<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%H:%M:%S").to_string()
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::at;
    use chrono::FixedOffset;
    use proptest::prelude::*;

    #[test]
    fn test_full_row() {
        let entry = LogEntry {
            timestamp: Some(at(10, 0, 3)),
            method: Some("GET".to_string()),
            path: Some("/api/orders".to_string()),
            status: Some(200),
            duration_ns: Some(12_340_000),
            namespace: Some("shop".to_string()),
            pod: Some("orders-5c9".to_string()),
            node: Some("worker-2".to_string()),
        };

        let row = TableRow::from_entry(&entry, &Utc);
        assert_eq!(row.time, "10:00:03");
        assert_eq!(row.method, "GET");
        assert_eq!(row.status, "200");
        assert_eq!(row.badge, StatusBadge::Ok);
        assert_eq!(row.duration, "12.3 ms");
        assert_eq!(row.node, "worker-2");
    }

    #[test]
    fn test_missing_fields_use_placeholder() {
        let entry = LogEntry {
            path: Some("  ".to_string()),
            ..LogEntry::default()
        };

        let row = TableRow::from_entry(&entry, &Utc);
        for cell in [
            &row.time,
            &row.method,
            &row.path,
            &row.status,
            &row.duration,
            &row.namespace,
            &row.pod,
            &row.node,
        ] {
            assert_eq!(cell, PLACEHOLDER);
        }
        assert_eq!(row.badge, StatusBadge::Unknown);
        assert_eq!(row.badge.class(), "badge none");
    }

    #[test]
    fn test_status_badges() {
        assert_eq!(StatusBadge::for_status(Some(503)), StatusBadge::Err);
        assert_eq!(StatusBadge::for_status(Some(500)), StatusBadge::Err);
        assert_eq!(StatusBadge::for_status(Some(499)), StatusBadge::Warn);
        assert_eq!(StatusBadge::for_status(Some(400)), StatusBadge::Warn);
        assert_eq!(StatusBadge::for_status(Some(302)), StatusBadge::Ok);
        assert_eq!(StatusBadge::for_status(None), StatusBadge::Unknown);
    }

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(0.0), "0.0 ms");
        assert_eq!(format_duration_ms(999.94), "999.9 ms");
        assert_eq!(format_duration_ms(1000.0), "1.00 s");
        assert_eq!(format_duration_ms(2500.0), "2.50 s");
        assert_eq!(format_duration_ms(f64::NAN), PLACEHOLDER);
    }

    #[test]
    fn test_time_of_day_in_zone() {
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_time_of_day(&at(10, 0, 3), &minus_five), "05:00:03");
    }

    #[test]
    fn test_rows_keep_input_order() {
        let entries: Vec<_> = ["/b", "/a", "/c"]
            .into_iter()
            .map(|path| LogEntry {
                path: Some(path.to_string()),
                ..LogEntry::default()
            })
            .collect();

        let paths: Vec<_> = table_rows(&entries, &Utc)
            .into_iter()
            .map(|row| row.path)
            .collect();
        assert_eq!(paths, ["/b", "/a", "/c"]);
    }

    proptest! {
        #[test]
        fn prop_rows_never_exceed_cap(len in 0usize..600) {
            let entries = vec![LogEntry::default(); len];
            let rows = table_rows(&entries, &Utc);
            prop_assert_eq!(rows.len(), len.min(MAX_ROWS));
        }
    }
}
