//! Aggregation of fetched log entries
//!
//! Everything here is a pure function of the entry list. A snapshot is
//! recomputed from scratch on every successful refresh.

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};
use heimdall_shared::{canonical_instant, LogEntry};
use serde::{Deserialize, Serialize};

/// Rank used for the latency scorecard
const P95: f64 = 0.95;

/// Number of requests observed in one minute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Start of the minute (seconds and sub-seconds zeroed)
    pub minute: DateTime<Utc>,
    pub count: usize,
}

impl Bucket {
    /// Canonical key of the bucket, e.g. `2024-05-01T10:00:00.000Z`
    pub fn key(&self) -> String {
        canonical_instant(&self.minute)
    }
}

/// Summary statistics for one batch of entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub count: usize,
    pub p95_ms: f64,
    pub error_rate_pct: f64,
    /// Ascending by minute
    pub buckets: Vec<Bucket>,
}

impl AggregateSnapshot {
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        Self {
            count: entries.len(),
            p95_ms: p95_latency_ms(entries),
            error_rate_pct: error_rate_pct(entries),
            buckets: minute_buckets(entries),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Largest bucket count, at least 1 so it can be used as a divisor
    pub fn peak(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.count)
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

/// Nearest-rank percentile over an ascending slice
///
/// The rank is `floor(rank × N)` clamped to the last index, without
/// interpolation. Returns 0 for an empty slice.
pub fn nearest_rank(sorted: &[f64], rank: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = ((sorted.len() as f64) * rank).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// 95th percentile duration in milliseconds; entries without a duration are skipped
pub fn p95_latency_ms(entries: &[LogEntry]) -> f64 {
    let mut latencies: Vec<f64> = entries
        .iter()
        .filter_map(LogEntry::duration_ms)
        .filter(|ms| ms.is_finite())
        .collect();
    latencies.sort_by(f64::total_cmp);
    nearest_rank(&latencies, P95)
}

/// Share of entries with status >= 400, in percent
pub fn error_rate_pct(entries: &[LogEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let errors = entries.iter().filter(|entry| entry.is_error()).count();
    (errors as f64 / entries.len() as f64) * 100.0
}

/// Truncate an instant to the start of its minute
pub fn minute_of(timestamp: &DateTime<Utc>) -> Option<DateTime<Utc>> {
    timestamp.with_second(0)?.with_nanosecond(0)
}

/// Per-minute request counts, ascending
///
/// Entries without a timestamp count towards the total but land in no bucket.
pub fn minute_buckets(entries: &[LogEntry]) -> Vec<Bucket> {
    let mut counts: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
    for minute in entries
        .iter()
        .filter_map(|entry| entry.timestamp.as_ref())
        .filter_map(minute_of)
    {
        *counts.entry(minute).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(minute, count)| Bucket { minute, count })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    pub(crate) fn entry(status: u16, duration_ms: u64) -> LogEntry {
        LogEntry {
            status: Some(status),
            duration_ns: Some(duration_ms * 1_000_000),
            ..LogEntry::default()
        }
    }

    pub(crate) fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let snapshot = AggregateSnapshot::from_entries(&[]);
        assert_eq!(snapshot, AggregateSnapshot::default());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.peak(), 1);
    }

    #[test]
    fn test_two_entries() {
        let snapshot = AggregateSnapshot::from_entries(&[entry(200, 10), entry(500, 20)]);

        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.error_rate_pct, 50.0);
        // floor(0.95 * 2) = 1 -> the second sorted value
        assert_eq!(snapshot.p95_ms, 20.0);
    }

    #[test]
    fn test_p95_nearest_rank() {
        let entries: Vec<_> = (1..=20).rev().map(|ms| entry(200, ms)).collect();
        // floor(0.95 * 20) = 19, the largest of twenty
        assert_eq!(p95_latency_ms(&entries), 20.0);

        let entries: Vec<_> = (1..=10).map(|ms| entry(200, ms)).collect();
        // floor(9.5) = 9
        assert_eq!(p95_latency_ms(&entries), 10.0);

        assert_eq!(p95_latency_ms(&[entry(200, 7)]), 7.0);
    }

    #[test]
    fn test_p95_skips_missing_durations() {
        let mut entries = vec![entry(200, 30), entry(200, 10)];
        entries.push(LogEntry {
            status: Some(200),
            ..LogEntry::default()
        });

        assert_eq!(p95_latency_ms(&entries), 30.0);
        assert_eq!(p95_latency_ms(&entries[2..]), 0.0);
    }

    #[test]
    fn test_error_rate_counts_4xx_and_5xx() {
        let mut entries = vec![entry(200, 1), entry(404, 1), entry(503, 1)];
        entries.push(LogEntry::default());

        assert_eq!(error_rate_pct(&entries), 50.0);
    }

    #[test]
    fn test_sub_minute_timestamps_share_a_bucket() {
        let entries = vec![
            LogEntry {
                timestamp: Some(at(10, 0, 3)),
                ..LogEntry::default()
            },
            LogEntry {
                timestamp: Some(at(10, 0, 47) + chrono::Duration::milliseconds(999)),
                ..LogEntry::default()
            },
        ];

        let buckets = minute_buckets(&entries);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].minute, at(10, 0, 0));
        assert_eq!(buckets[0].key(), "2024-05-01T10:00:00.000Z");
        assert_eq!(buckets[0].count, 2);
    }

    #[test]
    fn test_buckets_sorted_and_skip_missing_timestamps() {
        let entries = vec![
            LogEntry {
                timestamp: Some(at(10, 5, 1)),
                ..LogEntry::default()
            },
            LogEntry::default(),
            LogEntry {
                timestamp: Some(at(9, 59, 59)),
                ..LogEntry::default()
            },
            LogEntry {
                timestamp: Some(at(10, 5, 30)),
                ..LogEntry::default()
            },
        ];

        let snapshot = AggregateSnapshot::from_entries(&entries);
        assert_eq!(snapshot.count, 4);
        assert_eq!(
            snapshot.buckets,
            vec![
                Bucket { minute: at(9, 59, 0), count: 1 },
                Bucket { minute: at(10, 5, 0), count: 2 },
            ]
        );
        assert_eq!(snapshot.peak(), 2);
    }

    fn arb_entry() -> impl Strategy<Value = LogEntry> {
        (
            proptest::option::of(0i64..86_400),
            proptest::option::of(100u16..600),
            proptest::option::of(0u64..5_000_000_000),
        )
            .prop_map(|(offset, status, duration_ns)| LogEntry {
                timestamp: offset.map(|secs| at(0, 0, 0) + chrono::Duration::seconds(secs)),
                status,
                duration_ns,
                ..LogEntry::default()
            })
    }

    proptest! {
        #[test]
        fn prop_error_rate_in_range(entries in proptest::collection::vec(arb_entry(), 0..300)) {
            let rate = error_rate_pct(&entries);
            prop_assert!((0.0..=100.0).contains(&rate));
            if entries.is_empty() {
                prop_assert_eq!(rate, 0.0);
            }
        }

        #[test]
        fn prop_p95_is_nearest_rank(entries in proptest::collection::vec(arb_entry(), 0..300)) {
            let mut sorted: Vec<f64> = entries.iter().filter_map(LogEntry::duration_ms).collect();
            sorted.sort_by(f64::total_cmp);

            let expected = if sorted.is_empty() {
                0.0
            } else {
                let index = ((sorted.len() as f64) * 0.95).floor() as usize;
                sorted[index.min(sorted.len() - 1)]
            };
            prop_assert_eq!(p95_latency_ms(&entries), expected);
        }

        #[test]
        fn prop_buckets_ignore_order(
            (entries, shuffled) in proptest::collection::vec(arb_entry(), 0..200)
                .prop_flat_map(|entries| {
                    let shuffled = Just(entries.clone()).prop_shuffle();
                    (Just(entries), shuffled)
                })
        ) {
            prop_assert_eq!(minute_buckets(&entries), minute_buckets(&shuffled));

            let total: usize = minute_buckets(&entries).iter().map(|b| b.count).sum();
            let stamped = entries.iter().filter(|e| e.timestamp.is_some()).count();
            prop_assert_eq!(total, stamped);
        }
    }
}
