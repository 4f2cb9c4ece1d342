//! Query Builder
//!
//! Turns the filter bar's raw field values into a [`QuerySpec`].
//!
//! Time fields hold browser `datetime-local` values, i.e. wall-clock time in
//! the viewer's zone without an offset. The zone is a type parameter so the
//! conversion can be pinned in tests; the app uses [`chrono::Local`].

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use heimdall_shared::{QuerySpec, ViewerConfig, DEFAULT_LIMIT};

/// Value format of `<input type="datetime-local" step="1">`
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Browsers drop the seconds when they are zero and `step` is unset
const INPUT_FORMAT_NO_SECONDS: &str = "%Y-%m-%dT%H:%M";

/// Raw contents of the filter bar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub from: String,
    pub to: String,
    pub method: String,
    pub status: String,
    pub namespace: String,
    pub pod: String,
    pub path: String,
}

/// How the query window is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRangeMode {
    /// Trailing window ending now, recomputed before every query
    #[default]
    Auto,
    /// Whatever the user typed into the time fields
    Manual,
}

/// Builds queries from the filter form
#[derive(Debug, Clone)]
pub struct QueryBuilder<Tz: TimeZone = Local> {
    mode: TimeRangeMode,
    window: Duration,
    tz: Tz,
}

impl QueryBuilder<Local> {
    pub fn new(config: &ViewerConfig) -> Self {
        Self::with_timezone(config, Local)
    }
}

impl Default for QueryBuilder<Local> {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl<Tz> QueryBuilder<Tz>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    pub fn with_timezone(config: &ViewerConfig, tz: Tz) -> Self {
        Self {
            mode: TimeRangeMode::Auto,
            window: Duration::minutes(i64::from(config.auto_range_minutes)),
            tz,
        }
    }

    pub fn mode(&self) -> TimeRangeMode {
        self.mode
    }

    /// The user edited a time field; auto mode never comes back
    pub fn mark_manual(&mut self) {
        if self.mode == TimeRangeMode::Auto {
            tracing::debug!("time range switched to manual");
        }
        self.mode = TimeRangeMode::Manual;
    }

    /// Write the trailing window ending at `now` into the form's time fields
    pub fn fill_auto_range(&self, form: &mut FilterForm, now: DateTime<Utc>) {
        let (from, to) = self.auto_window(now);
        form.from = self.to_input_value(&from);
        form.to = self.to_input_value(&to);
    }

    /// Build the query for the current form
    ///
    /// In auto mode the time fields are overwritten first, so stale values
    /// from an earlier refresh never reach the server.
    pub fn build(&self, form: &mut FilterForm, now: DateTime<Utc>) -> QuerySpec {
        let (from, to) = match self.mode {
            TimeRangeMode::Auto => {
                self.fill_auto_range(form, now);
                let (from, to) = self.auto_window(now);
                (Some(from), Some(to))
            }
            TimeRangeMode::Manual => (
                self.parse_input_value(&form.from),
                self.parse_input_value(&form.to),
            ),
        };

        QuerySpec {
            from,
            to,
            method: non_empty(&form.method).map(|m| m.to_uppercase()),
            status: non_empty(&form.status),
            namespace: non_empty(&form.namespace),
            pod: non_empty(&form.pod),
            path: non_empty(&form.path),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Window bounds at whole-second precision, as the inputs display them
    fn auto_window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let to = now.with_nanosecond(0).unwrap_or(now);
        (to - self.window, to)
    }

    fn to_input_value(&self, instant: &DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.tz)
            .format(INPUT_FORMAT)
            .to_string()
    }

    fn parse_input_value(&self, value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let naive = NaiveDateTime::parse_from_str(value, INPUT_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(value, INPUT_FORMAT_NO_SECONDS))
            .ok()?;

        // Wall-clock times skipped by a DST jump have no instant; ambiguous
        // ones resolve to the earlier.
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
