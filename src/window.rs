//! # Time Window
//! Resolves the analysis period from the four time settings.
//!
//! Precedence (first satisfied rule wins):
//! 1. start + end date  → `custom_range`
//! 2. start date only   → `from_date`
//! 3. days/hours        → `duration` (defaults to 24h when the total is not positive)
//!
//! Malformed dates never fail the run; they are logged and treated as absent.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_HISTORY_HOURS: i64 = 24;

/// Raw time settings as configured (env vars or tests).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConfig {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub days: i64,
    pub hours: i64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            days: 1,
            hours: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    CustomRange,
    FromDate,
    Duration,
}

impl WindowMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowMode::CustomRange => "custom_range",
            WindowMode::FromDate => "from_date",
            WindowMode::Duration => "duration",
        }
    }
}

/// Resolved analysis period. Instants are local wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: String,
    pub mode: WindowMode,
}

impl TimeWindow {
    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Resolve against the current local time.
pub fn resolve(cfg: &TimeConfig) -> TimeWindow {
    resolve_at(cfg, Local::now().naive_local())
}

/// Same as [`resolve`] but with an explicit "now" (pure; used by tests).
pub fn resolve_at(cfg: &TimeConfig, now: NaiveDateTime) -> TimeWindow {
    let start = parse_date_setting("start", cfg.start_date.as_deref());
    let end = parse_date_setting("end", cfg.end_date.as_deref());

    if let (Some(start), Some(end)) = (start, end) {
        let end = end.min(now);
        let start = if start > end {
            day_before(end)
        } else {
            start
        };
        return TimeWindow {
            description: format!(
                "{} to {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
            start,
            end,
            mode: WindowMode::CustomRange,
        };
    }

    if let Some(start) = start {
        let start = if start > now {
            day_before(now)
        } else {
            start
        };
        return TimeWindow {
            description: format!("{} to present", start.format(DATE_FORMAT)),
            start,
            end: now,
            mode: WindowMode::FromDate,
        };
    }

    let mut total_hours = cfg.days.saturating_mul(24).saturating_add(cfg.hours);
    if total_hours <= 0 {
        total_hours = DEFAULT_HISTORY_HOURS;
    }
    let start = match Duration::try_hours(total_hours).and_then(|d| now.checked_sub_signed(d)) {
        Some(start) => start,
        None => {
            warn!(target: "window", days = cfg.days, hours = cfg.hours,
                "duration out of range; using default");
            total_hours = DEFAULT_HISTORY_HOURS;
            now.checked_sub_signed(Duration::hours(DEFAULT_HISTORY_HOURS))
                .unwrap_or(now)
        }
    };

    TimeWindow {
        start,
        end: now,
        description: format!(
            "past {} days {} hours",
            total_hours / 24,
            total_hours % 24
        ),
        mode: WindowMode::Duration,
    }
}

/// One day earlier, or `t` itself at the bottom of the calendar range.
fn day_before(t: NaiveDateTime) -> NaiveDateTime {
    t.checked_sub_signed(Duration::days(1)).unwrap_or(t)
}

/// Parse a `YYYY-MM-DD` setting into midnight of that day.
/// Blank means "not configured"; garbage is logged and also treated as absent.
fn parse_date_setting(which: &str, raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(d) => d.and_hms_opt(0, 0, 0),
        Err(e) => {
            warn!(target: "window", setting = which, value = raw, error = %e,
                "malformed date setting; ignoring it");
            None
        }
    }
}
