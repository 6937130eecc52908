//! Countdown window arithmetic.
//!
//! Each scope defines a window: a start and end instant in local wall-clock
//! time that bound the total duration. Windows are recomputed fresh from
//! `now` on every call; nothing is cached or mutated, so [`calculate`] is
//! safe to call at redraw frequency.
//!
//! Durations are carried as `f64` milliseconds because the disposable-time
//! filter scales them by a real ratio.

pub mod color;
pub mod filter;
pub mod message;
pub mod units;

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::storage::Settings;

/// Milliseconds in one Julian year (365.25 days), used for age arithmetic.
pub(crate) const MS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Time-window granularity selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Day,
    Week,
    Month,
    Year,
    Life,
    Goal,
}

impl Scope {
    pub const ALL: [Scope; 6] = [
        Scope::Day,
        Scope::Week,
        Scope::Month,
        Scope::Year,
        Scope::Life,
        Scope::Goal,
    ];

    /// Human-readable subject for milestone messages.
    pub fn label(&self) -> &'static str {
        match self {
            Scope::Day => "Today",
            Scope::Week => "This week",
            Scope::Month => "This month",
            Scope::Year => "This year",
            Scope::Life => "Your life",
            Scope::Goal => "Your goal",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Day => "day",
            Scope::Week => "week",
            Scope::Month => "month",
            Scope::Year => "year",
            Scope::Life => "life",
            Scope::Goal => "goal",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Scope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Scope::Day),
            "week" => Ok(Scope::Week),
            "month" => Ok(Scope::Month),
            "year" => Ok(Scope::Year),
            "life" => Ok(Scope::Life),
            "goal" => Ok(Scope::Goal),
            other => Err(ConfigError::InvalidValue {
                key: "scope".into(),
                message: format!("expected day|week|month|year|life|goal, got '{other}'"),
            }),
        }
    }
}

/// Output of one countdown evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownResult {
    /// Time left in the window, milliseconds, never negative.
    pub remaining_ms: f64,
    /// Fraction of the window already elapsed, clamped to [0, 1].
    pub elapsed_ratio: f64,
    /// Window length in milliseconds. The unconfigured-goal sentinel uses
    /// 1.0 so downstream ratio math never divides by zero.
    pub total_ms: f64,
    /// Human-readable description of the window.
    pub context: String,
}

/// Compute the countdown for `scope` at the instant `now` (local wall clock).
///
/// With `use_disposable` set, the result is passed through the
/// disposable-time filter (see [`filter::apply_disposable`]).
pub fn calculate(
    scope: Scope,
    settings: &Settings,
    use_disposable: bool,
    now: NaiveDateTime,
) -> CountdownResult {
    let result = match scope {
        Scope::Day => calc_day(now, settings),
        Scope::Week => calc_week(now),
        Scope::Month => calc_month(now),
        Scope::Year => calc_year(now),
        Scope::Life => calc_life(now, settings),
        Scope::Goal => calc_goal(now, settings),
    };

    if use_disposable {
        filter::apply_disposable(result, settings)
    } else {
        result
    }
}

fn calc_day(now: NaiveDateTime, settings: &Settings) -> CountdownResult {
    let start = day_start(now.date());

    let (end, end_label) = match settings.bedtime {
        Some(bedtime) => {
            // Seconds are not part of the bedtime contract.
            let bedtime = NaiveTime::from_hms_opt(bedtime.hour(), bedtime.minute(), 0)
                .unwrap_or(bedtime);
            let mut end = now.date().and_time(bedtime);
            // Past bedtime already: roll to tomorrow's bedtime.
            if now >= end {
                end += Duration::days(1);
            }
            (end, format!("bedtime {}", bedtime.format("%H:%M")))
        }
        None => (day_end(now.date()), "23:59".to_string()),
    };

    window_result(start, end, now, format!("Today → until {end_label}"))
}

fn calc_week(now: NaiveDateTime) -> CountdownResult {
    // Monday starts the week; a Sunday `now` belongs to the week that
    // started six days earlier.
    let offset = now.weekday().num_days_from_monday() as i64;
    let start = day_start(now.date() - Duration::days(offset));
    let end = day_end(start.date() + Duration::days(6));

    window_result(
        start,
        end,
        now,
        format!("This week ({}) → until Sunday", now.format("%A")),
    )
}

fn calc_month(now: NaiveDateTime) -> CountdownResult {
    let first = now.date().with_day(1).unwrap_or(now.date());
    let last = last_day_of_month(now.date());
    let start = day_start(first);
    let end = day_end(last);

    window_result(
        start,
        end,
        now,
        format!("{} → until day {}", now.format("%B"), last.day()),
    )
}

fn calc_year(now: NaiveDateTime) -> CountdownResult {
    let year = now.year();
    let start = day_start(ymd(year, 1, 1, now.date()));
    let end = day_end(ymd(year, 12, 31, now.date()));

    window_result(start, end, now, format!("{year} → until Dec 31"))
}

fn calc_life(now: NaiveDateTime, settings: &Settings) -> CountdownResult {
    let birth = day_start(settings.birthday);
    let death = day_start(add_calendar_years(
        settings.birthday,
        settings.life_expectancy as i32,
    ));

    let total = ms_between(birth, death);
    let elapsed = ms_between(birth, now);
    let remaining = ms_between(now, death).max(0.0);
    let age = (elapsed / MS_PER_YEAR).floor() as i64;

    CountdownResult {
        remaining_ms: remaining,
        elapsed_ratio: clamped_ratio(elapsed, total),
        total_ms: total,
        context: format!("Age {age} → until {}", settings.life_expectancy),
    }
}

fn calc_goal(now: NaiveDateTime, settings: &Settings) -> CountdownResult {
    let Some(goal_date) = settings.goal_date else {
        // Sentinel: total 1.0 keeps downstream ratio math away from zero.
        return CountdownResult {
            remaining_ms: 0.0,
            elapsed_ratio: 0.0,
            total_ms: 1.0,
            context: "Set a goal date in the settings".to_string(),
        };
    };

    let end = goal_date
        .and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| day_end(goal_date));
    // The window starts at *today's* midnight, not at the date the goal was
    // configured, so the ratio resets toward 0 each new day. Intentional.
    let start = day_start(now.date());

    let total = ms_between(start, end);
    let elapsed = ms_between(start, now);
    let remaining = ms_between(now, end).max(0.0);

    let name = if settings.goal_name.is_empty() {
        "Goal"
    } else {
        settings.goal_name.as_str()
    };

    CountdownResult {
        remaining_ms: remaining,
        elapsed_ratio: clamped_ratio(elapsed, total),
        total_ms: total,
        context: format!("{name} → until {}", goal_date.format("%B %-d, %Y")),
    }
}

// ── Window helpers ───────────────────────────────────────────────────

fn window_result(
    start: NaiveDateTime,
    end: NaiveDateTime,
    now: NaiveDateTime,
    context: String,
) -> CountdownResult {
    let total = ms_between(start, end);
    let elapsed = ms_between(start, now);
    let remaining = ms_between(now, end).max(0.0);

    CountdownResult {
        remaining_ms: remaining,
        elapsed_ratio: clamped_ratio(elapsed, total),
        total_ms: total,
        context,
    }
}

/// Elapsed/total as a ratio clamped to [0, 1]; 0 when total is degenerate.
fn clamped_ratio(elapsed: f64, total: f64) -> f64 {
    if total > 0.0 {
        (elapsed / total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn ms_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64
}

pub(crate) fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}

fn ymd(year: i32, month: u32, day: u32, fallback: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(fallback)
}

/// Last calendar day of the month containing `date`: first day of the next
/// month minus one day, which handles all month lengths and leap February.
fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    ymd(year, month, 1, date) - Duration::days(1)
}

/// Add whole calendar years, preserving month and day. A Feb 29 anchor in a
/// non-leap target year lands on Mar 1, matching the original behavior.
fn add_calendar_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}
