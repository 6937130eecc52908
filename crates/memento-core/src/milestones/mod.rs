//! Milestone notifications.
//!
//! A date-bucketed notification-dedup state machine. Identifiers are
//! deterministic (scope + threshold), so "already shown" is a membership
//! test, and delivery is at-most-once per identifier per day for
//! progress milestones, at-most-once ever for the life anniversaries.
//!
//! The tracker assumes a single concurrent evaluator. Persistence failures
//! are swallowed at the point of access; losing state re-notifies rather
//! than silencing, never the other way around.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::countdown::units::group_thousands;
use crate::countdown::{day_start, CountdownResult, Scope, MS_PER_YEAR};
use crate::storage::kv::KvStore;
use crate::storage::Settings;

const SHOWN_KEY: &str = "milestones_shown";
const DATE_KEY: &str = "milestones_date";

/// Percentage-elapsed thresholds, checked in ascending order.
pub const PERCENT_THRESHOLDS: [u32; 5] = [25, 50, 75, 90, 95];

/// A milestone the user has just crossed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneNotification {
    /// Stable identifier, e.g. `day_75pct` or `life_13000days`.
    pub id: String,
    pub icon: &'static str,
    pub message: String,
}

/// Tracks which milestones have been shown, persisting through a
/// key-value store: a JSON array of identifiers plus the calendar date of
/// the last daily reset.
pub struct MilestoneTracker<S: KvStore> {
    store: S,
    shown: HashSet<String>,
    last_reset: NaiveDate,
}

impl<S: KvStore> MilestoneTracker<S> {
    /// Load persisted state. Unreadable or corrupt state degrades to an
    /// empty shown set. If the persisted date differs from `today`, the
    /// daily reset runs immediately.
    pub fn load(store: S, today: NaiveDate) -> Self {
        let shown: HashSet<String> = store
            .get(SHOWN_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default();
        let stored_date = store.get(DATE_KEY).and_then(|raw| raw.trim().parse().ok());

        let mut tracker = Self {
            store,
            shown,
            last_reset: today,
        };
        if stored_date != Some(today) {
            tracker.daily_reset(today);
        }
        tracker
    }

    pub fn was_shown(&self, id: &str) -> bool {
        self.shown.contains(id)
    }

    /// Identifiers shown so far, sorted.
    pub fn shown(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.shown.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Record an identifier as shown and persist.
    pub fn mark_shown(&mut self, id: &str) {
        self.shown.insert(id.to_string());
        self.persist_shown();
    }

    /// Clear all state, including the permanent life milestones.
    pub fn reset(&mut self, today: NaiveDate) {
        self.shown.clear();
        self.last_reset = today;
        self.persist_shown();
        self.persist_date();
    }

    /// Run the daily reset if the calendar date moved past `last_reset`.
    pub fn roll_date(&mut self, today: NaiveDate) {
        if today != self.last_reset {
            self.daily_reset(today);
        }
    }

    /// Evaluate milestones for one countdown result. Does not mark anything
    /// shown; the caller calls [`mark_shown`](Self::mark_shown) for each
    /// notification it actually presents.
    pub fn check(
        &mut self,
        scope: Scope,
        result: &CountdownResult,
        settings: &Settings,
        now: NaiveDateTime,
    ) -> Vec<MilestoneNotification> {
        self.roll_date(now.date());

        let mut notifications = Vec::new();

        let percent = (result.elapsed_ratio * 100.0).floor() as u32;
        for threshold in PERCENT_THRESHOLDS {
            let id = format!("{scope}_{threshold}pct");
            if percent >= threshold && !self.was_shown(&id) {
                notifications.push(MilestoneNotification {
                    id,
                    icon: percent_icon(threshold),
                    message: format!(
                        "{} is {threshold}% over. {}% remains.",
                        scope.label(),
                        100 - threshold
                    ),
                });
            }
        }

        if scope == Scope::Life {
            self.check_life(settings, now, &mut notifications);
        }

        notifications
    }

    fn check_life(
        &self,
        settings: &Settings,
        now: NaiveDateTime,
        notifications: &mut Vec<MilestoneNotification>,
    ) {
        let age_ms = (now - day_start(settings.birthday)).num_milliseconds() as f64;
        let age_days = (age_ms / 86_400_000.0).floor() as i64;

        // Every full thousand days lived.
        let thousand_days = age_days / 1_000 * 1_000;
        if thousand_days > 0 {
            let id = format!("life_{thousand_days}days");
            if !self.was_shown(&id) {
                notifications.push(MilestoneNotification {
                    id,
                    icon: "🎯",
                    message: format!(
                        "{} days of your life have passed. Make each one count.",
                        group_thousands(thousand_days)
                    ),
                });
            }
        }

        // Round-decade birthdays from 20 up.
        let age_years = (age_ms / MS_PER_YEAR).floor() as i64;
        let decade = age_years / 10 * 10;
        if decade >= 20 {
            let id = format!("life_{decade}age");
            if !self.was_shown(&id) {
                notifications.push(MilestoneNotification {
                    id,
                    icon: "🏆",
                    message: format!("Your {decade}s. How will you spend the next ten years?"),
                });
            }
        }
    }

    fn daily_reset(&mut self, today: NaiveDate) {
        // Progress milestones are day-scoped and become eligible again;
        // life anniversaries fire once ever and survive the reset.
        self.shown.retain(|id| !id.ends_with("pct"));
        self.last_reset = today;
        self.persist_shown();
        self.persist_date();
    }

    fn persist_shown(&self) {
        match serde_json::to_string(&self.shown()) {
            Ok(json) => {
                if let Err(e) = self.store.set(SHOWN_KEY, &json) {
                    eprintln!("Warning: failed to persist milestone state: {e}");
                }
            }
            Err(e) => eprintln!("Warning: failed to encode milestone state: {e}"),
        }
    }

    fn persist_date(&self) {
        if let Err(e) = self.store.set(DATE_KEY, &self.last_reset.to_string()) {
            eprintln!("Warning: failed to persist milestone date: {e}");
        }
    }
}

fn percent_icon(threshold: u32) -> &'static str {
    if threshold >= 90 {
        "🔥"
    } else if threshold >= 75 {
        "⚡"
    } else {
        "📊"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryKvStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn result_with_ratio(ratio: f64) -> CountdownResult {
        CountdownResult {
            remaining_ms: 1_000.0,
            elapsed_ratio: ratio,
            total_ms: 10_000.0,
            context: String::new(),
        }
    }

    fn noon(d: NaiveDate) -> NaiveDateTime {
        d.and_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn thresholds_fire_cumulatively() {
        let today = date(2024, 3, 5);
        let mut tracker = MilestoneTracker::load(MemoryKvStore::new(), today);
        let notifications = tracker.check(
            Scope::Day,
            &result_with_ratio(0.76),
            &Settings::default(),
            noon(today),
        );
        let ids: Vec<&str> = notifications.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["day_25pct", "day_50pct", "day_75pct"]);
        assert_eq!(notifications[2].icon, "⚡");
        assert_eq!(notifications[0].icon, "📊");
    }

    #[test]
    fn ninety_percent_gets_fire_icon() {
        let today = date(2024, 3, 5);
        let mut tracker = MilestoneTracker::load(MemoryKvStore::new(), today);
        let notifications = tracker.check(
            Scope::Week,
            &result_with_ratio(0.97),
            &Settings::default(),
            noon(today),
        );
        let last = notifications.last().unwrap();
        assert_eq!(last.id, "week_95pct");
        assert_eq!(last.icon, "🔥");
    }

    #[test]
    fn marked_milestones_do_not_fire_twice() {
        let today = date(2024, 3, 5);
        let mut tracker = MilestoneTracker::load(MemoryKvStore::new(), today);
        let settings = Settings::default();

        let first = tracker.check(Scope::Day, &result_with_ratio(0.5), &settings, noon(today));
        assert!(!first.is_empty());
        for n in &first {
            tracker.mark_shown(&n.id);
        }

        let second = tracker.check(Scope::Day, &result_with_ratio(0.5), &settings, noon(today));
        assert!(second.is_empty());
    }

    #[test]
    fn state_survives_reload_through_store() {
        let store = MemoryKvStore::new();
        let today = date(2024, 3, 5);
        {
            let mut tracker = MilestoneTracker::load(&store, today);
            tracker.mark_shown("day_25pct");
        }
        let tracker = MilestoneTracker::load(&store, today);
        assert!(tracker.was_shown("day_25pct"));
    }

    #[test]
    fn daily_reset_reopens_progress_milestones() {
        let store = MemoryKvStore::new();
        let today = date(2024, 3, 5);
        let mut tracker = MilestoneTracker::load(&store, today);
        tracker.mark_shown("day_25pct");
        tracker.mark_shown("life_13000days");

        // Next calendar day: progress ids clear, life anniversaries stay.
        let tomorrow = date(2024, 3, 6);
        let notifications = tracker.check(
            Scope::Day,
            &result_with_ratio(0.3),
            &Settings::default(),
            noon(tomorrow),
        );
        assert!(notifications.iter().any(|n| n.id == "day_25pct"));
        assert!(tracker.was_shown("life_13000days"));
        assert!(!tracker.was_shown("day_25pct"));
    }

    #[test]
    fn load_resets_when_persisted_date_is_stale() {
        let store = MemoryKvStore::new();
        store
            .set("milestones_shown", r#"["day_50pct","life_20age"]"#)
            .unwrap();
        store.set("milestones_date", "2024-03-04").unwrap();

        let tracker = MilestoneTracker::load(&store, date(2024, 3, 5));
        assert!(!tracker.was_shown("day_50pct"));
        assert!(tracker.was_shown("life_20age"));
        assert_eq!(store.get("milestones_date").as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn corrupt_state_degrades_to_empty() {
        let store = MemoryKvStore::new();
        store.set("milestones_shown", "not json").unwrap();
        store.set("milestones_date", "2024-03-05").unwrap();
        let tracker = MilestoneTracker::load(&store, date(2024, 3, 5));
        assert!(tracker.shown().is_empty());
    }

    #[test]
    fn life_thousand_day_milestone() {
        let today = date(2024, 3, 5);
        let mut settings = Settings::default();
        // 1000 days before `today` plus a little margin.
        settings.birthday = today - chrono::Duration::days(1_050);
        let mut tracker = MilestoneTracker::load(MemoryKvStore::new(), today);
        let notifications = tracker.check(
            Scope::Life,
            &result_with_ratio(0.0),
            &settings,
            noon(today),
        );
        assert!(notifications.iter().any(|n| n.id == "life_1000days"));
    }

    #[test]
    fn life_decade_milestone_starts_at_twenty() {
        let today = date(2024, 3, 5);
        let mut tracker = MilestoneTracker::load(MemoryKvStore::new(), today);

        let mut settings = Settings::default();
        settings.birthday = date(2006, 1, 1); // age 18
        let young = tracker.check(
            Scope::Life,
            &result_with_ratio(0.0),
            &settings,
            noon(today),
        );
        assert!(!young.iter().any(|n| n.id.ends_with("age")));

        settings.birthday = date(1990, 1, 1); // age 34 -> decade 30
        let mut tracker = MilestoneTracker::load(MemoryKvStore::new(), today);
        let notifications = tracker.check(
            Scope::Life,
            &result_with_ratio(0.0),
            &settings,
            noon(today),
        );
        assert!(notifications.iter().any(|n| n.id == "life_30age"));
    }

    #[test]
    fn life_milestones_only_fire_in_life_scope() {
        let today = date(2024, 3, 5);
        let mut tracker = MilestoneTracker::load(MemoryKvStore::new(), today);
        let notifications = tracker.check(
            Scope::Year,
            &result_with_ratio(0.0),
            &Settings::default(),
            noon(today),
        );
        assert!(notifications.is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let store = MemoryKvStore::new();
        let today = date(2024, 3, 5);
        let mut tracker = MilestoneTracker::load(&store, today);
        tracker.mark_shown("life_20age");
        tracker.reset(today);
        assert!(tracker.shown().is_empty());
        assert_eq!(store.get("milestones_shown").as_deref(), Some("[]"));
    }
}
