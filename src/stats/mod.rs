//! Usage statistics.
//!
//! Completed focus sessions are accumulated into lifetime totals and a
//! date-keyed daily mapping. Counters only ever grow; each update persists
//! the whole daily mapping as one snapshot.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{load_value, save_value, KeyValueStore};

/// Store key for the lifetime pomodoro count.
pub const COMPLETED_POMODORO_COUNT_KEY: &str = "completed_pomodoro_count";

/// Store key for the lifetime focus minutes.
pub const TOTAL_FOCUS_MINUTES_KEY: &str = "total_focus_minutes";

/// Store key for the daily mapping.
pub const DAILY_STATS_KEY: &str = "daily_stats";

/// Format of the calendar-day keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Receives completed focus sessions from the timer engine.
pub trait SessionRecorder: Send + Sync {
    /// Records one completed focus session of `focus_minutes` minutes.
    fn record_focus_session(&self, focus_minutes: u32);
}

/// Accumulated usage for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    /// Calendar day, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// Completed focus sessions
    pub pomodoro_count: u32,
    /// Completed focus minutes
    pub focus_minutes: u32,
}

impl DailyStat {
    fn empty(date: &str) -> Self {
        Self {
            date: date.to_string(),
            ..Self::default()
        }
    }
}

/// Returns the key used for `date`.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats minutes as `1h 5m`, or `45m` below one hour.
pub fn format_focus_minutes(total: u32) -> String {
    let hours = total / 60;
    let minutes = total % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[derive(Debug, Default)]
struct Totals {
    pomodoro_count: u32,
    focus_minutes: u32,
    daily: BTreeMap<String, DailyStat>,
}

/// Persistent statistics backed by the key-value store.
pub struct StatisticsStore {
    store: Arc<dyn KeyValueStore>,
    totals: Mutex<Totals>,
}

impl StatisticsStore {
    /// Loads statistics from the store; missing entries start at zero.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut daily: BTreeMap<String, DailyStat> =
            load_value(store.as_ref(), DAILY_STATS_KEY).unwrap_or_default();
        for (key, stat) in daily.iter_mut() {
            if stat.date.is_empty() {
                stat.date = key.clone();
            }
        }

        let totals = Totals {
            pomodoro_count: load_value(store.as_ref(), COMPLETED_POMODORO_COUNT_KEY).unwrap_or(0),
            focus_minutes: load_value(store.as_ref(), TOTAL_FOCUS_MINUTES_KEY).unwrap_or(0),
            daily,
        };

        Self {
            store,
            totals: Mutex::new(totals),
        }
    }

    /// Lifetime number of completed focus sessions.
    pub fn total_pomodoro_count(&self) -> u32 {
        self.lock().pomodoro_count
    }

    /// Lifetime focus minutes.
    pub fn total_focus_minutes(&self) -> u32 {
        self.lock().focus_minutes
    }

    /// Lifetime focus time as `1h 5m`.
    pub fn total_focus_formatted(&self) -> String {
        format_focus_minutes(self.total_focus_minutes())
    }

    /// A copy of the full daily mapping.
    pub fn daily_stats(&self) -> BTreeMap<String, DailyStat> {
        self.lock().daily.clone()
    }

    /// Usage for one day (zero if nothing was recorded).
    pub fn day(&self, date: NaiveDate) -> DailyStat {
        let key = date_key(date);
        self.lock()
            .daily
            .get(&key)
            .cloned()
            .unwrap_or_else(|| DailyStat::empty(&key))
    }

    /// Usage for the `days` days ending at `today`, oldest first.
    ///
    /// Days without records are included with zero counts.
    pub fn last_days(&self, today: NaiveDate, days: u32) -> Vec<DailyStat> {
        let totals = self.lock();
        (0..u64::from(days))
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|date| {
                let key = date_key(date);
                totals
                    .daily
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| DailyStat::empty(&key))
            })
            .collect()
    }

    /// Usage for the last seven days ending at `today`, oldest first.
    pub fn last_seven_days(&self, today: NaiveDate) -> Vec<DailyStat> {
        self.last_days(today, 7)
    }

    /// Records one completed focus session on `date`.
    pub fn record_on(&self, date: NaiveDate, focus_minutes: u32) {
        let key = date_key(date);
        let mut totals = self.lock();

        totals.pomodoro_count = totals.pomodoro_count.saturating_add(1);
        totals.focus_minutes = totals.focus_minutes.saturating_add(focus_minutes);

        let entry = totals
            .daily
            .entry(key.clone())
            .or_insert_with(|| DailyStat::empty(&key));
        entry.pomodoro_count = entry.pomodoro_count.saturating_add(1);
        entry.focus_minutes = entry.focus_minutes.saturating_add(focus_minutes);

        debug!(
            "Recorded {} focus minutes on {} (day total: {} sessions)",
            focus_minutes, key, entry.pomodoro_count
        );

        let store = self.store.as_ref();
        save_value(store, COMPLETED_POMODORO_COUNT_KEY, &totals.pomodoro_count);
        save_value(store, TOTAL_FOCUS_MINUTES_KEY, &totals.focus_minutes);
        save_value(store, DAILY_STATS_KEY, &totals.daily);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Totals> {
        self.totals.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionRecorder for StatisticsStore {
    fn record_focus_session(&self, focus_minutes: u32) {
        self.record_on(Local::now().date_naive(), focus_minutes);
    }
}

impl std::fmt::Debug for StatisticsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let totals = self.lock();
        f.debug_struct("StatisticsStore")
            .field("pomodoro_count", &totals.pomodoro_count)
            .field("focus_minutes", &totals.focus_minutes)
            .field("days", &totals.daily.len())
            .finish_non_exhaustive()
    }
}

/// A recorder that discards every session (statistics tracking disabled).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl SessionRecorder for NullRecorder {
    fn record_focus_session(&self, _focus_minutes: u32) {}
}

/// Mock session recorder for testing.
#[derive(Debug, Default)]
pub struct MockSessionRecorder {
    sessions: Mutex<Vec<u32>>,
}

impl MockSessionRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Minutes of every recorded session, in order.
    #[must_use]
    pub fn sessions(&self) -> Vec<u32> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl SessionRecorder for MockSessionRecorder {
    fn record_focus_session(&self, focus_minutes: u32) {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).push(focus_minutes);
    }
}
