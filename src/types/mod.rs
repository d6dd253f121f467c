//! Core data types for the focus timer.
//!
//! This module defines the data structures used for:
//! - Timer modes and the transition between them
//! - Per-mode durations
//! - Countdown state

use serde::{Deserialize, Serialize};

/// Default focus duration in minutes.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

/// Default short break duration in minutes.
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;

/// Default long break duration in minutes.
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;

/// A long break follows every this many completed focus sessions.
pub const LONG_BREAK_INTERVAL: u32 = 4;

// ============================================================================
// TimerMode
// ============================================================================

/// The three modes of the Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    /// A focus session (one pomodoro)
    #[default]
    Focus,
    /// A short break between focus sessions
    ShortBreak,
    /// A long break after every fourth focus session
    LongBreak,
}

impl TimerMode {
    /// All modes, in cycle order.
    pub const ALL: [TimerMode; 3] = [TimerMode::Focus, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Returns true for either break mode.
    pub fn is_break(&self) -> bool {
        matches!(self, TimerMode::ShortBreak | TimerMode::LongBreak)
    }

    /// Returns the mode that follows this one.
    ///
    /// `completed_focus_count` is the count *after* the finishing session
    /// has been tallied.
    pub fn next(&self, completed_focus_count: u32) -> TimerMode {
        match self {
            TimerMode::Focus => {
                if completed_focus_count % LONG_BREAK_INTERVAL == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// TimerDurations
// ============================================================================

/// Durations, in minutes, for each mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDurations {
    /// Focus duration in minutes
    pub focus_minutes: u32,
    /// Short break duration in minutes
    pub short_break_minutes: u32,
    /// Long break duration in minutes
    pub long_break_minutes: u32,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
        }
    }
}

impl TimerDurations {
    /// Creates durations from minutes.
    pub fn new(focus_minutes: u32, short_break_minutes: u32, long_break_minutes: u32) -> Self {
        Self {
            focus_minutes,
            short_break_minutes,
            long_break_minutes,
        }
    }

    /// Returns the configured minutes for a mode.
    pub fn minutes_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Sets the minutes for a single mode.
    pub fn set_minutes_for(&mut self, mode: TimerMode, minutes: u32) {
        match mode {
            TimerMode::Focus => self.focus_minutes = minutes,
            TimerMode::ShortBreak => self.short_break_minutes = minutes,
            TimerMode::LongBreak => self.long_break_minutes = minutes,
        }
    }

    /// Returns the duration for a mode in seconds (never zero).
    pub fn seconds_for(&self, mode: TimerMode) -> u32 {
        self.minutes_for(mode).max(1).saturating_mul(60)
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state of the timer.
///
/// `remaining_seconds` never exceeds `total_seconds`, and `total_seconds`
/// is never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current mode
    pub mode: TimerMode,
    /// Remaining seconds in the current mode
    pub remaining_seconds: u32,
    /// Length of the current countdown in seconds
    pub total_seconds: u32,
    /// Whether the countdown has been started
    pub is_running: bool,
    /// Whether the countdown is paused
    pub is_paused: bool,
    /// Number of completed focus sessions
    pub completed_focus_count: u32,
}

impl TimerState {
    /// Creates a stopped state in focus mode.
    pub fn new(durations: &TimerDurations) -> Self {
        let total = durations.seconds_for(TimerMode::Focus);
        Self {
            mode: TimerMode::Focus,
            remaining_seconds: total,
            total_seconds: total,
            is_running: false,
            is_paused: false,
            completed_focus_count: 0,
        }
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has reached zero.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Restores the full countdown for the current mode.
    pub fn rewind(&mut self) {
        self.remaining_seconds = self.total_seconds;
    }

    /// Replaces the countdown length and rewinds to it.
    pub fn set_total_seconds(&mut self, seconds: u32) {
        self.total_seconds = seconds.max(1);
        self.remaining_seconds = self.total_seconds;
    }

    /// Extends both the countdown length and the remaining time.
    pub fn extend_by_seconds(&mut self, seconds: u32) {
        self.total_seconds = self.total_seconds.saturating_add(seconds);
        self.remaining_seconds = self.remaining_seconds.saturating_add(seconds);
    }

    /// Returns true if the countdown is currently advancing.
    pub fn is_counting(&self) -> bool {
        self.is_running && !self.is_paused
    }

    /// Returns true if the duration may be edited (stopped or paused).
    pub fn is_adjustable(&self) -> bool {
        !self.is_running || self.is_paused
    }

    /// Fraction of the countdown elapsed, from 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.total_seconds - self.remaining_seconds) / f64::from(self.total_seconds)
    }

    /// Remaining time as `MM:SS`.
    pub fn remaining_formatted(&self) -> String {
        format_mm_ss(self.remaining_seconds)
    }
}

/// Formats seconds as `MM:SS`.
pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// ============================================================================
// Tests
// ============================================================================
