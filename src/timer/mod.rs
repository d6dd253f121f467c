//! Countdown engine for the focus timer.
//!
//! This module provides the core timer functionality:
//! - Mode transitions (Focus → ShortBreak / LongBreak → Focus)
//! - Countdown driven by a one-second `tokio::time::interval`
//! - Statistics and notification callbacks on completion
//! - Optional auto-start of the next mode
//! - Duration adjustments while stopped or paused

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::notification::Notifier;
use crate::stats::SessionRecorder;
use crate::types::{TimerDurations, TimerMode, TimerState};

// ============================================================================
// TimerEvent
// ============================================================================

/// Events emitted by the engine for the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started from a stopped state
    Started { mode: TimerMode },
    /// Countdown paused
    Paused,
    /// Countdown resumed
    Resumed,
    /// Countdown stopped and rewound
    Reset,
    /// One second elapsed
    Tick {
        /// Remaining seconds
        remaining_seconds: u32,
    },
    /// A countdown reached zero and the engine moved to the next mode
    CycleCompleted {
        finished: TimerMode,
        next: TimerMode,
        completed_focus_count: u32,
    },
}

// ============================================================================
// EngineOptions
// ============================================================================

/// Behaviour toggles read from the persisted settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Keep counting into a break after a focus session
    pub auto_start_break: bool,
    /// Keep counting into a focus session after a break
    pub auto_start_work: bool,
    /// Report completed focus sessions to the recorder
    pub record_statistics: bool,
    /// Notify when a countdown starts
    pub notify_on_start: bool,
    /// Notify when a countdown completes
    pub notify_on_complete: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl EngineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            auto_start_break: settings.auto_start_break,
            auto_start_work: settings.auto_start_work,
            record_statistics: settings.statistics_tracking,
            notify_on_start: settings.start_notification,
            notify_on_complete: settings.complete_notification,
        }
    }

    fn auto_starts(&self, next: TimerMode) -> bool {
        if next.is_break() {
            self.auto_start_break
        } else {
            self.auto_start_work
        }
    }
}

/// Creates the one-second interval that drives [`TimerEngine::tick`].
///
/// The first tick fires one full period after creation. Missed ticks are
/// skipped rather than replayed in a burst.
pub fn ticker() -> Interval {
    let period = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that owns the countdown state and fires callbacks.
///
/// Commands that do not apply to the current state (pausing a stopped
/// timer, resuming a running one) leave the state untouched.
pub struct TimerEngine {
    state: TimerState,
    durations: TimerDurations,
    options: EngineOptions,
    recorder: Arc<dyn SessionRecorder>,
    notifier: Arc<dyn Notifier>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    pub fn new(
        durations: TimerDurations,
        options: EngineOptions,
        recorder: Arc<dyn SessionRecorder>,
        notifier: Arc<dyn Notifier>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            state: TimerState::new(&durations),
            durations,
            options,
            recorder,
            notifier,
            event_tx,
        }
    }

    fn emit(&self, event: TimerEvent) {
        if let Err(e) = self.event_tx.send(event) {
            debug!("Timer event dropped, receiver closed: {:?}", e.0);
        }
    }

    fn announce_start(&self) {
        if !self.options.notify_on_start {
            return;
        }
        if let Err(e) = self.notifier.notify_start(self.state.mode) {
            warn!("Start notification failed: {} ({})", e, e.suggestion());
        }
    }

    /// Starts the countdown. A paused countdown is resumed instead.
    pub fn start(&mut self) {
        if self.state.is_paused {
            self.resume();
            return;
        }
        if self.state.is_running {
            debug!("start ignored: already running");
            return;
        }

        self.state.is_running = true;
        self.state.is_paused = false;
        info!(
            "{} started ({})",
            self.state.mode,
            self.state.remaining_formatted()
        );

        self.emit(TimerEvent::Started {
            mode: self.state.mode,
        });
        self.announce_start();
    }

    pub fn pause(&mut self) {
        if !self.state.is_counting() {
            debug!("pause ignored: not counting");
            return;
        }
        self.state.is_paused = true;
        self.emit(TimerEvent::Paused);
    }

    pub fn resume(&mut self) {
        if !(self.state.is_running && self.state.is_paused) {
            debug!("resume ignored: not paused");
            return;
        }
        self.state.is_paused = false;
        self.emit(TimerEvent::Resumed);
    }

    /// Stops the countdown and restores the full time of the current mode.
    pub fn reset(&mut self) {
        self.state.is_running = false;
        self.state.is_paused = false;
        self.state.rewind();
        self.emit(TimerEvent::Reset);
    }

    /// Advances the countdown by one second.
    ///
    /// Does nothing unless running and not paused. Reaching zero triggers
    /// [`TimerEngine::complete_cycle`].
    pub fn tick(&mut self) {
        if !self.state.is_counting() {
            return;
        }

        let completed = self.state.tick();
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        });

        if completed {
            self.complete_cycle();
        }
    }

    /// Finishes the current mode and moves to the next one.
    pub fn complete_cycle(&mut self) {
        let finished = self.state.mode;

        if finished == TimerMode::Focus {
            self.state.completed_focus_count = self.state.completed_focus_count.saturating_add(1);
            if self.options.record_statistics {
                self.recorder
                    .record_focus_session(self.state.total_seconds / 60);
            }
        }

        let next = finished.next(self.state.completed_focus_count);
        self.state.mode = next;
        self.state.set_total_seconds(self.durations.seconds_for(next));

        let auto_start = self.options.auto_starts(next);
        self.state.is_running = auto_start;
        self.state.is_paused = false;

        info!(
            "{} complete, next: {} (focus sessions: {})",
            finished, next, self.state.completed_focus_count
        );

        self.emit(TimerEvent::CycleCompleted {
            finished,
            next,
            completed_focus_count: self.state.completed_focus_count,
        });

        if self.options.notify_on_complete {
            if let Err(e) = self.notifier.notify_complete(finished) {
                warn!("Completion notification failed: {} ({})", e, e.suggestion());
            }
        }

        if auto_start {
            self.emit(TimerEvent::Started { mode: next });
            self.announce_start();
        }
    }

    /// Adds minutes to the current countdown. Only while stopped or paused.
    pub fn add_minutes(&mut self, minutes: u32) {
        if !self.state.is_adjustable() {
            debug!("add_minutes ignored: timer is counting");
            return;
        }
        self.state.extend_by_seconds(minutes.saturating_mul(60));
    }

    /// Replaces the current countdown with `seconds`. Only while stopped
    /// or paused.
    pub fn set_custom_duration(&mut self, seconds: u32) {
        if !self.state.is_adjustable() {
            debug!("set_custom_duration ignored: timer is counting");
            return;
        }
        self.state.set_total_seconds(seconds);
    }

    /// Restores the factory duration of the current mode. Only while
    /// stopped or paused.
    pub fn reset_to_default(&mut self) {
        if !self.state.is_adjustable() {
            debug!("reset_to_default ignored: timer is counting");
            return;
        }
        let seconds = TimerDurations::default().seconds_for(self.state.mode);
        self.state.set_total_seconds(seconds);
    }

    /// Changes the configured minutes of the current mode and restarts its
    /// countdown from the new duration.
    pub fn set_custom_minutes(&mut self, minutes: u32) {
        let mode = self.state.mode;
        self.durations.set_minutes_for(mode, minutes);
        self.state.set_total_seconds(self.durations.seconds_for(mode));
    }

    /// Replaces all durations and restarts the current mode's countdown.
    pub fn apply_durations(&mut self, durations: TimerDurations) {
        self.durations = durations;
        self.state
            .set_total_seconds(self.durations.seconds_for(self.state.mode));
    }

    pub fn set_options(&mut self, options: EngineOptions) {
        self.options = options;
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn durations(&self) -> &TimerDurations {
        &self.durations
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .field("durations", &self.durations)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{MockNotifier, SentNotification};
    use crate::stats::MockSessionRecorder;

    struct Harness {
        engine: TimerEngine,
        rx: mpsc::UnboundedReceiver<TimerEvent>,
        recorder: Arc<MockSessionRecorder>,
        notifier: Arc<MockNotifier>,
    }

    fn harness_with(durations: TimerDurations, options: EngineOptions) -> Harness {
        let (tx, rx) = mpsc::unbounded_channel();
        let recorder = Arc::new(MockSessionRecorder::new());
        let notifier = Arc::new(MockNotifier::new());
        let engine = TimerEngine::new(
            durations,
            options,
            recorder.clone(),
            notifier.clone(),
            tx,
        );
        Harness {
            engine,
            rx,
            recorder,
            notifier,
        }
    }

    fn harness() -> Harness {
        let options = EngineOptions {
            notify_on_start: false,
            ..EngineOptions::default()
        };
        harness_with(TimerDurations::default(), options)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Runs the current countdown to zero.
    fn run_out(engine: &mut TimerEngine) {
        engine.start();
        engine.state_mut().remaining_seconds = 1;
        engine.tick();
    }

    mod commands {
        use super::*;

        #[test]
        fn test_new_engine() {
            let h = harness();
            let state = h.engine.state();
            assert_eq!(state.mode, TimerMode::Focus);
            assert_eq!(state.remaining_seconds, 1500);
            assert!(!state.is_running);
        }

        #[test]
        fn test_start() {
            let mut h = harness();
            h.engine.start();

            assert!(h.engine.state().is_running);
            assert!(!h.engine.state().is_paused);
            assert_eq!(
                drain(&mut h.rx),
                vec![TimerEvent::Started {
                    mode: TimerMode::Focus
                }]
            );
        }

        #[test]
        fn test_start_twice_is_noop() {
            let mut h = harness();
            h.engine.start();
            h.engine.start();
            assert_eq!(drain(&mut h.rx).len(), 1);
        }

        #[test]
        fn test_start_when_paused_resumes() {
            let mut h = harness();
            h.engine.start();
            h.engine.pause();
            h.engine.start();

            assert!(h.engine.state().is_counting());
            assert_eq!(drain(&mut h.rx).last(), Some(&TimerEvent::Resumed));
        }

        #[test]
        fn test_pause_and_resume_preserve_remaining() {
            let mut h = harness();
            h.engine.start();
            h.engine.tick();
            h.engine.pause();
            let remaining = h.engine.state().remaining_seconds;

            h.engine.tick();
            assert_eq!(h.engine.state().remaining_seconds, remaining);

            h.engine.resume();
            h.engine.tick();
            assert_eq!(h.engine.state().remaining_seconds, remaining - 1);
        }

        #[test]
        fn test_pause_when_stopped_is_noop() {
            let mut h = harness();
            h.engine.pause();
            assert!(!h.engine.state().is_paused);
            assert!(drain(&mut h.rx).is_empty());
        }

        #[test]
        fn test_resume_when_running_is_noop() {
            let mut h = harness();
            h.engine.start();
            drain(&mut h.rx);
            h.engine.resume();
            assert!(drain(&mut h.rx).is_empty());
        }

        #[test]
        fn test_reset_restores_total() {
            let mut h = harness();
            h.engine.start();
            for _ in 0..10 {
                h.engine.tick();
            }
            h.engine.reset();

            let state = h.engine.state();
            assert_eq!(state.remaining_seconds, state.total_seconds);
            assert!(!state.is_running);
            assert!(!state.is_paused);
            assert_eq!(drain(&mut h.rx).last(), Some(&TimerEvent::Reset));
        }

        #[test]
        fn test_tick_when_stopped_does_nothing() {
            let mut h = harness();
            h.engine.tick();
            assert_eq!(h.engine.state().remaining_seconds, 1500);
            assert!(drain(&mut h.rx).is_empty());
        }

        #[test]
        fn test_tick_emits_remaining() {
            let mut h = harness();
            h.engine.start();
            h.engine.tick();
            assert_eq!(
                drain(&mut h.rx).last(),
                Some(&TimerEvent::Tick {
                    remaining_seconds: 1499
                })
            );
        }

        #[test]
        fn test_dropped_receiver_is_not_fatal() {
            let Harness {
                mut engine, rx, ..
            } = harness();
            drop(rx);
            engine.start();
            engine.tick();
            assert_eq!(engine.state().remaining_seconds, 1499);
        }
    }

    mod cycle {
        use super::*;

        #[test]
        fn test_focus_to_short_break() {
            let mut h = harness();
            run_out(&mut h.engine);

            let state = h.engine.state();
            assert_eq!(state.mode, TimerMode::ShortBreak);
            assert_eq!(state.completed_focus_count, 1);
            assert_eq!(state.total_seconds, 300);
            assert_eq!(state.remaining_seconds, 300);
            assert!(!state.is_running);

            let events = drain(&mut h.rx);
            assert!(events.contains(&TimerEvent::CycleCompleted {
                finished: TimerMode::Focus,
                next: TimerMode::ShortBreak,
                completed_focus_count: 1,
            }));
        }

        #[test]
        fn test_long_break_after_four_focus_sessions() {
            let mut h = harness();
            let mut post_focus = Vec::new();

            for _ in 0..12 {
                let was_focus = h.engine.state().mode == TimerMode::Focus;
                run_out(&mut h.engine);
                if was_focus {
                    post_focus.push(h.engine.state().mode);
                }
            }

            assert_eq!(
                post_focus,
                vec![
                    TimerMode::ShortBreak,
                    TimerMode::ShortBreak,
                    TimerMode::ShortBreak,
                    TimerMode::LongBreak,
                    TimerMode::ShortBreak,
                    TimerMode::ShortBreak,
                ]
            );
            assert_eq!(h.engine.state().completed_focus_count, 6);
        }

        #[test]
        fn test_break_returns_to_focus() {
            let mut h = harness();
            run_out(&mut h.engine);
            run_out(&mut h.engine);

            let state = h.engine.state();
            assert_eq!(state.mode, TimerMode::Focus);
            assert_eq!(state.completed_focus_count, 1);
            assert_eq!(state.total_seconds, 1500);
        }

        #[test]
        fn test_focus_session_recorded_with_minutes() {
            let mut h = harness_with(
                TimerDurations::new(30, 5, 15),
                EngineOptions::default(),
            );
            run_out(&mut h.engine);
            run_out(&mut h.engine);

            assert_eq!(h.recorder.sessions(), vec![30]);
        }

        #[test]
        fn test_statistics_disabled() {
            let options = EngineOptions {
                record_statistics: false,
                ..EngineOptions::default()
            };
            let mut h = harness_with(TimerDurations::default(), options);
            run_out(&mut h.engine);
            assert_eq!(h.recorder.session_count(), 0);
            assert_eq!(h.engine.state().completed_focus_count, 1);
        }

        #[test]
        fn test_notification_carries_finished_mode() {
            let mut h = harness();
            run_out(&mut h.engine);
            run_out(&mut h.engine);

            assert_eq!(
                h.notifier.completed(),
                vec![TimerMode::Focus, TimerMode::ShortBreak]
            );
        }

        #[test]
        fn test_completion_notification_disabled() {
            let options = EngineOptions {
                notify_on_complete: false,
                notify_on_start: false,
                ..EngineOptions::default()
            };
            let mut h = harness_with(TimerDurations::default(), options);
            run_out(&mut h.engine);
            assert_eq!(h.notifier.notification_count(), 0);
        }

        #[test]
        fn test_notification_failure_does_not_stop_cycle() {
            let mut h = harness();
            h.notifier.set_should_fail(true);
            run_out(&mut h.engine);
            assert_eq!(h.engine.state().mode, TimerMode::ShortBreak);
        }

        #[test]
        fn test_start_notification() {
            let mut h = harness_with(TimerDurations::default(), EngineOptions::default());
            h.engine.start();
            assert_eq!(
                h.notifier.sent(),
                vec![SentNotification::Started(TimerMode::Focus)]
            );
        }

        #[test]
        fn test_auto_start_break() {
            let options = EngineOptions {
                auto_start_break: true,
                notify_on_start: false,
                ..EngineOptions::default()
            };
            let mut h = harness_with(TimerDurations::default(), options);
            run_out(&mut h.engine);

            assert_eq!(h.engine.state().mode, TimerMode::ShortBreak);
            assert!(h.engine.state().is_counting());
            assert_eq!(
                drain(&mut h.rx).last(),
                Some(&TimerEvent::Started {
                    mode: TimerMode::ShortBreak
                })
            );

            // Work does not auto-start.
            h.engine.state_mut().remaining_seconds = 1;
            h.engine.tick();
            assert_eq!(h.engine.state().mode, TimerMode::Focus);
            assert!(!h.engine.state().is_running);
        }

        #[test]
        fn test_auto_start_work() {
            let options = EngineOptions {
                auto_start_work: true,
                ..EngineOptions::default()
            };
            let mut h = harness_with(TimerDurations::default(), options);
            run_out(&mut h.engine);
            assert!(!h.engine.state().is_running);

            run_out(&mut h.engine);
            assert_eq!(h.engine.state().mode, TimerMode::Focus);
            assert!(h.engine.state().is_counting());
        }

        #[test]
        fn test_remaining_never_negative() {
            let mut h = harness_with(TimerDurations::new(1, 1, 1), EngineOptions::default());
            h.engine.start();
            for _ in 0..200 {
                h.engine.tick();
                let state = h.engine.state();
                assert!(state.remaining_seconds <= state.total_seconds);
            }
        }
    }

    mod adjustments {
        use super::*;

        #[test]
        fn test_add_minutes_when_stopped() {
            let mut h = harness();
            h.engine.add_minutes(5);
            assert_eq!(h.engine.state().remaining_seconds, 1800);
            assert_eq!(h.engine.state().total_seconds, 1800);
        }

        #[test]
        fn test_add_minutes_ignored_while_counting() {
            let mut h = harness();
            h.engine.start();
            h.engine.add_minutes(5);
            assert_eq!(h.engine.state().total_seconds, 1500);
        }

        #[test]
        fn test_add_minutes_when_paused() {
            let mut h = harness();
            h.engine.start();
            h.engine.tick();
            h.engine.pause();
            h.engine.add_minutes(1);
            assert_eq!(h.engine.state().remaining_seconds, 1559);
            assert_eq!(h.engine.state().total_seconds, 1560);
        }

        #[test]
        fn test_set_custom_duration() {
            let mut h = harness();
            h.engine.set_custom_duration(90);
            assert_eq!(h.engine.state().remaining_seconds, 90);
            assert_eq!(h.engine.state().total_seconds, 90);

            h.engine.start();
            h.engine.set_custom_duration(30);
            assert_eq!(h.engine.state().total_seconds, 90);
        }

        #[test]
        fn test_reset_to_default_uses_factory_durations() {
            let mut h = harness_with(TimerDurations::new(50, 10, 25), EngineOptions::default());
            assert_eq!(h.engine.state().total_seconds, 3000);
            h.engine.reset_to_default();
            assert_eq!(h.engine.state().total_seconds, 1500);
        }

        #[test]
        fn test_set_custom_minutes_updates_current_mode_only() {
            let mut h = harness();
            run_out(&mut h.engine);
            h.engine.set_custom_minutes(7);

            assert_eq!(h.engine.durations().short_break_minutes, 7);
            assert_eq!(h.engine.durations().focus_minutes, 25);
            assert_eq!(h.engine.state().total_seconds, 420);
            assert_eq!(h.engine.state().remaining_seconds, 420);
        }

        #[test]
        fn test_apply_durations() {
            let mut h = harness();
            h.engine.start();
            h.engine.tick();
            h.engine.apply_durations(TimerDurations::new(45, 10, 25));

            assert_eq!(h.engine.state().total_seconds, 2700);
            assert_eq!(h.engine.state().remaining_seconds, 2700);

            run_out(&mut h.engine);
            assert_eq!(h.engine.state().total_seconds, 600);
        }
    }

    mod interval_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_first_tick_is_one_period_out() {
            let created = Instant::now();
            let mut ticker = ticker();

            ticker.tick().await;
            assert_eq!(created.elapsed(), Duration::from_secs(1));
        }

        #[tokio::test(start_paused = true)]
        async fn test_ticker_drives_engine() {
            let mut h = harness();
            h.engine.start();
            drain(&mut h.rx);

            let started = Instant::now();
            let mut ticker = ticker();
            for _ in 0..2 {
                ticker.tick().await;
                h.engine.tick();
            }

            assert_eq!(started.elapsed(), Duration::from_secs(2));
            assert_eq!(h.engine.state().remaining_seconds, 1498);
            let ticks = drain(&mut h.rx)
                .into_iter()
                .filter(|e| matches!(e, TimerEvent::Tick { .. }))
                .count();
            assert_eq!(ticks, 2);
        }
    }
}
