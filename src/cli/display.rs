//! Display utilities for the tomato-focus CLI.
//!
//! `render_*` functions build the text; `show*` functions print it.

use crate::config::{Setting, Settings, TimerConfiguration};
use crate::sound::{BackgroundSound, Candidate, CandidateStatus};
use crate::stats::DailyStat;
use crate::theme::{AppTheme, THEMES};
use crate::types::{format_mm_ss, TimerMode, TimerState, LONG_BREAK_INTERVAL};

const PROGRESS_WIDTH: usize = 20;
const CHART_WIDTH: u32 = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// One-line countdown status, redrawn every second.
    pub fn render_status_line(state: &TimerState) -> String {
        let marker = if !state.is_running {
            "stopped"
        } else if state.is_paused {
            "paused"
        } else {
            "running"
        };
        format!(
            "[{}] {} {} {:>3.0}% ({})",
            state.mode,
            state.remaining_formatted(),
            Self::progress_bar(state.progress()),
            state.progress() * 100.0,
            marker
        )
    }

    /// Message printed when a countdown reaches zero.
    pub fn render_cycle_completed(
        finished: TimerMode,
        next: TimerMode,
        completed_focus_count: u32,
    ) -> String {
        format!(
            "* {} complete (focus sessions: {}). Next: {}",
            finished, completed_focus_count, next
        )
    }

    /// Reminder shown when the upcoming break will be a long one.
    pub fn render_long_break_reminder(state: &TimerState) -> Option<String> {
        let upcoming = state.completed_focus_count + 1;
        if state.mode == TimerMode::Focus && upcoming % LONG_BREAK_INTERVAL == 0 {
            Some("  A long break follows this session.".to_string())
        } else {
            None
        }
    }

    pub fn render_session_help() -> &'static str {
        "Commands: [s]tart  [p]ause  [r]esume  [x] reset  [+] add minute  [n]ext sound  [v N] volume  [q]uit"
    }

    fn progress_bar(progress: f64) -> String {
        let filled = ((progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f64).round()) as usize;
        format!(
            "{}{}",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled)
        )
    }

    // ------------------------------------------------------------------------
    // Configurations
    // ------------------------------------------------------------------------

    pub fn render_configuration(config: &TimerConfiguration) -> String {
        let kind = if config.is_user_defined {
            "custom"
        } else {
            "preset"
        };
        format!(
            "{} ({})\n  Focus:       {} min\n  Short break: {} min\n  Long break:  {} min\n  Id:          {}",
            config.name,
            kind,
            config.focus_minutes,
            config.short_break_minutes,
            config.long_break_minutes,
            config.id
        )
    }

    pub fn render_configuration_list(
        configurations: &[TimerConfiguration],
        selected: &TimerConfiguration,
    ) -> String {
        configurations
            .iter()
            .map(|c| {
                let marker = if c.id == selected.id { "*" } else { " " };
                let kind = if c.is_user_defined { "custom" } else { "preset" };
                format!(
                    "{} {:<24} {:>3}/{:>2}/{:>2} min  {}",
                    marker,
                    c.name,
                    c.focus_minutes,
                    c.short_break_minutes,
                    c.long_break_minutes,
                    kind
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ------------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------------

    pub fn render_stats(total_count: u32, total_focus: &str, days: &[DailyStat]) -> String {
        let mut lines = vec![
            "Statistics".to_string(),
            "─────────────────────────────".to_string(),
            format!("Completed pomodoros: {}", total_count),
            format!("Total focus time:    {}", total_focus),
            String::new(),
        ];

        let max = days.iter().map(|d| d.pomodoro_count).max().unwrap_or(0).max(1);
        for day in days {
            let width = (day.pomodoro_count * CHART_WIDTH).div_ceil(max);
            lines.push(format!(
                "{}  {:<20} {:>2} ({}m)",
                day.date,
                "#".repeat(width as usize),
                day.pomodoro_count,
                day.focus_minutes
            ));
        }
        lines.join("\n")
    }

    // ------------------------------------------------------------------------
    // Themes
    // ------------------------------------------------------------------------

    pub fn render_theme_list(current: &AppTheme) -> String {
        THEMES
            .iter()
            .map(|theme| {
                let marker = if theme.id == current.id { "*" } else { " " };
                format!(
                    "{} {} {:<8} {:<8} sound: {}",
                    marker,
                    theme.emoji,
                    theme.id,
                    theme.name,
                    theme.default_sound.id()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_theme(theme: &AppTheme) -> String {
        let mut lines = vec![
            format!("{} {} ({})", theme.emoji, theme.name, theme.id),
            format!("  Default sound: {}", theme.default_sound),
        ];
        for mode in TimerMode::ALL {
            lines.push(format!(
                "  {:<12} {}",
                mode.label(),
                theme.timer_color(mode).to_hex()
            ));
        }
        lines.push(format!("  {:<12} {}", "Accent", theme.accent_color().to_hex()));
        lines.join("\n")
    }

    // ------------------------------------------------------------------------
    // Settings / sounds
    // ------------------------------------------------------------------------

    pub fn render_settings(settings: &Settings) -> String {
        Setting::ALL
            .iter()
            .map(|setting| {
                let value = if settings.get(*setting) { "on" } else { "off" };
                format!("{:<24} {}", setting.key(), value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_sound_report(report: &[(BackgroundSound, Vec<Candidate>)]) -> String {
        let mut lines = Vec::new();
        for (sound, candidates) in report {
            let fallback = if candidates.iter().any(|c| c.status.is_acceptable()) {
                ""
            } else {
                "  (synthesized)"
            };
            lines.push(format!("{}{}", sound.display_name(), fallback));
            for candidate in candidates {
                lines.push(format!(
                    "  {:<40} {}",
                    candidate.path.display(),
                    Self::describe_status(&candidate.status)
                ));
            }
        }
        lines.join("\n")
    }

    fn describe_status(status: &CandidateStatus) -> String {
        match status {
            CandidateStatus::Missing => "missing".to_string(),
            CandidateStatus::Unreadable(reason) => format!("unreadable: {}", reason),
            CandidateStatus::TooSmall { bytes } => format!("too small ({} bytes)", bytes),
            CandidateStatus::Acceptable { bytes } => format!("ok ({} bytes)", bytes),
        }
    }

    // ------------------------------------------------------------------------
    // Printing
    // ------------------------------------------------------------------------

    pub fn show(text: &str) {
        println!("{}", text);
    }

    pub fn show_success(message: &str) {
        println!("* {}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows a hint below an error.
    pub fn show_hint(hint: &str) {
        eprintln!("  hint: {}", hint);
    }

    /// Formats remaining seconds as `MM:SS`.
    pub fn format_time(total_seconds: u32) -> String {
        format_mm_ss(total_seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_presets;
    use crate::types::TimerDurations;
    use std::path::PathBuf;

    mod format_time_tests {
        use super::*;

        #[test]
        fn test_format_time_zero() {
            assert_eq!(Display::format_time(0), "00:00");
        }

        #[test]
        fn test_format_time_mixed() {
            assert_eq!(Display::format_time(90), "01:30");
        }

        #[test]
        fn test_format_time_large() {
            assert_eq!(Display::format_time(120 * 60 + 59), "120:59");
        }
    }

    mod session_tests {
        use super::*;

        #[test]
        fn test_status_line() {
            let mut state = TimerState::new(&TimerDurations::default());
            assert_eq!(
                Display::render_status_line(&state),
                "[Focus] 25:00 --------------------   0% (stopped)"
            );

            state.is_running = true;
            state.remaining_seconds = 750;
            let line = Display::render_status_line(&state);
            assert!(line.starts_with("[Focus] 12:30 ##########----------"));
            assert!(line.ends_with("(running)"));

            state.is_paused = true;
            assert!(Display::render_status_line(&state).ends_with("(paused)"));
        }

        #[test]
        fn test_cycle_completed() {
            let text =
                Display::render_cycle_completed(TimerMode::Focus, TimerMode::LongBreak, 4);
            assert_eq!(
                text,
                "* Focus complete (focus sessions: 4). Next: Long Break"
            );
        }

        #[test]
        fn test_long_break_reminder() {
            let mut state = TimerState::new(&TimerDurations::default());
            assert!(Display::render_long_break_reminder(&state).is_none());

            state.completed_focus_count = 3;
            assert!(Display::render_long_break_reminder(&state).is_some());

            state.mode = TimerMode::ShortBreak;
            assert!(Display::render_long_break_reminder(&state).is_none());
        }
    }

    mod listing_tests {
        use super::*;

        #[test]
        fn test_configuration_list_marks_selected() {
            let presets = default_presets();
            let text = Display::render_configuration_list(&presets, &presets[2]);
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), presets.len());
            assert!(lines[2].starts_with("* Deep Work"));
            assert!(lines[0].starts_with("  Classic Pomodoro"));
            assert!(lines[0].contains("25/ 5/15 min"));
        }

        #[test]
        fn test_configuration_details() {
            let presets = default_presets();
            let text = Display::render_configuration(&presets[0]);
            assert!(text.starts_with("Classic Pomodoro (preset)"));
            assert!(text.contains("Focus:       25 min"));
        }

        #[test]
        fn test_stats_chart() {
            let days = vec![
                DailyStat {
                    date: "2026-10-17".to_string(),
                    pomodoro_count: 2,
                    focus_minutes: 50,
                },
                DailyStat {
                    date: "2026-10-18".to_string(),
                    pomodoro_count: 4,
                    focus_minutes: 100,
                },
            ];
            let text = Display::render_stats(6, "2h 30m", &days);
            assert!(text.contains("Completed pomodoros: 6"));
            assert!(text.contains("Total focus time:    2h 30m"));
            let last = text.lines().last().unwrap();
            assert!(last.starts_with("2026-10-18  ####################"));
            assert!(last.ends_with(" 4 (100m)"));
        }

        #[test]
        fn test_stats_with_no_sessions() {
            let days = vec![DailyStat {
                date: "2026-10-18".to_string(),
                pomodoro_count: 0,
                focus_minutes: 0,
            }];
            let text = Display::render_stats(0, "0m", &days);
            assert!(text.lines().last().unwrap().contains(" 0 (0m)"));
        }

        #[test]
        fn test_theme_list_marks_current() {
            let text = Display::render_theme_list(&THEMES[1]);
            assert_eq!(text.lines().count(), THEMES.len());
            assert!(text.lines().nth(1).unwrap().starts_with('*'));
        }

        #[test]
        fn test_theme_details() {
            let text = Display::render_theme(&THEMES[0]);
            assert!(text.contains("Forest (forest)"));
            assert!(text.contains("#388E3C"));
        }

        #[test]
        fn test_settings() {
            let text = Display::render_settings(&Settings::default());
            assert!(text.contains("auto_start_break"));
            assert_eq!(text.lines().count(), Setting::ALL.len());
            assert!(text.lines().next().unwrap().ends_with("off"));
        }

        #[test]
        fn test_sound_report() {
            let report = vec![(
                BackgroundSound::Rain,
                vec![
                    Candidate {
                        path: PathBuf::from("/s/rain.flac"),
                        status: CandidateStatus::Missing,
                    },
                    Candidate {
                        path: PathBuf::from("/s/rain.wav"),
                        status: CandidateStatus::TooSmall { bytes: 12 },
                    },
                ],
            )];
            let text = Display::render_sound_report(&report);
            assert!(text.starts_with("Rain  (synthesized)"));
            assert!(text.contains("missing"));
            assert!(text.contains("too small (12 bytes)"));
        }
    }
}
