//! Command definitions for the tomato-focus CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::Setting;
use crate::sound::BackgroundSound;

// ============================================================================
// CLI Structure
// ============================================================================

/// tomato-focus - a Pomodoro focus timer with ambient sounds
#[derive(Parser, Debug)]
#[command(
    name = "tomato-focus",
    version,
    about = "A Pomodoro focus timer with ambient sounds",
    long_about = "A Pomodoro focus timer for the terminal.\n\
                  Cycles focus sessions and breaks, plays ambient sounds and keeps local statistics.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the settings store [env: TOMATO_FOCUS_DATA_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory probed for sound files [env: TOMATO_FOCUS_SOUND_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub sound_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a focus session in the foreground
    Run(RunArgs),

    /// Manage timer configurations
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Show usage statistics
    Stats {
        /// Number of days to list (1-365)
        #[arg(
            short,
            long,
            default_value = "7",
            value_parser = clap::value_parser!(u32).range(1..=365)
        )]
        days: u32,
    },

    /// Manage colour themes
    Theme {
        #[command(subcommand)]
        action: ThemeCommand,
    },

    /// Show or change feature toggles
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// List sound file candidates and their status
    Sounds,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Configuration to select before starting (id or name)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Ambient sound (defaults to the theme's sound)
    #[arg(short, long, value_enum)]
    pub sound: Option<BackgroundSound>,

    /// Ambient volume in percent (0-100)
    #[arg(
        long,
        default_value = "50",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub volume: u8,

    /// Disable ambient sound and the completion chime
    #[arg(long)]
    pub no_sound: bool,

    /// Length of the first countdown in seconds, overriding the configuration
    #[arg(
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u32).range(1..=7200)
    )]
    pub duration: Option<u32>,

    /// Start the countdown immediately
    #[arg(long)]
    pub now: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: None,
            sound: None,
            volume: 50,
            no_sound: false,
            duration: None,
            now: false,
        }
    }
}

// ============================================================================
// Config Subcommands
// ============================================================================

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// List every configuration
    List,

    /// Show the selected configuration
    Show,

    /// Select a configuration by id or name
    Select { name: String },

    /// Add a user-defined configuration and select it
    Add(AddConfigArgs),

    /// Delete a user-defined configuration
    Delete { name: String },

    /// Add a user-defined copy of a configuration
    Duplicate { name: String },

    /// Set the focus duration of the selected configuration
    SetFocus {
        /// Minutes (1-120)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=120))]
        minutes: u32,
    },

    /// Set the short break duration of the selected configuration
    SetShort {
        /// Minutes (1-60)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=60))]
        minutes: u32,
    },

    /// Set the long break duration of the selected configuration
    SetLong {
        /// Minutes (1-60)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=60))]
        minutes: u32,
    },

    /// Save the selected durations under a new name
    SaveAs { name: String },

    /// Restore the built-in presets
    Reset,
}

/// Arguments for `config add`
#[derive(Args, Debug, Clone)]
pub struct AddConfigArgs {
    /// Configuration name
    pub name: String,

    /// Focus duration in minutes (1-120)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub focus: u32,

    /// Short break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub short_break: u32,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "15",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub long_break: u32,
}

// ============================================================================
// Theme / Settings Subcommands
// ============================================================================

/// Theme subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    /// List every theme
    List,
    /// Show the current theme's palette
    Show,
    /// Select a theme by id
    Set { id: String },
    /// Switch to the next theme
    Next,
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// List every toggle
    List,
    /// Change a toggle
    Set {
        #[arg(value_enum)]
        setting: Setting,
        /// on/off, true/false, yes/no
        #[arg(
            action = ArgAction::Set,
            value_parser = clap::builder::BoolishValueParser::new()
        )]
        value: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["tomato-focus"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.data_dir.is_none());
        }

        #[test]
        fn test_parse_global_flags_after_subcommand() {
            let cli = Cli::parse_from([
                "tomato-focus",
                "stats",
                "-v",
                "--data-dir",
                "/tmp/tf",
                "--sound-dir",
                "/tmp/snd",
            ]);
            assert!(cli.verbose);
            assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tf")));
            assert_eq!(cli.sound_dir, Some(PathBuf::from("/tmp/snd")));
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["tomato-focus", "completions", "bash"]);
            assert!(matches!(cli.command, Some(Commands::Completions { .. })));
        }
    }

    mod run_tests {
        use super::*;

        #[test]
        fn test_run_defaults() {
            let cli = Cli::parse_from(["tomato-focus", "run"]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert_eq!(args.volume, 50);
                    assert!(args.sound.is_none());
                    assert!(args.config.is_none());
                    assert!(!args.no_sound);
                    assert!(!args.now);
                    assert!(args.duration.is_none());
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_run_with_options() {
            let cli = Cli::parse_from([
                "tomato-focus",
                "run",
                "--config",
                "Deep Work",
                "--sound",
                "white-noise",
                "--volume",
                "80",
                "--now",
            ]);
            match cli.command {
                Some(Commands::Run(args)) => {
                    assert_eq!(args.config.as_deref(), Some("Deep Work"));
                    assert_eq!(args.sound, Some(BackgroundSound::WhiteNoise));
                    assert_eq!(args.volume, 80);
                    assert!(args.now);
                }
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_run_duration() {
            let cli = Cli::parse_from(["tomato-focus", "run", "--duration", "90"]);
            match cli.command {
                Some(Commands::Run(args)) => assert_eq!(args.duration, Some(90)),
                _ => panic!("Expected Run command"),
            }
            assert!(Cli::try_parse_from(["tomato-focus", "run", "--duration", "0"]).is_err());
            assert!(Cli::try_parse_from(["tomato-focus", "run", "--duration", "7201"]).is_err());
        }

        #[test]
        fn test_run_volume_out_of_range() {
            let result = Cli::try_parse_from(["tomato-focus", "run", "--volume", "101"]);
            assert!(result.is_err());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_config_add() {
            let cli = Cli::parse_from([
                "tomato-focus",
                "config",
                "add",
                "Reading",
                "--focus",
                "40",
                "--long-break",
                "20",
            ]);
            match cli.command {
                Some(Commands::Config {
                    action: ConfigCommand::Add(args),
                }) => {
                    assert_eq!(args.name, "Reading");
                    assert_eq!(args.focus, 40);
                    assert_eq!(args.short_break, 5);
                    assert_eq!(args.long_break, 20);
                }
                _ => panic!("Expected config add"),
            }
        }

        #[test]
        fn test_config_set_focus_range() {
            assert!(Cli::try_parse_from(["tomato-focus", "config", "set-focus", "120"]).is_ok());
            assert!(Cli::try_parse_from(["tomato-focus", "config", "set-focus", "121"]).is_err());
            assert!(Cli::try_parse_from(["tomato-focus", "config", "set-focus", "0"]).is_err());
        }

        #[test]
        fn test_config_set_break_range() {
            assert!(Cli::try_parse_from(["tomato-focus", "config", "set-short", "60"]).is_ok());
            assert!(Cli::try_parse_from(["tomato-focus", "config", "set-long", "61"]).is_err());
        }

        #[test]
        fn test_config_select() {
            let cli = Cli::parse_from(["tomato-focus", "config", "select", "Quick Sprint"]);
            match cli.command {
                Some(Commands::Config {
                    action: ConfigCommand::Select { name },
                }) => assert_eq!(name, "Quick Sprint"),
                _ => panic!("Expected config select"),
            }
        }
    }

    mod settings_tests {
        use super::*;

        #[test]
        fn test_settings_set_accepts_boolish_values() {
            for (raw, expected) in [("on", true), ("off", false), ("true", true), ("no", false)] {
                let cli = Cli::parse_from([
                    "tomato-focus",
                    "settings",
                    "set",
                    "auto-start-break",
                    raw,
                ]);
                match cli.command {
                    Some(Commands::Settings {
                        action: SettingsCommand::Set { setting, value },
                    }) => {
                        assert_eq!(setting, Setting::AutoStartBreak);
                        assert_eq!(value, expected);
                    }
                    _ => panic!("Expected settings set"),
                }
            }
        }

        #[test]
        fn test_settings_set_rejects_unknown_toggle() {
            let result =
                Cli::try_parse_from(["tomato-focus", "settings", "set", "dark-mode", "on"]);
            assert!(result.is_err());
        }
    }

    mod stats_tests {
        use super::*;

        #[test]
        fn test_stats_days() {
            let cli = Cli::parse_from(["tomato-focus", "stats", "--days", "30"]);
            assert!(matches!(cli.command, Some(Commands::Stats { days: 30 })));

            let cli = Cli::parse_from(["tomato-focus", "stats"]);
            assert!(matches!(cli.command, Some(Commands::Stats { days: 7 })));
        }
    }
}
