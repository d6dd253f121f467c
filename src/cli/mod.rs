//! CLI module for tomato-focus.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `app`: Store-backed services shared by every command
//! - `handlers`: One-shot subcommands (config, stats, theme, settings, sounds)
//! - `session`: The interactive `run` loop
//! - `display`: Output formatting and display logic

pub mod app;
pub mod commands;
pub mod display;
pub mod handlers;
pub mod session;

pub use app::App;
pub use commands::{
    AddConfigArgs, Cli, Commands, ConfigCommand, RunArgs, SettingsCommand, ThemeCommand,
};
pub use display::Display;
pub use session::SessionCommand;
