//! Handlers for the one-shot subcommands.

use anyhow::Result;
use chrono::Local;

use super::app::App;
use super::commands::{ConfigCommand, SettingsCommand, ThemeCommand};
use super::display::Display;
use crate::sound::BackgroundSound;
use crate::types::{TimerDurations, TimerMode};

/// Executes a `config` subcommand.
pub fn config(app: &App, action: ConfigCommand) -> Result<()> {
    let mut configs = app.configurations();

    match action {
        ConfigCommand::List => {
            Display::show(&Display::render_configuration_list(
                configs.configurations(),
                configs.selected(),
            ));
        }
        ConfigCommand::Show => {
            Display::show(&Display::render_configuration(configs.selected()));
        }
        ConfigCommand::Select { name } => {
            let selected = configs.select(&name)?;
            Display::show_success(&format!("Selected '{}'", selected.name));
        }
        ConfigCommand::Add(args) => {
            let durations = TimerDurations::new(args.focus, args.short_break, args.long_break);
            let added = configs.add_custom(&args.name, durations)?;
            Display::show_success(&format!("Added and selected '{}'", added.name));
        }
        ConfigCommand::Delete { name } => {
            let deleted = configs.delete(&name)?;
            Display::show_success(&format!("Deleted '{}'", deleted.name));
        }
        ConfigCommand::Duplicate { name } => {
            let copy = configs.duplicate(&name)?;
            Display::show_success(&format!("Created '{}'", copy.name));
        }
        ConfigCommand::SetFocus { minutes } => update(&mut configs, TimerMode::Focus, minutes)?,
        ConfigCommand::SetShort { minutes } => {
            update(&mut configs, TimerMode::ShortBreak, minutes)?
        }
        ConfigCommand::SetLong { minutes } => update(&mut configs, TimerMode::LongBreak, minutes)?,
        ConfigCommand::SaveAs { name } => {
            let saved = configs.save_current_as(&name)?;
            Display::show_success(&format!("Saved and selected '{}'", saved.name));
        }
        ConfigCommand::Reset => {
            configs.reset_to_defaults();
            Display::show_success("Restored the built-in presets");
        }
    }

    Ok(())
}

fn update(
    configs: &mut crate::config::ConfigurationStore,
    mode: TimerMode,
    minutes: u32,
) -> Result<()> {
    let previous = configs.selected().name.clone();
    let updated = configs.update_minutes(mode, minutes)?;
    if updated.name != previous {
        Display::show_success(&format!(
            "'{}' is a preset; created and selected '{}'",
            previous, updated.name
        ));
    }
    Display::show(&Display::render_configuration(updated));
    Ok(())
}

/// Executes the `stats` command.
pub fn stats(app: &App, days: u32) -> Result<()> {
    let stats = app.statistics();
    let today = Local::now().date_naive();
    Display::show(&Display::render_stats(
        stats.total_pomodoro_count(),
        &stats.total_focus_formatted(),
        &stats.last_days(today, days),
    ));
    Ok(())
}

/// Executes a `theme` subcommand.
pub fn theme(app: &App, action: ThemeCommand) -> Result<()> {
    let mut themes = app.themes();

    match action {
        ThemeCommand::List => Display::show(&Display::render_theme_list(themes.current())),
        ThemeCommand::Show => Display::show(&Display::render_theme(themes.current())),
        ThemeCommand::Set { id } => {
            let theme = themes.set_theme(&id)?;
            Display::show_success(&format!("Theme set to {} {}", theme.emoji, theme.name));
        }
        ThemeCommand::Next => {
            let theme = themes.next_theme();
            Display::show_success(&format!("Theme set to {} {}", theme.emoji, theme.name));
        }
    }

    Ok(())
}

/// Executes a `settings` subcommand.
pub fn settings(app: &App, action: SettingsCommand) -> Result<()> {
    let mut settings = app.settings();

    match action {
        SettingsCommand::List => Display::show(&Display::render_settings(&settings)),
        SettingsCommand::Set { setting, value } => {
            settings.set(app.store().as_ref(), setting, value);
            Display::show_success(&format!(
                "{} = {}",
                setting.key(),
                if value { "on" } else { "off" }
            ));
        }
    }

    Ok(())
}

/// Executes the `sounds` command.
pub fn sounds(app: &App) -> Result<()> {
    let library = app.sound_library();
    let report: Vec<_> = BackgroundSound::ALL
        .into_iter()
        .map(|sound| (sound, library.inspect(sound)))
        .collect();

    Display::show(&format!("Sound directory: {}", library.dir().display()));
    Display::show(&Display::render_sound_report(&report));
    Ok(())
}
