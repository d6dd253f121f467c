//! Foreground focus session.
//!
//! One `current_thread` task drives everything through `tokio::select!`:
//! the one-second ticker, engine events, stdin commands and Ctrl-C.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Interval;
use tracing::{debug, info};

use super::app::App;
use super::commands::RunArgs;
use super::display::Display;
use crate::config::Settings;
use crate::notification::{DesktopNotifier, Notifier};
use crate::sound::{try_create_output, AmbientPlayer, AudioOutput, BackgroundSound};
use crate::stats::SessionRecorder;
use crate::timer::{ticker, EngineOptions, TimerEngine, TimerEvent};
use crate::types::{TimerMode, TimerState};

// ============================================================================
// SessionCommand
// ============================================================================

/// A command typed on stdin during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    Resume,
    Reset,
    AddMinute,
    NextSound,
    /// Ambient volume in percent
    Volume(u8),
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Returns None for blank or unknown input.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let word = parts.next()?.to_ascii_lowercase();

        let command = match word.as_str() {
            "s" | "start" => Self::Start,
            "p" | "pause" => Self::Pause,
            "r" | "resume" => Self::Resume,
            "x" | "reset" => Self::Reset,
            "+" | "add" => Self::AddMinute,
            "n" | "next" => Self::NextSound,
            "v" | "volume" => {
                let percent = parts.next()?.parse::<u8>().ok()?;
                Self::Volume(percent.min(100))
            }
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// The sound after `current` in display order, wrapping around.
pub fn next_sound(current: BackgroundSound) -> BackgroundSound {
    let all = BackgroundSound::ALL;
    let index = all.iter().position(|s| *s == current).unwrap_or(0);
    all[(index + 1) % all.len()]
}

// ============================================================================
// Session
// ============================================================================

/// Ambient playback bound to the engine state.
struct Ambience<O: AudioOutput> {
    player: Option<AmbientPlayer<O>>,
    chime: bool,
}

impl<O: AudioOutput> Ambience<O> {
    fn follow(&mut self, event: &TimerEvent, counting: bool) {
        let Some(player) = self.player.as_mut() else {
            return;
        };

        match event {
            TimerEvent::Started { .. } | TimerEvent::Resumed => player.play(),
            TimerEvent::Paused | TimerEvent::Reset => player.stop(),
            TimerEvent::CycleCompleted { .. } => {
                if self.chime {
                    player.play_notification_sound();
                }
                if !counting && player.is_playing() {
                    player.stop();
                }
            }
            TimerEvent::Tick { .. } => {}
        }
    }

    fn next_sound(&mut self) -> Option<BackgroundSound> {
        let player = self.player.as_mut()?;
        let next = next_sound(player.selected());
        player.select_sound(next);
        Some(next)
    }

    fn set_volume(&mut self, percent: u8) {
        if let Some(player) = self.player.as_mut() {
            player.set_volume(f32::from(percent) / 100.0);
        }
    }

    fn stop(&mut self) {
        if let Some(player) = self.player.as_mut() {
            if player.is_playing() {
                player.stop();
            }
        }
    }
}

/// Builds the engine from persisted configuration and settings.
pub fn build_engine(
    durations: crate::types::TimerDurations,
    settings: &Settings,
    recorder: Arc<dyn SessionRecorder>,
    notifier: Arc<dyn Notifier>,
) -> (TimerEngine, mpsc::UnboundedReceiver<TimerEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(
        durations,
        EngineOptions::from_settings(settings),
        recorder,
        notifier,
        tx,
    );
    (engine, rx)
}

/// Runs an interactive session until `quit`, end of input or Ctrl-C.
pub async fn run(app: &App, args: RunArgs) -> Result<()> {
    let mut configs = app.configurations();
    if let Some(query) = &args.config {
        configs.select(query)?;
    }
    let settings = app.settings();
    let themes = app.themes();

    let (mut engine, mut events) = build_engine(
        configs.durations(),
        &settings,
        app.statistics(),
        Arc::new(DesktopNotifier::new()),
    );

    let sound = args.sound.unwrap_or_else(|| themes.default_sound());
    let player = if args.no_sound {
        None
    } else {
        try_create_output().map(|output| {
            AmbientPlayer::new(output, app.sound_library(), sound)
                .with_volume(f32::from(args.volume) / 100.0)
        })
    };
    let mut ambience = Ambience {
        player,
        chime: settings.sound_reminder && !args.no_sound,
    };

    Display::show(&format!(
        "{} {} | {} | sound: {}",
        themes.current().emoji,
        configs.selected().name,
        themes.current().name,
        if args.no_sound { "off" } else { sound.id() }
    ));
    Display::show(Display::render_session_help());

    if let Some(seconds) = args.duration {
        engine.set_custom_duration(seconds);
    }
    if args.now {
        engine.start();
    }
    redraw(&engine);

    let mut ticker = ticker();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if engine.state().is_counting() {
                    engine.tick();
                    redraw(&engine);
                }
            }
            Some(event) = events.recv() => {
                ambience.follow(&event, engine.state().is_counting());
                announce(&event, &settings, &engine);
                if session_over(stdin_open, engine.state()) {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        let Some(command) = SessionCommand::parse(&line) else {
                            debug!("Ignoring input {:?}", line);
                            continue;
                        };
                        if command == SessionCommand::Quit {
                            break;
                        }
                        let was_counting = engine.state().is_counting();
                        apply(command, &mut engine, &mut ambience);
                        realign(&mut ticker, was_counting, &engine);
                        redraw(&engine);
                    }
                    Ok(None) => {
                        debug!("stdin closed");
                        stdin_open = false;
                        if session_over(stdin_open, engine.state()) {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("stdin read failed: {}", e);
                        stdin_open = false;
                        if session_over(stdin_open, engine.state()) {
                            break;
                        }
                    }
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    ambience.stop();
    println!();
    Ok(())
}

/// Restarts the ticker period when a command took the engine from idle to
/// counting, so the first decrement lands one full second later.
fn realign(ticker: &mut Interval, was_counting: bool, engine: &TimerEngine) {
    if !was_counting && engine.state().is_counting() {
        ticker.reset();
    }
}

/// Without input nothing can restart a stopped or paused countdown.
fn session_over(stdin_open: bool, state: &TimerState) -> bool {
    !stdin_open && !state.is_counting()
}

fn apply<O: AudioOutput>(
    command: SessionCommand,
    engine: &mut TimerEngine,
    ambience: &mut Ambience<O>,
) {
    match command {
        SessionCommand::Start => engine.start(),
        SessionCommand::Pause => engine.pause(),
        SessionCommand::Resume => engine.resume(),
        SessionCommand::Reset => engine.reset(),
        SessionCommand::AddMinute => engine.add_minutes(1),
        SessionCommand::NextSound => {
            if let Some(sound) = ambience.next_sound() {
                println!();
                Display::show(&format!("Sound: {}", sound.display_name()));
            }
        }
        SessionCommand::Volume(percent) => ambience.set_volume(percent),
        SessionCommand::Help => {
            println!();
            Display::show(Display::render_session_help());
        }
        SessionCommand::Quit => {}
    }
}

fn announce(event: &TimerEvent, settings: &Settings, engine: &TimerEngine) {
    match event {
        TimerEvent::CycleCompleted {
            finished,
            next,
            completed_focus_count,
        } => {
            println!();
            Display::show(&Display::render_cycle_completed(
                *finished,
                *next,
                *completed_focus_count,
            ));
            redraw(engine);
        }
        TimerEvent::Started {
            mode: TimerMode::Focus,
        } if settings.long_break_reminder => {
            if let Some(reminder) = Display::render_long_break_reminder(engine.state()) {
                println!();
                Display::show(&reminder);
            }
        }
        _ => {}
    }
}

fn redraw(engine: &TimerEngine) {
    let mut stdout = std::io::stdout();
    // Ignored: a closed stdout only loses the status line.
    let _ = write!(stdout, "\r{}", Display::render_status_line(engine.state()));
    let _ = stdout.flush();
}
