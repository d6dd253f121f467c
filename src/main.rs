//! tomato-focus - a Pomodoro focus timer for the terminal
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after every 4 focus sessions

use anyhow::Result;
use clap::{CommandFactory, Parser};

use tomato_focus::cli::{handlers, session, App, Cli, Commands, Display};
use tomato_focus::config::ConfigError;
use tomato_focus::store::AppPaths;
use tomato_focus::theme::ThemeError;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            Display::show_hint(hint);
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins; otherwise `--verbose` selects `debug` and the default
/// is `warn`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        // No command provided, show help
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Completions { shell } = &command {
        generate_completions(*shell);
        return Ok(());
    }

    let app = App::open(AppPaths::resolve(cli.data_dir, cli.sound_dir))?;
    tracing::debug!("Store: {}", app.paths().store_file().display());

    match command {
        Commands::Run(args) => session::run(&app, args).await?,
        Commands::Config { action } => handlers::config(&app, action)?,
        Commands::Stats { days } => handlers::stats(&app, days)?,
        Commands::Theme { action } => handlers::theme(&app, action)?,
        Commands::Settings { action } => handlers::settings(&app, action)?,
        Commands::Sounds => handlers::sounds(&app)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Returns a hint for errors that carry one.
fn suggestion(error: &anyhow::Error) -> Option<&'static str> {
    if let Some(e) = error.downcast_ref::<ConfigError>() {
        return Some(e.suggestion());
    }
    error.downcast_ref::<ThemeError>().map(ThemeError::suggestion)
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
