//! # Atlas CLI Library
//!
//! Core library for the `atlas` command-line application. `main.rs` only
//! calls [`run`]; everything else lives here so it can be tested.
//!
//! ## Module Organization
//! ```text
//! atlas_cli_lib/
//! ├── lib.rs             ◄─── You are here (startup & dispatch)
//! ├── cli.rs             ◄─── clap definitions
//! ├── shell.rs           ◄─── Interactive shell
//! ├── state/
//! │   ├── mod.rs         ◄─── AppState wiring
//! │   └── emitter.rs     ◄─── Fetch status → tracing
//! ├── commands/
//! │   ├── mod.rs         ◄─── Shared rendering
//! │   ├── catalog.rs     ◄─── Browse / search / detail
//! │   ├── favorites.rs   ◄─── Favorites (login required)
//! │   ├── session.rs     ◄─── Login / logout / register
//! │   └── preferences.rs ◄─── Theme
//! └── error.rs           ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use std::process::ExitCode;

use anyhow::Context;
use atlas_client::AtlasConfig;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, FavoriteAction};
use commands::{catalog, favorites, preferences, session, CommandResult};
use state::AppState;

/// Runs the application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Parse arguments (clap)                                              │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,atlas=debug,reqwest=warn; override with RUST_LOG    │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config PATH must load cleanly                                   │
/// │     • otherwise atlas.toml if present, then ATLAS_* overrides           │
/// │                                                                         │
/// │  4. Initialize State ─────────────────────────────────────────────────► │
/// │     • HTTP country source, catalog store                                │
/// │     • FileStore (or MemoryStore with --ephemeral)                       │
/// │     • Session and theme restored from storage                           │
/// │                                                                         │
/// │  5. Run one command, or the interactive shell                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(start(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn start(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match cli.config {
        Some(path) => AtlasConfig::load(Some(path.clone()))
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AtlasConfig::load_or_default(None),
    };

    let state =
        AppState::from_config(config, cli.ephemeral).context("initializing application state")?;

    let restored = state.restore().await;

    match cli.command {
        Some(command) => Ok(report(execute(&state, command).await)),
        None => {
            info!("Starting interactive shell");
            shell::run(&state, &restored)
                .await
                .context("reading from stdin")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(result: CommandResult) -> ExitCode {
    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(code = ?e.code, "Command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Routes a parsed command to its handler.
pub async fn execute(state: &AppState, command: Command) -> CommandResult {
    match command {
        Command::All => catalog::list_all(state).await,
        Command::Preview => catalog::preview(state).await,
        Command::Search(args) => catalog::search(state, &args.to_form()).await,
        Command::Results => catalog::results(state).await,
        Command::Regions => Ok(catalog::regions()),
        Command::Subregions { region } => catalog::subregions(state, &region).await,
        Command::Region { name } => catalog::by_region(state, &name).await,
        Command::Name { text } => catalog::by_name(state, &text.join(" ")).await,
        Command::Show { code, json } => catalog::show(state, &code, json).await,
        Command::Status => catalog::status(state).await,

        Command::Favorites => favorites::list(state).await,
        Command::Favorite { action } => match action {
            FavoriteAction::Add { code } => favorites::add(state, &code).await,
            FavoriteAction::Remove { code } => favorites::remove(state, &code).await,
            FavoriteAction::Toggle { code } => favorites::toggle(state, &code).await,
        },

        Command::Login(args) => session::login(state, &args.to_form()).await,
        Command::Logout => session::logout(state).await,
        Command::Register(args) => session::register(state, &args.to_form()).await,
        Command::Whoami => session::whoami(state).await,

        Command::Theme { action } => preferences::theme(state, action),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=atlas_client=trace` - Trace the I/O layer only
/// - Default: INFO, DEBUG for atlas crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,atlas=debug,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ShellLine;
    use crate::commands::fixtures;

    async fn exec(state: &AppState, line: &[&str]) -> CommandResult {
        let parsed = ShellLine::try_parse_from(line.iter().copied()).unwrap();
        execute(state, parsed.command).await
    }

    #[tokio::test]
    async fn test_shell_session_flow() {
        let state = fixtures::state();

        let err = exec(&state, &["favorite", "add", "CAN"]).await.unwrap_err();
        assert_eq!(err.message, "Please log in to add favorites");

        exec(&state, &["login", "-u", "alice", "-p", "secret1"])
            .await
            .unwrap();
        exec(&state, &["favorite", "add", "CAN"]).await.unwrap();

        let out = exec(&state, &["search", "--region", "Americas"]).await.unwrap();
        assert!(out.contains("* CAN"));
        assert!(out.contains("  MEX"));

        let out = exec(&state, &["status"]).await.unwrap();
        assert!(out.contains("Status:     succeeded"));
        assert!(out.contains("Filtered:   2"));
        assert!(out.contains("Favorites:  1"));
        assert!(out.contains("User:       alice"));

        exec(&state, &["logout"]).await.unwrap();
        let out = exec(&state, &["favorites"]).await.unwrap();
        assert!(out.starts_with("Favorites (1)"));
    }

    #[tokio::test]
    async fn test_name_joins_words() {
        let state = fixtures::state();
        let out = exec(&state, &["name", "french", "republic"]).await.unwrap();
        assert!(out.contains("FRA"));
    }

    #[tokio::test]
    async fn test_register_does_not_log_in() {
        let state = fixtures::state();
        let out = exec(
            &state,
            &[
                "register",
                "-u",
                "bob",
                "-e",
                "bob@example.com",
                "-p",
                "password123",
                "-c",
                "password123",
            ],
        )
        .await
        .unwrap();
        assert_eq!(out, "Registration successful! Please log in.");
        assert_eq!(exec(&state, &["whoami"]).await.unwrap(), "Not logged in");
    }
}
