//! # Interactive Shell
//!
//! Keeps one [`AppState`] alive across commands, so fetched countries,
//! criteria and favorites survive between lines.
//!
//! ## Line Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  atlas> show CAN          ──► same commands as the one-shot CLI         │
//! │  atlas> /can              ──► search-as-you-type: settles after the     │
//! │                               debounce interval, then prints a count    │
//! │  atlas> /                 ──► clears the search term                    │
//! │  atlas> help              ──► clap help                                 │
//! │  atlas> quit | exit       ──► leaves the shell                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::sync::Arc;

use atlas_client::ResultsListener;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::cli::{Command, ShellLine};
use crate::commands::catalog::ensure_catalog;
use crate::state::{AppState, Restored};

const PROMPT: &str = "atlas> ";

/// What a single shell line asks for.
#[derive(Debug)]
pub enum ShellInput {
    Empty,
    Quit,
    /// Text for the live search box.
    Live(String),
    Command(Command),
    /// Help output or a parse error, printed as is.
    Message(String),
}

/// Splits a line into words, honouring double quotes.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_word = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

pub fn parse_line(line: &str) -> ShellInput {
    // Live search text is kept exactly as typed after the slash.
    if let Some(text) = line.trim_start().strip_prefix('/') {
        return ShellInput::Live(text.trim_end_matches(&['\r', '\n'][..]).to_string());
    }

    let trimmed = line.trim();
    let words = tokenize(trimmed);
    match words.first().map(String::as_str) {
        None => ShellInput::Empty,
        Some("quit" | "exit") => ShellInput::Quit,
        Some(_) => match ShellLine::try_parse_from(words) {
            Ok(line) => ShellInput::Command(line.command),
            Err(e) => ShellInput::Message(e.to_string()),
        },
    }
}

fn greeting(restored: &Restored) -> String {
    let theme = if restored.dark_mode { "dark" } else { "light" };
    match &restored.username {
        Some(username) => format!("Welcome back, {}! (theme: {})", username, theme),
        None => format!("Not logged in (theme: {})", theme),
    }
}

fn prompt() {
    print!("{}", PROMPT);
    let _ = std::io::stdout().flush();
}

/// Runs the read-eval-print loop until `quit` or end of input.
pub async fn run(state: &AppState, restored: &Restored) -> std::io::Result<()> {
    let listener: ResultsListener = Arc::new(|term: &str, count: usize| {
        if term.is_empty() {
            println!("\nSearch cleared: {} countries", count);
        } else {
            println!("\n{} countries match \"{}\"", count, term);
        }
        prompt();
    });
    let live = state.live_search(listener);

    println!("Atlas country explorer. Type `help` for commands, `/text` to search as you type.");
    println!("{}", greeting(restored));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            ShellInput::Empty => {}
            ShellInput::Quit => break,
            ShellInput::Live(text) => match ensure_catalog(state).await {
                Ok(()) => live.input(text),
                Err(e) => eprintln!("{}", e),
            },
            ShellInput::Command(command) => match crate::execute(state, command).await {
                Ok(output) => println!("{}", output),
                Err(e) => eprintln!("{}", e),
            },
            ShellInput::Message(message) => print!("{}", message),
        }
        prompt();
    }

    debug!("Shell closed");
    println!();
    Ok(())
}
