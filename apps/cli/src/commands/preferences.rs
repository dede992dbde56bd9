//! Display preference commands.

use clap::ValueEnum;

use super::CommandResult;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Dark,
    Light,
    Toggle,
}

fn describe(dark: bool) -> String {
    format!("Theme: {}", if dark { "dark" } else { "light" })
}

/// Shows the theme, or changes it when an action is given.
pub fn theme(state: &AppState, action: Option<ThemeAction>) -> CommandResult {
    let prefs = &state.preferences;
    let dark = match action {
        None => prefs.dark_mode()?,
        Some(ThemeAction::Toggle) => prefs.toggle_dark_mode()?,
        Some(ThemeAction::Dark) => {
            prefs.set_dark_mode(true)?;
            true
        }
        Some(ThemeAction::Light) => {
            prefs.set_dark_mode(false)?;
            false
        }
    };
    Ok(describe(dark))
}
