//! # Command-Line Surface
//!
//! clap definitions shared by one-shot invocations and the interactive
//! shell. Every value that feeds a form (search boxes, login fields) is
//! taken as raw text so that validation and "not a number means no bound"
//! behave the same as in a UI.

use std::path::PathBuf;

use atlas_core::query::CriteriaForm;
use atlas_core::validation::{LoginForm, RegisterForm};
use clap::{Args, Parser, Subcommand};

use crate::commands::preferences::ThemeAction;

/// Explore countries from the REST Countries API.
#[derive(Debug, Parser)]
#[command(name = "atlas", version, about)]
pub struct Cli {
    /// Config file (default: atlas.toml in the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep the session and preferences in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Command to run; starts the interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One line of the interactive shell.
#[derive(Debug, Parser)]
#[command(name = "atlas", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every country and list the current results
    All,

    /// Show the first countries of the catalog
    Preview,

    /// Filter the catalog by text, region, population and area
    Search(SearchArgs),

    /// Print the current results without fetching
    Results,

    /// List the regions of the region browser
    Regions,

    /// List the subregions of a region
    Subregions { region: String },

    /// Fetch the countries of a region
    Region { name: String },

    /// Fetch countries by name
    Name {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show one country by its code
    Show {
        code: String,

        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List favorite countries
    Favorites,

    /// Change favorites (requires login)
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Log in (simulated)
    Login(LoginArgs),

    /// Log out
    Logout,

    /// Register (simulated, does not log in)
    Register(RegisterArgs),

    /// Show the logged-in user
    Whoami,

    /// Show or change the display theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },

    /// Summarise catalog and session state
    Status,
}

#[derive(Debug, Subcommand)]
pub enum FavoriteAction {
    Add { code: String },
    Remove { code: String },
    Toggle { code: String },
}

#[derive(Debug, Default, Args)]
pub struct SearchArgs {
    /// Matches common name, official name or capital
    #[arg(num_args = 0..)]
    pub term: Vec<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub subregion: Option<String>,

    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub min_population: Option<String>,

    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub max_population: Option<String>,

    /// Square kilometres
    #[arg(long, value_name = "KM2", allow_hyphen_values = true)]
    pub min_area: Option<String>,

    #[arg(long, value_name = "KM2", allow_hyphen_values = true)]
    pub max_area: Option<String>,
}

impl SearchArgs {
    pub fn to_form(&self) -> CriteriaForm {
        CriteriaForm {
            search_term: self.term.join(" "),
            region: self.region.clone().unwrap_or_default(),
            subregion: self.subregion.clone().unwrap_or_default(),
            min_population: self.min_population.clone().unwrap_or_default(),
            max_population: self.max_population.clone().unwrap_or_default(),
            min_area: self.min_area.clone().unwrap_or_default(),
            max_area: self.max_area.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub username: Option<String>,

    #[arg(short, long)]
    pub password: Option<String>,
}

impl LoginArgs {
    pub fn to_form(&self) -> LoginForm {
        LoginForm {
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub username: Option<String>,

    #[arg(short, long)]
    pub email: Option<String>,

    #[arg(short, long)]
    pub password: Option<String>,

    #[arg(short = 'c', long)]
    pub confirm_password: Option<String>,
}

impl RegisterArgs {
    pub fn to_form(&self) -> RegisterForm {
        RegisterForm {
            username: self.username.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            confirm_password: self.confirm_password.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
        ShellLine::command().debug_assert();
    }

    #[test]
    fn test_search_flags_stay_raw() {
        let cli = Cli::try_parse_from([
            "atlas",
            "search",
            "united",
            "states",
            "--region",
            "Americas",
            "--min-population",
            "lots",
            "--max-population",
            "-1",
        ])
        .unwrap();

        let Some(Command::Search(args)) = cli.command else {
            panic!("expected search");
        };
        let form = args.to_form();
        assert_eq!(form.search_term, "united states");
        assert_eq!(form.region, "Americas");
        assert_eq!(form.min_population, "lots");
        assert_eq!(form.max_population, "-1");
        assert_eq!(form.max_area, "");
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["atlas", "--ephemeral", "--config", "a.toml"]).unwrap();
        assert!(cli.ephemeral);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_shell_line_needs_no_binary_name() {
        let line = ShellLine::try_parse_from(["favorite", "toggle", "CAN"]).unwrap();
        assert!(matches!(
            line.command,
            Command::Favorite {
                action: FavoriteAction::Toggle { ref code }
            } if code == "CAN"
        ));

        let line = ShellLine::try_parse_from(["theme", "dark"]).unwrap();
        assert!(matches!(
            line.command,
            Command::Theme {
                action: Some(ThemeAction::Dark)
            }
        ));
    }
}
