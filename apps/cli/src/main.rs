//! # Atlas Entry Point
//!
//! ```text
//! $ atlas preview              # first 20 countries
//! $ atlas show CAN             # detail view
//! $ atlas login -u alice -p secret1
//! $ atlas                      # interactive shell
//! ```
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (stderr)
//! 3. Load configuration
//! 4. Build state, restore session
//! 5. Run the command or the shell

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    atlas_cli_lib::run()
}
