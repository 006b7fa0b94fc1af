// feather-cli/src/lib.rs
//
// Library portion of the Feather CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{ApplyArgs, Cli, Commands, MaskArgs, ProbeArgs};
pub use commands::apply::run_apply;
pub use commands::mask::run_mask;
pub use commands::probe::run_probe;
pub use error::{CliResult, exit_code};
