// ============================================================================
// feather-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and exit codes
//
// The CLI reports core errors as they are; the only CLI-specific decision is
// which exit code a failure maps to.

use feather_core::{CoreError, CoreResult};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Exit code for problems found before any work started.
pub const EXIT_CONFIGURATION: i32 = 2;

/// Exit code for every other failure.
pub const EXIT_FAILURE: i32 = 1;

/// Maps an error to the process exit code.
pub fn exit_code(error: &CoreError) -> i32 {
    if error.is_configuration_error() {
        EXIT_CONFIGURATION
    } else {
        EXIT_FAILURE
    }
}
