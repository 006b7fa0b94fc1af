// ============================================================================
// feather-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// Every process the pipeline starts goes through this module. Commands are
// described as `ToolCommand` values and executed by a `ToolRunner`, which
// keeps timeouts and exit-code checks in one place and lets tests replace
// the real binaries.
//
// KEY COMPONENTS:
// - command: ToolCommand descriptor, ToolRunner trait, SystemRunner
// - ffmpeg: argument builders for the three ffmpeg modes the pipeline uses
// - Dependency checking for the configured tool paths

use std::path::Path;

use crate::error::{CoreError, CoreResult};

pub mod command;
pub mod ffmpeg;

pub use command::{SystemRunner, ToolCommand, ToolOutput, ToolRunner};

/// Checks that `tool` can be started, by running it with `-version`.
///
/// A tool that cannot be found yields [`CoreError::DependencyNotFound`]; a
/// tool that starts but reports a failure is tolerated and logged, matching
/// how ffmpeg builds without `-version` support behave.
pub fn check_dependency<R: ToolRunner + ?Sized>(runner: &R, tool: &Path) -> CoreResult<()> {
    let cmd = ToolCommand::new(tool)
        .arg("-version")
        .timeout(Some(std::time::Duration::from_secs(30)));

    match runner.run(&cmd) {
        Ok(_) => {
            log::debug!("Found dependency: {}", tool.display());
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            log::warn!("Dependency '{}' not found.", tool.display());
            Err(CoreError::DependencyNotFound(tool.display().to_string()))
        }
        Err(crate::error::ToolError::Start { source, .. }) => {
            log::error!("Failed to start dependency check for '{}': {}", tool.display(), source);
            Err(CoreError::DependencyNotFound(format!(
                "{} ({source})",
                tool.display()
            )))
        }
        Err(e) => {
            log::warn!("Dependency check for '{}' reported: {}", tool.display(), e);
            Ok(())
        }
    }
}
