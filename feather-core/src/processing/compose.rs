//! Final encode of the alpha frames (plus optional audio) into the output.

use std::path::Path;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::external::command::ToolRunner;
use crate::external::ffmpeg::{OutputCodecs, compose_command};
use crate::media::FrameRate;
use crate::processing::extract::AudioOutcome;
use crate::workspace::Workspace;

/// Encodes `<workspace>/frame_%06d.png` at `frame_rate` into `output`.
///
/// Audio is multiplexed only for [`AudioOutcome::Extracted`], in which case
/// the output is cut to the shorter of the two streams.
#[allow(clippy::too_many_arguments)]
pub fn compose<R: ToolRunner + ?Sized>(
    runner: &R,
    ffmpeg: &Path,
    workspace: &Workspace,
    frame_rate: FrameRate,
    audio: &AudioOutcome,
    output: &Path,
    codecs: &OutputCodecs,
    timeout: Option<Duration>,
) -> CoreResult<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let cmd = compose_command(
        ffmpeg,
        &workspace.frame_pattern(),
        frame_rate,
        audio.path(),
        output,
        codecs,
        timeout,
    );
    runner.run(&cmd).map_err(CoreError::Compose)?;

    log::debug!(
        "Composed {} ({} audio)",
        output.display(),
        if audio.has_audio() { "with" } else { "without" }
    );
    Ok(())
}
