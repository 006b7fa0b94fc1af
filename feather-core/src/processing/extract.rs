//! Frame and audio extraction into the workspace.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::command::{ToolRunner, last_lines};
use crate::media::FrameRate;
use crate::external::ffmpeg::{extract_audio_command, extract_frames_command};
use crate::workspace::Workspace;

/// Result of the best-effort audio copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
    /// The first audio stream was copied to this path.
    Extracted(PathBuf),
    /// The source has no audio stream.
    Absent,
    /// Extraction failed for another reason; the job continues without audio.
    Failed(String),
}

impl AudioOutcome {
    pub fn has_audio(&self) -> bool {
        matches!(self, AudioOutcome::Extracted(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            AudioOutcome::Extracted(path) => Some(path),
            _ => None,
        }
    }
}

/// Decodes `source` into the workspace on a constant `frame_rate` clock;
/// returns the frame count.
pub fn extract_frames<R: ToolRunner + ?Sized>(
    runner: &R,
    ffmpeg: &Path,
    source: &Path,
    workspace: &Workspace,
    frame_rate: FrameRate,
    timeout: Option<Duration>,
) -> CoreResult<usize> {
    let cmd = extract_frames_command(
        ffmpeg,
        source,
        &workspace.frame_pattern(),
        frame_rate,
        timeout,
    );
    runner.run(&cmd).map_err(CoreError::Extraction)?;

    let frames = workspace.list_frames()?;
    if frames.is_empty() {
        return Err(CoreError::FrameSequence(format!(
            "ffmpeg produced no frames for {}",
            source.display()
        )));
    }
    log::debug!("Extracted {} frames from {}", frames.len(), source.display());
    Ok(frames.len())
}

/// Copies the first audio stream of `source` without re-encoding.
///
/// Never fails the job: a missing stream is [`AudioOutcome::Absent`], every
/// other problem is logged and reported as [`AudioOutcome::Failed`].
pub fn extract_audio<R: ToolRunner + ?Sized>(
    runner: &R,
    ffmpeg: &Path,
    source: &Path,
    workspace: &Workspace,
    timeout: Option<Duration>,
) -> AudioOutcome {
    let audio_path = workspace.audio_path();
    let cmd = extract_audio_command(ffmpeg, source, &audio_path, timeout);

    // A silent source exits non-zero; `run` would log that at error level.
    let outcome = match runner.execute(&cmd) {
        Ok(output) if cmd.accepts(output.status) => match std::fs::metadata(&audio_path) {
            Ok(meta) if meta.len() > 0 => AudioOutcome::Extracted(audio_path),
            Ok(_) => AudioOutcome::Failed("ffmpeg wrote an empty audio file".to_string()),
            Err(e) => AudioOutcome::Failed(format!("audio file missing after copy: {e}")),
        },
        Ok(output) => {
            let stderr = output.stderr_lossy();
            if reports_missing_audio(&stderr) {
                AudioOutcome::Absent
            } else {
                let err =
                    command_failed_error(cmd.tool_name(), output.status, last_lines(&stderr, 5));
                AudioOutcome::Failed(err.to_string())
            }
        }
        Err(e) => AudioOutcome::Failed(e.to_string()),
    };

    match &outcome {
        AudioOutcome::Extracted(path) => log::debug!("Copied audio stream to {}", path.display()),
        AudioOutcome::Absent => log::info!("Source has no audio stream; output will be silent"),
        AudioOutcome::Failed(reason) => {
            log::warn!("Audio extraction failed, continuing without audio: {reason}")
        }
    }
    outcome
}

/// ffmpeg's wording when `-map 0:a:0` matches nothing, or when the output
/// ended up with no streams at all.
fn reports_missing_audio(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("matches no streams") || stderr.contains("does not contain any stream")
}
