// ============================================================================
// feather-core/src/config/mod.rs
// ============================================================================
//
// CONFIGURATION: Job configuration for a feathering run
//
// `FeatherConfig` carries everything the pipeline needs: the source and
// output paths, the border width, the external tool locations and the
// resource limits. It is built by consumers (usually through
// `FeatherConfigBuilder`) and checked with `validate()` before any external
// tool is started.
//
// KEY COMPONENTS:
// - FeatherConfig: the job description passed to `feather_video`
// - FeatherConfigBuilder: fluent construction with defaults
// - DEFAULT_* constants

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg::OutputCodecs;

mod builder;

pub use builder::FeatherConfigBuilder;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Width in pixels of the band over which frames fade to transparent.
pub const DEFAULT_BORDER_WIDTH: u32 = 30;

/// ffmpeg binary, resolved through `PATH`.
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// ffprobe binary, resolved through `PATH`.
pub const DEFAULT_FFPROBE_PATH: &str = "ffprobe";

/// Deadline applied to every external command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Lossless, alpha-capable encoder; pair it with a `.mov` output.
pub const DEFAULT_VIDEO_CODEC: &str = "png";

/// Encoder for the audio track, when the source has one.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

// ============================================================================
// CONFIGURATION STRUCTURE
// ============================================================================

/// Full description of one feathering job.
#[derive(Debug, Clone)]
pub struct FeatherConfig {
    /// Source video.
    pub input: PathBuf,

    /// Destination video; its parent directory is created if missing.
    pub output: PathBuf,

    /// Border width in pixels. Must be positive and less than half of both
    /// frame dimensions; the latter is only known after probing.
    pub border_width: u32,

    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,

    /// Base directory for the job workspace. `None` uses the system temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Compositor worker threads. `None` uses one per core.
    pub jobs: Option<usize>,

    /// Per-command deadline. `None` disables it.
    pub command_timeout: Option<Duration>,

    pub video_codec: String,
    pub audio_codec: String,

    /// Show the compositing progress bar.
    pub show_progress: bool,
}

impl Default for FeatherConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::new(),
            border_width: DEFAULT_BORDER_WIDTH,
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE_PATH),
            temp_dir: None,
            jobs: None,
            command_timeout: Some(DEFAULT_COMMAND_TIMEOUT),
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            show_progress: true,
        }
    }
}

impl FeatherConfig {
    /// Checks everything that can be checked without running a tool.
    ///
    /// The border is only checked for being non-zero here; the comparison
    /// against the frame size happens after probing.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input.is_file() {
            return Err(CoreError::SourceNotFound(self.input.clone()));
        }

        if self.output.as_os_str().is_empty() {
            return Err(CoreError::Config("output path is empty".to_string()));
        }

        if self.border_width == 0 {
            return Err(CoreError::Config(
                "border width must be greater than 0".to_string(),
            ));
        }

        if self.jobs == Some(0) {
            return Err(CoreError::Config(
                "jobs must be at least 1 when given".to_string(),
            ));
        }

        if self.command_timeout.is_some_and(|t| t.is_zero()) {
            return Err(CoreError::Config(
                "command timeout must be greater than 0".to_string(),
            ));
        }

        if self.video_codec.trim().is_empty() || self.audio_codec.trim().is_empty() {
            return Err(CoreError::Config("codec names must not be empty".to_string()));
        }

        if same_file(&self.input, &self.output) {
            return Err(CoreError::Config(format!(
                "output {} would overwrite the source",
                self.output.display()
            )));
        }

        Ok(())
    }

    /// Base directory for the workspace.
    pub fn workspace_base(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn output_codecs(&self) -> OutputCodecs {
        OutputCodecs {
            video: self.video_codec.clone(),
            audio: self.audio_codec.clone(),
        }
    }
}

/// Compares canonical paths when both exist, the raw paths otherwise.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
