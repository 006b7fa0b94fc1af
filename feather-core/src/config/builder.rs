// ============================================================================
// feather-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Fluent construction of FeatherConfig
//
// Starts from the defaults in `FeatherConfig::default()` and lets callers
// override individual fields. `build()` does not validate; call
// `FeatherConfig::validate()` (the pipeline does) once the config is final.

use std::path::PathBuf;
use std::time::Duration;

use super::FeatherConfig;

/// Builder for [`FeatherConfig`].
///
/// # Examples
///
/// ```rust
/// use feather_core::config::FeatherConfigBuilder;
/// use std::time::Duration;
///
/// let config = FeatherConfigBuilder::new()
///     .input("clip.mp4")
///     .output("clip_feathered.mov")
///     .border_width(40)
///     .jobs(4)
///     .command_timeout(Some(Duration::from_secs(600)))
///     .build();
///
/// assert_eq!(config.border_width, 40);
/// assert_eq!(config.jobs, Some(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatherConfigBuilder {
    config: FeatherConfig,
}

impl FeatherConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, input: impl Into<PathBuf>) -> Self {
        self.config.input = input.into();
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = output.into();
        self
    }

    pub fn border_width(mut self, border_width: u32) -> Self {
        self.config.border_width = border_width;
        self
    }

    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    pub fn ffprobe_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ffprobe_path = path.into();
        self
    }

    /// Base directory for the workspace instead of the system temp dir.
    pub fn temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(temp_dir.into());
        self
    }

    /// Number of compositor threads.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = Some(jobs);
        self
    }

    /// Per-command deadline; `None` lets commands run indefinitely.
    pub fn command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.command_timeout = timeout;
        self
    }

    pub fn video_codec(mut self, codec: impl Into<String>) -> Self {
        self.config.video_codec = codec.into();
        self
    }

    pub fn audio_codec(mut self, codec: impl Into<String>) -> Self {
        self.config.audio_codec = codec.into();
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    pub fn build(self) -> FeatherConfig {
        self.config
    }
}
