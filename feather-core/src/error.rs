//! Error types for the feather-core library.
//!
//! `CoreError` covers every fatal outcome of a feathering job. Failures of
//! individual ffmpeg/ffprobe invocations are described by [`ToolError`] and
//! wrapped by the stage that ran them, so the caller always sees which step
//! of the pipeline gave up.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single external tool invocation.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to start '{tool}': {source}")]
    Start {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("'{tool}' timed out after {}s and was killed", .after.as_secs())]
    Timeout { tool: String, after: Duration },

    #[error("failed waiting for '{tool}': {source}")]
    Wait {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    /// Captured stderr for a non-zero exit, empty for every other variant.
    pub fn stderr(&self) -> &str {
        match self {
            ToolError::Failed { stderr, .. } => stderr,
            _ => "",
        }
    }

    /// True when the tool binary itself could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ToolError::Start { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Errors produced by the feathering pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Configuration ----
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error(
        "Invalid border width {border}px for a {width}x{height} video: \
         the border must be positive and less than half of each dimension"
    )]
    InvalidBorder { border: u32, width: u32, height: u32 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    // ---- Workspace ----
    #[error("Workspace error: {0}")]
    Workspace(#[source] std::io::Error),

    // ---- Probing ----
    #[error("ffprobe failed: {0}")]
    ProbeFailed(#[source] ToolError),

    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParse(String),

    #[error("No video stream found in {}", .0.display())]
    NoVideoStream(PathBuf),

    // ---- Tool stages ----
    #[error("Frame extraction failed: {0}")]
    Extraction(#[source] ToolError),

    #[error("Frame extraction produced an unusable sequence: {0}")]
    FrameSequence(String),

    #[error("Video composition failed: {0}")]
    Compose(#[source] ToolError),

    // ---- Compositing ----
    #[error(
        "Frame {} is {actual_width}x{actual_height} but the mask is {mask_width}x{mask_height}",
        .path.display()
    )]
    DimensionMismatch {
        path: PathBuf,
        actual_width: u32,
        actual_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("Image error for {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Errors that are detected before the pipeline starts working on the
    /// source (bad paths, missing tools, unusable border width).
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CoreError::SourceNotFound(_)
                | CoreError::DependencyNotFound(_)
                | CoreError::InvalidBorder { .. }
                | CoreError::Config(_)
        )
    }
}

/// Result type for feather-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a [`ToolError::Start`] for a tool that could not be spawned.
pub fn command_start_error(tool: impl Into<String>, source: std::io::Error) -> ToolError {
    ToolError::Start {
        tool: tool.into(),
        source,
    }
}

/// Builds a [`ToolError::Failed`] for an unexpected exit status.
pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> ToolError {
    ToolError::Failed {
        tool: tool.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a [`ToolError::Wait`] for a child that could not be waited on.
pub fn command_wait_error(tool: impl Into<String>, source: std::io::Error) -> ToolError {
    ToolError::Wait {
        tool: tool.into(),
        source,
    }
}
