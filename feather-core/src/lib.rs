//! Core library for feathering the edges of video clips with ffmpeg and ffprobe.
//!
//! A job probes the source, decodes every frame into a private workspace,
//! replaces each frame's alpha channel with a Gaussian-feathered rectangular
//! mask and re-encodes the frames (plus the source audio, when present)
//! with an alpha-capable codec.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use feather_core::FeatherConfigBuilder;
//!
//! let config = FeatherConfigBuilder::new()
//!     .input("clip.mp4")
//!     .output("clip_feathered.mov")
//!     .border_width(30)
//!     .build();
//!
//! let result = feather_core::run(&config).unwrap();
//! println!(
//!     "{} frames, audio: {}",
//!     result.frame_count,
//!     result.has_audio()
//! );
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod media;
pub mod processing;
pub mod utils;
pub mod workspace;

// Re-exports for public API
pub use config::{FeatherConfig, FeatherConfigBuilder};
pub use error::{CoreError, CoreResult, ToolError};
pub use external::{SystemRunner, ToolCommand, ToolOutput, ToolRunner};
pub use media::{FrameRate, ProbeInfo};
pub use processing::{
    AlphaMask, AudioOutcome, FeatherResult, PipelineStage, build_mask, feather_video, run,
};
pub use utils::{format_bytes, format_duration};
pub use workspace::Workspace;
