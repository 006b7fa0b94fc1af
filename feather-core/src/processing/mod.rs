//! Feathering stages and their orchestration.
//!
//! Each stage lives in its own module; [`pipeline`] runs them in order for a
//! single job.

/// Frame and audio extraction into the workspace
pub mod extract;

/// Feathered alpha mask synthesis
pub mod mask;

/// Per-frame alpha compositing
pub mod composite;

/// Final encode with an alpha-capable codec
pub mod compose;

/// Job orchestration and stage tracking
pub mod pipeline;

pub use composite::{apply_mask, composite_frames};
pub use extract::AudioOutcome;
pub use mask::{AlphaMask, build_mask, validate_border};
pub use pipeline::{FeatherResult, PipelineStage, feather_video, run};
