//! Media inspection: probe results and the exact frame-rate type.

pub mod info;
pub mod probe;

pub use info::{FrameRate, ProbeInfo};
pub use probe::probe;
