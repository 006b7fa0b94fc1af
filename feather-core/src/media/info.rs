use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Exact frame rate as reported by ffprobe (`r_frame_rate`), e.g. `30000/1001`.
///
/// The value is never converted to a float on its way through the pipeline;
/// the composer receives the same `num/den` text the prober read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub num: u32,
    pub den: u32,
}

impl FrameRate {
    pub fn new(num: u32, den: u32) -> Result<Self, CoreError> {
        if num == 0 || den == 0 {
            return Err(CoreError::ProbeParse(format!(
                "frame rate {num}/{den} must have a non-zero numerator and denominator"
            )));
        }
        Ok(Self { num, den })
    }

    /// Approximate frames per second, for display only.
    pub fn as_f64(&self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl FromStr for FrameRate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| CoreError::ProbeParse(format!("invalid frame rate '{s}'")))
        };
        FrameRate::new(parse(num)?, parse(den)?)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Resolution and frame rate of the first video stream of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeInfo {
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
}

impl fmt::Display for ProbeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} @ {} ({:.3} fps)",
            self.width,
            self.height,
            self.frame_rate,
            self.frame_rate.as_f64()
        )
    }
}
