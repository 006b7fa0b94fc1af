//! ffprobe-based inspection of the source's first video stream.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::external::command::{ToolCommand, ToolRunner};
use crate::media::info::{FrameRate, ProbeInfo};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<i64>,
    height: Option<i64>,
    r_frame_rate: Option<String>,
}

/// Builds the ffprobe invocation for width, height and frame rate of `v:0`.
pub fn probe_command(ffprobe: &Path, source: &Path, timeout: Option<Duration>) -> ToolCommand {
    ToolCommand::new(ffprobe)
        .args(["-v", "error", "-select_streams", "v:0"])
        .args(["-show_entries", "stream=width,height,r_frame_rate"])
        .args(["-of", "json"])
        .arg(source)
        .timeout(timeout)
}

/// Probes `source` for its resolution and exact frame rate.
pub fn probe<R: ToolRunner + ?Sized>(
    runner: &R,
    ffprobe: &Path,
    source: &Path,
    timeout: Option<Duration>,
) -> CoreResult<ProbeInfo> {
    log::debug!("Probing video stream of {}", source.display());
    let output = runner
        .run(&probe_command(ffprobe, source, timeout))
        .map_err(CoreError::ProbeFailed)?;

    let info = parse_probe_output(&output.stdout, source)?;
    log::debug!("Probe result for {}: {}", source.display(), info);
    Ok(info)
}

/// Parses ffprobe's JSON document into a [`ProbeInfo`].
pub fn parse_probe_output(stdout: &[u8], source: &Path) -> CoreResult<ProbeInfo> {
    let parsed: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| CoreError::ProbeParse(format!("ffprobe JSON for {}: {e}", source.display())))?;

    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::NoVideoStream(source.to_path_buf()))?;

    let dimension = |value: Option<i64>, name: &str| -> CoreResult<u32> {
        let value = value.ok_or_else(|| {
            CoreError::ProbeParse(format!("video stream missing {name} in {}", source.display()))
        })?;
        u32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| {
                CoreError::ProbeParse(format!(
                    "invalid {name} {value} in {}",
                    source.display()
                ))
            })
    };

    let width = dimension(stream.width, "width")?;
    let height = dimension(stream.height, "height")?;
    let frame_rate: FrameRate = stream
        .r_frame_rate
        .as_deref()
        .ok_or_else(|| {
            CoreError::ProbeParse(format!("video stream missing frame rate in {}", source.display()))
        })?
        .parse()?;

    Ok(ProbeInfo {
        width,
        height,
        frame_rate,
    })
}
