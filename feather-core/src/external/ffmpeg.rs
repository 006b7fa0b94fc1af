//! Builders for the ffmpeg invocations used by the pipeline.
//!
//! Each function returns a fully formed [`ToolCommand`]; nothing here runs a
//! process. Keeping the argument lists in one file makes the exact tool
//! behaviour easy to audit and to assert on in tests.

use std::path::Path;
use std::time::Duration;

use crate::external::command::ToolCommand;
use crate::media::FrameRate;

/// Codec choices for the final encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCodecs {
    /// Video encoder; must support an alpha channel (e.g. `png`, `qtrle`).
    pub video: String,
    /// Audio encoder used when the source had audio.
    pub audio: String,
}

/// Pixel format that keeps an alpha channel for the given video encoder.
///
/// Unknown encoders get `rgba`; ffmpeg rejects the job if they cannot take it.
pub fn alpha_pixel_format(video_codec: &str) -> &'static str {
    match video_codec {
        "prores_ks" | "prores" => "yuva444p10le",
        "libvpx-vp9" | "libvpx" => "yuva420p",
        "ffv1" => "yuva444p",
        "qtrle" => "argb",
        _ => "rgba",
    }
}

/// Common prefix: no banner, never read stdin, overwrite outputs.
fn base(ffmpeg: &Path, timeout: Option<Duration>) -> ToolCommand {
    ToolCommand::new(ffmpeg)
        .args(["-hide_banner", "-nostdin", "-y"])
        .timeout(timeout)
}

/// Decodes the first video stream into numbered PNGs.
///
/// Frames are resampled onto a constant `frame_rate` clock (duplicated or
/// dropped as needed), the same rate the compose step replays them at, so
/// variable-rate sources keep their duration.
pub fn extract_frames_command(
    ffmpeg: &Path,
    source: &Path,
    frame_pattern: &Path,
    frame_rate: FrameRate,
    timeout: Option<Duration>,
) -> ToolCommand {
    base(ffmpeg, timeout)
        .arg("-i")
        .arg(source)
        .args(["-map", "0:v:0"])
        .args(["-fps_mode", "cfr"])
        .arg("-r")
        .arg(frame_rate.to_string())
        .arg(frame_pattern)
}

/// Copies the first audio stream without re-encoding.
pub fn extract_audio_command(
    ffmpeg: &Path,
    source: &Path,
    audio_path: &Path,
    timeout: Option<Duration>,
) -> ToolCommand {
    base(ffmpeg, timeout)
        .arg("-i")
        .arg(source)
        .arg("-vn")
        .args(["-map", "0:a:0"])
        .args(["-c:a", "copy"])
        .arg(audio_path)
}

/// Encodes the processed frame sequence (and optional audio) into `output`.
pub fn compose_command(
    ffmpeg: &Path,
    frame_pattern: &Path,
    frame_rate: FrameRate,
    audio_path: Option<&Path>,
    output: &Path,
    codecs: &OutputCodecs,
    timeout: Option<Duration>,
) -> ToolCommand {
    let mut cmd = base(ffmpeg, timeout)
        .arg("-framerate")
        .arg(frame_rate.to_string())
        .args(["-start_number", "1"])
        .arg("-i")
        .arg(frame_pattern);

    if let Some(audio) = audio_path {
        cmd = cmd.arg("-i").arg(audio);
    }

    cmd = cmd
        .args(["-map", "0:v:0"])
        .args(["-c:v", codecs.video.as_str()])
        .args(["-pix_fmt", alpha_pixel_format(&codecs.video)]);

    if audio_path.is_some() {
        cmd = cmd
            .args(["-map", "1:a:0"])
            .args(["-c:a", codecs.audio.as_str()])
            .arg("-shortest");
    }

    cmd.arg(output)
}
