//! Implementation of the 'apply' subcommand.
//!
//! Maps the arguments onto a `FeatherConfig`, runs the core pipeline and
//! prints the summary.

use std::time::Duration;

use feather_core::{
    AudioOutcome, FeatherConfig, FeatherConfigBuilder, FeatherResult, format_bytes,
    format_duration,
};

use crate::cli::ApplyArgs;
use crate::error::CliResult;
use crate::terminal;

/// Builds the core configuration from the command-line arguments.
pub fn build_config(args: &ApplyArgs) -> FeatherConfig {
    let mut builder = FeatherConfigBuilder::new()
        .input(&args.input)
        .output(&args.output)
        .border_width(args.border)
        .ffmpeg_path(&args.tools.ffmpeg)
        .ffprobe_path(&args.tools.ffprobe)
        .command_timeout(Some(Duration::from_secs(args.timeout)))
        .video_codec(&args.video_codec)
        .audio_codec(&args.audio_codec)
        .show_progress(!args.no_progress);

    if let Some(dir) = &args.temp_dir {
        builder = builder.temp_dir(dir);
    }
    if let Some(jobs) = args.jobs {
        builder = builder.jobs(jobs);
    }
    builder.build()
}

pub fn run_apply(args: &ApplyArgs) -> CliResult<FeatherResult> {
    let config = build_config(args);

    terminal::print_section("Feather");
    terminal::print_status("Input", config.input.display());
    terminal::print_status("Output", config.output.display());
    terminal::print_status("Border", format!("{}px", config.border_width));
    log::debug!("Configuration: {config:?}");

    let result = feather_core::run(&config)?;

    print_summary(&result);
    Ok(result)
}

fn print_summary(result: &FeatherResult) {
    terminal::print_section("Summary");
    terminal::print_status("Frames", result.frame_count);
    terminal::print_status(
        "Resolution",
        format!("{}x{}", result.probe.width, result.probe.height),
    );
    terminal::print_status(
        "Frame rate",
        format!(
            "{} ({:.3} fps)",
            result.probe.frame_rate,
            result.probe.frame_rate.as_f64()
        ),
    );
    terminal::print_status("Audio", describe_audio(&result.audio));
    terminal::print_status("Size", format_bytes(result.output_size));
    terminal::print_status("Time", format_duration(result.elapsed));
    terminal::print_success(&format!(
        "Feathered video written to {}",
        result.output_path.display()
    ));
}

fn describe_audio(audio: &AudioOutcome) -> String {
    match audio {
        AudioOutcome::Extracted(_) => "copied from source".to_string(),
        AudioOutcome::Absent => "none in source".to_string(),
        AudioOutcome::Failed(reason) => format!("dropped ({reason})"),
    }
}
