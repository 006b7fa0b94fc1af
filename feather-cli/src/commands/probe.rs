//! Implementation of the 'probe' subcommand.

use feather_core::config::DEFAULT_COMMAND_TIMEOUT;
use feather_core::external::check_dependency;
use feather_core::{CoreError, ProbeInfo, SystemRunner};

use crate::cli::ProbeArgs;
use crate::error::CliResult;
use crate::terminal;

pub fn run_probe(args: &ProbeArgs) -> CliResult<ProbeInfo> {
    if !args.input.is_file() {
        return Err(CoreError::SourceNotFound(args.input.clone()));
    }
    check_dependency(&SystemRunner, &args.ffprobe)?;

    let info = feather_core::media::probe(
        &SystemRunner,
        &args.ffprobe,
        &args.input,
        Some(DEFAULT_COMMAND_TIMEOUT),
    )?;

    terminal::print_section("Probe");
    terminal::print_status("File", args.input.display());
    terminal::print_status("Resolution", format!("{}x{}", info.width, info.height));
    terminal::print_status(
        "Frame rate",
        format!("{} ({:.3} fps)", info.frame_rate, info.frame_rate.as_f64()),
    );
    Ok(info)
}
