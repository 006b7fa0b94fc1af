//! Implementation of the 'mask' subcommand.
//!
//! Renders the same mask the pipeline would apply, so a border width can be
//! previewed without processing a video.

use feather_core::AlphaMask;

use crate::cli::MaskArgs;
use crate::error::CliResult;
use crate::terminal;

pub fn run_mask(args: &MaskArgs) -> CliResult<AlphaMask> {
    let mask = feather_core::build_mask(args.width, args.height, args.border)?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    mask.save(&args.output)?;

    terminal::print_status("Mask", format!("{}x{}", mask.width(), mask.height()));
    terminal::print_status("Border", format!("{}px", args.border));
    terminal::print_success(&format!("Mask written to {}", args.output.display()));
    Ok(mask)
}
