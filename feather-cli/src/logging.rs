// ============================================================================
// feather-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern dispatch for console and log file
//
// Everything the application reports goes through the `log` macros. The
// console sink writes plain messages to stderr (warnings and errors get a
// coloured prefix); the optional file sink adds timestamps and levels and
// strips terminal styling.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use feather_core::CoreError;
use log::{Level, LevelFilter};

use crate::error::CliResult;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Name of the log file for a run started now.
pub fn log_file_name() -> String {
    format!("feather_{}.log", get_timestamp())
}

/// Installs the global logger. Returns the log file path when `log_dir` is set.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console_sink = fern::Dispatch::new()
        .format(|out, message, record| match record.level() {
            Level::Error => out.finish(format_args!(
                "{} {}",
                style("ERROR").red().bold().for_stderr(),
                message
            )),
            Level::Warn => out.finish(format_args!(
                "{} {}",
                style("WARN").yellow().for_stderr(),
                message
            )),
            Level::Info => out.finish(format_args!("{message}")),
            Level::Debug | Level::Trace => out.finish(format_args!(
                "{} {}",
                style(record.target()).dim().for_stderr(),
                message
            )),
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().level(level).chain(console_sink);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir)?;
        let path = dir.join(log_file_name());
        let file = fern::log_file(&path)?;
        let file_sink = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    console::strip_ansi_codes(&message.to_string())
                ))
            })
            .chain(file);
        dispatch = dispatch.chain(file_sink);
        log_path = Some(path);
    }

    dispatch
        .apply()
        .map_err(|e| CoreError::Config(format!("failed to initialize logging: {e}")))?;

    Ok(log_path)
}
