//! Terminal output styling for feather.
//!
//! All output goes through `log::info!` so it reaches both the console and
//! the log file. Styling uses `console` and is switched off when `NO_COLOR`
//! is set.

use std::fmt::Display;

use console::style;
use log::{error, info};

/// Disables colours when `NO_COLOR` is present in the environment.
pub fn configure_colors() {
    if std::env::var_os("NO_COLOR").is_some() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

/// Print a section header for a major phase
pub fn print_section(title: &str) {
    info!("");
    info!(
        "{}",
        style(format!("===== {} =====", title.to_uppercase()))
            .cyan()
            .bold()
            .for_stderr()
    );
}

/// Print a key-value status line
pub fn print_status(label: &str, value: impl Display) {
    let label = format!("{label}:");
    info!("  {:<12} {}", label, style(value).bold().for_stderr());
}

/// Print a success message
pub fn print_success(message: &str) {
    info!("");
    info!(
        "  {} {}",
        style("✓").green().bold().for_stderr(),
        style(message).green().for_stderr()
    );
}

/// Print a fatal error
pub fn print_error(err: impl Display) {
    info!("");
    error!("{err}");
}
