//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Runs the full feathering pipeline.
pub mod apply;

/// Prints probe results for a source.
pub mod probe;

/// Renders a mask preview.
pub mod mask;
