// feather-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use feather_core::config::{
    DEFAULT_AUDIO_CODEC, DEFAULT_BORDER_WIDTH, DEFAULT_COMMAND_TIMEOUT, DEFAULT_FFMPEG_PATH,
    DEFAULT_FFPROBE_PATH, DEFAULT_VIDEO_CODEC,
};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Feather: fade the edges of a video clip to transparent",
    long_about = "Probes a clip, applies a Gaussian-feathered alpha mask to every frame \
                  and re-encodes it with an alpha-capable codec using ffmpeg."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug-level logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Feathers the edges of a video and writes the result
    Apply(ApplyArgs),
    /// Prints the resolution and frame rate of a video
    Probe(ProbeArgs),
    /// Renders the alpha mask for a frame size to a PNG preview
    Mask(MaskArgs),
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Source video
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: PathBuf,

    /// Output video; use a container that supports the video codec (e.g. .mov)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Width in pixels of the band that fades to transparent
    #[arg(short = 'b', long = "border", value_name = "PIXELS", default_value_t = DEFAULT_BORDER_WIDTH)]
    pub border: u32,

    #[command(flatten)]
    pub tools: ToolArgs,

    /// Base directory for the temporary workspace (defaults to the system temp dir)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Number of compositing threads (defaults to one per core)
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Deadline in seconds for each ffmpeg/ffprobe invocation
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_COMMAND_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Alpha-capable video encoder for the output
    #[arg(long, value_name = "CODEC", default_value = DEFAULT_VIDEO_CODEC)]
    pub video_codec: String,

    /// Audio encoder used when the source has audio
    #[arg(long, value_name = "CODEC", default_value = DEFAULT_AUDIO_CODEC)]
    pub audio_codec: String,

    /// Also write a timestamped log file to this directory
    #[arg(short = 'l', long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Hide the compositing progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

/// Locations of the external tools.
#[derive(Args, Debug)]
pub struct ToolArgs {
    /// Path to the ffmpeg binary
    #[arg(long, value_name = "PATH", env = "FEATHER_FFMPEG", default_value = DEFAULT_FFMPEG_PATH)]
    pub ffmpeg: PathBuf,

    /// Path to the ffprobe binary
    #[arg(long, value_name = "PATH", env = "FEATHER_FFPROBE", default_value = DEFAULT_FFPROBE_PATH)]
    pub ffprobe: PathBuf,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Video to inspect
    #[arg(short = 'i', long = "input", value_name = "INPUT")]
    pub input: PathBuf,

    /// Path to the ffprobe binary
    #[arg(long, value_name = "PATH", env = "FEATHER_FFPROBE", default_value = DEFAULT_FFPROBE_PATH)]
    pub ffprobe: PathBuf,
}

#[derive(Args, Debug)]
pub struct MaskArgs {
    /// Frame width in pixels
    #[arg(short = 'W', long, value_name = "PIXELS")]
    pub width: u32,

    /// Frame height in pixels
    #[arg(short = 'H', long, value_name = "PIXELS")]
    pub height: u32,

    /// Border width in pixels
    #[arg(short = 'b', long = "border", value_name = "PIXELS", default_value_t = DEFAULT_BORDER_WIDTH)]
    pub border: u32,

    /// Destination PNG
    #[arg(short = 'o', long = "output", value_name = "PNG")]
    pub output: PathBuf,
}
