//! Orchestration of a complete feathering job.
//!
//! Validate config -> probe -> validate border -> workspace -> extract frames
//! and audio -> build mask -> composite -> compose -> release workspace.
//! Stages run strictly in sequence and the workspace is removed on every
//! exit path once it exists.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::FeatherConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{SystemRunner, ToolRunner, check_dependency};
use crate::media::{ProbeInfo, probe};
use crate::processing::compose::compose;
use crate::processing::composite::composite_frames;
use crate::processing::extract::{AudioOutcome, extract_audio, extract_frames};
use crate::processing::mask::{build_mask, validate_border};
use crate::workspace::Workspace;

/// Position of a job in the pipeline. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    Probing,
    Extracting,
    MaskBuilding,
    Compositing,
    Composing,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Init => "init",
            PipelineStage::Probing => "probing",
            PipelineStage::Extracting => "extracting",
            PipelineStage::MaskBuilding => "mask building",
            PipelineStage::Compositing => "compositing",
            PipelineStage::Composing => "composing",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a successful job.
#[derive(Debug, Clone)]
pub struct FeatherResult {
    pub output_path: PathBuf,
    /// Frames extracted, composited and handed to the composer.
    pub frame_count: usize,
    pub probe: ProbeInfo,
    pub audio: AudioOutcome,
    pub output_size: u64,
    pub elapsed: Duration,
}

impl FeatherResult {
    pub fn has_audio(&self) -> bool {
        self.audio.has_audio()
    }
}

/// Tracks the current stage and logs every transition.
#[derive(Debug)]
struct StageTracker {
    stage: PipelineStage,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            stage: PipelineStage::Init,
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        if self.stage.is_terminal() {
            return;
        }
        log::debug!("Pipeline stage: {} -> {}", self.stage, next);
        self.stage = next;
    }

    fn fail(&mut self, err: &CoreError) {
        log::error!("Feathering failed during {}: {}", self.stage, err);
        self.advance(PipelineStage::Failed);
    }
}

/// Runs a job with the real ffmpeg/ffprobe binaries.
pub fn run(config: &FeatherConfig) -> CoreResult<FeatherResult> {
    feather_video(&SystemRunner, config)
}

/// Runs a job, launching every external tool through `runner`.
pub fn feather_video<R: ToolRunner + ?Sized>(
    runner: &R,
    config: &FeatherConfig,
) -> CoreResult<FeatherResult> {
    let started = Instant::now();
    let mut tracker = StageTracker::new();

    let outcome = execute(runner, config, &mut tracker).and_then(|(probe, frame_count, audio)| {
        let output_size = std::fs::metadata(&config.output)?.len();
        Ok((probe, frame_count, audio, output_size))
    });

    match outcome {
        Ok((probe, frame_count, audio, output_size)) => {
            tracker.advance(PipelineStage::Done);
            let result = FeatherResult {
                output_path: config.output.clone(),
                frame_count,
                probe,
                audio,
                output_size,
                elapsed: started.elapsed(),
            };
            log::info!(
                "Feathered {} frames into {}",
                result.frame_count,
                result.output_path.display()
            );
            Ok(result)
        }
        Err(e) => {
            tracker.fail(&e);
            Err(e)
        }
    }
}

fn execute<R: ToolRunner + ?Sized>(
    runner: &R,
    config: &FeatherConfig,
    tracker: &mut StageTracker,
) -> CoreResult<(ProbeInfo, usize, AudioOutcome)> {
    config.validate()?;
    check_dependency(runner, &config.ffmpeg_path)?;
    check_dependency(runner, &config.ffprobe_path)?;

    tracker.advance(PipelineStage::Probing);
    log::info!("Probing {}", config.input.display());
    let info = probe(
        runner,
        &config.ffprobe_path,
        &config.input,
        config.command_timeout,
    )?;
    log::info!("Source: {info}");
    validate_border(info.width, info.height, config.border_width)?;

    let workspace = Workspace::acquire(&config.workspace_base())?;
    match run_in_workspace(runner, config, &info, &workspace, tracker) {
        Ok((frame_count, audio)) => {
            workspace.release()?;
            Ok((info, frame_count, audio))
        }
        Err(e) => {
            let path = workspace.path().to_path_buf();
            if let Err(cleanup) = workspace.release() {
                log::warn!("Failed to remove workspace {}: {}", path.display(), cleanup);
            }
            Err(e)
        }
    }
}

fn run_in_workspace<R: ToolRunner + ?Sized>(
    runner: &R,
    config: &FeatherConfig,
    info: &ProbeInfo,
    workspace: &Workspace,
    tracker: &mut StageTracker,
) -> CoreResult<(usize, AudioOutcome)> {
    let timeout = config.command_timeout;

    tracker.advance(PipelineStage::Extracting);
    log::info!("Extracting frames");
    let frame_count = extract_frames(
        runner,
        &config.ffmpeg_path,
        &config.input,
        workspace,
        info.frame_rate,
        timeout,
    )?;
    let audio = extract_audio(runner, &config.ffmpeg_path, &config.input, workspace, timeout);

    tracker.advance(PipelineStage::MaskBuilding);
    let mask = build_mask(info.width, info.height, config.border_width)?;

    tracker.advance(PipelineStage::Compositing);
    log::info!("Compositing {frame_count} frames");
    let frames = workspace.list_frames()?;
    if frames.len() != frame_count {
        return Err(CoreError::FrameSequence(format!(
            "{} frames extracted but {} present before compositing",
            frame_count,
            frames.len()
        )));
    }
    composite_frames(&frames, &mask, config.jobs, config.show_progress)?;

    tracker.advance(PipelineStage::Composing);
    log::info!("Composing {}", config.output.display());
    compose(
        runner,
        &config.ffmpeg_path,
        workspace,
        info.frame_rate,
        &audio,
        &config.output,
        &config.output_codecs(),
        timeout,
    )?;

    Ok((frame_count, audio))
}
