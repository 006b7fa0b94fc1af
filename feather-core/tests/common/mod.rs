// feather-core/tests/common/mod.rs
//
// Simulated ffmpeg/ffprobe used by the pipeline tests. The fake inspects
// each command the pipeline builds and produces the files the real tool
// would have produced.

#![allow(dead_code)]

use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Mutex;
use std::time::Duration;

use feather_core::error::command_start_error;
use feather_core::{ToolCommand, ToolError, ToolOutput, ToolRunner};
use image::{Rgb, RgbImage};

/// How the simulated audio copy behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeAudio {
    Present,
    Absent,
    Corrupt,
}

/// Description of the simulated source and of any injected failures.
#[derive(Debug, Clone)]
pub struct FakeMedia {
    pub width: u32,
    pub height: u32,
    pub frame_rate: String,
    pub frames: usize,
    pub audio: FakeAudio,
    pub probe_fails: bool,
    pub extraction_times_out: bool,
    pub compose_fails: bool,
    /// Compose exits 0 without leaving an output file behind.
    pub compose_writes_nothing: bool,
    pub missing_tools: Vec<String>,
}

impl Default for FakeMedia {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            frame_rate: "30/1".to_string(),
            frames: 10,
            audio: FakeAudio::Present,
            probe_fails: false,
            extraction_times_out: false,
            compose_fails: false,
            compose_writes_nothing: false,
            missing_tools: Vec::new(),
        }
    }
}

/// What the composer saw when it ran.
#[derive(Debug, Clone, Default)]
pub struct ComposeObservation {
    pub frames_present: usize,
    pub corner_alpha: u8,
    pub center_alpha: u8,
    pub is_rgba: bool,
}

pub struct FakeRunner {
    pub media: FakeMedia,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    composed: Mutex<Option<ComposeObservation>>,
}

impl FakeRunner {
    pub fn new(media: FakeMedia) -> Self {
        Self {
            media,
            calls: Mutex::new(Vec::new()),
            composed: Mutex::new(None),
        }
    }

    /// Every invocation as (tool name, arguments), in call order.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Arguments of the first call whose arguments contain `needle`.
    pub fn call_with(&self, needle: &str) -> Option<Vec<String>> {
        self.calls()
            .into_iter()
            .map(|(_, args)| args)
            .find(|args| args.iter().any(|a| a == needle))
    }

    pub fn composed(&self) -> Option<ComposeObservation> {
        self.composed.lock().unwrap().clone()
    }

    fn extract_frames(&self, pattern: &str) -> Result<ToolOutput, ToolError> {
        if self.media.extraction_times_out {
            return Err(ToolError::Timeout {
                tool: "ffmpeg".to_string(),
                after: Duration::from_secs(1),
            });
        }
        for index in 1..=self.media.frames {
            let path = pattern.replace("%06d", &format!("{index:06}"));
            let shade = (index * 20 % 256) as u8;
            RgbImage::from_pixel(self.media.width, self.media.height, Rgb([shade, 64, 128]))
                .save(&path)
                .unwrap();
        }
        Ok(ok_output(Vec::new()))
    }

    fn extract_audio(&self, audio_path: &str) -> Result<ToolOutput, ToolError> {
        match self.media.audio {
            FakeAudio::Present => {
                std::fs::write(audio_path, b"fake audio stream").unwrap();
                Ok(ok_output(Vec::new()))
            }
            FakeAudio::Absent => Ok(failed_output(
                "Stream map '0:a:0' matches no streams.\n\
                 To ignore this, add a trailing '?' to the map.\n",
            )),
            FakeAudio::Corrupt => Ok(failed_output(
                "Error while decoding stream #0:1: Invalid data found when processing input\n",
            )),
        }
    }

    fn compose(&self, args: &[String]) -> Result<ToolOutput, ToolError> {
        if self.media.compose_fails {
            return Ok(failed_output("Unknown encoder 'nonsense'\n"));
        }

        let pattern = input_after(args, "-framerate").unwrap();
        let dir = Path::new(&pattern).parent().unwrap().to_path_buf();
        let frames_present = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("frame_"))
            .count();

        let first = image::open(dir.join("frame_000001.png")).unwrap();
        let is_rgba = matches!(first.color(), image::ColorType::Rgba8);
        let rgba = first.to_rgba8();
        let (w, h) = rgba.dimensions();
        *self.composed.lock().unwrap() = Some(ComposeObservation {
            frames_present,
            corner_alpha: rgba.get_pixel(0, 0).0[3],
            center_alpha: rgba.get_pixel(w / 2, h / 2).0[3],
            is_rgba,
        });

        if !self.media.compose_writes_nothing {
            let output = PathBuf::from(args.last().unwrap());
            std::fs::write(output, b"fake feathered video").unwrap();
        }
        Ok(ok_output(Vec::new()))
    }

    fn probe_json(&self) -> Vec<u8> {
        format!(
            r#"{{"programs": [], "streams": [{{"width": {}, "height": {}, "r_frame_rate": "{}"}}]}}"#,
            self.media.width, self.media.height, self.media.frame_rate
        )
        .into_bytes()
    }
}

impl ToolRunner for FakeRunner {
    fn execute(&self, cmd: &ToolCommand) -> Result<ToolOutput, ToolError> {
        let tool = cmd.tool_name();
        let args: Vec<String> = cmd
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        self.calls.lock().unwrap().push((tool.clone(), args.clone()));

        let program = cmd.program().to_string_lossy().into_owned();
        if self.media.missing_tools.iter().any(|t| *t == program) {
            return Err(command_start_error(
                tool,
                std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            ));
        }

        if args == ["-version"] {
            return Ok(ok_output(format!("{tool} version 7.0").into_bytes()));
        }

        if tool.contains("ffprobe") {
            if self.media.probe_fails {
                return Ok(failed_output("moov atom not found\n"));
            }
            return Ok(ok_output(self.probe_json()));
        }

        let last = args.last().cloned().unwrap_or_default();
        if args.iter().any(|a| a == "-fps_mode") {
            self.extract_frames(&last)
        } else if args.iter().any(|a| a == "0:a:0") {
            self.extract_audio(&last)
        } else if args.iter().any(|a| a == "-framerate") {
            self.compose(&args)
        } else {
            panic!("unexpected command: {cmd}");
        }
    }
}

/// The argument following `-i` after the first occurrence of `flag`.
fn input_after(args: &[String], flag: &str) -> Option<String> {
    let start = args.iter().position(|a| a == flag)?;
    let rest = &args[start..];
    let i = rest.iter().position(|a| a == "-i")?;
    rest.get(i + 1).cloned()
}

fn ok_output(stdout: Vec<u8>) -> ToolOutput {
    ToolOutput {
        status: ExitStatus::from_raw(0),
        stdout,
        stderr: Vec::new(),
    }
}

fn failed_output(stderr: &str) -> ToolOutput {
    ToolOutput {
        status: ExitStatus::from_raw(1 << 8),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Creates a placeholder source file; the fake never reads it.
pub fn create_dummy_source(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"dummy content").unwrap();
    path
}

/// Number of entries left in a workspace base directory.
pub fn entries_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
