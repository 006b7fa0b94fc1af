// feather-core/tests/pipeline_tests.rs
//
// Full pipeline runs against a simulated ffmpeg/ffprobe.

mod common;

use std::path::PathBuf;

use common::{FakeAudio, FakeMedia, FakeRunner, create_dummy_source, entries_in};
use feather_core::{AudioOutcome, CoreError, FeatherConfig, FeatherConfigBuilder, ToolError, feather_video};
use tempfile::{TempDir, tempdir};

struct Job {
    _input_dir: TempDir,
    output_dir: TempDir,
    temp_base: TempDir,
    config: FeatherConfig,
}

fn job(border: u32) -> Job {
    let input_dir = tempdir().unwrap();
    let output_dir = tempdir().unwrap();
    let temp_base = tempdir().unwrap();
    let source = create_dummy_source(input_dir.path(), "clip.mp4");

    let config = FeatherConfigBuilder::new()
        .input(source)
        .output(output_dir.path().join("clip_feathered.mov"))
        .border_width(border)
        .temp_dir(temp_base.path())
        .jobs(2)
        .show_progress(false)
        .build();

    Job {
        _input_dir: input_dir,
        output_dir,
        temp_base,
        config,
    }
}

fn value_after(args: &[String], flag: &str) -> Option<String> {
    let i = args.iter().position(|a| a == flag)?;
    args.get(i + 1).cloned()
}

#[test]
fn test_feathers_clip_with_audio() -> Result<(), Box<dyn std::error::Error>> {
    let job = job(30);
    let runner = FakeRunner::new(FakeMedia::default());

    let result = feather_video(&runner, &job.config)?;

    assert_eq!(result.frame_count, 10);
    assert_eq!((result.probe.width, result.probe.height), (320, 240));
    assert_eq!(result.probe.frame_rate.to_string(), "30/1");
    assert!(result.has_audio());
    assert_eq!(result.output_path, job.output_dir.path().join("clip_feathered.mov"));
    assert!(result.output_path.exists());
    assert!(result.output_size > 0);

    let compose_args = runner.call_with("-framerate").expect("compose was not run");
    assert_eq!(value_after(&compose_args, "-framerate").as_deref(), Some("30/1"));
    assert_eq!(value_after(&compose_args, "-c:v").as_deref(), Some("png"));
    assert_eq!(value_after(&compose_args, "-pix_fmt").as_deref(), Some("rgba"));
    assert_eq!(value_after(&compose_args, "-c:a").as_deref(), Some("aac"));
    assert!(compose_args.iter().any(|a| a == "1:a:0"));
    assert!(compose_args.iter().any(|a| a == "-shortest"));
    assert_eq!(compose_args.iter().filter(|a| *a == "-i").count(), 2);

    let seen = runner.composed().unwrap();
    assert_eq!(seen.frames_present, result.frame_count);
    assert!(seen.is_rgba, "frames handed to the composer must carry alpha");
    assert_eq!(seen.center_alpha, 255);
    assert!(seen.corner_alpha < seen.center_alpha);

    assert_eq!(entries_in(job.temp_base.path()), 0, "workspace left behind");
    Ok(())
}

#[test]
fn test_source_without_audio_still_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let job = job(30);
    let runner = FakeRunner::new(FakeMedia {
        audio: FakeAudio::Absent,
        ..FakeMedia::default()
    });

    let result = feather_video(&runner, &job.config)?;

    assert!(!result.has_audio());
    assert_eq!(result.audio, AudioOutcome::Absent);
    assert_eq!(result.frame_count, 10);

    let compose_args = runner.call_with("-framerate").unwrap();
    assert_eq!(compose_args.iter().filter(|a| *a == "-i").count(), 1);
    assert!(!compose_args.iter().any(|a| a == "-shortest"));
    assert!(!compose_args.iter().any(|a| a == "-c:a"));
    assert_eq!(entries_in(job.temp_base.path()), 0);
    Ok(())
}

#[test]
fn test_failed_audio_copy_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let job = job(30);
    let runner = FakeRunner::new(FakeMedia {
        audio: FakeAudio::Corrupt,
        ..FakeMedia::default()
    });

    let result = feather_video(&runner, &job.config)?;

    assert!(matches!(result.audio, AudioOutcome::Failed(_)));
    assert!(!result.has_audio());
    assert!(!runner.call_with("-framerate").unwrap().iter().any(|a| a == "-shortest"));
    Ok(())
}

#[test]
fn test_oversized_border_fails_before_extraction() {
    let job = job(200);
    let runner = FakeRunner::new(FakeMedia::default());

    let err = feather_video(&runner, &job.config).unwrap_err();

    assert!(matches!(
        err,
        CoreError::InvalidBorder {
            border: 200,
            width: 320,
            height: 240
        }
    ));
    assert!(err.is_configuration_error());
    assert!(runner.call_with("-fps_mode").is_none(), "frames were extracted");
    assert!(runner.call_with("-framerate").is_none());
    assert_eq!(entries_in(job.temp_base.path()), 0);
    assert!(!job.config.output.exists());
}

#[test]
fn test_exact_frame_rate_reaches_composer() -> Result<(), Box<dyn std::error::Error>> {
    let job = job(10);
    let runner = FakeRunner::new(FakeMedia {
        frame_rate: "30000/1001".to_string(),
        frames: 3,
        ..FakeMedia::default()
    });

    let result = feather_video(&runner, &job.config)?;

    assert_eq!(result.frame_count, 3);
    let compose_args = runner.call_with("-framerate").unwrap();
    assert_eq!(value_after(&compose_args, "-framerate").as_deref(), Some("30000/1001"));
    Ok(())
}

#[test]
fn test_extraction_and_compose_share_one_clock() -> Result<(), Box<dyn std::error::Error>> {
    let job = job(10);
    let runner = FakeRunner::new(FakeMedia {
        frame_rate: "60000/1001".to_string(),
        frames: 4,
        ..FakeMedia::default()
    });

    feather_video(&runner, &job.config)?;

    let extract_args = runner.call_with("-fps_mode").unwrap();
    let compose_args = runner.call_with("-framerate").unwrap();
    assert_eq!(value_after(&extract_args, "-fps_mode").as_deref(), Some("cfr"));
    assert_eq!(value_after(&extract_args, "-r").as_deref(), Some("60000/1001"));
    assert_eq!(
        value_after(&extract_args, "-r"),
        value_after(&compose_args, "-framerate")
    );
    Ok(())
}

#[test]
fn test_missing_output_after_compose_is_an_error() {
    let job = job(30);
    let runner = FakeRunner::new(FakeMedia {
        compose_writes_nothing: true,
        ..FakeMedia::default()
    });

    let err = feather_video(&runner, &job.config).unwrap_err();

    assert!(matches!(err, CoreError::Io(_)));
    assert!(runner.composed().is_some());
    assert_eq!(entries_in(job.temp_base.path()), 0);
}

#[test]
fn test_compose_failure_cleans_up() {
    let job = job(30);
    let runner = FakeRunner::new(FakeMedia {
        compose_fails: true,
        ..FakeMedia::default()
    });

    let err = feather_video(&runner, &job.config).unwrap_err();

    match err {
        CoreError::Compose(ToolError::Failed { stderr, .. }) => {
            assert!(stderr.contains("Unknown encoder"));
        }
        other => panic!("expected compose failure, got {other:?}"),
    }
    assert_eq!(entries_in(job.temp_base.path()), 0, "workspace left behind");
}

#[test]
fn test_probe_failure_is_reported() {
    let job = job(30);
    let runner = FakeRunner::new(FakeMedia {
        probe_fails: true,
        ..FakeMedia::default()
    });

    let err = feather_video(&runner, &job.config).unwrap_err();

    assert!(matches!(err, CoreError::ProbeFailed(ToolError::Failed { .. })));
    assert!(!err.is_configuration_error());
    assert_eq!(entries_in(job.temp_base.path()), 0);
}

#[test]
fn test_extraction_timeout_is_fatal() {
    let job = job(30);
    let runner = FakeRunner::new(FakeMedia {
        extraction_times_out: true,
        ..FakeMedia::default()
    });

    let err = feather_video(&runner, &job.config).unwrap_err();

    assert!(matches!(err, CoreError::Extraction(ToolError::Timeout { .. })));
    assert!(runner.call_with("-framerate").is_none());
    assert_eq!(entries_in(job.temp_base.path()), 0);
}

#[test]
fn test_empty_extraction_is_an_error() {
    let job = job(30);
    let runner = FakeRunner::new(FakeMedia {
        frames: 0,
        ..FakeMedia::default()
    });

    let err = feather_video(&runner, &job.config).unwrap_err();

    assert!(matches!(err, CoreError::FrameSequence(_)));
    assert_eq!(entries_in(job.temp_base.path()), 0);
}

#[test]
fn test_missing_source_runs_no_tools() {
    let mut job = job(30);
    job.config.input = PathBuf::from("/definitely/not/here.mp4");
    let runner = FakeRunner::new(FakeMedia::default());

    let err = feather_video(&runner, &job.config).unwrap_err();

    assert!(matches!(err, CoreError::SourceNotFound(_)));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_missing_ffmpeg_is_a_dependency_error() {
    let mut job = job(30);
    job.config.ffmpeg_path = PathBuf::from("/opt/none/ffmpeg");
    let runner = FakeRunner::new(FakeMedia {
        missing_tools: vec!["/opt/none/ffmpeg".to_string()],
        ..FakeMedia::default()
    });

    let err = feather_video(&runner, &job.config).unwrap_err();

    assert!(matches!(err, CoreError::DependencyNotFound(_)));
    assert!(err.is_configuration_error());
    assert_eq!(runner.calls().len(), 1);
}

#[test]
fn test_custom_codecs_are_used() -> Result<(), Box<dyn std::error::Error>> {
    let mut job = job(30);
    job.config.video_codec = "qtrle".to_string();
    job.config.audio_codec = "pcm_s16le".to_string();
    let runner = FakeRunner::new(FakeMedia::default());

    feather_video(&runner, &job.config)?;

    let compose_args = runner.call_with("-framerate").unwrap();
    assert_eq!(value_after(&compose_args, "-c:v").as_deref(), Some("qtrle"));
    assert_eq!(value_after(&compose_args, "-pix_fmt").as_deref(), Some("argb"));
    assert_eq!(value_after(&compose_args, "-c:a").as_deref(), Some("pcm_s16le"));
    Ok(())
}

#[test]
fn test_output_parent_is_created() -> Result<(), Box<dyn std::error::Error>> {
    let mut job = job(30);
    job.config.output = job.output_dir.path().join("nested/deeper/out.mov");
    let runner = FakeRunner::new(FakeMedia::default());

    let result = feather_video(&runner, &job.config)?;

    assert!(result.output_path.exists());
    Ok(())
}
