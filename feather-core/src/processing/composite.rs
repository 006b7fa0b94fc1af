//! Per-frame alpha compositing.
//!
//! Each frame is independent: load, replace alpha with the shared mask, save
//! back to the same path. Frames are spread over a bounded rayon pool and
//! every result is written to the frame's own indexed file, so output order
//! never depends on which worker finishes first.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::error::{CoreError, CoreResult};
use crate::processing::mask::AlphaMask;

/// Replaces the alpha channel of `frame` with the mask values.
pub fn apply_mask(frame: &mut RgbaImage, mask: &AlphaMask, path: &Path) -> CoreResult<()> {
    if frame.dimensions() != mask.dimensions() {
        return Err(CoreError::DimensionMismatch {
            path: path.to_path_buf(),
            actual_width: frame.width(),
            actual_height: frame.height(),
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }

    for (pixel, &alpha) in frame.pixels_mut().zip(mask.as_raw()) {
        pixel.0[3] = alpha;
    }
    Ok(())
}

/// Loads one frame as RGBA, applies the mask and overwrites it as PNG.
pub fn composite_frame(path: &Path, mask: &AlphaMask) -> CoreResult<()> {
    let image_error = |source| CoreError::Image {
        path: path.to_path_buf(),
        source,
    };

    let mut frame = image::open(path).map_err(image_error)?.into_rgba8();
    apply_mask(&mut frame, mask, path)?;
    frame
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(image_error)
}

/// Composites every frame in `frames` with `mask`.
///
/// `jobs` bounds the worker pool (`None` uses rayon's default of one thread
/// per core). Returns the number of frames processed; the first failure
/// aborts the remaining work.
pub fn composite_frames(
    frames: &[PathBuf],
    mask: &AlphaMask,
    jobs: Option<usize>,
    show_progress: bool,
) -> CoreResult<usize> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder
        .build()
        .map_err(|e| CoreError::Config(format!("Failed to initialize thread pool: {e}")))?;

    log::debug!(
        "Compositing {} frames on {} worker(s)",
        frames.len(),
        pool.current_num_threads()
    );

    let progress = create_progress_bar(frames.len() as u64, show_progress);
    let result = pool.install(|| {
        frames.par_iter().try_for_each(|path| {
            composite_frame(path, mask)?;
            progress.inc(1);
            Ok::<(), CoreError>(())
        })
    });

    match result {
        Ok(()) => {
            progress.finish_and_clear();
            Ok(frames.len())
        }
        Err(e) => {
            progress.abandon();
            Err(e)
        }
    }
}

fn create_progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.green} Compositing [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})",
    )
    .map(|s| s.progress_chars("█▓▒░ "))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
