//! Ephemeral working directory for a single feathering job.
//!
//! The directory is created with a random suffix through the tempfile crate,
//! so concurrent jobs never share one. [`Workspace::release`] removes it and
//! reports failures; if a job bails out before reaching `release`, the
//! `TempDir` inside removes it on drop.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{Builder as TempFileBuilder, TempDir};

use crate::error::{CoreError, CoreResult};

/// Prefix of every workspace directory.
pub const WORKSPACE_PREFIX: &str = "feather_";

/// Name pattern passed to ffmpeg for the extracted frames.
pub const FRAME_PATTERN: &str = "frame_%06d.png";

/// File name of the copied audio stream.
pub const AUDIO_FILE_NAME: &str = "audio.mka";

const FRAME_PREFIX: &str = "frame_";
const FRAME_SUFFIX: &str = ".png";

/// Exclusively owned scratch directory holding frames and audio.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a fresh, uniquely named directory inside `base_dir`.
    pub fn acquire(base_dir: &Path) -> CoreResult<Self> {
        fs::create_dir_all(base_dir).map_err(CoreError::Workspace)?;
        let dir = TempFileBuilder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(base_dir)
            .map_err(CoreError::Workspace)?;
        log::debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `<workspace>/frame_%06d.png`
    pub fn frame_pattern(&self) -> PathBuf {
        self.path().join(FRAME_PATTERN)
    }

    /// Path of the frame with the given 1-based index.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.path().join(frame_file_name(index))
    }

    pub fn audio_path(&self) -> PathBuf {
        self.path().join(AUDIO_FILE_NAME)
    }

    /// Lists extracted frames in sequence order.
    ///
    /// The numbering must start at 1 and be contiguous; a gap means the
    /// extractor output cannot be trusted and is reported as an error.
    pub fn list_frames(&self) -> CoreResult<Vec<PathBuf>> {
        let mut indices: Vec<usize> = fs::read_dir(self.path())?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| parse_frame_index(&entry.file_name().to_string_lossy()))
            .collect();
        indices.sort_unstable();

        for (position, index) in indices.iter().enumerate() {
            if *index != position + 1 {
                return Err(CoreError::FrameSequence(format!(
                    "expected frame {} but found frame {} in {}",
                    position + 1,
                    index,
                    self.path().display()
                )));
            }
        }

        Ok(indices.into_iter().map(|i| self.frame_path(i)).collect())
    }

    /// Deletes the directory and everything in it.
    pub fn release(self) -> CoreResult<()> {
        let path = self.path().to_path_buf();
        self.dir.close().map_err(CoreError::Workspace)?;
        log::debug!("Removed workspace {}", path.display());
        Ok(())
    }
}

/// `frame_000001.png` for index 1.
pub fn frame_file_name(index: usize) -> String {
    format!("{FRAME_PREFIX}{index:06}{FRAME_SUFFIX}")
}

/// Inverse of [`frame_file_name`]; `None` for anything that is not a frame.
pub fn parse_frame_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(FRAME_PREFIX)?.strip_suffix(FRAME_SUFFIX)?;
    if digits.len() < 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
