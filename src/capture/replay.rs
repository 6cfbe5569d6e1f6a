use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::capture::{CaptureSource, CapturedFrame};
use crate::error::CaptureError;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

// Cycles through the image files of a directory in name order, wrapping back
// to the first file. Stands in for a live camera in demos and tests.
pub struct ReplaySource {
    frames: Vec<PathBuf>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(dir: PathBuf) -> Result<Self, CaptureError> {
        let entries =
            fs::read_dir(&dir).map_err(|e| CaptureError::Read(e, dir.display().to_string()))?;
        let mut frames: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        frames.sort();
        debug!(dir = %dir.display(), frames = frames.len(), "replay source loaded");
        Ok(Self { frames, cursor: 0 })
    }
}

#[async_trait]
impl CaptureSource for ReplaySource {
    async fn grab(&mut self) -> Result<CapturedFrame, CaptureError> {
        if self.frames.is_empty() {
            return Err(CaptureError::Unavailable(
                "replay directory has no image files".to_string(),
            ));
        }
        let path = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        let bytes = fs::read(&path).map_err(|e| CaptureError::Read(e, path.display().to_string()))?;
        CapturedFrame::from_encoded(bytes)
    }
}
