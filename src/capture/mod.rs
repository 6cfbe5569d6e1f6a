pub mod replay;
pub mod snapshot;

pub use replay::ReplaySource;
pub use snapshot::HttpSnapshotSource;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::DynamicImage;

use crate::error::CaptureError;

// A single still frame taken from a camera: the encoded bytes as they will be
// uploaded, plus the decoded image for on-screen display.
#[derive(Clone)]
pub struct CapturedFrame {
    pub bytes: Vec<u8>,
    pub image: Arc<DynamicImage>,
    pub captured_at: DateTime<Utc>,
}

impl CapturedFrame {
    pub fn from_encoded(bytes: Vec<u8>) -> Result<Self, CaptureError> {
        let image = image::load_from_memory(&bytes)?;
        Ok(Self {
            bytes,
            image: Arc::new(image),
            captured_at: Utc::now(),
        })
    }
}

#[async_trait]
pub trait CaptureSource: Send + Sync {
    // Produces one still frame on demand. Any error means the camera had no
    // frame to give; the caller aborts the cycle silently.
    async fn grab(&mut self) -> Result<CapturedFrame, CaptureError>;
}
