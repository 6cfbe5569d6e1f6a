use async_trait::async_trait;
use tracing::debug;

use crate::capture::{CaptureSource, CapturedFrame};
use crate::error::CaptureError;

// IP-camera style still endpoint: every capture is one GET returning a single
// encoded image.
pub struct HttpSnapshotSource {
    url: String,
    http: reqwest::Client,
}

impl HttpSnapshotSource {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CaptureSource for HttpSnapshotSource {
    async fn grab(&mut self) -> Result<CapturedFrame, CaptureError> {
        debug!(url = %self.url, "fetching snapshot");
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(CaptureError::Unavailable(format!(
                "snapshot endpoint returned {}",
                response.status()
            )));
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(CaptureError::Unavailable(
                "snapshot endpoint returned an empty body".to_string(),
            ));
        }
        CapturedFrame::from_encoded(bytes.to_vec())
    }
}
