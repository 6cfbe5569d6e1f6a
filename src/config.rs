use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_HISTORY_LIMIT: usize = 15;
pub const DEFAULT_INSPECTION_ID_BASE: u64 = 1800;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    // Prediction classes that count as an acceptable part. Everything else is a defect.
    pub good_classes: Vec<String>,
    pub history_limit: usize,
    pub inspection_id_base: u64,
    pub token_path: PathBuf,
    pub demo_notification_email: String,
    pub lines: Vec<LineSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineSettings {
    pub name: String,
    pub source: SourceSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSettings {
    // IP-camera style still endpoint, fetched once per capture.
    Snapshot { url: String },
    // Cycles through image files in a directory.
    Replay { dir: PathBuf },
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            good_classes: vec![
                "polished_casting".to_string(),
                "unpolished_casting".to_string(),
            ],
            history_limit: DEFAULT_HISTORY_LIMIT,
            inspection_id_base: DEFAULT_INSPECTION_ID_BASE,
            token_path: PathBuf::from("vision_ai_token"),
            demo_notification_email: "demo-requests@visionline.example".to_string(),
            lines: vec![
                LineSettings {
                    name: "Line A".to_string(),
                    source: SourceSettings::Snapshot {
                        url: "http://127.0.0.1:8081/snapshot.jpg".to_string(),
                    },
                },
                LineSettings {
                    name: "Line B".to_string(),
                    source: SourceSettings::Snapshot {
                        url: "http://127.0.0.1:8082/snapshot.jpg".to_string(),
                    },
                },
            ],
        }
    }
}

impl Settings {
    // Layered load: visionline.toml next to the binary (optional), then
    // VISIONLINE_-prefixed environment variables. Missing keys fall back to
    // the defaults above.
    pub fn load() -> Result<Self, AppError> {
        let config = Config::builder()
            .add_source(File::with_name("visionline").required(false))
            .add_source(Environment::with_prefix("VISIONLINE").separator("__"))
            .build()?;
        let settings = config.try_deserialize()?;
        Ok(settings)
    }
}
