use serde::{Deserialize, Serialize};

// Class label carried by the placeholder detection of a synthetic error result.
pub const ERROR_PLACEHOLDER_CLASS: &str = "API Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionStatus {
    Accepted,
    Rejected,
    #[serde(other)]
    Error,
}

// One detected object, as returned by the inspection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub prediction: String,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub bounds: [f64; 4],
}

// A box in normalized [0,1] coordinates with x1<=x2 and y1<=y2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Detection {
    // Validates the wire box. A non-finite value, a value outside [0,1], or
    // inverted corners makes the box unusable for rendering; the detection
    // itself still exists (its class keeps counting toward defects).
    pub fn normalized_box(&self) -> Option<NormalizedBox> {
        let [x1, y1, x2, y2] = self.bounds;
        if self
            .bounds
            .iter()
            .any(|v| !v.is_finite() || !(0.0..=1.0).contains(v))
        {
            return None;
        }
        if x1 > x2 || y1 > y2 {
            return None;
        }
        Some(NormalizedBox { x1, y1, x2, y2 })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionResult {
    pub status: InspectionStatus,
    pub detections: Vec<Detection>,
}

impl InspectionResult {
    // Stand-in result for a failed round trip, so the display and history
    // paths stay uniform whether the backend answered or not.
    pub fn error_placeholder() -> Self {
        Self {
            status: InspectionStatus::Error,
            detections: vec![Detection {
                prediction: ERROR_PLACEHOLDER_CLASS.to_string(),
                confidence: 0.0,
                bounds: [0.0, 0.0, 0.0, 0.0],
            }],
        }
    }

    // First detection's confidence, the one shown in the corner badge.
    pub fn headline_confidence(&self) -> f64 {
        self.detections.first().map(|d| d.confidence).unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub company: CompanyDescriptor,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDescriptor {
    pub name: String,
    // YYYY-MM-DD, as the service expects it.
    pub established_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub company_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRequest {
    pub email: String,
    pub date: String,
    #[serde(rename = "timeSlot")]
    pub time_slot: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleResponse {
    pub message: String,
}

// Error bodies carry a human-readable "detail" field.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
