pub mod client;
pub mod session;
pub mod types;

pub use client::{InspectionApi, InspectionBackend};
pub use session::Session;
pub use types::{Detection, InspectionResult, InspectionStatus};
