pub mod history;
pub mod line;
pub mod overlay;

pub use history::{HistoryEntry, InspectionHistory, InspectionIdAllocator};
pub use line::{Line, LineEvent};
pub use overlay::{Badge, GoodClasses, Overlay, OverlayBox};
