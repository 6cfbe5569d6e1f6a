use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::api::types::{InspectionResult, InspectionStatus};
use crate::inspect::overlay::{self, GoodClasses};

// Summary of one completed capture cycle, success or failure alike.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub status: InspectionStatus,
    pub elapsed_seconds: f64,
    pub defect_count: usize,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn summarize(
        id: String,
        result: &InspectionResult,
        elapsed_seconds: f64,
        good: &GoodClasses,
    ) -> Self {
        Self {
            id,
            status: result.status,
            elapsed_seconds: (elapsed_seconds * 100.0).round() / 100.0,
            defect_count: overlay::defect_count(result, good),
            recorded_at: Utc::now(),
        }
    }
}

// Bounded most-recent-first list of completed inspections. The only shared
// state across lines; mutated by append-and-truncate only.
#[derive(Debug)]
pub struct InspectionHistory {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl InspectionHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Sequential inspection ids, shared by every line. Monotonic within one
// session only.
#[derive(Debug)]
pub struct InspectionIdAllocator {
    next: AtomicU64,
}

impl InspectionIdAllocator {
    pub fn new(base: u64) -> Self {
        Self {
            next: AtomicU64::new(base),
        }
    }

    pub fn allocate(&self) -> String {
        format!("D-{}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            status: InspectionStatus::Accepted,
            elapsed_seconds: 0.5,
            defect_count: 0,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn keeps_entries_most_recent_first() {
        let mut history = InspectionHistory::new(15);
        history.record(entry("D-1800"));
        history.record(entry("D-1801"));
        history.record(entry("D-1802"));

        let ids: Vec<&str> = history.entries().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["D-1802", "D-1801", "D-1800"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn truncates_to_the_configured_cap() {
        let mut history = InspectionHistory::new(15);
        for n in 0..20 {
            history.record(entry(&format!("D-{}", 1800 + n)));
        }
        assert_eq!(history.len(), 15);
        // Newest entry survives, the five oldest were evicted.
        assert_eq!(history.entries().next().unwrap().id, "D-1819");
        assert!(history.entries().all(|e| e.id != "D-1804"));
        assert_eq!(history.entries().last().unwrap().id, "D-1805");
    }

    #[test]
    fn summarize_rounds_elapsed_to_two_decimals() {
        let good = GoodClasses::new(vec!["polished_casting".to_string()]);
        let result = InspectionResult {
            status: InspectionStatus::Rejected,
            detections: vec![crate::api::types::Detection {
                prediction: "scratch".to_string(),
                confidence: 0.8,
                bounds: [0.0, 0.0, 1.0, 1.0],
            }],
        };
        let entry = HistoryEntry::summarize("D-1800".to_string(), &result, 1.23678, &good);
        assert_eq!(entry.elapsed_seconds, 1.24);
        assert_eq!(entry.defect_count, 1);
        assert_eq!(entry.status, InspectionStatus::Rejected);
    }

    #[test]
    fn ids_are_sequential_from_the_base() {
        let ids = InspectionIdAllocator::new(1800);
        assert_eq!(ids.allocate(), "D-1800");
        assert_eq!(ids.allocate(), "D-1801");
        assert_eq!(ids.allocate(), "D-1802");
    }
}
