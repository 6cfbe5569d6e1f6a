use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::client::InspectionBackend;
use crate::api::session::Session;
use crate::api::types::InspectionResult;
use crate::capture::{CaptureSource, CapturedFrame};
use crate::error::ApiError;
use crate::inspect::history::{HistoryEntry, InspectionIdAllocator};
use crate::inspect::overlay::GoodClasses;

// Events a line delivers to the UI thread as its cycle progresses.
pub enum LineEvent {
    Captured {
        line_id: Uuid,
        frame: CapturedFrame,
    },
    Completed {
        line_id: Uuid,
        result: InspectionResult,
        entry: HistoryEntry,
        elapsed_seconds: f64,
    },
    CaptureFailed {
        line_id: Uuid,
    },
    SessionExpired {
        line_id: Uuid,
    },
}

// One independent camera + inspection pipeline. Each trigger runs a full
// Idle -> Capturing -> Submitting -> Displaying cycle on its own task; the
// in-flight flag keeps cycles strictly sequential within the line.
pub struct Line {
    id: Uuid,
    name: String,
    source: Arc<tokio::sync::Mutex<Box<dyn CaptureSource>>>,
    backend: Arc<dyn InspectionBackend>,
    session: Arc<Mutex<Session>>,
    good_classes: Arc<GoodClasses>,
    ids: Arc<InspectionIdAllocator>,
    events: mpsc::Sender<LineEvent>,
    in_flight: Arc<AtomicBool>,
}

impl Line {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        source: Box<dyn CaptureSource>,
        backend: Arc<dyn InspectionBackend>,
        session: Arc<Mutex<Session>>,
        good_classes: Arc<GoodClasses>,
        ids: Arc<InspectionIdAllocator>,
        events: mpsc::Sender<LineEvent>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            source: Arc::new(tokio::sync::Mutex::new(source)),
            backend,
            session,
            good_classes,
            ids,
            events,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    // Starts one capture-and-inspect cycle. A trigger while a cycle is in
    // flight is ignored outright, not queued.
    pub fn trigger(&self) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!(line = %self.name, "capture ignored, inspection already in flight");
            return;
        }

        let id = self.id;
        let name = self.name.clone();
        let source = self.source.clone();
        let backend = self.backend.clone();
        let session = self.session.clone();
        let good_classes = self.good_classes.clone();
        let ids = self.ids.clone();
        let events = self.events.clone();
        let in_flight = self.in_flight.clone();

        tokio::spawn(async move {
            run_cycle(id, &name, source, backend, session, good_classes, ids, events).await;
            in_flight.store(false, Ordering::SeqCst);
        });
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_cycle(
    line_id: Uuid,
    name: &str,
    source: Arc<tokio::sync::Mutex<Box<dyn CaptureSource>>>,
    backend: Arc<dyn InspectionBackend>,
    session: Arc<Mutex<Session>>,
    good_classes: Arc<GoodClasses>,
    ids: Arc<InspectionIdAllocator>,
    events: mpsc::Sender<LineEvent>,
) {
    let frame = match source.lock().await.grab().await {
        Ok(frame) => frame,
        Err(err) => {
            warn!(line = %name, error = %err, "no frame available, skipping inspection");
            let _ = events.send(LineEvent::CaptureFailed { line_id }).await;
            return;
        }
    };

    let inspection_id = ids.allocate();
    let token = session
        .lock()
        .expect("session lock poisoned")
        .token()
        .map(str::to_string);
    let _ = events
        .send(LineEvent::Captured {
            line_id,
            frame: frame.clone(),
        })
        .await;

    let started = Instant::now();
    let result = match backend.inspect(token, frame.bytes).await {
        Ok(result) => result,
        Err(ApiError::SessionExpired) => {
            warn!(line = %name, "session expired during inspection");
            session.lock().expect("session lock poisoned").clear();
            let _ = events.send(LineEvent::SessionExpired { line_id }).await;
            return;
        }
        Err(err) => {
            warn!(line = %name, error = %err, "inspection request failed");
            InspectionResult::error_placeholder()
        }
    };

    let elapsed = started.elapsed().as_secs_f64();
    let entry = HistoryEntry::summarize(inspection_id, &result, elapsed, &good_classes);
    info!(
        line = %name,
        id = %entry.id,
        status = ?entry.status,
        elapsed_seconds = entry.elapsed_seconds,
        defects = entry.defect_count,
        "inspection completed"
    );
    let _ = events
        .send(LineEvent::Completed {
            line_id,
            result,
            elapsed_seconds: entry.elapsed_seconds,
            entry,
        })
        .await;
}
