use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError as MpscTryRecvError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::client::{InspectionApi, InspectionBackend};
use crate::api::session::Session;
use crate::api::types::ScheduleRequest;
use crate::capture::{CaptureSource, HttpSnapshotSource, ReplaySource};
use crate::config::{Settings, SourceSettings};
use crate::error::{ApiError, AppError};
use crate::inspect::history::{InspectionHistory, InspectionIdAllocator};
use crate::inspect::line::{Line, LineEvent};
use crate::inspect::overlay::GoodClasses;

use crate::app::views::{AuthAction, AuthView, HistoryView, LineView, ScheduleView};

// Outcomes of the async auth and scheduling calls, delivered back to the UI
// thread over a channel.
pub enum AuthEvent {
    LoggedIn(String),
    LoginFailed(String),
    SignupCompleted,
    SignupFailed(String),
    SessionInvalid,
    DemoScheduled(String),
    DemoFailed(String),
}

pub struct MonitorApp {
    settings: Settings,
    api: Arc<InspectionApi>,
    session: Arc<Mutex<Session>>,
    good_classes: Arc<GoodClasses>,
    lines: Vec<Line>,
    line_views: Vec<LineView>,
    history: InspectionHistory,
    history_view: HistoryView,
    auth_view: AuthView,
    schedule_view: ScheduleView,
    line_rx: mpsc::Receiver<LineEvent>,
    auth_rx: mpsc::Receiver<AuthEvent>,
    auth_tx: mpsc::Sender<AuthEvent>,
}

impl MonitorApp {
    // Builds the lines from the settings and runs the native window loop.
    // Must be called from within the tokio runtime: every capture cycle and
    // auth call is spawned onto it.
    pub fn start_gui(settings: Settings) -> Result<(), AppError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(1280.0, 800.0))
                .with_title("VisionLine - Live Monitoring Dashboard"),
            ..Default::default()
        };

        let session = Arc::new(Mutex::new(Session::load(settings.token_path.clone())));
        let api = Arc::new(InspectionApi::new(settings.api_url.clone()));
        let good_classes = Arc::new(GoodClasses::new(settings.good_classes.clone()));
        let ids = Arc::new(InspectionIdAllocator::new(settings.inspection_id_base));

        let (line_tx, line_rx) = mpsc::channel::<LineEvent>(100);
        let (auth_tx, auth_rx) = mpsc::channel::<AuthEvent>(100);

        let mut lines = Vec::new();
        let mut line_views = Vec::new();
        for line_settings in &settings.lines {
            let source: Box<dyn CaptureSource> = match &line_settings.source {
                SourceSettings::Snapshot { url } => {
                    Box::new(HttpSnapshotSource::new(url.clone()))
                }
                SourceSettings::Replay { dir } => Box::new(ReplaySource::new(dir.clone())?),
            };
            let line = Line::new(
                line_settings.name.clone(),
                source,
                api.clone() as Arc<dyn InspectionBackend>,
                session.clone(),
                good_classes.clone(),
                ids.clone(),
                line_tx.clone(),
            );
            line_views.push(LineView::new(line.id(), line_settings.name.clone()));
            lines.push(line);
        }
        info!(lines = lines.len(), api_url = %settings.api_url, "monitoring dashboard starting");

        Self::validate_stored_session(&api, &session, &auth_tx);

        let history = InspectionHistory::new(settings.history_limit);
        let app = MonitorApp {
            settings,
            api,
            session,
            good_classes,
            lines,
            line_views,
            history,
            history_view: HistoryView,
            auth_view: AuthView::default(),
            schedule_view: ScheduleView::default(),
            line_rx,
            auth_rx,
            auth_tx,
        };

        eframe::run_native(
            "VisionLine - Live Monitoring Dashboard",
            options,
            Box::new(move |_cc| Ok(Box::new(app))),
        )
        .map_err(|e| AppError::Ui(e.to_string()))
    }

    // A persisted token is trusted optimistically; a 401 from the profile
    // endpoint kicks the user back to login. Other failures (service down)
    // leave the token in place.
    fn validate_stored_session(
        api: &Arc<InspectionApi>,
        session: &Arc<Mutex<Session>>,
        auth_tx: &mpsc::Sender<AuthEvent>,
    ) {
        let stored = session
            .lock()
            .expect("session lock poisoned")
            .token()
            .map(str::to_string);
        let Some(token) = stored else {
            return;
        };
        let api = api.clone();
        let session = session.clone();
        let auth_tx = auth_tx.clone();
        tokio::spawn(async move {
            match api.current_user(&token).await {
                Ok(profile) => info!(email = %profile.email, "restored session"),
                Err(ApiError::SessionExpired) => {
                    session.lock().expect("session lock poisoned").clear();
                    let _ = auth_tx.send(AuthEvent::SessionInvalid).await;
                }
                Err(err) => warn!(error = %err, "could not validate stored session"),
            }
        });
    }

    fn view_mut(&mut self, line_id: Uuid) -> Option<&mut LineView> {
        self.line_views.iter_mut().find(|v| v.line_id() == line_id)
    }

    fn drain_line_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.line_rx.try_recv() {
                Ok(event) => self.handle_line_event(ctx, event),
                Err(MpscTryRecvError::Empty) => break,
                Err(MpscTryRecvError::Disconnected) => {
                    error!("line event channel disconnected");
                    break;
                }
            }
        }
    }

    fn handle_line_event(&mut self, ctx: &egui::Context, event: LineEvent) {
        match event {
            LineEvent::Captured { line_id, frame } => {
                if let Some(view) = self.view_mut(line_id) {
                    view.show_snapshot(ctx, &frame);
                }
            }
            LineEvent::Completed {
                line_id,
                result,
                entry,
                elapsed_seconds,
            } => {
                self.history.record(entry);
                let good = self.good_classes.clone();
                if let Some(view) = self.view_mut(line_id) {
                    view.show_result(&result, &good, elapsed_seconds);
                }
            }
            LineEvent::CaptureFailed { line_id } => {
                if let Some(view) = self.view_mut(line_id) {
                    view.note_capture_failure();
                }
            }
            LineEvent::SessionExpired { .. } => {
                // The line already purged the credential; route back to login.
                warn!("session expired, returning to login");
                self.auth_view = AuthView::default();
                self.auth_view.error =
                    Some("Your session has expired. Please log in again.".to_string());
            }
        }
    }

    fn drain_auth_events(&mut self) {
        loop {
            match self.auth_rx.try_recv() {
                Ok(event) => self.handle_auth_event(event),
                Err(MpscTryRecvError::Empty) => break,
                Err(MpscTryRecvError::Disconnected) => {
                    error!("auth event channel disconnected");
                    break;
                }
            }
        }
    }

    fn handle_auth_event(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::LoggedIn(token) => {
                self.session
                    .lock()
                    .expect("session lock poisoned")
                    .store(token);
                self.auth_view.reset();
            }
            AuthEvent::LoginFailed(message) => {
                self.auth_view.busy = false;
                self.auth_view.error = Some(message);
            }
            AuthEvent::SignupCompleted => {
                self.auth_view.busy = false;
                self.auth_view
                    .switch_to_login_with_notice("Account created. Sign in with your credentials.");
            }
            AuthEvent::SignupFailed(message) => {
                self.auth_view.busy = false;
                self.auth_view.error = Some(message);
            }
            AuthEvent::SessionInvalid => {
                self.auth_view = AuthView::default();
                self.auth_view.error =
                    Some("Your session has expired. Please log in again.".to_string());
            }
            AuthEvent::DemoScheduled(message) => self.schedule_view.finish(Ok(message)),
            AuthEvent::DemoFailed(message) => self.schedule_view.finish(Err(message)),
        }
    }

    fn submit_auth(&mut self, action: AuthAction) {
        self.auth_view.busy = true;
        let api = self.api.clone();
        let auth_tx = self.auth_tx.clone();
        match action {
            AuthAction::Login { email, password } => {
                tokio::spawn(async move {
                    let event = match api.login(&email, &password).await {
                        Ok(token) => AuthEvent::LoggedIn(token),
                        Err(err) => AuthEvent::LoginFailed(err.to_string()),
                    };
                    let _ = auth_tx.send(event).await;
                });
            }
            AuthAction::Signup(request) => {
                tokio::spawn(async move {
                    let event = match api.signup(&request).await {
                        Ok(()) => AuthEvent::SignupCompleted,
                        Err(err) => AuthEvent::SignupFailed(err.to_string()),
                    };
                    let _ = auth_tx.send(event).await;
                });
            }
        }
    }

    fn submit_schedule(&mut self, date: String, time_slot: String) {
        self.schedule_view.busy = true;
        let request = ScheduleRequest {
            email: self.settings.demo_notification_email.clone(),
            date,
            time_slot,
        };
        let api = self.api.clone();
        let auth_tx = self.auth_tx.clone();
        tokio::spawn(async move {
            let event = match api.schedule_demo(&request).await {
                Ok(message) => AuthEvent::DemoScheduled(message),
                Err(err) => AuthEvent::DemoFailed(err.to_string()),
            };
            let _ = auth_tx.send(event).await;
        });
    }

    fn logout(&mut self) {
        info!("logged out");
        self.session
            .lock()
            .expect("session lock poisoned")
            .clear();
        self.auth_view = AuthView::default();
    }

    fn draw_auth(&mut self, ctx: &egui::Context) {
        let mut action = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            action = self.auth_view.draw(ui);
        });
        if let Some(action) = action {
            self.submit_auth(action);
        }
    }

    fn draw_monitor(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("dashboard_header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("VisionLine - Live Monitoring Dashboard");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Logout").clicked() {
                        self.logout();
                    }
                    if ui.button("Schedule Demo").clicked() {
                        self.schedule_view.open = true;
                    }
                });
            });
        });

        egui::SidePanel::right("recent_inspections")
            .min_width(280.0)
            .show(ctx, |ui| {
                self.history_view.draw(ui, &self.history);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (line, view) in self.lines.iter().zip(self.line_views.iter_mut()) {
                    view.draw(ui, line);
                    ui.add_space(12.0);
                }
            });
        });

        if let Some((date, time_slot)) = self.schedule_view.draw(ctx) {
            self.submit_schedule(date, time_slot);
        }
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_line_events(ctx);
        self.drain_auth_events();

        let authenticated = self
            .session
            .lock()
            .expect("session lock poisoned")
            .is_authenticated();
        if authenticated {
            self.draw_monitor(ctx);
        } else {
            self.draw_auth(ctx);
        }

        ctx.request_repaint();
    }
}
