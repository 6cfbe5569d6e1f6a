use egui::TextureOptions;
use uuid::Uuid;

use crate::api::types::InspectionResult;
use crate::capture::CapturedFrame;
use crate::inspect::line::Line;
use crate::inspect::overlay::{self, Badge, GoodClasses, Overlay};

// One camera panel: live snapshot with the detection boxes painted over it,
// status and confidence badges, and the capture control.
pub struct LineView {
    line_id: Uuid,
    name: String,
    texture: Option<egui::TextureHandle>,
    overlay: Option<Overlay>,
    scan_time: Option<f64>,
    notice: Option<String>,
}

impl LineView {
    pub fn new(line_id: Uuid, name: String) -> Self {
        Self {
            line_id,
            name,
            texture: None,
            overlay: None,
            scan_time: None,
            notice: None,
        }
    }

    pub fn line_id(&self) -> Uuid {
        self.line_id
    }

    // A fresh capture supersedes the previous result immediately.
    pub fn show_snapshot(&mut self, ctx: &egui::Context, frame: &CapturedFrame) {
        let rgb = frame.image.to_rgb8();
        let color_image = egui::ColorImage::from_rgb(
            [rgb.width() as usize, rgb.height() as usize],
            rgb.as_raw().as_slice(),
        );
        self.texture = Some(ctx.load_texture(
            format!("line_snapshot_{}", self.line_id),
            color_image,
            TextureOptions::default(),
        ));
        self.overlay = None;
        self.scan_time = None;
        self.notice = None;
    }

    pub fn show_result(
        &mut self,
        result: &InspectionResult,
        good: &GoodClasses,
        elapsed_seconds: f64,
    ) {
        self.overlay = Some(overlay::build(result, good));
        self.scan_time = Some(elapsed_seconds);
    }

    pub fn note_capture_failure(&mut self) {
        self.notice = Some("No frame available from the camera.".to_string());
    }

    pub fn draw(&mut self, ui: &mut egui::Ui, line: &Line) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.heading(&self.name);
                if line.is_in_flight() {
                    ui.spinner();
                    ui.label("Analyzing...");
                } else if let Some(overlay) = &self.overlay {
                    let (text, color) = badge_style(overlay.badge);
                    ui.colored_label(color, text);
                    ui.label(format!("Conf: {:.1}%", overlay.confidence_pct));
                }
            });
            ui.separator();

            if let Some(texture) = &self.texture {
                let response = ui.add(egui::Image::new(texture).max_width(560.0));
                if let Some(overlay) = &self.overlay {
                    let rect = response.rect;
                    let painter = ui.painter_at(rect);
                    for b in &overlay.boxes {
                        let min = rect.min
                            + egui::vec2(
                                rect.width() * (b.left / 100.0) as f32,
                                rect.height() * (b.top / 100.0) as f32,
                            );
                        let size = egui::vec2(
                            rect.width() * (b.width / 100.0) as f32,
                            rect.height() * (b.height / 100.0) as f32,
                        );
                        let color = if b.passing {
                            egui::Color32::GREEN
                        } else {
                            egui::Color32::RED
                        };
                        painter.rect_stroke(
                            egui::Rect::from_min_size(min, size),
                            egui::CornerRadius::ZERO,
                            egui::Stroke::new(2.0, color),
                            egui::StrokeKind::Inside,
                        );
                    }
                }
            } else {
                ui.label("Capture an image to inspect");
            }

            if let Some(notice) = &self.notice {
                ui.colored_label(egui::Color32::YELLOW, notice);
            }

            if let (Some(overlay), Some(scan_time)) = (&self.overlay, self.scan_time) {
                ui.horizontal(|ui| {
                    ui.label(format!("Scan Time: {:.2}s", scan_time));
                    ui.label(format!("Defects: {}", overlay.defect_count));
                    ui.label(format!("Confidence: {:.1}%", overlay.confidence_pct));
                });
            }

            let capture = ui.add_enabled(!line.is_in_flight(), egui::Button::new("Inspect"));
            if capture.clicked() {
                line.trigger();
            }
        });
    }
}

fn badge_style(badge: Badge) -> (String, egui::Color32) {
    let color = match badge {
        Badge::Pass => egui::Color32::GREEN,
        Badge::Fail(_) => egui::Color32::RED,
        Badge::Unknown => egui::Color32::YELLOW,
    };
    (badge.to_string(), color)
}
