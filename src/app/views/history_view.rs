use crate::api::types::InspectionStatus;
use crate::inspect::history::InspectionHistory;

pub struct HistoryView;

impl HistoryView {
    pub fn draw(&self, ui: &mut egui::Ui, history: &InspectionHistory) {
        ui.heading("Recent Inspections");
        ui.separator();

        if history.is_empty() {
            ui.label("No inspections yet. Run a scan to see results here.");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in history.entries() {
                ui.horizontal(|ui| {
                    ui.label(&entry.id);
                    ui.label(format!("{:.2}s", entry.elapsed_seconds));
                    ui.label(entry.recorded_at.format("%H:%M:%S").to_string());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (tag, color) = match entry.status {
                            InspectionStatus::Accepted => {
                                ("PASS".to_string(), egui::Color32::GREEN)
                            }
                            _ => (
                                format!("FAIL ({})", entry.defect_count),
                                egui::Color32::RED,
                            ),
                        };
                        ui.colored_label(color, tag);
                    });
                });
                ui.separator();
            }
        });
    }
}
