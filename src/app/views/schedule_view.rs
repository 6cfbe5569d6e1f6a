use chrono::Local;

const TIME_SLOTS: [&str; 3] = ["10 min", "20 min", "30 min"];

// Demo-scheduling dialog. Submission goes to the public endpoint; the
// confirmation message comes back from the service verbatim.
pub struct ScheduleView {
    pub open: bool,
    date: String,
    time_slot: String,
    pub busy: bool,
    outcome: Option<Result<String, String>>,
}

impl Default for ScheduleView {
    fn default() -> Self {
        Self {
            open: false,
            date: Local::now().format("%Y-%m-%d").to_string(),
            time_slot: TIME_SLOTS[0].to_string(),
            busy: false,
            outcome: None,
        }
    }
}

impl ScheduleView {
    pub fn finish(&mut self, outcome: Result<String, String>) {
        self.busy = false;
        self.outcome = Some(outcome);
    }

    // Returns the (date, time slot) pair when the user submits.
    pub fn draw(&mut self, ctx: &egui::Context) -> Option<(String, String)> {
        if !self.open {
            return None;
        }

        let mut submitted = None;
        let mut keep_open = true;
        let mut close_clicked = false;

        egui::Window::new("Schedule a Demo")
            .open(&mut keep_open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                if let Some(Ok(message)) = &self.outcome {
                    ui.colored_label(egui::Color32::GREEN, "Booked!");
                    ui.label(message);
                    if ui.button("Close").clicked() {
                        close_clicked = true;
                    }
                    return;
                }

                if let Some(Err(message)) = &self.outcome {
                    ui.colored_label(egui::Color32::RED, message);
                }

                ui.horizontal(|ui| {
                    ui.label("Date:");
                    ui.text_edit_singleline(&mut self.date);
                });
                egui::ComboBox::from_label("Duration")
                    .selected_text(self.time_slot.clone())
                    .show_ui(ui, |ui| {
                        for slot in TIME_SLOTS {
                            ui.selectable_value(&mut self.time_slot, slot.to_string(), slot);
                        }
                    });

                ui.add_space(8.0);
                if self.busy {
                    ui.spinner();
                    ui.label("Scheduling...");
                } else if ui.button("Schedule").clicked() {
                    submitted = Some((self.date.clone(), self.time_slot.clone()));
                }
            });

        if close_clicked || !keep_open {
            self.open = false;
            self.outcome = None;
            self.busy = false;
        }
        submitted
    }
}
