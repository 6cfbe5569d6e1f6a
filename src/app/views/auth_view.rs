use crate::api::types::{CompanyDescriptor, SignupRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Signup,
}

pub enum AuthAction {
    Login { email: String, password: String },
    Signup(SignupRequest),
}

// Login and signup forms with inline errors. Password confirmation is checked
// locally; a mismatch never reaches the network.
pub struct AuthView {
    mode: AuthMode,
    email: String,
    password: String,
    confirm_password: String,
    company_name: String,
    established_date: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub busy: bool,
}

impl Default for AuthView {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            company_name: String::new(),
            established_date: String::new(),
            error: None,
            notice: None,
            busy: false,
        }
    }
}

impl AuthView {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn switch_to_login_with_notice(&mut self, notice: &str) {
        let email = self.email.clone();
        self.reset();
        self.email = email;
        self.notice = Some(notice.to_string());
    }

    pub fn draw(&mut self, ui: &mut egui::Ui) -> Option<AuthAction> {
        let mut action = None;
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.set_max_width(360.0);

            match self.mode {
                AuthMode::Login => ui.heading("Welcome Back"),
                AuthMode::Signup => ui.heading("Create an Account"),
            };
            ui.label("VisionLine Quality Inspection");
            ui.add_space(16.0);

            ui.add(egui::TextEdit::singleline(&mut self.email).hint_text("Email Address"));
            ui.add(
                egui::TextEdit::singleline(&mut self.password)
                    .hint_text("Password")
                    .password(true),
            );
            if self.mode == AuthMode::Signup {
                ui.add(
                    egui::TextEdit::singleline(&mut self.confirm_password)
                        .hint_text("Confirm Password")
                        .password(true),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut self.company_name).hint_text("Company Name"),
                );
                ui.add(
                    egui::TextEdit::singleline(&mut self.established_date)
                        .hint_text("Established Date (YYYY-MM-DD)"),
                );
            }

            if let Some(error) = &self.error {
                ui.colored_label(egui::Color32::RED, error);
            }
            if let Some(notice) = &self.notice {
                ui.colored_label(egui::Color32::GREEN, notice);
            }

            ui.add_space(8.0);
            let label = match self.mode {
                AuthMode::Login => "Login",
                AuthMode::Signup => "Sign Up",
            };
            let submit = ui.add_enabled(!self.busy, egui::Button::new(label)).clicked();
            if self.busy {
                ui.spinner();
            }

            ui.add_space(8.0);
            match self.mode {
                AuthMode::Login => {
                    if ui.small_button("Don't have an account? Sign up").clicked() {
                        self.mode = AuthMode::Signup;
                        self.error = None;
                        self.notice = None;
                    }
                }
                AuthMode::Signup => {
                    if ui.small_button("Already registered? Log in").clicked() {
                        self.mode = AuthMode::Login;
                        self.error = None;
                        self.notice = None;
                    }
                }
            }

            if submit {
                action = self.submit();
            }
        });
        action
    }

    fn submit(&mut self) -> Option<AuthAction> {
        self.notice = None;
        match self.mode {
            AuthMode::Login => {
                self.error = None;
                Some(AuthAction::Login {
                    email: self.email.clone(),
                    password: self.password.clone(),
                })
            }
            AuthMode::Signup => {
                if self.password != self.confirm_password {
                    self.error = Some("Passwords do not match".to_string());
                    return None;
                }
                self.error = None;
                Some(AuthAction::Signup(SignupRequest {
                    email: self.email.clone(),
                    password: self.password.clone(),
                    company: CompanyDescriptor {
                        name: self.company_name.clone(),
                        established_date: self.established_date.clone(),
                    },
                }))
            }
        }
    }
}
