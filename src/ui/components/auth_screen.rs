use std::time::Instant;

use eframe::egui;

use crate::store::ChatState;
use crate::ui::state::{AuthForm, AuthStep, PhoneSubmission};
use crate::ui::validation;

#[derive(Default)]
pub struct AuthActions {
    pub toggle_theme: bool,
    pub submit_phone: Option<PhoneSubmission>,
    pub submit_otp: Option<String>,
    pub resend: bool,
    pub back: bool,
}

pub fn render(ui: &mut egui::Ui, state: &ChatState, form: &mut AuthForm, now: Instant) -> AuthActions {
    let mut actions = AuthActions::default();

    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let icon = if state.is_dark_mode() { "☀" } else { "🌙" };
            if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                actions.toggle_theme = true;
            }
        });
    });

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        match form.step {
            AuthStep::Phone => {
                ui.heading("Welcome to Gemini");
                ui.label("Enter your phone number to get started");
            }
            AuthStep::Otp => {
                ui.heading("Verify Your Number");
                ui.label("Enter the 6-digit code sent to your phone");
            }
        }
        ui.add_space(20.0);

        match form.step {
            AuthStep::Phone => phone_step(ui, state, form, &mut actions),
            AuthStep::Otp => otp_step(ui, form, now, &mut actions),
        }

        if let Some(error) = form.error {
            ui.colored_label(egui::Color32::RED, error);
        }
    });

    actions
}

fn phone_step(ui: &mut egui::Ui, state: &ChatState, form: &mut AuthForm, actions: &mut AuthActions) {
    ui.label("Country");
    let selected_text = form
        .selected_country
        .as_ref()
        .map(|country| format!("{} {} ({})", country.flag, country.name, country.dial_code))
        .unwrap_or_else(|| "Select country".to_string());

    egui::ComboBox::from_id_salt("country_picker")
        .selected_text(selected_text)
        .width(280.0)
        .show_ui(ui, |ui| {
            if state.countries().is_empty() {
                ui.label("Loading countries...");
            }
            for country in state.countries() {
                let selected = form
                    .selected_country
                    .as_ref()
                    .is_some_and(|current| current.code == country.code);
                let label = format!("{} {}  {}", country.flag, country.name, country.dial_code);
                if ui.selectable_label(selected, label).clicked() {
                    form.selected_country = Some(country.clone());
                }
            }
        });

    ui.add_space(8.0);
    ui.label("Phone Number");
    let response = ui.add(
        egui::TextEdit::singleline(&mut form.phone_input)
            .hint_text("Enter your phone number")
            .desired_width(280.0),
    );
    let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    ui.add_space(12.0);
    if ui.button("Send OTP").clicked() || entered {
        let Some(country) = form.selected_country.as_ref() else {
            form.error = Some("Please select a country");
            return;
        };
        match validation::phone(&form.phone_input) {
            Ok(phone) => {
                actions.submit_phone = Some(PhoneSubmission {
                    phone,
                    country_code: country.dial_code.clone(),
                });
            }
            Err(message) => form.error = Some(message),
        }
    }
}

fn otp_step(ui: &mut egui::Ui, form: &mut AuthForm, now: Instant, actions: &mut AuthActions) {
    if let Some(submitted) = &form.submitted {
        ui.label(format!("Code sent to {} {}", submitted.country_code, submitted.phone));
    }

    ui.label("Verification Code");
    let response = ui.add(
        egui::TextEdit::singleline(&mut form.otp_input)
            .hint_text("Enter 6-digit code")
            .char_limit(6)
            .font(egui::TextStyle::Monospace)
            .desired_width(160.0),
    );
    let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    ui.add_space(12.0);
    let verify_label = if form.verifying { "Verifying..." } else { "Verify OTP" };
    let clicked = ui
        .add_enabled(!form.verifying, egui::Button::new(verify_label))
        .clicked();
    if (clicked || entered) && !form.verifying {
        match validation::otp(&form.otp_input) {
            Ok(code) => actions.submit_otp = Some(code),
            Err(message) => form.error = Some(message),
        }
    }

    let resend_label = match form.resend {
        Some(countdown) if countdown.is_running(now) => {
            format!("Resend OTP in {}s", countdown.remaining_secs(now))
        }
        _ => "Resend OTP".to_string(),
    };
    if ui
        .add_enabled(form.can_resend(now), egui::Button::new(resend_label).frame(false))
        .clicked()
    {
        actions.resend = true;
    }

    if ui.button("← Back to phone number").clicked() {
        actions.back = true;
    }

    ui.add_space(12.0);
    ui.label(egui::RichText::new("💡 Demo Tip: Use OTP 123456 to continue").weak());
}
