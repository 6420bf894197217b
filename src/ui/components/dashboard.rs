use std::time::Instant;

use chrono::Utc;
use eframe::egui;

use crate::store::ChatState;
use crate::ui::format::relative_time;
use crate::ui::state::DashboardForm;
use crate::ui::validation;

#[derive(Default)]
pub struct DashboardActions {
    pub toggle_theme: bool,
    pub logout: bool,
    pub create_title: Option<String>,
    /// (id, title) of a room whose deletion was confirmed.
    pub delete: Option<(String, String)>,
    pub open: Option<String>,
}

pub fn render(
    ui: &mut egui::Ui,
    state: &ChatState,
    form: &mut DashboardForm,
    now: Instant,
) -> DashboardActions {
    let mut actions = DashboardActions::default();

    ui.horizontal(|ui| {
        ui.heading("Gemini Chat");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Log out").clicked() {
                actions.logout = true;
            }
            if let Some(user) = state.user() {
                ui.label(format!("{} {}", user.country_code, user.phone));
            }
            let icon = if state.is_dark_mode() { "☀" } else { "🌙" };
            if ui.button(icon).on_hover_text("Toggle theme").clicked() {
                actions.toggle_theme = true;
            }
        });
    });
    ui.separator();

    ui.horizontal(|ui| {
        let search = ui.add(
            egui::TextEdit::singleline(&mut form.search.input)
                .hint_text("Search chatrooms...")
                .desired_width(240.0),
        );
        if search.changed() {
            form.search.edited(now);
        }

        ui.separator();

        let title = ui.add(
            egui::TextEdit::singleline(&mut form.title_input)
                .hint_text("New chatroom title")
                .desired_width(220.0),
        );
        let entered = title.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("➕ New Chat").clicked() || entered {
            match validation::chatroom_title(&form.title_input) {
                Ok(title) => {
                    form.title_input.clear();
                    form.title_error = None;
                    actions.create_title = Some(title);
                }
                Err(message) => form.title_error = Some(message),
            }
        }
    });
    if let Some(error) = form.title_error {
        ui.colored_label(egui::Color32::RED, error);
    }
    ui.separator();

    let rooms = state.filtered_chatrooms();
    if rooms.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            if state.chatrooms().is_empty() {
                ui.label("No chatrooms yet. Create one to start chatting.");
            } else {
                ui.label(format!("No chatrooms match \"{}\".", state.search_query()));
            }
        });
        return actions;
    }

    let now_utc = Utc::now();
    egui::ScrollArea::vertical().show(ui, |ui| {
        for room in rooms {
            ui.horizontal(|ui| {
                let label = format!("💬 {}", room.title);
                if ui.add(egui::Button::new(label).frame(false)).clicked() {
                    actions.open = Some(room.id.clone());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let armed = form.delete_confirm.is_armed(&room.id, now);
                    let delete_label = if armed { "Confirm delete" } else { "🗑" };
                    let button = egui::Button::new(delete_label);
                    let button = if armed {
                        button.fill(egui::Color32::DARK_RED)
                    } else {
                        button
                    };
                    if ui.add(button).on_hover_text("Delete chatroom").clicked()
                        && form.delete_confirm.click(&room.id, now)
                    {
                        actions.delete = Some((room.id.clone(), room.title.clone()));
                    }

                    let updated = room
                        .last_message
                        .as_ref()
                        .map(|message| message.timestamp)
                        .unwrap_or(room.created_at);
                    ui.label(egui::RichText::new(relative_time(updated, now_utc)).weak());
                });
            });
            ui.label(egui::RichText::new(truncate(room.preview(), 80)).weak().small());
            ui.separator();
        }
    });

    actions
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}…")
}
