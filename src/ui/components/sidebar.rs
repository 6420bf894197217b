use crate::store::ChatState;
use eframe::egui;

#[derive(Default)]
pub struct SidebarActions {
    pub select: Option<String>,
    pub new_chat: bool,
    pub toggle_theme: bool,
    pub collapse: bool,
}

pub fn render(ui: &mut egui::Ui, state: &ChatState) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.horizontal(|ui| {
        if ui.button("☰").on_hover_text("Hide sidebar").clicked() {
            actions.collapse = true;
        }
        let icon = if state.is_dark_mode() { "☀" } else { "🌙" };
        if ui.button(icon).on_hover_text("Toggle theme").clicked() {
            actions.toggle_theme = true;
        }
    });
    ui.label(egui::RichText::new("Gemini 2.5 Pro").weak());
    ui.separator();

    if ui.button("➕ New chat").clicked() {
        actions.new_chat = true;
    }

    ui.separator();
    ui.label("Recent");

    if state.chatrooms().is_empty() {
        ui.label("No chatrooms yet");
        return actions;
    }

    let current = state.current_chatroom_id();
    egui::ScrollArea::vertical().show(ui, |ui| {
        for room in state.chatrooms() {
            let selected = current == Some(room.id.as_str());
            if ui.selectable_label(selected, &room.title).clicked() && !selected {
                actions.select = Some(room.id.clone());
            }
        }
    });

    actions
}
