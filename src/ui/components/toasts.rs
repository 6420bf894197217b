use eframe::egui;

use crate::ui::state::{ToastKind, Toasts};

pub fn render(ctx: &egui::Context, toasts: &Toasts) {
    if toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for toast in toasts.iter() {
                let (icon, color) = match toast.kind {
                    ToastKind::Success => ("✔", egui::Color32::from_rgb(34, 197, 94)),
                    ToastKind::Error => ("✖", egui::Color32::from_rgb(239, 68, 68)),
                };
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.colored_label(color, icon);
                        ui.label(&toast.text);
                    });
                });
                ui.add_space(4.0);
            }
        });
}
