use eframe::egui;

use crate::common::{Chatroom, Message};
use crate::ui::attachment::InlineImages;
use crate::ui::format::clock_time;

const IMAGE_MAX_SIDE: f32 = 240.0;

#[derive(Default)]
pub struct ChatAreaActions {
    pub load_older: bool,
    pub copy: Option<String>,
}

pub fn render(
    ui: &mut egui::Ui,
    room: &Chatroom,
    typing: bool,
    loading_older: bool,
    images: &mut InlineImages,
) -> ChatAreaActions {
    let mut actions = ChatAreaActions::default();

    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                if loading_older {
                    ui.spinner();
                } else if ui.button("Load older messages").clicked() {
                    actions.load_older = true;
                }
            });

            for message in &room.messages {
                if let Some(text) = bubble(ui, message, images) {
                    actions.copy = Some(text);
                }
            }

            if typing {
                ui.horizontal(|ui| {
                    ui.label("✨");
                    ui.label(egui::RichText::new("Gemini is typing...").italics().weak());
                });
            }
        });

    actions
}

/// Vẽ một tin nhắn; trả về nội dung nếu người dùng bấm copy.
fn bubble(ui: &mut egui::Ui, message: &Message, images: &mut InlineImages) -> Option<String> {
    let mut copied = None;
    let layout = if message.is_user {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        if !message.is_user {
            ui.label("✨");
        }
        let frame = if message.is_user {
            egui::Frame::group(ui.style()).fill(ui.visuals().faint_bg_color)
        } else {
            egui::Frame::NONE
        };
        frame.show(ui, |ui| {
            ui.set_max_width(ui.available_width() * 0.75);
            ui.vertical(|ui| {
                if let Some(data_url) = &message.image {
                    match images.uri(ui.ctx(), &message.id, data_url) {
                        Some(uri) => {
                            ui.add(
                                egui::Image::new(uri)
                                    .max_width(IMAGE_MAX_SIDE)
                                    .max_height(IMAGE_MAX_SIDE),
                            );
                        }
                        None => {
                            ui.label(egui::RichText::new("🖼 Image unavailable").weak());
                        }
                    }
                }
                ui.label(&message.content);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(clock_time(message.timestamp)).small().weak());
                    if ui.small_button("📋").on_hover_text("Copy message").clicked() {
                        copied = Some(message.content.clone());
                    }
                });
            });
        });
    });

    copied
}
