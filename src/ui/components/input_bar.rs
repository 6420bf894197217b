use eframe::egui;

use crate::ui::state::ChatForm;

/// Kích thước ảnh xem trước trước khi gửi.
const PREVIEW_SIDE: f32 = 64.0;

/// Payload của một lần gửi: nội dung + ảnh (data URL) nếu có.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub content: String,
    pub image: Option<String>,
}

#[derive(Default)]
pub struct InputActions {
    pub send: Option<Outgoing>,
    pub attach_path: Option<String>,
}

pub fn render(ui: &mut egui::Ui, form: &mut ChatForm) -> InputActions {
    let mut actions = InputActions::default();

    if let Some(attachment) = &form.attachment {
        let mut remove = false;
        ui.horizontal(|ui| {
            if let Some(uri) = form.images.uri(ui.ctx(), &attachment.id, &attachment.data_url) {
                ui.add(egui::Image::new(uri).max_width(PREVIEW_SIDE).max_height(PREVIEW_SIDE));
            }
            ui.label(format!(
                "{} ({} KB)",
                attachment.file_name,
                attachment.size.div_ceil(1024)
            ));
            if ui.small_button("✖").on_hover_text("Remove image").clicked() {
                remove = true;
            }
        });
        if remove {
            form.images.forget(ui.ctx(), &attachment.id);
            form.attachment = None;
        }
    } else {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut form.attachment_path)
                    .hint_text("Image path (optional)")
                    .desired_width(260.0),
            );
            if ui.button("Attach").clicked() && !form.attachment_path.trim().is_empty() {
                actions.attach_path = Some(form.attachment_path.trim().to_string());
            }
        });
    }

    let mut send = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut form.draft)
                .hint_text("Ask Gemini")
                .desired_width(ui.available_width() - 70.0),
        );
        let can_send = !form.draft.trim().is_empty() || form.attachment.is_some();
        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
            send = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
        }
    });

    if send {
        let preview = form.attachment.as_ref().map(|a| a.id.clone());
        actions.send = outgoing(form);
        if let (Some(id), Some(_)) = (preview, &actions.send) {
            form.images.forget(ui.ctx(), &id);
        }
    }

    actions
}

/// Empty text is allowed only with an image, which then reads "[Image]".
fn outgoing(form: &mut ChatForm) -> Option<Outgoing> {
    let text = form.draft.trim();
    let image = form.attachment.as_ref().map(|a| a.data_url.clone());
    if text.is_empty() && image.is_none() {
        return None;
    }
    let content = if text.is_empty() {
        "[Image]".to_string()
    } else {
        text.to_string()
    };
    form.clear_draft();
    Some(Outgoing { content, image })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::ui::attachment::{Attachment, InlineImages};

    fn form(draft: &str, attachment: Option<Attachment>) -> ChatForm {
        ChatForm {
            draft: draft.to_string(),
            attachment_path: "pic.png".to_string(),
            attachment,
            loading_older: BTreeSet::new(),
            sidebar_open: true,
            images: InlineImages::default(),
        }
    }

    fn picture() -> Attachment {
        Attachment {
            id: "att-1".to_string(),
            file_name: "pic.png".to_string(),
            size: 4,
            data_url: "data:image/png;base64,iVBORw==".to_string(),
        }
    }

    #[test]
    fn blank_draft_without_image_sends_nothing() {
        let mut form = form("   ", None);
        assert_eq!(outgoing(&mut form), None);
        assert_eq!(form.draft, "   ");
    }

    #[test]
    fn text_is_trimmed_and_form_cleared() {
        let mut form = form("  hello  ", None);
        assert_eq!(
            outgoing(&mut form),
            Some(Outgoing {
                content: "hello".to_string(),
                image: None
            })
        );
        assert!(form.draft.is_empty());
        assert!(form.attachment_path.is_empty());
    }

    #[test]
    fn image_only_reads_as_placeholder() {
        let mut form = form("", Some(picture()));
        let sent = outgoing(&mut form).unwrap();
        assert_eq!(sent.content, "[Image]");
        assert_eq!(sent.image.as_deref(), Some("data:image/png;base64,iVBORw=="));
        assert!(form.attachment.is_none());
    }
}
