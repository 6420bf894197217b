use std::error::Error;

use eframe::egui;

use crate::store::{Change, ChatState, StoreSubscriber};

pub fn apply_theme(ctx: &egui::Context, dark: bool) {
    let theme = if dark {
        egui::Theme::Dark
    } else {
        egui::Theme::Light
    };
    ctx.set_theme(theme);
}

/// Keeps egui visuals in sync with the dark-mode flag.
pub struct ThemeEffect {
    ctx: egui::Context,
}

impl ThemeEffect {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl StoreSubscriber for ThemeEffect {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn on_commit(&mut self, state: &ChatState, change: Change) -> Result<(), Box<dyn Error>> {
        if change.theme {
            apply_theme(&self.ctx, state.is_dark_mode());
        }
        Ok(())
    }
}
