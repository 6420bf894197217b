pub mod auth_screen;
pub mod chat_area;
pub mod dashboard;
pub mod input_bar;
pub mod sidebar;
pub mod toasts;
