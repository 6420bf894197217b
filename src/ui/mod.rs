pub mod app;
pub mod attachment;
pub mod components;
pub mod format;
pub mod state;
pub mod theme;
pub mod validation;

pub use app::ChatApp;
