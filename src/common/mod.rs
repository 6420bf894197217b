pub mod commands;
pub mod events;
pub mod types;

pub use commands::SimCommand;
pub use events::SimEvent;
pub use types::{Chatroom, Country, Message, User};
