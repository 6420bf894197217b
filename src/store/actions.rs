use crate::common::{Country, User};

/// Typed commands accepted by [`super::Store::dispatch`].
#[derive(Debug, Clone)]
pub enum Action {
    SetUser(Option<User>),
    /// Xoá phiên, toàn bộ chatroom, lựa chọn hiện tại và con trỏ phân trang.
    Logout,
    SetCountries(Vec<Country>),
    /// Title length (1-50) is validated by the caller.
    AddChatroom { title: String },
    DeleteChatroom { id: String },
    SetCurrentChatroom(Option<String>),
    SetSearchQuery(String),
    AddMessage {
        chatroom_id: String,
        content: String,
        is_user: bool,
        image: Option<String>,
    },
    LoadMoreMessages { chatroom_id: String },
    SetTyping { chatroom_id: String, typing: bool },
    ToggleDarkMode,
}
