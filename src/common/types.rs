use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phiên đăng nhập sau khi xác thực OTP (giả lập).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub phone: String,
    pub country_code: String,
    pub is_authenticated: bool,
}

/// One entry of the dial-code directory, already flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    pub code: String,
    pub dial_code: String,
    pub flag: String,
}

/// Domain model đại diện một tin nhắn chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    /// `true` khi người dùng gửi, `false` khi là trả lời giả lập.
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    /// Ảnh đính kèm dạng `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A conversation thread, messages ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chatroom {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    /// Always a copy of the newest element of `messages`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
}

impl Chatroom {
    pub fn preview(&self) -> &str {
        self.last_message
            .as_ref()
            .map(|message| message.content.as_str())
            .unwrap_or("No messages yet")
    }
}
