use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::common::Message;

/// Size of every synthetic batch (room creation and "load older").
pub const SEED_BATCH: usize = 20;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Sinh `count` tin nhắn mẫu, cách nhau 1 phút, tin cũ nhất ở index 0.
/// Even indices are authored by the user, odd ones by the assistant.
pub fn generate_seed_messages(count: usize, now: DateTime<Utc>) -> Vec<Message> {
    (0..count)
        .map(|i| Message {
            id: new_id(),
            content: format!(
                "This is a sample message {}. Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
                i + 1
            ),
            is_user: i % 2 == 0,
            timestamp: now - Duration::minutes((count - i) as i64),
            image: None,
        })
        .collect()
}
