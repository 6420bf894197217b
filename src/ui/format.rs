use chrono::{DateTime, Local, Utc};

/// "Just now", "5m ago", "3h ago", "2d ago", then a plain date.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(timestamp);
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        timestamp.with_timezone(&Local).format("%m/%d/%Y").to_string()
    }
}

/// Giờ hiển thị dưới mỗi tin nhắn, ví dụ `09:05 PM`.
pub fn clock_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%I:%M %p").to_string()
}
