use uuid::Uuid;

use crate::common::User;

/// Mã OTP duy nhất được chấp nhận trong bản demo.
pub const DEMO_OTP: &str = "123456";

/// Build the session user when `code` matches, `None` otherwise.
pub fn verify(phone: &str, country_code: &str, code: &str) -> Option<User> {
    if code != DEMO_OTP {
        return None;
    }
    Some(User {
        id: Uuid::new_v4().to_string(),
        phone: phone.to_string(),
        country_code: country_code.to_string(),
        is_authenticated: true,
    })
}
