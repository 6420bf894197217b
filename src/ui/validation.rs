use std::sync::LazyLock;

use regex::Regex;

pub const MAX_TITLE_CHARS: usize = 50;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9][0-9 \-]{4,}$").expect("phone regex is valid"));
static OTP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("otp regex is valid"));

pub fn phone(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();
    if PHONE_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err("Phone number must be at least 5 digits")
    }
}

pub fn otp(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();
    if OTP_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err("OTP must be exactly 6 digits")
    }
}

/// 1 đến 50 ký tự (tính theo char, không theo byte).
pub fn chatroom_title(input: &str) -> Result<String, &'static str> {
    let trimmed = input.trim();
    match trimmed.chars().count() {
        0 => Err("Title is required"),
        n if n > MAX_TITLE_CHARS => Err("Title must be less than 50 characters"),
        _ => Ok(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_needs_five_digits() {
        assert_eq!(phone(" 55512 ").unwrap(), "55512");
        assert_eq!(phone("555 123-4567").unwrap(), "555 123-4567");
        assert!(phone("5551").is_err());
        assert!(phone("abcdef").is_err());
    }

    #[test]
    fn otp_is_exactly_six_digits() {
        assert_eq!(otp("123456").unwrap(), "123456");
        assert!(otp("12345").is_err());
        assert!(otp("1234567").is_err());
        assert!(otp("12a456").is_err());
    }

    #[test]
    fn title_bounds() {
        assert!(chatroom_title("").is_err());
        assert!(chatroom_title("   ").is_err());
        assert_eq!(chatroom_title("Trip Planning").unwrap(), "Trip Planning");
        assert!(chatroom_title(&"x".repeat(50)).is_ok());
        assert!(chatroom_title(&"x".repeat(51)).is_err());
        assert!(chatroom_title(&"é".repeat(50)).is_ok());
    }
}
