use super::types::{Country, User};

/// Sự kiện từ tầng giả lập gửi lên UI.
#[derive(Debug, Clone)]
pub enum SimEvent {
    OtpSent { phone: String, resend: bool },
    /// `attempt` echoes the one carried by [`super::SimCommand::VerifyOtp`].
    OtpVerified { attempt: u64, user: User },
    OtpRejected { attempt: u64 },
    ReplyReady { chatroom_id: String, content: String },
    OlderMessagesReady { chatroom_id: String },
    CountriesLoaded(Vec<Country>),
    CountriesFailed(String),
}
