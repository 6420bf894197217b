/// Lệnh UI gửi xuống tầng giả lập (simulator).
#[derive(Debug, Clone)]
pub enum SimCommand {
    /// Giả lập gửi OTP tới số điện thoại.
    /// - resend: true khi người dùng bấm "Resend OTP"
    SendOtp {
        phone: String,
        country_code: String,
        resend: bool,
    },
    /// Kiểm tra mã OTP người dùng nhập.
    /// - attempt: số thứ tự lần xác minh, được trả lại nguyên vẹn trong event
    /// - phone / country_code: dữ liệu bước nhập số điện thoại
    /// - code: mã 6 chữ số
    VerifyOtp {
        attempt: u64,
        phone: String,
        country_code: String,
        code: String,
    },
    /// Request a simulated assistant reply for a chatroom.
    RequestReply { chatroom_id: String, prompt: String },
    /// Simulated "older history" fetch for a chatroom.
    LoadOlder { chatroom_id: String },
    /// One-time fetch of the country / dial-code directory.
    FetchCountries,
}
