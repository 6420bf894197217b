use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::common::Country;
use crate::config::AppConfig;

use super::attachment::{Attachment, InlineImages};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStep {
    Phone,
    Otp,
}

/// Deadline-based countdown; dropping it is the cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    deadline: Instant,
}

impl Countdown {
    pub fn start(now: Instant, length: Duration) -> Self {
        Self {
            deadline: now + length,
        }
    }

    /// Seconds left, rounded up so the label never shows 0 while still running.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let left = self.deadline.saturating_duration_since(now);
        let secs = left.as_secs();
        if left.subsec_nanos() > 0 { secs + 1 } else { secs }
    }

    pub fn is_running(&self, now: Instant) -> bool {
        now < self.deadline
    }
}

/// Phone number + dial code captured by the first auth step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneSubmission {
    pub phone: String,
    pub country_code: String,
}

pub struct AuthForm {
    pub step: AuthStep,
    pub selected_country: Option<Country>,
    pub phone_input: String,
    pub otp_input: String,
    pub submitted: Option<PhoneSubmission>,
    pub resend: Option<Countdown>,
    pub verifying: bool,
    /// Id of the newest verification request; older results are stale.
    attempt: u64,
    pub countries_requested: bool,
    pub error: Option<&'static str>,
}

impl AuthForm {
    pub fn new() -> Self {
        Self {
            step: AuthStep::Phone,
            selected_country: None,
            phone_input: String::new(),
            otp_input: String::new(),
            submitted: None,
            resend: None,
            verifying: false,
            attempt: 0,
            countries_requested: false,
            error: None,
        }
    }

    pub fn enter_otp_step(&mut self, submission: PhoneSubmission, countdown: Countdown) {
        self.submitted = Some(submission);
        self.step = AuthStep::Otp;
        self.resend = Some(countdown);
        self.otp_input.clear();
        self.error = None;
    }

    /// Leave the OTP step; the resend countdown goes with it.
    pub fn back_to_phone(&mut self) {
        self.step = AuthStep::Phone;
        self.otp_input.clear();
        self.resend = None;
        self.verifying = false;
        self.error = None;
    }

    /// Start a new verification and return its attempt id.
    pub fn begin_verify(&mut self) -> u64 {
        self.attempt += 1;
        self.verifying = true;
        self.error = None;
        self.attempt
    }

    /// Only the newest in-flight attempt may settle the form.
    pub fn is_pending(&self, attempt: u64) -> bool {
        self.verifying && self.attempt == attempt
    }

    pub fn can_resend(&self, now: Instant) -> bool {
        self.resend.is_none_or(|countdown| !countdown.is_running(now))
    }

    /// Sau khi đăng nhập: giữ lại cờ đã tải danh sách quốc gia và bộ đếm attempt.
    pub fn reset(&mut self) {
        let countries_requested = self.countries_requested;
        let attempt = self.attempt;
        *self = Self::new();
        self.countries_requested = countries_requested;
        self.attempt = attempt;
    }
}

/// Two-step delete: the first click arms a window, a second click inside it confirms.
pub struct DeleteConfirm {
    armed: Option<(String, Instant)>,
    window: Duration,
}

impl DeleteConfirm {
    pub fn new(window: Duration) -> Self {
        Self {
            armed: None,
            window,
        }
    }

    /// Returns `true` when this click should delete.
    pub fn click(&mut self, id: &str, now: Instant) -> bool {
        if self.is_armed(id, now) {
            self.armed = None;
            return true;
        }
        self.armed = Some((id.to_string(), now));
        false
    }

    pub fn is_armed(&self, id: &str, now: Instant) -> bool {
        match &self.armed {
            Some((armed_id, at)) => armed_id == id && now.duration_since(*at) < self.window,
            None => false,
        }
    }
}

pub struct SearchDebounce {
    pub input: String,
    committed: String,
    last_edit: Option<Instant>,
    delay: Duration,
}

impl SearchDebounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            input: String::new(),
            committed: String::new(),
            last_edit: None,
            delay,
        }
    }

    pub fn edited(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// The query to commit once input has been quiet for the debounce delay.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let edited_at = self.last_edit?;
        if now.duration_since(edited_at) < self.delay {
            return None;
        }
        self.last_edit = None;
        if self.input == self.committed {
            return None;
        }
        self.committed = self.input.clone();
        Some(self.committed.clone())
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.committed.clear();
        self.last_edit = None;
    }
}

pub struct DashboardForm {
    pub title_input: String,
    pub title_error: Option<&'static str>,
    pub search: SearchDebounce,
    pub delete_confirm: DeleteConfirm,
}

pub struct ChatForm {
    pub draft: String,
    pub attachment_path: String,
    pub attachment: Option<Attachment>,
    /// Rooms with a "load older" request in flight.
    pub loading_older: BTreeSet<String>,
    pub sidebar_open: bool,
    pub images: InlineImages,
}

impl ChatForm {
    pub fn clear_draft(&mut self) {
        self.draft.clear();
        self.attachment = None;
        self.attachment_path.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    expires_at: Instant,
}

/// Thông báo tạm thời, tự hết hạn.
#[derive(Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn success(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Error, text.into());
    }

    fn push(&mut self, kind: ToastKind, text: String) {
        self.items.push(Toast {
            kind,
            text,
            expires_at: Instant::now() + TOAST_TTL,
        });
        // Giữ tối đa 5 thông báo
        if self.items.len() > 5 {
            self.items.remove(0);
        }
    }

    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|toast| toast.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Trạng thái cục bộ của UI (không thuộc store, không được lưu).
pub struct UiState {
    pub auth: AuthForm,
    pub dashboard: DashboardForm,
    pub chat: ChatForm,
    pub toasts: Toasts,
}

impl UiState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            auth: AuthForm::new(),
            dashboard: DashboardForm {
                title_input: String::new(),
                title_error: None,
                search: SearchDebounce::new(Duration::from_millis(config.search_debounce_ms)),
                delete_confirm: DeleteConfirm::new(Duration::from_secs(config.delete_confirm_secs)),
            },
            chat: ChatForm {
                draft: String::new(),
                attachment_path: String::new(),
                attachment: None,
                loading_older: BTreeSet::new(),
                sidebar_open: true,
                images: InlineImages::default(),
            },
            toasts: Toasts::default(),
        }
    }
}
