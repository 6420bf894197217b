use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::ensure_parent_dir;

pub const DEFAULT_CONFIG_PATH: &str = "config/app.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage_path: String,
    pub countries_url: String,
    pub otp_send_delay_ms: u64,
    pub otp_verify_delay_ms: u64,
    pub load_more_delay_ms: u64,
    pub reply_delay_min_ms: u64,
    pub reply_delay_max_ms: u64,
    pub otp_resend_secs: u64,
    pub delete_confirm_secs: u64,
    pub search_debounce_ms: u64,
    pub max_image_bytes: u64,
    /// Upper bound on messages kept per room when loading older pages.
    pub max_messages_per_room: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: "data/gemini_chat.db".to_string(),
            countries_url: "https://restcountries.com/v3.1/all?fields=name,cca2,idd,flag"
                .to_string(),
            otp_send_delay_ms: 1000,
            otp_verify_delay_ms: 1500,
            load_more_delay_ms: 1000,
            reply_delay_min_ms: 2000,
            reply_delay_max_ms: 4000,
            otp_resend_secs: 30,
            delete_confirm_secs: 3,
            search_debounce_ms: 300,
            max_image_bytes: 5 * 1024 * 1024,
            max_messages_per_room: None,
        }
    }
}

impl AppConfig {
    /// Khoảng thời gian "suy nghĩ" của AI giả lập, luôn min <= max.
    pub fn reply_delay_range(&self) -> (Duration, Duration) {
        let min = self.reply_delay_min_ms.min(self.reply_delay_max_ms);
        let max = self.reply_delay_min_ms.max(self.reply_delay_max_ms);
        (Duration::from_millis(min), Duration::from_millis(max))
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    ensure_parent_dir(Path::new(path))?;
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}
