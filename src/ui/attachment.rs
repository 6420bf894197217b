use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use eframe::egui;
use thiserror::Error;

use crate::store::seed::new_id;

#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("Image size must be less than {}MB", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Could not read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a base64 data URL")]
    MalformedDataUrl,

    #[error("Invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Ảnh đã chọn, chờ gửi kèm tin nhắn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    pub size: u64,
    pub data_url: String,
}

fn mime_for(path: &Path) -> Result<&'static str, AttachmentError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "gif" => Ok("image/gif"),
        "webp" => Ok("image/webp"),
        _ => Err(AttachmentError::UnsupportedType(extension)),
    }
}

/// Read an image from disk and encode it as a `data:` URL.
/// Files above `limit` bytes are rejected before being read.
pub fn load_image(path: &Path, limit: u64) -> Result<Attachment, AttachmentError> {
    let mime = mime_for(path)?;
    let size = fs::metadata(path)?.len();
    if size > limit {
        return Err(AttachmentError::TooLarge { size, limit });
    }

    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Attachment {
        id: new_id(),
        file_name,
        size,
        data_url: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
    })
}

/// Split a `data:<mime>;base64,<payload>` URL into its mime type and raw bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), AttachmentError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or(AttachmentError::MalformedDataUrl)?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(AttachmentError::MalformedDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(AttachmentError::MalformedDataUrl)?;
    let bytes = STANDARD.decode(payload)?;
    Ok((mime.to_string(), bytes))
}

/// `bytes://` uri under which an inline image is registered with egui.
/// The extension lets the image loader pick a decoder.
pub fn inline_uri(key: &str, mime: &str) -> String {
    let extension = match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    };
    format!("bytes://inline/{key}.{extension}")
}

/// Data URLs decoded once and handed to egui's byte loader, keyed by message
/// or attachment id. `None` marks a payload that could not be decoded.
#[derive(Default)]
pub struct InlineImages {
    registered: BTreeMap<String, Option<String>>,
}

impl InlineImages {
    pub fn uri(&mut self, ctx: &egui::Context, key: &str, data_url: &str) -> Option<String> {
        if let Some(uri) = self.registered.get(key) {
            return uri.clone();
        }

        let uri = match decode_data_url(data_url) {
            Ok((mime, bytes)) => {
                let uri = inline_uri(key, &mime);
                ctx.include_bytes(uri.clone(), bytes);
                Some(uri)
            }
            Err(err) => {
                log::warn!("Cannot render image {key}: {err}");
                None
            }
        };
        self.registered.insert(key.to_string(), uri.clone());
        uri
    }

    /// Drop a preview that will not be shown again.
    pub fn forget(&mut self, ctx: &egui::Context, key: &str) {
        if let Some(Some(uri)) = self.registered.remove(key) {
            ctx.forget_image(&uri);
        }
    }
}
