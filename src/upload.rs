//! Image and attachment uploads.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;

use crate::api::{ApiClient, ApiError, ResourceUpload, Transport};

/// The schedule form field that receives an uploaded image's name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleForm {
    pub image: String,
}

impl ResourceUpload {
    /// Build an upload body, base64-encoding `bytes`.
    pub fn from_bytes(mime: impl Into<String>, filename: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            filename: filename.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Read a file and build its upload body.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("No file name in {}", path.display()))?;
        Ok(Self::from_bytes(mime_for(path), filename, &bytes))
    }

    /// Decoded size of the payload in bytes.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|&b| b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// MIME type for a file, guessed from its extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

/// Upload `upload` and put the stored filename into the form's image field.
///
/// A rejected upload is logged and leaves the form untouched.
pub fn upload_resource<T: Transport>(
    client: &ApiClient<T>,
    upload: &ResourceUpload,
    form: &mut ScheduleForm,
) -> Result<(), ApiError> {
    match client.upload_resource(upload) {
        Ok(filename) => {
            tracing::debug!(%filename, "resource stored");
            form.image = filename;
            Ok(())
        }
        Err(err) => {
            tracing::warn!(filename = %upload.filename, "upload failed: {err}");
            Err(err)
        }
    }
}
