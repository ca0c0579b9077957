// Image selection. Every check here runs before the API client is involved,
// so a rejected file never produces network traffic.

use crate::data_uri;
use crate::error::ValidationError;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Largest upload accepted client-side: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// A validated image ready to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    /// Load and validate a file from disk. The MIME type is inferred from
    /// the extension. Size is checked from metadata before reading and again
    /// on the bytes actually read, which are capped one past the limit.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let mime = mime_for_path(path);
        check_mime(mime)?;

        let unreadable = |source| ValidationError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(unreadable)?.len();
        check_size(size)?;
        let mut bytes = Vec::new();
        File::open(path)
            .and_then(|file| file.take(MAX_UPLOAD_BYTES + 1).read_to_end(&mut bytes))
            .map_err(unreadable)?;
        check_size(bytes.len() as u64)?;

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        log::debug!("selected {} ({}, {} bytes)", name, mime, bytes.len());
        Ok(ImageFile {
            name,
            mime: mime.to_string(),
            bytes,
        })
    }

    /// Validate an in-memory image with a caller-supplied MIME type.
    pub fn from_bytes(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let mime = mime.into();
        check_mime(&mime)?;
        check_size(bytes.len() as u64)?;
        Ok(ImageFile {
            name: name.into(),
            mime,
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in megabytes, formatted with two decimals.
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.size() as f64 / 1024.0 / 1024.0)
    }

    pub fn preview_data_uri(&self) -> String {
        data_uri::encode(&self.mime, &self.bytes)
    }
}

fn check_mime(mime: &str) -> Result<(), ValidationError> {
    if mime.starts_with("image/") {
        Ok(())
    } else {
        Err(ValidationError::NotAnImage {
            mime: mime.to_string(),
        })
    }
}

fn check_size(size: u64) -> Result<(), ValidationError> {
    if size > MAX_UPLOAD_BYTES {
        Err(ValidationError::TooLarge { size })
    } else {
        Ok(())
    }
}

/// MIME type for a path, judged by extension only.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
