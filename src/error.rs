// Error taxonomy for the detection flow. The `Display` text of every
// variant is exactly what gets shown to the user in the results panel.

use std::path::PathBuf;
use thiserror::Error;

/// Shown when the server gives no usable message for a non-2xx response or
/// the request never reached it.
pub const CONNECTION_FAILED: &str = "Failed to connect to the detection service.";

/// Shown when a 2xx response is not a usable success envelope.
pub const DETECTION_FAILED: &str = "Detection failed";

/// Rejections raised before any network traffic happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please select a valid image file")]
    NotAnImage { mime: String },
    #[error("File size must be less than 10MB")]
    TooLarge { size: u64 },
    #[error("Could not read image file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Request timeout. The model is taking too long to process the image.")]
    Timeout,
    #[error("Image file is too large. Please use an image smaller than 10MB.")]
    PayloadTooLarge,
    #[error("Unsupported image format. Please use JPG, PNG, or WEBP.")]
    UnsupportedMediaType,
    #[error("Server error. Please try again later.")]
    Server { status: u16 },
    #[error("{0}")]
    Connection(String),
    #[error("{0}")]
    Application(String),
}

impl DetectError {
    /// Build the error for a non-2xx response. `server_message` is the
    /// `error` field of the body, if the body had one.
    pub fn from_status(status: u16, server_message: Option<String>) -> Self {
        match status {
            413 => DetectError::PayloadTooLarge,
            415 => DetectError::UnsupportedMediaType,
            s if s >= 500 => DetectError::Server { status: s },
            _ => DetectError::Connection(
                server_message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| CONNECTION_FAILED.to_string()),
            ),
        }
    }

    /// Build the error for a 2xx response carrying `success: false`.
    pub fn application(message: Option<String>) -> Self {
        DetectError::Application(
            message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DETECTION_FAILED.to_string()),
        )
    }
}
