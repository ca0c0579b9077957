// Inline `data:<mime>;base64,<payload>` images, as returned by the service
// for the original and processed images.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};

/// File stem used when saving a result image.
pub const DEFAULT_SAVE_STEM: &str = "road-defect-detection-result";

/// Borrowed view over a base64 data URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUri<'a> {
    mime: &'a str,
    payload: &'a str,
}

impl<'a> DataUri<'a> {
    pub fn parse(uri: &'a str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| anyhow!("not a data URI"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| anyhow!("data URI has no payload separator"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| anyhow!("only base64 data URIs are supported"))?;
        Ok(DataUri { mime, payload })
    }

    pub fn mime(&self) -> &'a str {
        self.mime
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.payload.trim())
            .context("Decoding base64 image payload")
    }

    /// Size of the decoded payload, without decoding it.
    pub fn decoded_len(&self) -> usize {
        let payload = self.payload.trim();
        let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
        ((payload.len() / 4) * 3).saturating_sub(padding.min(2))
    }

    pub fn extension(&self) -> &'static str {
        extension_for_mime(self.mime)
    }
}

/// Encode raw bytes as a base64 data URI.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "image/avif" => "avif",
        "image/heic" => "heic",
        "image/svg+xml" => "svg",
        _ => "png",
    }
}

/// Directory results are saved into when the user does not pick one.
pub fn default_save_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Decode `uri` and write it to `<dir>/<stem>.<ext>`, returning the path.
pub fn save_image(uri: &str, dir: &Path, stem: &str) -> Result<PathBuf> {
    let parsed = DataUri::parse(uri)?;
    let bytes = parsed.decode()?;
    fs::create_dir_all(dir).with_context(|| format!("Creating {}", dir.display()))?;
    let path = dir.join(format!("{}.{}", stem, parsed.extension()));
    fs::write(&path, &bytes).with_context(|| format!("Writing {}", path.display()))?;
    log::info!("saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
