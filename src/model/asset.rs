//! Content-addressed asset metadata.

use serde::{Deserialize, Serialize};

/// A deduplicated, content-addressed image asset.
///
/// Identical byte content always maps to the same `asset_id`, across
/// the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Hash-derived id, `img_` + leading hex of the sha256
    pub asset_id: String,

    /// Output-relative filename for the stored bytes
    pub filename: String,

    /// Full sha256 of the byte payload, lowercase hex
    pub sha256: String,
}

impl Asset {
    /// Create an asset entry.
    pub fn new(
        asset_id: impl Into<String>,
        filename: impl Into<String>,
        sha256: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            filename: filename.into(),
            sha256: sha256.into(),
        }
    }

    /// Detect the file extension from data magic bytes.
    ///
    /// Unrecognized payloads fall back to `raw`.
    pub fn detect_extension(data: &[u8]) -> &'static str {
        if data.len() < 8 {
            return "raw";
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return "jpg";
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return "png";
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return "gif";
        }

        // TIFF: little- or big-endian header
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return "tiff";
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return "bmp";
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return "webp";
        }

        "raw"
    }
}
