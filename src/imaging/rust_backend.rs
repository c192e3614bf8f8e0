//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::load_from_memory` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Overlay | `image::imageops::overlay` (alpha blend) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, ImageBackend};
use super::params::ComposeParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbaImage};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(bytes).map_err(|e| BackendError::Decode {
        what: "source image".to_string(),
        reason: e.to_string(),
    })
}

/// Load the overlay from disk. It must carry an alpha channel: that channel
/// is the paste mask.
fn load_overlay(path: &Path) -> Result<RgbaImage, BackendError> {
    let overlay = ImageReader::open(path)
        .map_err(|source| BackendError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| BackendError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|e| BackendError::Decode {
            what: path.display().to_string(),
            reason: e.to_string(),
        })?;
    if !overlay.color().has_alpha() {
        return Err(BackendError::OverlayWithoutAlpha(path.to_path_buf()));
    }
    Ok(overlay.to_rgba8())
}

/// Encode as baseline JPEG. Alpha is dropped first; JPEG has none.
fn encode_jpeg(img: DynamicImage, quality: u8) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(e.to_string()))?;
    Ok(out)
}

impl ImageBackend for RustBackend {
    fn compose(&self, source: &[u8], params: &ComposeParams) -> Result<Vec<u8>, BackendError> {
        let img = decode(source)?;
        let overlay = load_overlay(&params.overlay)?;

        let mut canvas = img
            .resize_exact(params.size, params.size, FilterType::Lanczos3)
            .to_rgba8();
        image::imageops::overlay(&mut canvas, &overlay, 0, 0);

        encode_jpeg(DynamicImage::ImageRgba8(canvas), params.quality.value() as u8)
    }
}
