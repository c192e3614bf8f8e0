//! High-level image operations.
//!
//! These functions turn config into parameters and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::params::{ComposeParams, Quality};
use crate::config::ImageConfig;
use std::path::Path;
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan the compose operation without executing it.
pub fn plan_compose(config: &ImageConfig) -> ComposeParams {
    ComposeParams {
        size: config.size,
        overlay: config.overlay.clone(),
        quality: Quality::new(config.quality),
    }
}

/// Resize `source` to the configured square, paste the overlay, encode JPEG.
///
/// Non-square sources are stretched, not cropped.
pub fn process_image(
    backend: &impl ImageBackend,
    source: &[u8],
    config: &ImageConfig,
) -> Result<Vec<u8>> {
    let params = plan_compose(config);
    let jpeg = backend.compose(source, &params)?;
    debug!(
        source_bytes = source.len(),
        output_bytes = jpeg.len(),
        size = params.size,
        "composited overlay"
    );
    Ok(jpeg)
}

/// Run [`process_image`] on a file and write the JPEG next to it.
///
/// Backs the offline `process` command.
pub fn process_file(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    config: &ImageConfig,
) -> Result<usize> {
    let source = std::fs::read(input).map_err(|source| BackendError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let jpeg = process_image(backend, &source, config)?;
    std::fs::write(output, &jpeg).map_err(|source| BackendError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(jpeg.len())
}
