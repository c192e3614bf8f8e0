//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! [`operations`](super::operations), which derives them from config, and the
//! [`backend`](super::backend), which does the pixel work.
//!
//! - [`Quality`]: JPEG quality (1–100, default 90). Clamped on construction.
//! - [`ComposeParams`]: canvas edge, overlay path, quality.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for the resize + overlay + encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeParams {
    /// Edge of the square output canvas. Non-square input is stretched.
    pub size: u32,
    /// Overlay image with an alpha channel, pasted at (0,0).
    pub overlay: PathBuf,
    pub quality: Quality,
}
