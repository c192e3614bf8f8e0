//! Image processing, pure Rust via the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Compose** | `resize_exact` (Lanczos3) + `imageops::overlay` |
//! | **Encode** | `JpegEncoder` |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing the compose operation
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining config + backend

pub mod backend;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use operations::{plan_compose, process_file, process_image};
pub use params::{ComposeParams, Quality};
pub use rust_backend::RustBackend;
