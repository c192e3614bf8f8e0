//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the one operation the workflow needs:
//! compose (decode, resize, paste the overlay, re-encode). The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ComposeParams;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("overlay {0} has no alpha channel")]
    OverlayWithoutAlpha(PathBuf),
    #[error("Failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },
    #[error("JPEG encode failed: {0}")]
    Encode(String),
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Resize to the square canvas, paste the overlay at (0,0) through its
    /// alpha channel, and encode as JPEG.
    fn compose(&self, source: &[u8], params: &ComposeParams) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Mock backend that records operations and returns canned output.
    #[derive(Default)]
    pub struct MockBackend {
        pub output: Vec<u8>,
        pub operations: RefCell<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Compose {
            source_len: usize,
            size: u32,
            quality: u32,
            overlay: PathBuf,
        },
    }

    impl MockBackend {
        pub fn returning(output: Vec<u8>) -> Self {
            Self {
                output,
                operations: RefCell::new(Vec::new()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.borrow().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn compose(&self, source: &[u8], params: &ComposeParams) -> Result<Vec<u8>, BackendError> {
            self.operations.borrow_mut().push(RecordedOp::Compose {
                source_len: source.len(),
                size: params.size,
                quality: params.quality.value(),
                overlay: params.overlay.clone(),
            });
            Ok(self.output.clone())
        }
    }

    #[test]
    fn mock_records_compose() {
        let backend = MockBackend::returning(vec![1, 2, 3]);
        let out = backend
            .compose(
                &[0; 10],
                &ComposeParams {
                    size: 400,
                    overlay: "/overlay.png".into(),
                    quality: super::super::params::Quality::new(85),
                },
            )
            .unwrap();

        assert_eq!(out, vec![1, 2, 3]);
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Compose {
                source_len: 10,
                size: 400,
                quality: 85,
                ..
            }
        ));
    }
}
