//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend
//! must support: normalize and render_icon.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), which decodes, transforms
//! and encodes entirely in memory with the `image` crate and only touches the
//! filesystem to read the source and write the finished file.

use super::params::{IconParams, NormalizeParams};
use super::source::ColorMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Invalid target size {width}x{height}: both dimensions must be positive")]
    InvalidTarget { width: u32, height: u32 },
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// Width and height of an image or a requested target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// Every backend implements both operations so planning code in
/// [`operations`](super::operations) is backend-agnostic.
pub trait ImageBackend: Sync {
    /// Fit a source into an exact canvas and write it. Returns the source's color mode.
    fn normalize(&self, params: &NormalizeParams) -> Result<ColorMode, ImagingError>;

    /// Render the procedural icon at one edge length and write it.
    fn render_icon(&self, params: &IconParams) -> Result<(), ImagingError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use image::Rgb;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it satisfies the `Sync` bound.
    #[derive(Default)]
    pub struct MockBackend {
        pub fail_sources: Vec<String>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Normalize {
            source: String,
            output: String,
            width: u32,
            height: u32,
            quality: u32,
        },
        RenderIcon {
            output: String,
            edge: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Normalizing any of these sources fails with `InvalidImage`.
        pub fn failing_on(sources: &[&str]) -> Self {
            Self {
                fail_sources: sources.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn normalize(&self, params: &NormalizeParams) -> Result<ColorMode, ImagingError> {
            let source = params.source.to_string_lossy().to_string();
            self.operations.lock().unwrap().push(RecordedOp::Normalize {
                source: source.clone(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            if self.fail_sources.contains(&source) {
                return Err(ImagingError::InvalidImage(format!("mock failure: {source}")));
            }
            Ok(ColorMode::Opaque)
        }

        fn render_icon(&self, params: &IconParams) -> Result<(), ImagingError> {
            self.operations.lock().unwrap().push(RecordedOp::RenderIcon {
                output: params.output.to_string_lossy().to_string(),
                edge: params.edge,
            });
            Ok(())
        }
    }

    #[test]
    fn mock_records_normalize() {
        let backend = MockBackend::new();

        backend
            .normalize(&NormalizeParams {
                source: "/source.jpg".into(),
                output: "/out.jpg".into(),
                width: 1280,
                height: 800,
                background: Rgb([255, 255, 255]),
                quality: Quality::new(90),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Normalize {
                width: 1280,
                height: 800,
                quality: 90,
                ..
            }
        ));
    }

    #[test]
    fn mock_failing_source_errors() {
        let backend = MockBackend::failing_on(&["/bad.jpg"]);
        let result = backend.normalize(&NormalizeParams {
            source: "/bad.jpg".into(),
            output: "/out.jpg".into(),
            width: 10,
            height: 10,
            background: Rgb([255, 255, 255]),
            quality: Quality::default(),
        });
        assert!(matches!(result, Err(ImagingError::InvalidImage(_))));
    }

    #[test]
    fn dimensions_empty_when_either_axis_zero() {
        assert!(Dimensions::new(0, 10).is_empty());
        assert!(Dimensions::new(10, 0).is_empty());
        assert!(!Dimensions::new(1, 1).is_empty());
    }
}
