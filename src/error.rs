//! Custom error types for tooling-nodes.

use thiserror::Error;

/// Main error type for the tooling-nodes library.
#[derive(Error, Debug)]
pub enum Error {
    /// The payload was not valid base64.
    #[error("failed to decode base64 payload: {source}")]
    Base64Decode {
        #[source]
        source: base64::DecodeError,
    },

    /// The decoded bytes were not a readable image.
    #[error("failed to read image data: {source}")]
    ImageRead {
        #[source]
        source: image::ImageError,
    },

    /// A batch could not be assembled because item shapes differ.
    #[error("failed to assemble batch: {source}")]
    BatchShape {
        #[source]
        source: ndarray::ShapeError,
    },

    /// No usable images were decoded from a batch payload.
    #[error("no images could be loaded from the provided input")]
    NoImages,

    /// A crop region extends past the image bounds.
    #[error(
        "crop region {x},{y} {width}x{height} exceeds image dimensions {image_width}x{image_height}"
    )]
    CropOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        image_width: usize,
        image_height: usize,
    },

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// A node was invoked with a missing or wrongly-typed input.
    #[error("invalid input {name}: {reason}")]
    InvalidInput { name: String, reason: String },

    /// The preview transport rejected a frame.
    #[error("preview transport failed: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tooling-nodes operations.
pub type Result<T> = std::result::Result<T, Error>;
