//! Tensor type aliases and channel conventions.

use ndarray::{Array3, Array4};

/// Image tensor in BHWC format (batch, height, width, channels).
/// Values are normalized to [0, 1]; channels are RGB or RGBA.
pub type ImageTensor = Array4<f32>;

/// Mask tensor in BHW format (batch, height, width).
/// Values are in [0, 1]; for alpha-derived masks 0 = keep, 1 = removed.
pub type MaskTensor = Array3<f32>;

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Number of channels in RGBA images.
pub const RGBA_CHANNELS: usize = 4;

/// Index of the alpha channel in RGBA images.
pub const ALPHA_CHANNEL: usize = 3;

/// Upper bound advertised for crop coordinates and dimensions.
pub const MAX_COORD: i64 = 8192;
