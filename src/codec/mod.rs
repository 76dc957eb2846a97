//! Conversions between base64 payloads, images, and tensors.

mod decode;
mod encode;

pub use decode::{decode_image, decode_mask};
pub use encode::tensor_to_image;
