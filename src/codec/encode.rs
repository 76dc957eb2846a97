//! Tensor to image conversion for preview output.

use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
use ndarray::ArrayView3;

use crate::error::{Error, Result};
use crate::tensor::{RGBA_CHANNELS, RGB_CHANNELS};

/// Convert a single normalized HWC frame to an 8-bit image.
///
/// Values are denormalized from [0, 1] to [0, 255] and clamped. A 3-channel
/// frame becomes an RGB image, a 4-channel frame an RGBA image.
///
/// # Errors
///
/// Returns a shape mismatch error if the frame has any other channel count.
#[allow(clippy::cast_possible_truncation)]
pub fn tensor_to_image(frame: ArrayView3<'_, f32>) -> Result<DynamicImage> {
    let (height, width, channels) = frame.dim();

    match channels {
        RGB_CHANNELS => {
            let mut img = ImageBuffer::new(width as u32, height as u32);
            for y in 0..height {
                for x in 0..width {
                    let r = denormalize(frame[[y, x, 0]]);
                    let g = denormalize(frame[[y, x, 1]]);
                    let b = denormalize(frame[[y, x, 2]]);
                    img.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
                }
            }
            Ok(DynamicImage::ImageRgb8(img))
        }
        RGBA_CHANNELS => {
            let mut img = ImageBuffer::new(width as u32, height as u32);
            for y in 0..height {
                for x in 0..width {
                    let r = denormalize(frame[[y, x, 0]]);
                    let g = denormalize(frame[[y, x, 1]]);
                    let b = denormalize(frame[[y, x, 2]]);
                    let a = denormalize(frame[[y, x, 3]]);
                    img.put_pixel(x as u32, y as u32, Rgba([r, g, b, a]));
                }
            }
            Ok(DynamicImage::ImageRgba8(img))
        }
        other => Err(Error::ShapeMismatch {
            expected: "3 or 4 channels".to_string(),
            actual: format!("{other} channels"),
        }),
    }
}

/// Denormalize a value from [0, 1] to [0, 255] with clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn denormalize(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize(0.0), 0);
        assert_eq!(denormalize(0.5), 127);
        assert_eq!(denormalize(1.0), 255);
    }

    #[test]
    fn test_denormalize_clamp() {
        assert_eq!(denormalize(-1.0), 0);
        assert_eq!(denormalize(2.0), 255);
    }

    #[test]
    fn test_rgb_frame() {
        let frame = Array3::from_elem((2, 3, 3), 1.0f32);
        let img = tensor_to_image(frame.view()).unwrap();

        assert_eq!(img.width(), 3);
        assert_eq!(img.height(), 2);
        assert!(matches!(img, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_rgba_frame() {
        let frame = Array3::from_elem((2, 2, 4), 0.5f32);
        let img = tensor_to_image(frame.view()).unwrap();

        assert!(matches!(img, DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn test_bad_channel_count() {
        let frame = Array3::from_elem((2, 2, 5), 0.0f32);
        let err = tensor_to_image(frame.view()).unwrap_err();

        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }
}
