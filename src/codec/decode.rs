//! Base64 payload decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::GenericImageView;
use ndarray::{Array2, Array4};

use crate::error::{Error, Result};
use crate::tensor::{ImageTensor, RGB_CHANNELS};

/// Decode a base64-encoded image payload into a normalized tensor and mask.
///
/// The image is converted to RGB and normalized to [0, 1], returned with a
/// batch axis as a (1, height, width, 3) tensor. If the source has an alpha
/// band, the mask is 1 minus the normalized alpha (0 = keep, 1 = removed);
/// otherwise it is all zeros. The mask carries no batch axis.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64 or the decoded bytes
/// are not a readable image.
pub fn decode_image(payload: &str) -> Result<(ImageTensor, Array2<f32>)> {
    let img = parse_payload(payload)?;

    let (width, height) = img.dimensions();
    let (width, height) = (width as usize, height as usize);

    let mut tensor = Array4::<f32>::zeros((1, height, width, RGB_CHANNELS));
    let mut mask = Array2::<f32>::zeros((height, width));

    if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        for (x, y, pixel) in rgba.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            tensor[[0, y, x, 0]] = f32::from(pixel[0]) / 255.0;
            tensor[[0, y, x, 1]] = f32::from(pixel[1]) / 255.0;
            tensor[[0, y, x, 2]] = f32::from(pixel[2]) / 255.0;
            mask[[y, x]] = 1.0 - f32::from(pixel[3]) / 255.0;
        }
    } else {
        let rgb = img.to_rgb8();
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            tensor[[0, y, x, 0]] = f32::from(pixel[0]) / 255.0;
            tensor[[0, y, x, 1]] = f32::from(pixel[1]) / 255.0;
            tensor[[0, y, x, 2]] = f32::from(pixel[2]) / 255.0;
        }
    }

    Ok((tensor, mask))
}

/// Decode a base64-encoded image payload into a raw mask plane.
///
/// No alpha handling is performed: single-channel sources are used directly,
/// multi-channel sources contribute their first (red) channel. Values are
/// normalized to [0, 1].
///
/// # Errors
///
/// Returns an error if the payload is not valid base64 or the decoded bytes
/// are not a readable image.
pub fn decode_mask(payload: &str) -> Result<Array2<f32>> {
    let img = parse_payload(payload)?;

    let (width, height) = img.dimensions();
    let (width, height) = (width as usize, height as usize);

    let mut mask = Array2::<f32>::zeros((height, width));

    if img.color().channel_count() == 1 {
        let luma = img.to_luma8();
        for (x, y, pixel) in luma.enumerate_pixels() {
            mask[[y as usize, x as usize]] = f32::from(pixel[0]) / 255.0;
        }
    } else {
        // Multi-channel input, use the first channel as the mask value.
        let rgb = img.to_rgb8();
        for (x, y, pixel) in rgb.enumerate_pixels() {
            mask[[y as usize, x as usize]] = f32::from(pixel[0]) / 255.0;
        }
    }

    Ok(mask)
}

fn parse_payload(payload: &str) -> Result<image::DynamicImage> {
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|source| Error::Base64Decode { source })?;

    image::load_from_memory(&bytes).map_err(|source| Error::ImageRead { source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::test_support::{encode_png, rgb_image, rgba_image};

    #[test]
    fn test_decode_rgb() {
        let payload = encode_png(&rgb_image(4, 3, [10, 128, 250]));
        let (tensor, mask) = decode_image(&payload).unwrap();

        assert_eq!(tensor.shape(), &[1, 3, 4, 3]);
        assert_eq!(mask.shape(), &[3, 4]);
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!((tensor[[0, 0, 0, 1]] - 128.0 / 255.0).abs() < 1e-6);
        assert!(mask.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_decode_rgba_inverts_alpha() {
        let payload = encode_png(&rgba_image(2, 2, [0, 0, 0, 64]));
        let (_, mask) = decode_image(&payload).unwrap();

        assert!(mask.iter().all(|&v| (v - (1.0 - 64.0 / 255.0)).abs() < 1e-6));
    }

    #[test]
    fn test_decode_bad_base64() {
        let err = decode_image("not@valid@base64!").unwrap_err();
        assert!(matches!(err, Error::Base64Decode { .. }));
    }

    #[test]
    fn test_decode_bad_image_bytes() {
        let payload = STANDARD.encode(b"these are not image bytes");
        let err = decode_image(&payload).unwrap_err();
        assert!(matches!(err, Error::ImageRead { .. }));
    }

    #[test]
    fn test_decode_mask_uses_red_channel() {
        let payload = encode_png(&rgb_image(3, 3, [200, 10, 10]));
        let mask = decode_mask(&payload).unwrap();

        assert_eq!(mask.shape(), &[3, 3]);
        assert!(mask.iter().all(|&v| (v - 200.0 / 255.0).abs() < 1e-6));
    }

    #[test]
    fn test_round_trip_preserves_pixels() {
        let img = rgb_image(5, 4, [17, 99, 201]);
        let payload = encode_png(&img);
        let (tensor, _) = decode_image(&payload).unwrap();

        assert!((tensor[[0, 2, 3, 0]] - 17.0 / 255.0).abs() < 1e-6);
        assert!((tensor[[0, 2, 3, 1]] - 99.0 / 255.0).abs() < 1e-6);
        assert!((tensor[[0, 2, 3, 2]] - 201.0 / 255.0).abs() < 1e-6);
    }
}
