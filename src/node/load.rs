//! Base64 loader nodes.

use ndarray::Axis;

use crate::codec::{decode_image, decode_mask};
use crate::error::{Error, Result};
use crate::tensor::{ImageTensor, MaskTensor};

/// Decode a single base64 payload into an image and its mask.
///
/// # Errors
///
/// Returns an error if the payload cannot be decoded; the host treats this
/// as a terminal failure for the call.
pub fn load_image(payload: &str) -> Result<(ImageTensor, MaskTensor)> {
    let (image, mask) = decode_image(payload)?;
    Ok((image, mask.insert_axis(Axis(0))))
}

/// Decode a newline-separated list of base64 payloads into a batch.
///
/// Each line is decoded independently; a line that fails to decode is
/// logged and skipped so one corrupt entry cannot abort the batch. Images
/// are concatenated along the batch axis, masks stacked along a new one.
///
/// # Errors
///
/// Returns [`Error::NoImages`] when no line decodes successfully, or a
/// batch shape error when the decoded images have differing dimensions.
pub fn load_images(payload: &str) -> Result<(ImageTensor, MaskTensor)> {
    let mut images = Vec::new();
    let mut masks = Vec::new();

    for (index, line) in payload.trim().split('\n').enumerate() {
        match decode_image(line) {
            Ok((image, mask)) => {
                images.push(image);
                masks.push(mask);
            }
            Err(err) => {
                tracing::warn!("skipping batch item {index}: {err}");
            }
        }
    }

    if images.is_empty() {
        return Err(Error::NoImages);
    }

    let image_views: Vec<_> = images.iter().map(|image| image.view()).collect();
    let batch = ndarray::concatenate(Axis(0), &image_views)
        .map_err(|source| Error::BatchShape { source })?;

    let mask_views: Vec<_> = masks.iter().map(|mask| mask.view()).collect();
    let mask_batch =
        ndarray::stack(Axis(0), &mask_views).map_err(|source| Error::BatchShape { source })?;

    Ok((batch, mask_batch))
}

/// Decode a base64 payload as a raw mask, without alpha handling.
///
/// # Errors
///
/// Returns an error if the payload cannot be decoded.
pub fn load_mask(payload: &str) -> Result<MaskTensor> {
    let mask = decode_mask(payload)?;
    Ok(mask.insert_axis(Axis(0)))
}
