//! Geometric and compositing transform nodes.

use ndarray::{s, Array4};

use crate::error::{Error, Result};
use crate::tensor::{ImageTensor, MaskTensor, ALPHA_CHANNEL, RGBA_CHANNELS, RGB_CHANNELS};

/// Crop a rectangular region out of every batch item.
///
/// # Errors
///
/// Returns [`Error::CropOutOfBounds`] when the region extends past the
/// image dimensions.
pub fn crop(
    image: &ImageTensor,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<ImageTensor> {
    let (_, image_height, image_width, _) = image.dim();

    if x + width > image_width || y + height > image_height {
        return Err(Error::CropOutOfBounds {
            x,
            y,
            width,
            height,
            image_width,
            image_height,
        });
    }

    Ok(image
        .slice(s![.., y..y + height, x..x + width, ..])
        .to_owned())
}

/// Composite a mask into an image's alpha channel.
///
/// A 3-channel image is widened to 4 channels first, with alpha
/// initialized to fully opaque. The alpha channel of each batch item is
/// then overwritten by the corresponding mask plane.
///
/// # Errors
///
/// Returns a shape mismatch error when the mask's batch size or spatial
/// dimensions differ from the image's, or when the image is neither 3-
/// nor 4-channel.
pub fn apply_mask(image: &ImageTensor, mask: &MaskTensor) -> Result<ImageTensor> {
    let (batch, height, width, channels) = image.dim();

    if mask.dim() != (batch, height, width) {
        return Err(Error::ShapeMismatch {
            expected: format!("({batch}, {height}, {width})"),
            actual: format!("{:?}", mask.dim()),
        });
    }

    let mut out = match channels {
        RGBA_CHANNELS => image.clone(),
        RGB_CHANNELS => {
            let mut widened = Array4::<f32>::ones((batch, height, width, RGBA_CHANNELS));
            widened
                .slice_mut(s![.., .., .., ..RGB_CHANNELS])
                .assign(image);
            widened
        }
        other => {
            return Err(Error::ShapeMismatch {
                expected: "3 or 4 channels".to_string(),
                actual: format!("{other} channels"),
            })
        }
    };

    out.slice_mut(s![.., .., .., ALPHA_CHANNEL]).assign(mask);

    Ok(out)
}
