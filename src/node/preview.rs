//! Preview sender node.

use image::DynamicImage;
use ndarray::Axis;

use crate::codec::tensor_to_image;
use crate::error::Result;
use crate::tensor::ImageTensor;

/// Format tag attached to every preview frame.
pub const PREVIEW_FORMAT_PNG: &str = "PNG";

/// Transport capability for pushing unencoded preview frames to the
/// currently connected client. Injected by the host; framing, client
/// binding, and delivery are the transport's concern.
pub trait PreviewTransport {
    /// Push one frame, tagged with its format literal.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame cannot be delivered.
    fn send_preview(&mut self, format: &str, image: &DynamicImage) -> Result<()>;
}

/// Host-UI bookkeeping record emitted per transmitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewRecord {
    pub source: &'static str,
    pub content_type: &'static str,
    pub kind: &'static str,
}

impl PreviewRecord {
    const fn websocket_png() -> Self {
        Self {
            source: "websocket",
            content_type: "image/png",
            kind: "output",
        }
    }
}

/// Send every image in a batch to the client as a preview frame.
///
/// Frames are converted to 8-bit, transmitted synchronously in batch
/// order, and matched to records by index. There is no per-frame error
/// isolation: the first transport failure aborts the remaining frames.
///
/// # Errors
///
/// Returns an error when a frame cannot be converted or transmitted.
pub fn send_images(
    images: &ImageTensor,
    transport: &mut dyn PreviewTransport,
) -> Result<Vec<PreviewRecord>> {
    let mut records = Vec::with_capacity(images.len_of(Axis(0)));

    for frame in images.axis_iter(Axis(0)) {
        let image = tensor_to_image(frame)?;
        transport.send_preview(PREVIEW_FORMAT_PNG, &image)?;
        records.push(PreviewRecord::websocket_png());
    }

    tracing::debug!("sent {} preview frame(s)", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use ndarray::Array4;

    use super::*;
    use crate::error::Error;

    /// Records frames instead of transmitting them.
    #[derive(Default)]
    struct FakeTransport {
        frames: Vec<(String, u32, u32)>,
        fail_after: Option<usize>,
    }

    impl PreviewTransport for FakeTransport {
        fn send_preview(&mut self, format: &str, image: &DynamicImage) -> Result<()> {
            if self.fail_after == Some(self.frames.len()) {
                return Err(Error::Transport {
                    source: "connection closed".into(),
                });
            }
            self.frames
                .push((format.to_string(), image.width(), image.height()));
            Ok(())
        }
    }

    #[test]
    fn test_sends_one_frame_per_batch_item() {
        let images = Array4::<f32>::from_elem((3, 4, 6, 3), 0.5);
        let mut transport = FakeTransport::default();

        let records = send_images(&images, &mut transport).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(transport.frames.len(), 3);
        assert!(transport
            .frames
            .iter()
            .all(|frame| frame == &("PNG".to_string(), 6, 4)));
    }

    #[test]
    fn test_record_fields() {
        let images = Array4::<f32>::zeros((1, 2, 2, 3));
        let mut transport = FakeTransport::default();

        let records = send_images(&images, &mut transport).unwrap();

        assert_eq!(records[0].source, "websocket");
        assert_eq!(records[0].content_type, "image/png");
        assert_eq!(records[0].kind, "output");
    }

    #[test]
    fn test_transport_failure_aborts_iteration() {
        let images = Array4::<f32>::zeros((3, 2, 2, 3));
        let mut transport = FakeTransport {
            fail_after: Some(1),
            ..FakeTransport::default()
        };

        let err = send_images(&images, &mut transport).unwrap_err();

        assert!(matches!(err, Error::Transport { .. }));
        assert_eq!(transport.frames.len(), 1);
    }
}
