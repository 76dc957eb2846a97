//! Node registry and invocation contract.
//!
//! Each node is a pure function behind a [`NodeSpec`]: static metadata
//! describing its named, typed inputs and outputs, plus a function pointer
//! the host calls with an [`Inputs`] map. The host owns type-checking,
//! wiring, and scheduling; the one side-effecting node (the preview sender)
//! receives its transport through [`NodeContext`] instead of ambient state.

mod load;
mod preview;
mod transform;

pub use load::{load_image, load_images, load_mask};
pub use preview::{send_images, PreviewRecord, PreviewTransport, PREVIEW_FORMAT_PNG};
pub use transform::{apply_mask, crop};

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::tensor::{ImageTensor, MaskTensor, MAX_COORD};

/// Category under which all nodes are registered.
pub const CATEGORY: &str = "external_tooling";

/// A runtime value passed between nodes.
#[derive(Debug, Clone)]
pub enum Value {
    /// A text payload (base64 input strings).
    Text(String),
    /// An integer parameter.
    Int(i64),
    /// An image batch tensor.
    Image(ImageTensor),
    /// A mask batch tensor.
    Mask(MaskTensor),
}

impl Value {
    /// Get the kind tag for this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Int(_) => ValueKind::Int,
            Self::Image(_) => ValueKind::Image,
            Self::Mask(_) => ValueKind::Mask,
        }
    }
}

/// The kind of a node input or output value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Int,
    Image,
    Mask,
}

impl ValueKind {
    /// Host-facing type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text => "STRING",
            Self::Int => "INT",
            Self::Image => "IMAGE",
            Self::Mask => "MASK",
        }
    }
}

/// Schema for one named node input.
#[derive(Debug, Clone, Copy)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: InputKind,
}

/// Input type plus the constraints advertised to the host.
#[derive(Debug, Clone, Copy)]
pub enum InputKind {
    /// Multiline text input.
    Text,
    /// Integer with default and range constraints.
    Int {
        default: i64,
        min: i64,
        max: i64,
        step: i64,
    },
    /// An image batch produced by an upstream node.
    Image,
    /// A mask batch produced by an upstream node.
    Mask,
}

impl InputSpec {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: InputKind::Text,
        }
    }

    const fn image(name: &'static str) -> Self {
        Self {
            name,
            kind: InputKind::Image,
        }
    }

    const fn mask(name: &'static str) -> Self {
        Self {
            name,
            kind: InputKind::Mask,
        }
    }

    const fn coord(name: &'static str, default: i64, min: i64) -> Self {
        Self {
            name,
            kind: InputKind::Int {
                default,
                min,
                max: MAX_COORD,
                step: 1,
            },
        }
    }
}

/// Named input values for one node invocation.
#[derive(Debug, Default)]
pub struct Inputs {
    values: HashMap<String, Value>,
}

impl Inputs {
    /// Create an empty input map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named input, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Get a required text input.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the input is missing or not text.
    pub fn text(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            Value::Text(text) => Ok(text),
            other => Err(Self::wrong_kind(name, ValueKind::Text, other)),
        }
    }

    /// Get a required integer input.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the input is missing or not an integer.
    pub fn int(&self, name: &str) -> Result<i64> {
        match self.get(name)? {
            Value::Int(value) => Ok(*value),
            other => Err(Self::wrong_kind(name, ValueKind::Int, other)),
        }
    }

    /// Get a required image input.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the input is missing or not an image.
    pub fn image(&self, name: &str) -> Result<&ImageTensor> {
        match self.get(name)? {
            Value::Image(image) => Ok(image),
            other => Err(Self::wrong_kind(name, ValueKind::Image, other)),
        }
    }

    /// Get a required mask input.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the input is missing or not a mask.
    pub fn mask(&self, name: &str) -> Result<&MaskTensor> {
        match self.get(name)? {
            Value::Mask(mask) => Ok(mask),
            other => Err(Self::wrong_kind(name, ValueKind::Mask, other)),
        }
    }

    fn get(&self, name: &str) -> Result<&Value> {
        self.values.get(name).ok_or_else(|| Error::InvalidInput {
            name: name.to_string(),
            reason: "missing required input".to_string(),
        })
    }

    fn wrong_kind(name: &str, expected: ValueKind, actual: &Value) -> Error {
        Error::InvalidInput {
            name: name.to_string(),
            reason: format!(
                "expected {}, got {}",
                expected.name(),
                actual.kind().name()
            ),
        }
    }
}

/// Per-invocation capabilities handed to a node by the host.
#[derive(Default)]
pub struct NodeContext<'a> {
    preview: Option<&'a mut dyn PreviewTransport>,
}

impl<'a> NodeContext<'a> {
    /// Create a context with no transport bound (pure nodes only).
    #[must_use]
    pub fn new() -> Self {
        Self { preview: None }
    }

    /// Create a context with a preview transport bound.
    #[must_use]
    pub fn with_preview(transport: &'a mut dyn PreviewTransport) -> Self {
        Self {
            preview: Some(transport),
        }
    }

    /// Get the bound preview transport.
    ///
    /// # Errors
    ///
    /// Returns a transport error if no transport is bound.
    pub fn preview(&mut self) -> Result<&mut dyn PreviewTransport> {
        match self.preview.as_mut() {
            Some(transport) => Ok(&mut **transport),
            None => Err(Error::Transport {
                source: "no preview transport is bound".into(),
            }),
        }
    }
}

/// The result of one node invocation: graph outputs plus optional
/// host-UI bookkeeping records from output nodes.
#[derive(Debug, Default)]
pub struct NodeOutput {
    pub values: Vec<Value>,
    pub previews: Vec<PreviewRecord>,
}

impl NodeOutput {
    fn from_values(values: Vec<Value>) -> Self {
        Self {
            values,
            previews: Vec::new(),
        }
    }

    fn from_previews(previews: Vec<PreviewRecord>) -> Self {
        Self {
            values: Vec::new(),
            previews,
        }
    }
}

/// Signature shared by all node entry points.
pub type NodeFn = fn(&mut NodeContext<'_>, &Inputs) -> Result<NodeOutput>;

/// Static registration record for one node type.
pub struct NodeSpec {
    pub name: &'static str,
    pub category: &'static str,
    pub inputs: &'static [InputSpec],
    pub returns: &'static [ValueKind],
    /// Output nodes sit at graph leaves and produce UI records, not values.
    pub output_node: bool,
    pub run: NodeFn,
}

/// Build the registration table for all nodes in this crate.
#[must_use]
pub fn registry() -> Vec<NodeSpec> {
    vec![
        NodeSpec {
            name: "load_image_base64",
            category: CATEGORY,
            inputs: &const { [InputSpec::text("image")] },
            returns: &[ValueKind::Image, ValueKind::Mask],
            output_node: false,
            run: run_load_image,
        },
        NodeSpec {
            name: "load_images_base64",
            category: CATEGORY,
            inputs: &const { [InputSpec::text("images")] },
            returns: &[ValueKind::Image, ValueKind::Mask],
            output_node: false,
            run: run_load_images,
        },
        NodeSpec {
            name: "load_mask_base64",
            category: CATEGORY,
            inputs: &const { [InputSpec::text("mask")] },
            returns: &[ValueKind::Mask],
            output_node: false,
            run: run_load_mask,
        },
        NodeSpec {
            name: "send_image_preview",
            category: CATEGORY,
            inputs: &const { [InputSpec::image("images")] },
            returns: &[],
            output_node: true,
            run: run_send_images,
        },
        NodeSpec {
            name: "crop_image",
            category: CATEGORY,
            inputs: &const {
                [
                    InputSpec::image("image"),
                    InputSpec::coord("x", 0, 0),
                    InputSpec::coord("y", 0, 0),
                    InputSpec::coord("width", 512, 1),
                    InputSpec::coord("height", 512, 1),
                ]
            },
            returns: &[ValueKind::Image],
            output_node: false,
            run: run_crop,
        },
        NodeSpec {
            name: "apply_mask_to_image",
            category: CATEGORY,
            inputs: &const { [InputSpec::image("image"), InputSpec::mask("mask")] },
            returns: &[ValueKind::Image],
            output_node: false,
            run: run_apply_mask,
        },
    ]
}

fn run_load_image(_ctx: &mut NodeContext<'_>, inputs: &Inputs) -> Result<NodeOutput> {
    let (image, mask) = load_image(inputs.text("image")?)?;
    Ok(NodeOutput::from_values(vec![
        Value::Image(image),
        Value::Mask(mask),
    ]))
}

fn run_load_images(_ctx: &mut NodeContext<'_>, inputs: &Inputs) -> Result<NodeOutput> {
    let (images, masks) = load_images(inputs.text("images")?)?;
    Ok(NodeOutput::from_values(vec![
        Value::Image(images),
        Value::Mask(masks),
    ]))
}

fn run_load_mask(_ctx: &mut NodeContext<'_>, inputs: &Inputs) -> Result<NodeOutput> {
    let mask = load_mask(inputs.text("mask")?)?;
    Ok(NodeOutput::from_values(vec![Value::Mask(mask)]))
}

fn run_send_images(ctx: &mut NodeContext<'_>, inputs: &Inputs) -> Result<NodeOutput> {
    let images = inputs.image("images")?;
    let records = send_images(images, ctx.preview()?)?;
    Ok(NodeOutput::from_previews(records))
}

fn run_crop(_ctx: &mut NodeContext<'_>, inputs: &Inputs) -> Result<NodeOutput> {
    let image = inputs.image("image")?;
    let x = coord(inputs, "x")?;
    let y = coord(inputs, "y")?;
    let width = coord(inputs, "width")?;
    let height = coord(inputs, "height")?;
    let out = crop(image, x, y, width, height)?;
    Ok(NodeOutput::from_values(vec![Value::Image(out)]))
}

fn run_apply_mask(_ctx: &mut NodeContext<'_>, inputs: &Inputs) -> Result<NodeOutput> {
    let out = apply_mask(inputs.image("image")?, inputs.mask("mask")?)?;
    Ok(NodeOutput::from_values(vec![Value::Image(out)]))
}

fn coord(inputs: &Inputs, name: &str) -> Result<usize> {
    let value = inputs.int(name)?;
    usize::try_from(value).map_err(|_| Error::InvalidInput {
        name: name.to_string(),
        reason: format!("expected a non-negative integer, got {value}"),
    })
}

#[cfg(test)]
mod tests {
    use ndarray::{Array3, Array4};

    use super::*;

    #[test]
    fn test_registry_covers_all_nodes() {
        let names: Vec<_> = registry().iter().map(|spec| spec.name).collect();
        assert_eq!(
            names,
            [
                "load_image_base64",
                "load_images_base64",
                "load_mask_base64",
                "send_image_preview",
                "crop_image",
                "apply_mask_to_image",
            ]
        );
        assert!(registry().iter().all(|spec| spec.category == CATEGORY));
    }

    #[test]
    fn test_only_preview_is_output_node() {
        for spec in registry() {
            assert_eq!(spec.output_node, spec.name == "send_image_preview");
        }
    }

    #[test]
    fn test_missing_input() {
        let inputs = Inputs::new();
        let err = inputs.text("image").unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_wrong_input_kind() {
        let mut inputs = Inputs::new();
        inputs.set("image", Value::Int(3));
        let err = inputs.image("image").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput { reason, .. } if reason == "expected IMAGE, got INT"
        ));
    }

    #[test]
    fn test_crop_node_invocation() {
        let spec = registry()
            .into_iter()
            .find(|spec| spec.name == "crop_image")
            .unwrap();

        let mut inputs = Inputs::new();
        inputs
            .set("image", Value::Image(Array4::zeros((1, 8, 8, 3))))
            .set("x", Value::Int(2))
            .set("y", Value::Int(2))
            .set("width", Value::Int(4))
            .set("height", Value::Int(4));

        let out = (spec.run)(&mut NodeContext::new(), &inputs).unwrap();
        assert_eq!(out.values.len(), 1);
        match &out.values[0] {
            Value::Image(image) => assert_eq!(image.shape(), &[1, 4, 4, 3]),
            other => panic!("expected image output, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_negative_coordinate_rejected() {
        let spec = registry()
            .into_iter()
            .find(|spec| spec.name == "crop_image")
            .unwrap();

        let mut inputs = Inputs::new();
        inputs
            .set("image", Value::Image(Array4::zeros((1, 8, 8, 3))))
            .set("x", Value::Int(-1))
            .set("y", Value::Int(0))
            .set("width", Value::Int(4))
            .set("height", Value::Int(4));

        let err = (spec.run)(&mut NodeContext::new(), &inputs).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_preview_node_without_transport() {
        let spec = registry()
            .into_iter()
            .find(|spec| spec.name == "send_image_preview")
            .unwrap();

        let mut inputs = Inputs::new();
        inputs.set("images", Value::Image(Array4::zeros((1, 2, 2, 3))));

        let err = (spec.run)(&mut NodeContext::new(), &inputs).unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }

    #[test]
    fn test_apply_mask_node_invocation() {
        let spec = registry()
            .into_iter()
            .find(|spec| spec.name == "apply_mask_to_image")
            .unwrap();

        let mut inputs = Inputs::new();
        inputs
            .set("image", Value::Image(Array4::zeros((1, 4, 4, 3))))
            .set("mask", Value::Mask(Array3::zeros((1, 4, 4))));

        let out = (spec.run)(&mut NodeContext::new(), &inputs).unwrap();
        match &out.values[0] {
            Value::Image(image) => assert_eq!(image.shape(), &[1, 4, 4, 4]),
            other => panic!("expected image output, got {:?}", other.kind()),
        }
    }
}
