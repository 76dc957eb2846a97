//! # tooling-nodes
//!
//! Plugin nodes for a node-based image-processing host. Each node is a
//! stateless transformation over float tensors: decode base64 payloads into
//! normalized image and mask tensors, crop an image batch, composite a mask
//! into an image's alpha channel, or stream preview frames to a connected
//! client over an injected transport.
//!
//! The host runtime owns the execution graph, scheduling, and wire
//! transport; this crate exposes the node functions plus a registration
//! table of their input/output schemas via [`node::registry`].
//!
//! ## Example
//!
//! ```no_run
//! use tooling_nodes::node::{registry, Inputs, NodeContext, Value};
//!
//! # fn main() -> tooling_nodes::Result<()> {
//! let nodes = registry();
//! let crop = nodes.iter().find(|spec| spec.name == "crop_image").unwrap();
//!
//! let mut inputs = Inputs::new();
//! inputs
//!     .set("image", Value::Image(ndarray::Array4::zeros((1, 64, 64, 3))))
//!     .set("x", Value::Int(0))
//!     .set("y", Value::Int(0))
//!     .set("width", Value::Int(32))
//!     .set("height", Value::Int(32));
//!
//! let output = (crop.run)(&mut NodeContext::new(), &inputs)?;
//! # let _ = output;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod node;
pub mod tensor;

pub use error::{Error, Result};
pub use tensor::{ImageTensor, MaskTensor};
