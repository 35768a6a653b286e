//! Idiomatic Rust representations of the primitives of a music notation graph: the objects found
//! on a page by an OMR pipeline, their bounding boxes and the edges between them.

#![deny(clippy::all)]

mod bbox;
pub mod graph;
mod index;
mod object;

// Re-export useful data types into the top level of the crate
pub use bbox::BoundingBox;
pub use graph::{EdgeSide, GraphError, NotationGraph};
pub use index::ObjectIndex;
pub use object::{DetectedObject, ObjId};
