//! FILENAME: frame/src/lib.rs
//! PURPOSE: Main library entry point for the frame data model.
//! CONTEXT: Re-exports the shared columnar types used by the partition and
//! reshape crates.

pub mod field;
pub mod frame;
pub mod labels;

// Re-export commonly used types at the crate root
pub use field::{Field, FieldOrigin, FieldType, FieldValue, OrderedFloat};
pub use frame::{Frame, FrameError, FrameMeta, FrameType};
pub use labels::Labels;
