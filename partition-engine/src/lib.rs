//! FILENAME: partition-engine/src/lib.rs
//! Partition subsystem for the frame workspace.
//!
//! This crate provides the order-preserving multi-key grouping engine and
//! the frame partitioner built on top of it. It depends on `frame` only for
//! the shared columnar types (Frame, Field, FieldValue).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the split IS)
//! - `engine`: Partition engine and frame partitioner (HOW we split)

pub mod definition;
pub mod engine;
pub mod error;

pub use definition::*;
pub use engine::{partition, partition_by_values, RowIndex};
pub use error::PartitionError;
