//! FILENAME: partition-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PartitionError {
    #[error("partition requires at least one key column")]
    NoKeyColumns,

    #[error("key column {index} has {actual} values, expected {expected}")]
    KeyColumnLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
