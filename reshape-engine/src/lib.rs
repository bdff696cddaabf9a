//! FILENAME: reshape-engine/src/lib.rs
//! Time-series reshaping subsystem for the frame workspace.
//!
//! This crate converts collections of frames between the three canonical
//! time-series layouts. It depends on `partition-engine` for row-level
//! grouping and on `frame` for shared types.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the target layout IS)
//! - `engine`: Layout conversions (HOW we reshape)
//! - `join`: Time-ordered outer join used to build the Wide layout

pub mod definition;
pub mod engine;
pub mod join;

pub use definition::*;
pub use engine::{
    prepare_time_series, to_time_series_long, to_time_series_multi, to_time_series_wide,
};
pub use join::outer_join_on_time;
