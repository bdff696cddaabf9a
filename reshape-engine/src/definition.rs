//! FILENAME: reshape-engine/src/definition.rs
//! Reshaper configuration - the serializable options layer.

use serde::{Deserialize, Serialize};

/// Target layout for `prepare_time_series`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSeriesFormat {
    /// One shared time column plus many value columns.
    Wide,

    /// One row per (time, dimension-combination); dimensions as columns.
    Long,

    /// Many two-column (time, value) frames; dimensions demoted to labels.
    /// Also accepts the deprecated wire name "many".
    #[serde(alias = "many")]
    Multi,
}

impl Default for TimeSeriesFormat {
    fn default() -> Self {
        TimeSeriesFormat::Wide
    }
}

/// Options for the time-series reshaper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReshapeOptions {
    #[serde(default)]
    pub format: TimeSeriesFormat,
}
