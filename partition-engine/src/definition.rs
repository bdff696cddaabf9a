//! FILENAME: partition-engine/src/definition.rs
//! Partition configuration - the serializable options layer.
//!
//! This module contains all the types needed to DESCRIBE a frame split.
//! These structures are designed to be:
//! - Serializable (for saving/loading transform pipelines)
//! - Immutable snapshots of user intent

use serde::{Deserialize, Serialize};

// ============================================================================
// FIELD SELECTION
// ============================================================================

/// Selects the discriminator fields within a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSelector {
    /// Match fields by exact name.
    Names(Vec<String>),

    /// Match fields whose name matches a regular expression.
    /// An invalid pattern matches nothing.
    Pattern(String),
}

impl Default for FieldSelector {
    fn default() -> Self {
        FieldSelector::Names(Vec::new())
    }
}

// ============================================================================
// NAMING POLICY
// ============================================================================

/// Naming/labeling policy for partitioned output frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingOptions {
    /// Keep the input frame's name and attach each discriminator's
    /// stringified value as a label on the remaining value fields.
    #[serde(default = "default_as_labels")]
    pub as_labels: bool,

    /// Prefix the built frame name with the input frame's original name.
    #[serde(default)]
    pub append: bool,

    /// Include the discriminator field name in each name part
    /// ("name<separator1>value" instead of just the value).
    #[serde(default)]
    pub with_names: bool,

    /// Separator between a discriminator name and its value.
    #[serde(default = "default_separator1")]
    pub separator1: String,

    /// Separator between the per-discriminator name parts.
    #[serde(default = "default_separator2")]
    pub separator2: String,
}

fn default_as_labels() -> bool {
    true
}

fn default_separator1() -> String {
    "=".to_string()
}

fn default_separator2() -> String {
    " ".to_string()
}

impl Default for NamingOptions {
    fn default() -> Self {
        NamingOptions {
            as_labels: default_as_labels(),
            append: false,
            with_names: false,
            separator1: default_separator1(),
            separator2: default_separator2(),
        }
    }
}

// ============================================================================
// PARTITION OPTIONS
// ============================================================================

/// Options for `partition_by_values`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionOptions {
    /// The discriminator fields. Resolving to zero fields makes the
    /// partitioner a no-op passthrough.
    #[serde(default)]
    pub fields: FieldSelector,

    #[serde(default)]
    pub naming: NamingOptions,

    /// Retain the (sliced) discriminator columns in each output frame
    /// instead of dropping them.
    #[serde(default)]
    pub keep_fields: bool,
}
