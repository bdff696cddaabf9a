//! FILENAME: frame/src/frame.rs
//! PURPOSE: The columnar frame container and its metadata.
//! CONTEXT: A Frame is an ordered list of Fields sharing a common row count,
//! plus naming and layout metadata. Frames are the sole boundary contract of
//! the reshaping core: callers supply them in memory and receive freshly
//! allocated ones back.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{Field, FieldType, FieldValue};

/// Layout tag identifying the current shape of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    /// One shared time column plus many value columns, one row per time point.
    TimeSeriesWide,
    /// One row per (time, dimension-combination); dimensions as columns.
    TimeSeriesLong,
    /// Many two-column (time, value) frames, dimensions demoted to labels.
    TimeSeriesMulti,
}

/// Free-form frame annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMeta {
    /// Tag identifying the frame's current layout, set by the reshaper.
    #[serde(default)]
    pub frame_type: Option<FrameType>,

    /// Additional annotations, opaque to the reshaping core.
    #[serde(default)]
    pub custom: Option<serde_json::Value>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("field '{field}' has {actual} values, expected {expected}")]
    FieldLengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate field identity: '{name}' with labels {labels}")]
    DuplicateFieldIdentity { name: String, labels: String },
}

/// An ordered list of fields sharing a common row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: Option<String>,

    /// Identifier of the source query that produced this frame, if any.
    pub ref_id: Option<String>,

    pub fields: Vec<Field>,

    #[serde(default)]
    pub meta: FrameMeta,
}

impl Frame {
    pub fn new(name: Option<String>, fields: Vec<Field>) -> Self {
        Frame {
            name,
            ref_id: None,
            fields,
            meta: FrameMeta::default(),
        }
    }

    /// The shared row count, taken from the first field.
    pub fn row_count(&self) -> usize {
        self.fields.first().map(Field::len).unwrap_or(0)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The first Time-typed field, with its index. This is *the* time field
    /// for every reshaping operation.
    pub fn first_time_field(&self) -> Option<(usize, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.field_type == FieldType::Time)
    }

    /// Checks the two frame invariants: every field holds `row_count` values,
    /// and no two value-typed fields share the same `(name, labels)` identity.
    pub fn validate(&self) -> Result<(), FrameError> {
        let expected = self.row_count();
        for field in &self.fields {
            if field.len() != expected {
                return Err(FrameError::FieldLengthMismatch {
                    field: field.name.clone(),
                    expected,
                    actual: field.len(),
                });
            }
        }

        let mut identities = HashSet::new();
        for field in &self.fields {
            if !field.field_type.is_value_type() {
                continue;
            }
            let identity = (field.name.clone(), field.labels.key());
            if !identities.insert(identity) {
                return Err(FrameError::DuplicateFieldIdentity {
                    name: field.name.clone(),
                    labels: field.labels.key(),
                });
            }
        }

        Ok(())
    }

    /// Builds a fresh frame containing only the given rows, in the given
    /// order. Field names, types, configs, and labels are preserved.
    pub fn slice_rows(&self, rows: &[usize]) -> Frame {
        let fields = self
            .fields
            .iter()
            .map(|field| Field {
                name: field.name.clone(),
                field_type: field.field_type,
                values: rows.iter().map(|&r| field.values[r].clone()).collect(),
                config: field.config.clone(),
                labels: field.labels.clone(),
                origin: field.origin,
            })
            .collect();

        Frame {
            name: self.name.clone(),
            ref_id: self.ref_id.clone(),
            fields,
            meta: self.meta.clone(),
        }
    }

    /// Row indices in stable ascending order of the first time field's
    /// values. Identity order when the frame has no time field.
    pub fn sorted_row_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.row_count()).collect();
        if let Some((_, time_field)) = self.first_time_field() {
            order.sort_by(|&a, &b| {
                FieldValue::compare(&time_field.values[a], &time_field.values[b])
            });
        }
        order
    }

    /// Whether the first time field's values are already ascending.
    /// Frames without a time field count as sorted.
    pub fn is_sorted_by_time(&self) -> bool {
        match self.first_time_field() {
            Some((_, time_field)) => time_field
                .values
                .windows(2)
                .all(|w| FieldValue::compare(&w[0], &w[1]) != std::cmp::Ordering::Greater),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Labels;

    fn create_test_frame() -> Frame {
        Frame::new(
            Some("metrics".to_string()),
            vec![
                Field::time("time".to_string(), vec![300, 100, 200]),
                Field::number("value".to_string(), vec![3.0, 1.0, 2.0]),
                Field::string(
                    "region".to_string(),
                    vec!["EU".to_string(), "US".to_string(), "EU".to_string()],
                ),
            ],
        )
    }

    #[test]
    fn test_row_count_and_lookup() {
        let frame = create_test_frame();
        assert_eq!(frame.row_count(), 3);
        assert_eq!(frame.field_count(), 3);
        assert!(frame.field_by_name("region").is_some());
        assert!(frame.field_by_name("missing").is_none());

        let (index, time_field) = frame.first_time_field().unwrap();
        assert_eq!(index, 0);
        assert_eq!(time_field.name, "time");
    }

    #[test]
    fn test_validate_accepts_well_formed_frame() {
        assert_eq!(create_test_frame().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_ragged_fields() {
        let mut frame = create_test_frame();
        frame.fields[1].values.pop();

        assert_eq!(
            frame.validate(),
            Err(FrameError::FieldLengthMismatch {
                field: "value".to_string(),
                expected: 3,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_identity() {
        let mut frame = create_test_frame();
        frame
            .fields
            .push(Field::number("value".to_string(), vec![0.0, 0.0, 0.0]));

        assert!(matches!(
            frame.validate(),
            Err(FrameError::DuplicateFieldIdentity { .. })
        ));
    }

    #[test]
    fn test_same_name_different_labels_is_valid() {
        let mut frame = create_test_frame();
        frame.fields.push(
            Field::number("value".to_string(), vec![0.0, 0.0, 0.0])
                .with_labels(Labels::from_pairs(&[("host", "web-1")])),
        );

        assert_eq!(frame.validate(), Ok(()));
    }

    #[test]
    fn test_sorted_row_order() {
        let frame = create_test_frame();
        assert_eq!(frame.sorted_row_order(), vec![1, 2, 0]);
        assert!(!frame.is_sorted_by_time());

        let sorted = frame.slice_rows(&frame.sorted_row_order());
        assert!(sorted.is_sorted_by_time());
        assert_eq!(sorted.fields[1].values[0].as_f64(), Some(1.0));
    }

    #[test]
    fn test_slice_rows_preserves_metadata() {
        let mut frame = create_test_frame();
        frame.meta.frame_type = Some(FrameType::TimeSeriesWide);

        let sliced = frame.slice_rows(&[2, 0]);
        assert_eq!(sliced.row_count(), 2);
        assert_eq!(sliced.name.as_deref(), Some("metrics"));
        assert_eq!(sliced.meta.frame_type, Some(FrameType::TimeSeriesWide));
        assert_eq!(sliced.fields[0].values[0].as_time(), Some(200));
        assert_eq!(sliced.fields[2].values[1], FieldValue::Text("EU".to_string()));
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::new(None, Vec::new());
        assert_eq!(frame.row_count(), 0);
        assert_eq!(frame.validate(), Ok(()));
        assert!(frame.first_time_field().is_none());
        assert!(frame.is_sorted_by_time());
    }
}
