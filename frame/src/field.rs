//! FILENAME: frame/src/field.rs
//! PURPOSE: Defines the fundamental data structures for a single frame column.
//! CONTEXT: This file contains the `Field` struct and `FieldValue` enum.
//! It separates a column's role during reshaping (`FieldType`) from its raw
//! values. It is designed to be lightweight as frames may carry dozens of
//! columns over thousands of rows.

use serde::{Deserialize, Serialize};

use crate::labels::Labels;

/// The role a column plays during reshaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Time,
    Number,
    Boolean,
    String,
    Other,
}

impl FieldType {
    /// Value-typed fields are the ones whose `(name, labels)` combination is
    /// their identity within a frame.
    pub fn is_value_type(&self) -> bool {
        matches!(self, FieldType::Number | FieldType::Boolean | FieldType::Other)
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as partition keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A single raw value within a field.
///
/// Time values are epoch milliseconds. Number uses the hashable float wrapper
/// so raw values can key partition tries and group maps directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValue {
    Empty,
    Time(i64),
    Number(OrderedFloat),
    Text(String),
    Boolean(bool),
}

impl FieldValue {
    pub fn number(n: f64) -> Self {
        FieldValue::Number(OrderedFloat(n))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<i64> {
        match self {
            FieldValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns the display form of the value as a String.
    /// This is used for frame naming, labeling, and other features that need
    /// to show a raw value as text.
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Time(t) => format!("{}", t),
            FieldValue::Number(n) => {
                let n = n.as_f64();
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Text(s) => s.clone(),
            FieldValue::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
        }
    }

    /// Total ordering across heterogeneous values: Empty, then Time, then
    /// Number, then Text, then Boolean.
    pub fn compare(a: &FieldValue, b: &FieldValue) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (a, b) {
            (FieldValue::Empty, FieldValue::Empty) => Ordering::Equal,
            (FieldValue::Empty, _) => Ordering::Less,
            (_, FieldValue::Empty) => Ordering::Greater,

            (FieldValue::Time(ta), FieldValue::Time(tb)) => ta.cmp(tb),
            (FieldValue::Time(_), _) => Ordering::Less,
            (_, FieldValue::Time(_)) => Ordering::Greater,

            (FieldValue::Number(na), FieldValue::Number(nb)) => {
                na.as_f64().partial_cmp(&nb.as_f64()).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Number(_), _) => Ordering::Less,
            (_, FieldValue::Number(_)) => Ordering::Greater,

            (FieldValue::Text(ta), FieldValue::Text(tb)) => ta.cmp(tb),
            (FieldValue::Text(_), _) => Ordering::Less,
            (_, FieldValue::Text(_)) => Ordering::Greater,

            (FieldValue::Boolean(ba), FieldValue::Boolean(bb)) => ba.cmp(bb),
        }
    }
}

/// Back-reference recorded by the wide join: which input frame and field
/// contributed an output column. Indices refer to the frame list passed to
/// the join and that frame's field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOrigin {
    pub frame_index: usize,
    pub field_index: usize,
}

/// One column of a frame: name, type, ordered values, optional labels/config.
///
/// `name` is not required to be unique across columns; value-typed fields are
/// identified by their `(name, labels)` combination instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    pub field_type: FieldType,

    /// Raw values, one per frame row.
    pub values: Vec<FieldValue>,

    /// Display metadata, opaque to the reshaping core.
    #[serde(default)]
    pub config: Option<serde_json::Value>,

    /// Key/value annotations distinguishing this field from same-named ones.
    #[serde(default)]
    pub labels: Labels,

    /// Provenance back-reference, populated by the wide join.
    #[serde(default)]
    pub origin: Option<FieldOrigin>,
}

impl Field {
    pub fn new(name: String, field_type: FieldType, values: Vec<FieldValue>) -> Self {
        Field {
            name,
            field_type,
            values,
            config: None,
            labels: Labels::new(),
            origin: None,
        }
    }

    pub fn time(name: String, times: Vec<i64>) -> Self {
        Field::new(
            name,
            FieldType::Time,
            times.into_iter().map(FieldValue::Time).collect(),
        )
    }

    pub fn number(name: String, numbers: Vec<f64>) -> Self {
        Field::new(
            name,
            FieldType::Number,
            numbers.into_iter().map(FieldValue::number).collect(),
        )
    }

    pub fn string(name: String, texts: Vec<String>) -> Self {
        Field::new(
            name,
            FieldType::String,
            texts.into_iter().map(FieldValue::Text).collect(),
        )
    }

    pub fn boolean(name: String, bools: Vec<bool>) -> Self {
        Field::new(
            name,
            FieldType::Boolean,
            bools.into_iter().map(FieldValue::Boolean).collect(),
        )
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value_formats() {
        assert_eq!(FieldValue::number(42.0).display_value(), "42");
        assert_eq!(FieldValue::number(1.5).display_value(), "1.5");
        assert_eq!(FieldValue::Text("EU".to_string()).display_value(), "EU");
        assert_eq!(FieldValue::Boolean(true).display_value(), "TRUE");
        assert_eq!(FieldValue::Boolean(false).display_value(), "FALSE");
        assert_eq!(FieldValue::Empty.display_value(), "");
        assert_eq!(FieldValue::Time(1000).display_value(), "1000");
    }

    #[test]
    fn test_nan_values_are_equal_keys() {
        let a = FieldValue::number(f64::NAN);
        let b = FieldValue::number(f64::NAN);
        assert_eq!(a, b);

        let mut map = std::collections::HashMap::new();
        map.insert(a, 1);
        map.insert(b, 2);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_compare_orders_types() {
        use std::cmp::Ordering;

        let empty = FieldValue::Empty;
        let time = FieldValue::Time(5);
        let number = FieldValue::number(100.0);
        let text = FieldValue::Text("a".to_string());

        assert_eq!(FieldValue::compare(&empty, &time), Ordering::Less);
        assert_eq!(FieldValue::compare(&time, &number), Ordering::Less);
        assert_eq!(FieldValue::compare(&number, &text), Ordering::Less);
        assert_eq!(
            FieldValue::compare(&FieldValue::Time(1), &FieldValue::Time(2)),
            Ordering::Less
        );
    }

    #[test]
    fn test_field_constructors() {
        let field = Field::number("value".to_string(), vec![1.0, 2.0]);
        assert_eq!(field.field_type, FieldType::Number);
        assert_eq!(field.len(), 2);
        assert_eq!(field.values[0].as_f64(), Some(1.0));

        let field = Field::time("time".to_string(), vec![10, 20]);
        assert_eq!(field.values[1].as_time(), Some(20));
    }

    #[test]
    fn test_value_type_classification() {
        assert!(FieldType::Number.is_value_type());
        assert!(FieldType::Boolean.is_value_type());
        assert!(FieldType::Other.is_value_type());
        assert!(!FieldType::Time.is_value_type());
        assert!(!FieldType::String.is_value_type());
    }
}
