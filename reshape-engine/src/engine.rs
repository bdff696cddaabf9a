//! FILENAME: reshape-engine/src/engine.rs
//! Time-series reshaper - converts frames between Wide, Long, and Multi.
//!
//! Each conversion is a pure function that re-derives the target layout from
//! scratch; input frames are never mutated and every output frame is freshly
//! allocated.
//!
//! Layout rules:
//! - Long: the first Time field is *the* time field; String/Boolean fields
//!   are row-level factors; everything else is a value field, grouped into
//!   label-groups by its (name, labels) identity.
//! - Multi: one two-column (time, value) frame per value field per distinct
//!   factor combination, with the combination demoted to labels.
//! - Wide: frames tagged Long are decomposed on String factors only, then
//!   everything is outer-joined on time.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use frame::{Field, FieldType, FieldValue, Frame, FrameMeta, FrameType, Labels};
use partition_engine::partition;

use crate::definition::{ReshapeOptions, TimeSeriesFormat};
use crate::join::outer_join_on_time;

/// Converts the given frames to the target layout.
pub fn prepare_time_series(frames: &[Frame], options: &ReshapeOptions) -> Vec<Frame> {
    match options.format {
        TimeSeriesFormat::Wide => to_time_series_wide(frames),
        TimeSeriesFormat::Long => to_time_series_long(frames),
        TimeSeriesFormat::Multi => to_time_series_multi(frames),
    }
}

fn tagged_meta(frame: &Frame, frame_type: FrameType) -> FrameMeta {
    FrameMeta {
        frame_type: Some(frame_type),
        custom: frame.meta.custom.clone(),
    }
}

// ============================================================================
// LONG CONVERSION
// ============================================================================

/// One label-group: the value fields sharing a labels identity.
struct LabelGroup<'a> {
    labels: &'a Labels,

    /// Value name -> wide field index within this group (last wins).
    fields: HashMap<String, usize>,
}

/// Classification of one frame's fields for the long conversion.
struct LongLayout<'a> {
    time_index: usize,

    /// Factor name -> wide field index (first wins).
    factors: BTreeMap<String, usize>,

    /// Value name -> wide field index of the first field seen with that name
    /// (its type and config carry over to the long column).
    value_fields: BTreeMap<String, usize>,

    /// Stable labels key -> label-group, iterated in sorted key order.
    label_groups: BTreeMap<String, LabelGroup<'a>>,

    /// Union of label keys across all value fields.
    label_keys: BTreeSet<String>,
}

fn classify_long(frame: &Frame) -> Option<LongLayout<'_>> {
    let mut time_index = None;
    let mut factors = BTreeMap::new();
    let mut value_fields = BTreeMap::new();
    let mut label_groups: BTreeMap<String, LabelGroup> = BTreeMap::new();
    let mut label_keys = BTreeSet::new();

    for (index, field) in frame.fields.iter().enumerate() {
        match field.field_type {
            FieldType::String | FieldType::Boolean => {
                factors.entry(field.name.clone()).or_insert(index);
            }
            FieldType::Time if time_index.is_none() => {
                time_index = Some(index);
            }
            // Everything else (including any further Time fields) is a value
            // field, keyed into label-groups by its labels identity.
            _ => {
                value_fields.entry(field.name.clone()).or_insert(index);
                let group = label_groups
                    .entry(field.labels.key())
                    .or_insert_with(|| LabelGroup {
                        labels: &field.labels,
                        fields: HashMap::new(),
                    });
                group.fields.insert(field.name.clone(), index);
                for key in field.labels.keys() {
                    label_keys.insert(key.clone());
                }
            }
        }
    }

    time_index.map(|time_index| LongLayout {
        time_index,
        factors,
        value_fields,
        label_groups,
        label_keys,
    })
}

/// Converts one frame to the long layout. Returns `None` when the frame has
/// no time field to classify against.
fn long_frame(frame: &Frame) -> Option<Frame> {
    // Degenerate frames pass through untouched.
    if frame.fields.is_empty() || frame.row_count() == 0 {
        return Some(frame.clone());
    }

    let layout = match classify_long(frame) {
        Some(layout) => layout,
        None => {
            log::debug!(
                "frame {:?} has no time field; dropped from long conversion",
                frame.name
            );
            return None;
        }
    };

    let time_field = &frame.fields[layout.time_index];
    let order = frame.sorted_row_order();
    let capacity = order.len() * layout.label_groups.len();

    let mut time_values: Vec<FieldValue> = Vec::with_capacity(capacity);
    let mut value_columns: Vec<(&String, usize, Vec<FieldValue>)> = layout
        .value_fields
        .iter()
        .map(|(name, &index)| (name, index, Vec::with_capacity(capacity)))
        .collect();
    let mut label_columns: Vec<(&String, Vec<FieldValue>)> = layout
        .label_keys
        .iter()
        .map(|key| (key, Vec::with_capacity(capacity)))
        .collect();
    let mut factor_columns: Vec<(&String, usize, Vec<FieldValue>)> = layout
        .factors
        .iter()
        .map(|(name, &index)| (name, index, Vec::with_capacity(capacity)))
        .collect();

    // One output row per (source row, label-group) pair: rows in stable
    // ascending time order, label-groups in sorted key order.
    for &row in &order {
        for group in layout.label_groups.values() {
            time_values.push(time_field.values[row].clone());

            for (name, _, values) in value_columns.iter_mut() {
                let value = group
                    .fields
                    .get(name.as_str())
                    .map(|&index| frame.fields[index].values[row].clone())
                    .unwrap_or(FieldValue::Empty);
                values.push(value);
            }

            for (key, values) in label_columns.iter_mut() {
                values.push(match group.labels.get(key.as_str()) {
                    Some(value) => FieldValue::Text(value.to_string()),
                    None => FieldValue::Empty,
                });
            }

            for (_, index, values) in factor_columns.iter_mut() {
                values.push(frame.fields[*index].values[row].clone());
            }
        }
    }

    let mut fields =
        Vec::with_capacity(1 + value_columns.len() + label_columns.len() + factor_columns.len());
    fields.push(Field {
        name: time_field.name.clone(),
        field_type: FieldType::Time,
        values: time_values,
        config: time_field.config.clone(),
        labels: Labels::new(),
        origin: None,
    });
    for (name, index, values) in value_columns {
        let source = &frame.fields[index];
        fields.push(Field {
            name: name.clone(),
            field_type: source.field_type,
            values,
            config: source.config.clone(),
            labels: Labels::new(),
            origin: None,
        });
    }
    for (key, values) in label_columns {
        fields.push(Field {
            name: key.clone(),
            field_type: FieldType::String,
            values,
            config: None,
            labels: Labels::new(),
            origin: None,
        });
    }
    for (name, index, values) in factor_columns {
        let source = &frame.fields[index];
        fields.push(Field {
            name: name.clone(),
            field_type: source.field_type,
            values,
            config: source.config.clone(),
            labels: Labels::new(),
            origin: None,
        });
    }

    Some(Frame {
        name: frame.name.clone(),
        ref_id: frame.ref_id.clone(),
        fields,
        meta: tagged_meta(frame, FrameType::TimeSeriesLong),
    })
}

/// Converts every input frame to the long layout. Frames without a time
/// field are silently excluded.
pub fn to_time_series_long(frames: &[Frame]) -> Vec<Frame> {
    frames.iter().filter_map(long_frame).collect()
}

// ============================================================================
// MULTI CONVERSION
// ============================================================================

/// Which column types act as row-level dimensions when splitting a long
/// frame into two-column series.
#[derive(Clone, Copy)]
enum FactorSet {
    /// String and Boolean columns (the full Multi conversion).
    StringsAndBooleans,

    /// String columns only; Booleans stay value fields (the restricted
    /// split used when building Wide).
    StringsOnly,
}

fn is_factor(field_type: FieldType, set: FactorSet) -> bool {
    match set {
        FactorSet::StringsAndBooleans => {
            matches!(field_type, FieldType::String | FieldType::Boolean)
        }
        FactorSet::StringsOnly => field_type == FieldType::String,
    }
}

/// Splits a long-shaped frame into two-column (time, value) frames, one per
/// value field per distinct factor combination. The factor combination is
/// attached as the value field's labels; rows whose time or value cell is
/// unset are skipped.
fn split_long_frame(frame: &Frame, set: FactorSet) -> Vec<Frame> {
    let Some((time_index, time_field)) = frame.first_time_field() else {
        log::debug!(
            "frame {:?} has no time field; dropped from multi split",
            frame.name
        );
        return Vec::new();
    };

    let factor_indices: Vec<usize> = frame
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| is_factor(field.field_type, set))
        .map(|(index, _)| index)
        .collect();
    let value_indices: Vec<usize> = frame
        .fields
        .iter()
        .enumerate()
        .filter(|(index, field)| *index != time_index && !is_factor(field.field_type, set))
        .map(|(index, _)| index)
        .collect();

    let mut result = Vec::new();

    if factor_indices.is_empty() {
        for &value_index in &value_indices {
            let value_field = &frame.fields[value_index];
            result.push(Frame {
                name: frame.name.clone(),
                ref_id: frame.ref_id.clone(),
                fields: vec![
                    Field {
                        name: time_field.name.clone(),
                        field_type: FieldType::Time,
                        values: time_field.values.clone(),
                        config: time_field.config.clone(),
                        labels: Labels::new(),
                        origin: None,
                    },
                    Field {
                        name: value_field.name.clone(),
                        field_type: value_field.field_type,
                        values: value_field.values.clone(),
                        config: value_field.config.clone(),
                        labels: value_field.labels.clone(),
                        origin: None,
                    },
                ],
                meta: tagged_meta(frame, FrameType::TimeSeriesMulti),
            });
        }
        return result;
    }

    let key_columns: Vec<&[FieldValue]> = factor_indices
        .iter()
        .map(|&index| frame.fields[index].values.as_slice())
        .collect();
    let groups = match partition(&key_columns) {
        Ok(groups) => groups,
        Err(err) => {
            log::warn!("row partition of frame {:?} failed: {}", frame.name, err);
            return Vec::new();
        }
    };

    for &value_index in &value_indices {
        let value_field = &frame.fields[value_index];

        for rows in &groups {
            let first_row = rows[0];

            let mut labels = value_field.labels.clone();
            for &factor_index in &factor_indices {
                let factor = &frame.fields[factor_index];
                let value = &factor.values[first_row];
                if !value.is_empty() {
                    labels.insert(factor.name.clone(), value.display_value());
                }
            }

            let mut times = Vec::with_capacity(rows.len());
            let mut values = Vec::with_capacity(rows.len());
            for &row in rows {
                let time = &time_field.values[row];
                let value = &value_field.values[row];
                // Unset cells are leftovers of the long step's cross-product.
                if time.is_empty() || value.is_empty() {
                    continue;
                }
                times.push(time.clone());
                values.push(value.clone());
            }
            if times.is_empty() {
                continue;
            }

            result.push(Frame {
                name: frame.name.clone(),
                ref_id: frame.ref_id.clone(),
                fields: vec![
                    Field {
                        name: time_field.name.clone(),
                        field_type: FieldType::Time,
                        values: times,
                        config: time_field.config.clone(),
                        labels: Labels::new(),
                        origin: None,
                    },
                    Field {
                        name: value_field.name.clone(),
                        field_type: value_field.field_type,
                        values,
                        config: value_field.config.clone(),
                        labels,
                        origin: None,
                    },
                ],
                meta: tagged_meta(frame, FrameType::TimeSeriesMulti),
            });
        }
    }

    result
}

/// Converts every input frame to the multi layout: long-convert first, then
/// split each long frame into two-column series.
pub fn to_time_series_multi(frames: &[Frame]) -> Vec<Frame> {
    let mut result = Vec::new();
    for long in to_time_series_long(frames) {
        if long.fields.is_empty() || long.row_count() == 0 {
            result.push(long);
            continue;
        }
        result.extend(split_long_frame(&long, FactorSet::StringsAndBooleans));
    }
    result
}

// ============================================================================
// WIDE CONVERSION
// ============================================================================

/// Converts the input frames to a single wide frame: frames tagged Long are
/// decomposed on their String factors, then everything is outer-joined on
/// time. Returns an empty result when no frame has a time field.
pub fn to_time_series_wide(frames: &[Frame]) -> Vec<Frame> {
    let mut joinable = Vec::new();
    for frame in frames {
        if frame.meta.frame_type == Some(FrameType::TimeSeriesLong) {
            joinable.extend(split_long_frame(frame, FactorSet::StringsOnly));
        } else {
            joinable.push(frame.clone());
        }
    }

    match outer_join_on_time(&joinable) {
        Some(mut joined) => {
            joined.meta.frame_type = Some(FrameType::TimeSeriesWide);
            vec![joined]
        }
        None => Vec::new(),
    }
}
