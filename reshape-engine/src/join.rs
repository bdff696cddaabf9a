//! FILENAME: reshape-engine/src/join.rs
//! Time-ordered outer join used to build the Wide layout.
//!
//! Joins any number of frames on their first Time field into a single frame
//! with one shared ascending time column. Every output field records which
//! input frame/field contributed it, so downstream consumers can map columns
//! back to their origin.

use std::collections::HashMap;

use frame::{Field, FieldOrigin, FieldType, FieldValue, Frame, FrameMeta, Labels};

/// Outer-joins the given frames on their first Time field.
///
/// Frames without a time field are excluded; returns `None` when nothing is
/// joinable. Rows whose time cell is unset are dropped. When several rows of
/// one frame share a time value, the last one wins. Value-typed fields that
/// collide on their `(name, labels)` identity across inputs share one output
/// column: later contributors overwrite the cells where they have data, the
/// recorded origin stays with the first contributor.
pub fn outer_join_on_time(frames: &[Frame]) -> Option<Frame> {
    // Joinable inputs, time-sorted, with their index into `frames` kept for
    // provenance.
    let mut inputs: Vec<(usize, Frame, usize)> = Vec::new();
    for (frame_index, frame) in frames.iter().enumerate() {
        match frame.first_time_field() {
            Some((time_index, _)) => {
                let sorted = if frame.is_sorted_by_time() {
                    frame.clone()
                } else {
                    frame.slice_rows(&frame.sorted_row_order())
                };
                inputs.push((frame_index, sorted, time_index));
            }
            None => {
                log::debug!(
                    "frame {:?} has no time field; excluded from join",
                    frame.name
                );
            }
        }
    }

    if inputs.is_empty() {
        return None;
    }

    // A single joinable frame already is the wide result once time-sorted.
    if inputs.len() == 1 {
        let (frame_index, mut only, _) = inputs.remove(0);
        for (field_index, field) in only.fields.iter_mut().enumerate() {
            field.origin = Some(FieldOrigin {
                frame_index,
                field_index,
            });
        }
        return Some(only);
    }

    // Union of all time values, ascending.
    let mut times: Vec<i64> = inputs
        .iter()
        .flat_map(|(_, frame, time_index)| {
            frame.fields[*time_index]
                .values
                .iter()
                .filter_map(FieldValue::as_time)
        })
        .collect();
    times.sort_unstable();
    times.dedup();

    // Per input: output row -> source row. Inputs are ascending, so a single
    // forward cursor suffices; later duplicates of a time value overwrite
    // earlier ones.
    let mut row_maps: Vec<Vec<Option<usize>>> = Vec::with_capacity(inputs.len());
    for (_, frame, time_index) in &inputs {
        let mut map = vec![None; times.len()];
        let mut cursor = 0;
        for (row, value) in frame.fields[*time_index].values.iter().enumerate() {
            let Some(time) = value.as_time() else {
                continue;
            };
            while cursor < times.len() && times[cursor] < time {
                cursor += 1;
            }
            if cursor < times.len() && times[cursor] == time {
                map[cursor] = Some(row);
            }
        }
        row_maps.push(map);
    }

    // The shared time column takes its name/config from the first input.
    let (first_index, first_frame, first_time) = &inputs[0];
    let time_template = &first_frame.fields[*first_time];
    let mut out_fields: Vec<Field> = vec![Field {
        name: time_template.name.clone(),
        field_type: FieldType::Time,
        values: times.iter().map(|&t| FieldValue::Time(t)).collect(),
        config: time_template.config.clone(),
        labels: Labels::new(),
        origin: Some(FieldOrigin {
            frame_index: *first_index,
            field_index: *first_time,
        }),
    }];

    // One output column per distinct (name, labels) value identity.
    let mut identity_to_column: HashMap<(String, String), usize> = HashMap::new();

    for (input_pos, (frame_index, frame, time_index)) in inputs.iter().enumerate() {
        for (field_index, field) in frame.fields.iter().enumerate() {
            if field_index == *time_index {
                continue;
            }

            let gathered: Vec<FieldValue> = row_maps[input_pos]
                .iter()
                .map(|source| match source {
                    Some(row) => field.values[*row].clone(),
                    None => FieldValue::Empty,
                })
                .collect();

            if field.field_type.is_value_type() {
                let identity = (field.name.clone(), field.labels.key());
                if let Some(&column) = identity_to_column.get(&identity) {
                    log::warn!(
                        "joined fields collide on identity '{}' {}; later values win",
                        field.name,
                        field.labels
                    );
                    let existing = &mut out_fields[column];
                    for (row, value) in gathered.into_iter().enumerate() {
                        if !value.is_empty() {
                            existing.values[row] = value;
                        }
                    }
                    continue;
                }
                identity_to_column.insert(identity, out_fields.len());
            }

            out_fields.push(Field {
                name: field.name.clone(),
                field_type: field.field_type,
                values: gathered,
                config: field.config.clone(),
                labels: field.labels.clone(),
                origin: Some(FieldOrigin {
                    frame_index: *frame_index,
                    field_index,
                }),
            });
        }
    }

    Some(Frame {
        name: None,
        ref_id: None,
        fields: out_fields,
        meta: FrameMeta::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_series(name: &str, times: Vec<i64>, values: Vec<f64>) -> Frame {
        Frame::new(
            Some(name.to_string()),
            vec![
                Field::time("time".to_string(), times),
                Field::number(name.to_string(), values),
            ],
        )
    }

    #[test]
    fn test_join_aligns_on_shared_times() {
        let a = create_series("a", vec![1, 3], vec![1.0, 3.0]);
        let b = create_series("b", vec![2, 3], vec![20.0, 30.0]);

        let joined = outer_join_on_time(&[a, b]).unwrap();

        assert_eq!(joined.field_count(), 3);
        let times: Vec<i64> = joined.fields[0]
            .values
            .iter()
            .filter_map(FieldValue::as_time)
            .collect();
        assert_eq!(times, vec![1, 2, 3]);

        assert_eq!(
            joined.fields[1].values,
            vec![
                FieldValue::number(1.0),
                FieldValue::Empty,
                FieldValue::number(3.0),
            ]
        );
        assert_eq!(
            joined.fields[2].values,
            vec![
                FieldValue::Empty,
                FieldValue::number(20.0),
                FieldValue::number(30.0),
            ]
        );
    }

    #[test]
    fn test_join_records_provenance() {
        let a = create_series("a", vec![1], vec![1.0]);
        let b = create_series("b", vec![1], vec![2.0]);

        let joined = outer_join_on_time(&[a, b]).unwrap();

        assert_eq!(
            joined.fields[1].origin,
            Some(FieldOrigin {
                frame_index: 0,
                field_index: 1,
            })
        );
        assert_eq!(
            joined.fields[2].origin,
            Some(FieldOrigin {
                frame_index: 1,
                field_index: 1,
            })
        );
    }

    #[test]
    fn test_join_sorts_unsorted_inputs() {
        let a = create_series("a", vec![3, 1], vec![3.0, 1.0]);
        let b = create_series("b", vec![2], vec![2.0]);

        let joined = outer_join_on_time(&[a, b]).unwrap();

        let times: Vec<i64> = joined.fields[0]
            .values
            .iter()
            .filter_map(FieldValue::as_time)
            .collect();
        assert_eq!(times, vec![1, 2, 3]);
        assert_eq!(joined.fields[1].values[0], FieldValue::number(1.0));
        assert_eq!(joined.fields[1].values[2], FieldValue::number(3.0));
    }

    #[test]
    fn test_join_single_frame_passes_through_sorted() {
        let frame = create_series("a", vec![2, 1], vec![2.0, 1.0]);

        let joined = outer_join_on_time(&[frame]).unwrap();

        assert_eq!(joined.name.as_deref(), Some("a"));
        assert!(joined.is_sorted_by_time());
        assert!(joined.fields.iter().all(|f| f.origin.is_some()));
    }

    #[test]
    fn test_join_excludes_frames_without_time() {
        let a = create_series("a", vec![1], vec![1.0]);
        let no_time = Frame::new(
            Some("bare".to_string()),
            vec![Field::number("x".to_string(), vec![9.0])],
        );

        let joined = outer_join_on_time(&[no_time.clone(), a]).unwrap();
        assert_eq!(joined.field_count(), 2);

        assert!(outer_join_on_time(&[no_time]).is_none());
        assert!(outer_join_on_time(&[]).is_none());
    }

    #[test]
    fn test_join_identity_collision_last_wins() {
        let a = create_series("value", vec![1, 2], vec![1.0, 2.0]);
        let mut b = create_series("value", vec![2, 3], vec![20.0, 30.0]);
        b.name = Some("other".to_string());

        let joined = outer_join_on_time(&[a, b]).unwrap();

        // One shared column; rows where the second frame has data win.
        assert_eq!(joined.field_count(), 2);
        assert_eq!(
            joined.fields[1].values,
            vec![
                FieldValue::number(1.0),
                FieldValue::number(20.0),
                FieldValue::number(30.0),
            ]
        );
        // The origin back-reference stays with the first contributor.
        assert_eq!(
            joined.fields[1].origin,
            Some(FieldOrigin {
                frame_index: 0,
                field_index: 1,
            })
        );
    }

    #[test]
    fn test_join_duplicate_times_last_row_wins() {
        let a = Frame::new(
            Some("a".to_string()),
            vec![
                Field::time("time".to_string(), vec![1, 1, 2]),
                Field::number("a".to_string(), vec![10.0, 11.0, 12.0]),
            ],
        );
        let b = create_series("b", vec![1], vec![1.0]);

        let joined = outer_join_on_time(&[a, b]).unwrap();

        let times: Vec<i64> = joined.fields[0]
            .values
            .iter()
            .filter_map(FieldValue::as_time)
            .collect();
        assert_eq!(times, vec![1, 2]);
        assert_eq!(joined.fields[1].values[0], FieldValue::number(11.0));
    }
}
