//! FILENAME: partition-engine/src/engine.rs
//! Partition Engine - order-preserving multi-key grouping.
//!
//! Algorithm:
//! 1. Build a depth-K trie over the K key columns, inserting rows in index
//!    order 0..R
//! 2. Traverse the trie depth-first, descending children in creation order
//! 3. Collect the leaf row-index lists; their order is the result order
//!
//! The group order is a depth-first order of the trie, not a sort of the
//! keys: it reproduces the order in which distinct key tuples were first
//! observed at each nesting level.

use frame::{Field, FieldValue, Frame};
use regex::Regex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::definition::{FieldSelector, PartitionOptions};
use crate::error::PartitionError;

/// Index of a row within a frame.
pub type RowIndex = usize;

// ============================================================================
// PARTITION ENGINE
// ============================================================================

/// A node in the key trie, stored in a flat arena.
///
/// Children are deduplicated through the hash map and ordered through the
/// creation-order vector: lookup stays O(1) while traversal reproduces
/// first-encounter order. Rows are only ever attached to depth-K nodes, so a
/// node with no children is a leaf.
#[derive(Debug, Default)]
struct TrieNode {
    children: FxHashMap<FieldValue, usize>,
    child_order: Vec<usize>,
    rows: Vec<RowIndex>,
}

/// Groups row indices by the tuple of values the key columns hold at each
/// row. Every `key_columns[i]` must have the same length R; the returned
/// groups are an exact partition of `0..R` in depth-first trie order.
///
/// K = 0 is not supported: callers must treat "no discriminator fields" as
/// "no partitioning performed" instead of calling with no key columns.
pub fn partition(
    key_columns: &[&[FieldValue]],
) -> Result<Vec<Vec<RowIndex>>, PartitionError> {
    if key_columns.is_empty() {
        return Err(PartitionError::NoKeyColumns);
    }

    let row_count = key_columns[0].len();
    for (index, column) in key_columns.iter().enumerate().skip(1) {
        if column.len() != row_count {
            return Err(PartitionError::KeyColumnLengthMismatch {
                index,
                expected: row_count,
                actual: column.len(),
            });
        }
    }

    if row_count == 0 {
        return Ok(Vec::new());
    }

    // Insert rows with an iterative walk over the key depth.
    let mut nodes: Vec<TrieNode> = vec![TrieNode::default()];
    for row in 0..row_count {
        let mut current = 0;
        for column in key_columns {
            let value = &column[row];
            current = match nodes[current].children.get(value) {
                Some(&child) => child,
                None => {
                    let child = nodes.len();
                    nodes.push(TrieNode::default());
                    nodes[current].children.insert(value.clone(), child);
                    nodes[current].child_order.push(child);
                    child
                }
            };
        }
        nodes[current].rows.push(row);
    }

    // Depth-first collection with an explicit stack. Children are pushed in
    // reverse creation order so the first-created child pops first.
    let mut groups = Vec::new();
    let mut stack: Vec<usize> = vec![0];
    while let Some(node_index) = stack.pop() {
        if nodes[node_index].child_order.is_empty() {
            let rows = std::mem::take(&mut nodes[node_index].rows);
            groups.push(rows);
        } else {
            stack.extend(nodes[node_index].child_order.iter().rev().copied());
        }
    }

    Ok(groups)
}

// ============================================================================
// FRAME PARTITIONER
// ============================================================================

/// Resolves the selector to discriminator field indices, preserving the
/// frame's field order.
fn resolve_fields(frame: &Frame, selector: &FieldSelector) -> SmallVec<[usize; 4]> {
    match selector {
        FieldSelector::Names(names) => frame
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| names.iter().any(|name| name == &field.name))
            .map(|(index, _)| index)
            .collect(),
        FieldSelector::Pattern(pattern) => match Regex::new(pattern) {
            Ok(re) => frame
                .fields
                .iter()
                .enumerate()
                .filter(|(_, field)| re.is_match(&field.name))
                .map(|(index, _)| index)
                .collect(),
            Err(_) => {
                log::debug!("invalid field pattern '{}', matching nothing", pattern);
                SmallVec::new()
            }
        },
    }
}

/// Builds the output frame name for one group when `as_labels` is off.
fn build_group_name(
    frame: &Frame,
    key_indices: &[usize],
    key_values: &[String],
    options: &PartitionOptions,
) -> String {
    let naming = &options.naming;
    let parts: Vec<String> = key_indices
        .iter()
        .zip(key_values)
        .map(|(&index, value)| {
            if naming.with_names {
                format!(
                    "{}{}{}",
                    frame.fields[index].name, naming.separator1, value
                )
            } else {
                value.clone()
            }
        })
        .collect();
    let joined = parts.join(&naming.separator2);

    if naming.append {
        match &frame.name {
            Some(original) => format!("{} {}", original, joined),
            None => joined,
        }
    } else {
        joined
    }
}

/// Splits one frame into several, keyed by the distinct value tuples of the
/// selected discriminator fields.
///
/// Output frames appear in first-encounter order of their key tuple. When
/// the selector resolves to zero fields the input frame is returned
/// unchanged - a no-op, not an error.
pub fn partition_by_values(frame: &Frame, options: &PartitionOptions) -> Vec<Frame> {
    let key_indices = resolve_fields(frame, &options.fields);
    if key_indices.is_empty() {
        log::debug!(
            "no discriminator fields matched in frame {:?}; returning it unchanged",
            frame.name
        );
        return vec![frame.clone()];
    }

    let key_columns: Vec<&[FieldValue]> = key_indices
        .iter()
        .map(|&index| frame.fields[index].values.as_slice())
        .collect();

    let groups = match partition(&key_columns) {
        Ok(groups) => groups,
        Err(err) => {
            log::warn!("partition of frame {:?} failed: {}", frame.name, err);
            return vec![frame.clone()];
        }
    };

    let naming = &options.naming;
    let mut result = Vec::with_capacity(groups.len());

    for rows in &groups {
        let first_row = rows[0];

        // Stringified discriminator values for this group, in selector order.
        let key_values: Vec<String> = key_indices
            .iter()
            .map(|&index| frame.fields[index].values[first_row].display_value())
            .collect();

        let name = if naming.as_labels {
            frame.name.clone()
        } else {
            Some(build_group_name(frame, &key_indices, &key_values, options))
        };

        let mut fields = Vec::with_capacity(frame.fields.len());
        for (index, field) in frame.fields.iter().enumerate() {
            let is_key = key_indices.contains(&index);
            if is_key && !options.keep_fields {
                continue;
            }

            let mut out = Field {
                name: field.name.clone(),
                field_type: field.field_type,
                values: rows.iter().map(|&r| field.values[r].clone()).collect(),
                config: field.config.clone(),
                labels: field.labels.clone(),
                origin: field.origin,
            };

            if naming.as_labels && !is_key && field.field_type.is_value_type() {
                for (key_pos, &key_index) in key_indices.iter().enumerate() {
                    out.labels.insert(
                        frame.fields[key_index].name.clone(),
                        key_values[key_pos].clone(),
                    );
                }
            }

            fields.push(out);
        }

        result.push(Frame {
            name,
            ref_id: frame.ref_id.clone(),
            fields,
            meta: frame.meta.clone(),
        });
    }

    result
}
