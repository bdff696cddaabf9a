//! FILENAME: partition-engine/benches/partition_groups.rs
//! Criterion benchmarks for the partition engine on dashboard-sized data.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame::{Field, FieldValue, Frame};
use partition_engine::{partition, partition_by_values, FieldSelector, PartitionOptions};

const ROWS: usize = 10_000;

fn build_key_columns() -> (Vec<FieldValue>, Vec<FieldValue>) {
    let regions = ["us", "eu", "ap", "sa"];
    let region_column: Vec<FieldValue> = (0..ROWS)
        .map(|i| FieldValue::Text(regions[i % regions.len()].to_string()))
        .collect();
    let host_column: Vec<FieldValue> = (0..ROWS)
        .map(|i| FieldValue::Text(format!("host-{}", i % 25)))
        .collect();
    (region_column, host_column)
}

fn bench_partition(c: &mut Criterion) {
    let (region_column, host_column) = build_key_columns();

    c.bench_function("partition 10k rows x 2 keys", |b| {
        b.iter(|| {
            partition(black_box(&[
                region_column.as_slice(),
                host_column.as_slice(),
            ]))
            .unwrap()
        })
    });
}

fn bench_partition_by_values(c: &mut Criterion) {
    let (region_column, host_column) = build_key_columns();
    let frame = Frame::new(
        Some("metrics".to_string()),
        vec![
            Field::new("region".to_string(), frame::FieldType::String, region_column),
            Field::new("host".to_string(), frame::FieldType::String, host_column),
            Field::number("value".to_string(), (0..ROWS).map(|i| i as f64).collect()),
        ],
    );
    let options = PartitionOptions {
        fields: FieldSelector::Names(vec!["region".to_string(), "host".to_string()]),
        ..PartitionOptions::default()
    };

    c.bench_function("partition_by_values 10k rows", |b| {
        b.iter(|| partition_by_values(black_box(&frame), black_box(&options)))
    });
}

criterion_group!(benches, bench_partition, bench_partition_by_values);
criterion_main!(benches);
