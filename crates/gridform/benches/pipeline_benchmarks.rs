//! Pipeline performance benchmarks.
//!
//! Measures ingestion, full re-validation after an edit, and diffing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridform::{EditedRow, FormSchema, PipelineState};
use serde_json::json;

fn schema() -> FormSchema {
    FormSchema::new(json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "name": { "type": "string", "minLength": 3 },
            "score": { "type": "number", "minimum": 0 },
            "active": { "type": "boolean" },
            "email": { "type": "string", "format": "email" }
        },
        "required": ["id", "name"]
    }))
    .unwrap()
}

/// Synthetic CSV where roughly one row in seven fails validation.
fn generate_csv_data(rows: usize) -> String {
    let mut data = String::from("id,name,score,active,email\n");
    for row in 0..rows {
        let name = if row % 7 == 0 { "ab".to_string() } else { format!("user_{}", row) };
        data.push_str(&format!(
            "{},{},{:.2},{},user{}@example.org\n",
            row,
            name,
            row as f64 * 1.5,
            if row % 2 == 0 { "true" } else { "false" },
            row
        ));
    }
    data
}

fn loaded_state() -> PipelineState {
    let mut state = PipelineState::new();
    state.set_schema(schema()).unwrap();
    state
}

/// Benchmark ingestion (parse, coerce, validate, attach).
fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(loaded_state, |mut state| {
                black_box(state.ingest_text("bench.csv", data).unwrap())
            })
        });
    }

    group.finish();
}

/// Benchmark the edit pass, which re-validates every row.
fn bench_edit_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_all");

    for rows in [100, 1_000, 10_000].iter() {
        let mut state = loaded_state();
        let ingested = state.ingest_text("bench.csv", &generate_csv_data(*rows)).unwrap();
        let edits: Vec<EditedRow> = ingested.into_iter().map(EditedRow::from).collect();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &edits, |b, edits| {
            b.iter(|| black_box(state.edit_all(edits.clone())))
        });
    }

    group.finish();
}

/// Benchmark diffing after a handful of edits.
fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");

    for rows in [1_000, 10_000].iter() {
        let mut state = loaded_state();
        let ingested = state.ingest_text("bench.csv", &generate_csv_data(*rows)).unwrap();
        let edits: Vec<EditedRow> = ingested
            .into_iter()
            .enumerate()
            .filter(|(i, _)| i % 100 != 0)
            .map(|(_, row)| EditedRow::from(row))
            .collect();
        state.edit_all(edits);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_function(BenchmarkId::new("rows", rows), |b| b.iter(|| black_box(state.diff())));
    }

    group.finish();
}

criterion_group!(benches, bench_ingest, bench_edit_all, bench_diff);
criterion_main!(benches);
