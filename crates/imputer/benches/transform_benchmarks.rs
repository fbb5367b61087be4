//! Transform performance benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use imputer::{CleaningMode, Column, Frame, Imputer, ImputerParams};

fn generate_frame(rows: usize) -> Frame {
    Frame::new(vec![
        Column::long("id", (0..rows).map(|r| Some(r as i64))),
        Column::double(
            "value",
            (0..rows).map(|r| if r % 5 == 0 { None } else { Some(r as f64) }),
        ),
        Column::string(
            "label",
            (0..rows).map(|r| if r % 3 == 0 { None } else { Some(format!("item_{}", r % 50)) }),
        ),
    ])
    .unwrap()
}

/// Benchmark in-place filling versus filling into a new column.
fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for rows in [1_000, 10_000, 100_000].iter() {
        let frame = generate_frame(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        let in_place = Imputer::new(ImputerParams::in_place(["value"])).fit(&frame).unwrap();
        group.bench_with_input(BenchmarkId::new("in_place", rows), &frame, |b, frame| {
            b.iter(|| black_box(in_place.transform(frame).unwrap()))
        });

        let aliased = Imputer::new(
            ImputerParams::default()
                .with_input_cols(["value", "label"])
                .with_output_cols(["value_clean", "label_clean"])
                .with_mode(CleaningMode::Custom)
                .with_custom_value("0"),
        )
        .fit(&frame)
        .unwrap();
        group.bench_with_input(BenchmarkId::new("new_columns", rows), &frame, |b, frame| {
            b.iter(|| black_box(aliased.transform(frame).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
