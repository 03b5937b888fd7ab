use campus_qa::chunker::flatten_record;
use campus_qa::data::{TOPICS, builtin_record};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn criterion_benchmark(c: &mut Criterion) {
    let records: Vec<_> = TOPICS
        .iter()
        .map(|topic| (*topic, builtin_record(topic)))
        .collect();

    c.bench_function("chunking", |b| {
        b.iter(|| {
            for (topic, record) in &records {
                black_box(flatten_record(black_box(record), topic, 400));
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
