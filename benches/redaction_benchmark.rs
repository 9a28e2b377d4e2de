//! Comprehensive redaction over transcript-sized text.
//!
//! Run with: `cargo bench --bench redaction_benchmark`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use phivault::{redact_comprehensive, PatientIdentity, RedactionOptions};

const UTTERANCE: &str = "Jane Doe reports poor sleep since 03/14/2024. \
    Reach her at 555-123-4567 or jane.doe@example.com; SSN on file 123-45-6789. \
    Jane lives near 94110. ";

fn benchmark_redaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("redact_comprehensive");
    let patient = PatientIdentity::new("Jane", "Doe");
    let options = RedactionOptions {
        redact_dates: true,
        redact_address: true,
        ..RedactionOptions::default()
    };

    for repeats in [1usize, 50, 500] {
        let text = UTTERANCE.repeat(repeats);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(repeats), &text, |b, text| {
            b.iter(|| redact_comprehensive(black_box(text), Some(&patient), &options).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_redaction);
criterion_main!(benches);
