// Benchmark for event alignment
// Measures slot packing over staggered multi-day events and the mapping pipeline

use calendar_panel::models::event::Event;
use calendar_panel::models::frame::{DataFrame, Field, FieldType};
use calendar_panel::models::locale::LocaleContext;
use calendar_panel::models::settings::{AlignStrategy, FieldConfig};
use calendar_panel::services::alignment::align_with;
use calendar_panel::services::mapper::FieldMapper;
use chrono::{DateTime, Duration};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const START_MS: i64 = 1_577_891_162_000; // 2020-01-01T15:06:02Z
const DAY_MS: i64 = 86_400_000;

fn staggered_events(count: usize, days: i64) -> Vec<Event> {
    let first = DateTime::parse_from_rfc3339("2020-01-01T15:06:02Z").unwrap();
    (0..count)
        .map(|i| {
            let start = first + Duration::days(i as i64);
            Event::builder()
                .text(format!("event {}", i))
                .start(start)
                .end(start + Duration::days(days - 1))
                .build()
                .unwrap()
        })
        .collect()
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align");

    for count in [10, 100, 1000].iter() {
        let events = staggered_events(*count, 3);
        group.bench_with_input(BenchmarkId::new("first_fit", count), &events, |b, events| {
            b.iter(|| align_with(black_box(events), AlignStrategy::FirstFit));
        });
        group.bench_with_input(BenchmarkId::new("strict", count), &events, |b, events| {
            b.iter(|| align_with(black_box(events), AlignStrategy::Strict));
        });
    }

    group.finish();
}

fn bench_map_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_frame");
    let config = FieldConfig::default();
    let locale = LocaleContext::default();
    let anchor = DateTime::parse_from_rfc3339("2020-01-15T00:00:00Z").unwrap();

    for rows in [100_i64, 1000].iter() {
        let frame = DataFrame::new(vec![
            Field::new("time", FieldType::Time, (0..*rows).map(|i| START_MS + i * DAY_MS)),
            Field::new("title", FieldType::String, (0..*rows).map(|i| format!("row {}", i))),
        ]);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &frame, |b, frame| {
            let mapper = FieldMapper::new(&config, &locale, anchor);
            b.iter(|| mapper.map_frame(black_box(frame)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_align, bench_map_frame);
criterion_main!(benches);
