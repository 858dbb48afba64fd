use criterion::{black_box, criterion_group, criterion_main, Criterion};

use data_detective_ingest::ingestion::{DataIngestor, SourceFile};

fn events_csv(rows: usize) -> String {
    let mut out = String::from("user_id,event,timestamp,amount\n");
    for i in 0..rows {
        out.push_str(&format!(
            "u{},{},2024-03-{:02}T10:00:00Z,{}.{}\n",
            i % 97,
            if i % 3 == 0 { "purchase" } else { "view" },
            i % 28 + 1,
            i,
            i % 100
        ));
    }
    out
}

fn events_json(rows: usize) -> String {
    let items: Vec<String> = (0..rows)
        .map(|i| format!(r#"{{"user_id":"u{}","event":"view","meta":{{"page":{}}}}}"#, i % 97, i))
        .collect();
    format!("[{}]", items.join(","))
}

fn bench_ingestion(c: &mut Criterion) {
    let ingestor = DataIngestor::default();
    let csv_file = SourceFile::new("events.csv", events_csv(10_000));
    let json_file = SourceFile::new("events.json", events_json(10_000));

    c.bench_function("parse_csv_10k", |b| {
        b.iter(|| ingestor.parse_file(black_box(&csv_file)).unwrap())
    });
    c.bench_function("parse_json_10k", |b| {
        b.iter(|| ingestor.parse_file(black_box(&json_file)).unwrap())
    });
}

criterion_group!(benches, bench_ingestion);
criterion_main!(benches);
