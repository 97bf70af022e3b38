use altre_isearch::{IncrementalSearch, SearchDirection, TextBuffer};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_text() -> String {
    let mut text = "lorem ipsum dolor sit amet ".repeat(2000);
    text.push_str("needle in the haystack");
    text
}

fn benchmark_typing_pattern(c: &mut Criterion) {
    let text = sample_text();
    c.bench_function("isearch_type_pattern", |b| {
        b.iter(|| {
            let mut buffer = TextBuffer::new(&text);
            let mut session = IncrementalSearch::new();
            session.begin_session(&mut buffer).unwrap();
            for ch in black_box("needle").chars() {
                session.append_character(&mut buffer, ch).unwrap();
            }
            session.end_session(&mut buffer);
        });
    });
}

fn benchmark_repeat_search(c: &mut Criterion) {
    let text = sample_text();
    c.bench_function("isearch_repeat_forward", |b| {
        b.iter(|| {
            let mut buffer = TextBuffer::new(&text);
            let mut session = IncrementalSearch::new();
            session.begin_session(&mut buffer).unwrap();
            for ch in "dolor".chars() {
                session.append_character(&mut buffer, ch).unwrap();
            }
            for _ in 0..100 {
                session
                    .repeat_search(&mut buffer, black_box(SearchDirection::Forward))
                    .unwrap();
            }
        });
    });
}

criterion_group!(benches, benchmark_typing_pattern, benchmark_repeat_search);
criterion_main!(benches);
