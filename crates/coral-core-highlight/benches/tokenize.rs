use coral_core_highlight::{CarryState, SyntaxHighlighter};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn source_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 4 {
            0 => format!("int value_{i} = {i} * 3.5; // trailing comment"),
            1 => "/* block comment that".to_string(),
            2 => "   ends here */ const char* s = \"text with \\\" escape\";".to_string(),
            _ => format!("for (int j = 0; j < {i}; ++j) {{ total += j; }}"),
        })
        .collect()
}

fn bench_tokenize_line(c: &mut Criterion) {
    let mut hl = SyntaxHighlighter::new();
    hl.set_language("C++").unwrap();
    let line = "for (int j = 0; j < 1000; ++j) { total += j * 3.5; } // loop";
    c.bench_function("tokenize_line/cpp", |b| {
        b.iter(|| black_box(hl.tokenize_line(black_box(line), &CarryState::new())))
    });
}

fn bench_highlight_cold_and_warm(c: &mut Criterion) {
    let lines = source_lines(10_000);

    c.bench_function("highlight_lines/cold_10k", |b| {
        b.iter(|| {
            let mut hl = SyntaxHighlighter::new();
            hl.set_language("C++").unwrap();
            black_box(hl.highlight_lines(&lines, 9_950..10_000).len());
        })
    });

    let mut warm = SyntaxHighlighter::new();
    warm.set_language("C++").unwrap();
    warm.highlight_lines(&lines, 0..10_000);
    c.bench_function("highlight_lines/warm_window", |b| {
        b.iter(|| black_box(warm.highlight_lines(&lines, 5_000..5_050).len()))
    });
}

criterion_group!(benches, bench_tokenize_line, bench_highlight_cold_and_warm);
criterion_main!(benches);
