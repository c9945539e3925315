use coral_core::{
    Command, CursorCommand, EditCommand, Editor, OperationKind, Position, SearchOptions,
    TextBuffer, UndoRedoManager, ViewCommand,
};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} let quick = brown(fox) + jumps; // over the lazy dog\n"
        ));
    }
    out.pop();
    out
}

fn bench_load(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("load/50k_lines", |b| {
        b.iter(|| {
            let buffer = TextBuffer::from_string(black_box(&text));
            black_box(buffer.line_count());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(10_000);
    c.bench_function("typing_middle/100_chars", |b| {
        b.iter_batched(
            || {
                let mut editor = Editor::from_text(&text);
                editor
                    .execute(CursorCommand::SetCursor(5_000, 10))
                    .unwrap();
                editor
            },
            |mut editor| {
                for _ in 0..100 {
                    editor.execute(EditCommand::InsertChar('x')).unwrap();
                }
                black_box(editor.cursor());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_snapshot_history(c: &mut Criterion) {
    let buffer = TextBuffer::from_string(&large_text(10_000));
    c.bench_function("history/save_100_snapshots", |b| {
        b.iter(|| {
            let mut history = UndoRedoManager::new(100);
            for i in 0..100 {
                history.save_state(&buffer, Position::new(i, 0), OperationKind::Insert, "x");
            }
            black_box(history.memory_usage());
        })
    });
}

fn bench_render_frame(c: &mut Criterion) {
    let mut editor = Editor::from_text(&large_text(50_000));
    editor
        .execute(ViewCommand::SetLanguage("Rust".to_string()))
        .unwrap();
    editor.execute(ViewCommand::ScrollToLine(25_000)).unwrap();
    editor.render_frame();

    c.bench_function("render_frame/warm", |b| {
        b.iter(|| black_box(editor.render_frame().lines.len()))
    });

    c.bench_function("render_frame/after_edit", |b| {
        b.iter(|| {
            editor
                .execute(Command::Cursor(CursorCommand::SetCursor(25_001, 0)))
                .unwrap();
            editor.execute(EditCommand::InsertChar('y')).unwrap();
            black_box(editor.render_frame().lines.len())
        })
    });
}

fn bench_replace_all(c: &mut Criterion) {
    let text = large_text(5_000);
    c.bench_function("replace_all/5k_lines", |b| {
        b.iter_batched(
            || Editor::from_text(&text),
            |mut editor| {
                let result = editor
                    .execute(EditCommand::ReplaceAll {
                        query: "quick".to_string(),
                        replacement: "slow".to_string(),
                        options: SearchOptions::default(),
                    })
                    .unwrap();
                black_box(result);
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_load,
    bench_typing_in_middle,
    bench_snapshot_history,
    bench_render_frame,
    bench_replace_all
);
criterion_main!(benches);
