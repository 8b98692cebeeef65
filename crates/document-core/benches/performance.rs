use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use document_core::{FixedAdvance, LayoutOptions, Paginator, PieceTable, compute_change, layout};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (document-core benchmark line)\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty line.
    out.pop();
    out
}

fn bench_buffer_construction(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("buffer_construction/50k_lines", |b| {
        b.iter(|| {
            let table = PieceTable::new(black_box(&text));
            black_box(table.char_count());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || PieceTable::new(&text),
            |mut table| {
                let mut offset = table.char_count() / 2;
                for _ in 0..100 {
                    table.insert(offset, "x").unwrap();
                    offset += 1;
                }
                black_box(table.char_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_range_read(c: &mut Criterion) {
    let text = large_text(50_000);
    let mut table = PieceTable::new(&text);
    // Fragment the piece list a little so reads cross piece boundaries.
    for i in 0..100 {
        table.insert(i * 1000, "edit").unwrap();
    }

    let start = table.char_count() / 2;
    let end = start + 4096;

    c.bench_function("range_read/4k_chars", |b| {
        b.iter(|| {
            let slice = table.get_slice(black_box(start), black_box(end)).unwrap();
            black_box(slice.len());
        })
    });
}

fn bench_diff_small_edit(c: &mut Criterion) {
    let prev = large_text(10_000);
    let mut next = prev.clone();
    let mid = next.len() / 2;
    next.insert_str(mid, "inserted text");

    c.bench_function("diff/small_edit_in_10k_lines", |b| {
        b.iter(|| {
            let change = compute_change(black_box(&prev), black_box(&next));
            black_box(change.start);
        })
    });
}

fn bench_paginate_large_document(c: &mut Criterion) {
    let text = large_text(10_000);
    let options = LayoutOptions::default();

    c.bench_function("paginate/10k_lines_cold", |b| {
        b.iter(|| {
            let pages = layout(black_box(&text), &options).unwrap();
            black_box(pages.len());
        })
    });

    c.bench_function("paginate/10k_lines_warm_cache", |b| {
        let mut paginator = Paginator::new(FixedAdvance::default());
        paginator.paginate(&text, &options).unwrap();
        b.iter(|| {
            let pages = paginator.paginate(black_box(&text), &options).unwrap();
            black_box(pages.len());
        })
    });
}

criterion_group!(
    benches,
    bench_buffer_construction,
    bench_typing_in_middle,
    bench_range_read,
    bench_diff_small_edit,
    bench_paginate_large_document
);
criterion_main!(benches);
