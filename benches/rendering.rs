//! Benchmarks for the markdown render pipeline.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use splitmark::diagram::{DiagramSet, DiagramTheme};
use splitmark::document::{layout, render};

fn sample_document() -> String {
    let section = "## Section\n\nSome **bold** and *italic* text with `code` and a \
                   [link](https://example.com) that runs long enough to wrap.\n\n\
                   - first\n- second\n  - nested\n\n> quoted line\n\n\
                   ```rust\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n";
    section.repeat(50)
}

fn bench_render(c: &mut Criterion) {
    let md = sample_document();
    c.bench_function("render", |b| b.iter(|| render(black_box(&md))));
}

fn bench_layout(c: &mut Criterion) {
    let md = sample_document();
    let tree = render(&md);
    let diagrams = DiagramSet::new(false, DiagramTheme::Default);
    c.bench_function("layout_80", |b| {
        b.iter(|| layout(black_box(&tree), &diagrams, black_box(80)))
    });
}

criterion_group!(benches, bench_render, bench_layout);
criterion_main!(benches);
