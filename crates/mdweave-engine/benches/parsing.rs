use criterion::{Criterion, criterion_group, criterion_main};
use mdweave_engine::ext::{StrikethroughExtension, WikiLinkExtension};
use mdweave_engine::{Parser, ParserBuilder, ParserOptions};
mod common;

fn bench_block_structure(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let parser = Parser::default();
    let content = common::generate_markdown_content(100);
    group.bench_function("mixed_blocks", |b| {
        b.iter(|| std::hint::black_box(parser.parse(std::hint::black_box(&content))));
    });

    let lists = common::generate_nested_lists(200, 5);
    group.bench_function("nested_lists", |b| {
        b.iter(|| std::hint::black_box(parser.parse(std::hint::black_box(&lists))));
    });

    group.finish();
}

fn bench_inline_delimiters(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");
    group.sample_size(10);

    let parser = ParserBuilder::new(ParserOptions::default())
        .with_extension(&StrikethroughExtension)
        .with_extension(&WikiLinkExtension)
        .build()
        .expect("extensions declare no cycles");
    let content = common::generate_inline_heavy(200);
    group.bench_function("delimiters_and_links", |b| {
        b.iter(|| std::hint::black_box(parser.parse(std::hint::black_box(&content))));
    });

    group.finish();
}

criterion_group!(benches, bench_block_structure, bench_inline_delimiters);
criterion_main!(benches);
