use blockpad_engine::parsing::{BlockStrategy, ParseInput, ScanStrategy, TreeStrategy};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
mod common;

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(20);

    for blocks in [10, 100, 1000] {
        let content = common::generate_scratch_document(blocks);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(BenchmarkId::new("scan", blocks), &content, |b, content| {
            b.iter(|| {
                let input = ParseInput::new(std::hint::black_box(content), "text");
                std::hint::black_box(ScanStrategy.try_parse(&input));
            });
        });

        // Includes building the syntax tree, as the block index does.
        group.bench_with_input(BenchmarkId::new("tree", blocks), &content, |b, content| {
            b.iter(|| {
                let tree = blockpad_syntax::parse(std::hint::black_box(content));
                let input = ParseInput::new(content, "text").with_tree(&tree);
                std::hint::black_box(TreeStrategy.try_parse(&input));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
