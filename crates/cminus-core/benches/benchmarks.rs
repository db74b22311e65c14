use std::hint::black_box;

use cminus_core::analysis::AnalysisEngine;
use cminus_core::syntax::json::{from_json, load_tree};
use cminus_core::syntax::{ExpType, NodeId, Operator, SyntaxTree, TreeBuilder};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/fixtures");

/// `count` functions, each with a local array, a nested loop block and a
/// call to the previous function.
fn generate_program(count: u32) -> SyntaxTree {
    let mut b = TreeBuilder::new();
    let mut items = Vec::with_capacity(count as usize + 1);
    let total = b.var(1, "total", ExpType::Integer);
    items.push(total);

    for i in 0..count {
        let line = i * 10 + 2;
        let name = format!("f{i}");
        let n = b.param(line, "n", ExpType::Integer);
        let data = b.array_var(line + 1, "data", 8);
        let k = b.var(line + 1, "k", ExpType::Integer);

        let cond_left = b.id(line + 2, "k");
        let cond_right = b.id(line + 2, "n");
        let cond = b.op(line + 2, Operator::Lt, cond_left, cond_right);

        let index = b.id(line + 3, "k");
        let element = b.array_id(line + 3, "data", index);
        let sum_left = b.id(line + 3, "total");
        let sum_right = b.id(line + 3, "k");
        let sum = b.op(line + 3, Operator::Plus, sum_left, sum_right);
        let store = b.assign(line + 3, element, sum);
        let inner = b.compound(line + 2, &[], &[store]);
        let loop_stmt = b.while_stmt(line + 2, cond, inner);

        let value: NodeId = if i == 0 {
            b.id(line + 4, "n")
        } else {
            let arg = b.id(line + 4, "n");
            b.call(line + 4, &format!("f{}", i - 1), &[arg])
        };
        let ret = b.ret(line + 4, Some(value));

        let body = b.compound(line, &[data, k], &[loop_stmt, ret]);
        items.push(b.fun(line, &name, ExpType::Integer, &[n], body));
    }

    b.finish(&items)
}

fn read_fixture(name: &str) -> SyntaxTree {
    load_tree(std::path::Path::new(FIXTURES_DIR).join(name).as_path())
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

fn bench_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading");

    let content = std::fs::read_to_string(format!("{}/gcd.json", FIXTURES_DIR))
        .unwrap_or_else(|_| panic!("Failed to read fixture: gcd.json"));
    group.bench_function("load_gcd_json", |b| b.iter(|| from_json(black_box(&content))));

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let engine = AnalysisEngine::new();

    let gcd = read_fixture("gcd.json");
    group.bench_function("analyze_gcd", |b| b.iter(|| engine.analyze(black_box(&gcd))));

    let errors = read_fixture("type_errors.json");
    group.bench_function("analyze_type_errors", |b| {
        b.iter(|| engine.analyze(black_box(&errors)))
    });

    for size in [10, 100, 1000] {
        let tree = generate_program(size);
        group.throughput(Throughput::Elements(tree.len() as u64));
        group.bench_with_input(BenchmarkId::new("functions", size), &tree, |b, tree| {
            b.iter(|| engine.analyze(black_box(tree)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_loading, bench_analysis);
criterion_main!(benches);
