//! # genext 性能基准测试
//!
//! 使用 Criterion.rs 进行性能基准测试。
//!
//! ## 基准测试分组
//! - `frontend`: 词法与语法分析
//! - `specialize`: 绑定时间分析与生成扩展输出
//! - `instantiate`: 在 Rust 中执行生成扩展
//!
//! ## 使用方法
//! ```bash
//! cargo bench              # 运行所有
//! cargo bench specialize   # 只运行特化相关
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use genext::backends::emitter::{build, emit};
use genext::frontend::parse_program;
use genext::middle::bta::analyze_function;
use genext::{GenextConfig, MemorySink, StaticArgs, StaticParams};
use serde_json::json;
use std::hint::black_box;

/// A subject function with `n` blocks of static and dynamic work
fn subject(n: usize) -> String {
    let mut body = String::from("var acc = 0; var k = x * 2;");
    for i in 0..n {
        body.push_str(&format!(
            " k = k + {i}; if (k > {i}) {{ acc = acc + y * {i}; }} else {{ acc = acc - y; }} \
             for (var j{i} = 0; j{i} < y; j{i}++) {{ acc = acc + j{i}; }}"
        ));
    }
    format!("function f(x, y) {{ {} return acc; }}\nf.specialize = true;\nf.staticVars = ['x'];\n", body)
}

fn quiet() {
    let _ = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(tracing::Level::ERROR)
        .try_init();
}

// ============================================================================
// Frontend
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for n in [10, 100] {
        let source = subject(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, source| {
            b.iter(|| parse_program(black_box(source)).expect("parse failed"))
        });
    }
    group.finish();
}

// ============================================================================
// Specialization
// ============================================================================

fn bench_analyze(c: &mut Criterion) {
    quiet();
    let program = parse_program(&subject(100)).expect("parse failed");
    let func = program.find_function("f").expect("no subject function");
    let params: StaticParams = ["x"].into_iter().collect();
    let config = GenextConfig::default();

    c.bench_function("analyze_100", |b| {
        b.iter(|| analyze_function(black_box(func), &params, &config.specialize).expect("analysis failed"))
    });
}

fn bench_emit(c: &mut Criterion) {
    quiet();
    let program = parse_program(&subject(100)).expect("parse failed");
    let func = program.find_function("f").expect("no subject function");
    let params: StaticParams = ["x"].into_iter().collect();
    let config = GenextConfig::default();

    c.bench_function("emit_100", |b| {
        b.iter(|| {
            let mut sink = MemorySink::new();
            emit(black_box(func), &params, &config, &mut sink).expect("emit failed");
            sink
        })
    });
}

// ============================================================================
// Instantiation
// ============================================================================

fn bench_instantiate(c: &mut Criterion) {
    quiet();
    let program = parse_program(&subject(100)).expect("parse failed");
    let func = program.find_function("f").expect("no subject function");
    let params: StaticParams = ["x"].into_iter().collect();
    let ext = build(func, &params, &GenextConfig::default()).expect("build failed");
    let args: StaticArgs = [("x", json!(3))].into_iter().collect();

    c.bench_function("instantiate_100", |b| {
        b.iter(|| ext.instantiate(black_box(&args)).expect("instantiate failed"))
    });
}

// ============================================================================
// Criterion Groups
// ============================================================================

criterion_group!(
    name = frontend;
    config = Criterion::default().sample_size(50);
    targets = bench_parse
);

criterion_group!(
    name = specialize;
    config = Criterion::default().sample_size(30);
    targets = bench_analyze, bench_emit
);

criterion_group!(
    name = instantiate;
    config = Criterion::default().sample_size(30);
    targets = bench_instantiate
);

criterion_main!(frontend, specialize, instantiate);
