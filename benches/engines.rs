//! Benchmark comparing the execution engines: tree-walk vs bytecode VM.
//!
//! Run with: cargo bench --bench engines

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use monkey_lang::compiler::Compiler;
use monkey_lang::interpreter::Interpreter;
use monkey_lang::parser::Parser;
use monkey_lang::vm::Vm;

/// Parse source code into an AST.
fn parse(source: &str) -> monkey_lang::ast::Program {
    let mut parser = Parser::from_source(source);
    let program = parser.parse();
    assert!(parser.errors().is_empty(), "parser errors");
    program
}

/// Run with the tree-walking interpreter.
fn run_tree_walk(source: &str) {
    let program = parse(source);
    let mut interpreter = Interpreter::new();
    interpreter.interpret(&program).expect("runtime error");
}

/// Run with the bytecode VM.
fn run_bytecode(source: &str) {
    let program = parse(source);
    let mut compiler = Compiler::new();
    compiler.compile(&program).expect("compile error");
    let mut vm = Vm::new(compiler.bytecode());
    vm.run().expect("vm error");
}

/// Recursive fibonacci - tests function call overhead.
fn fibonacci_recursive(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib_recursive");

    let source = r#"
let fib = fn(n) {
    if (n < 2) { n } else { fib(n - 1) + fib(n - 2) }
};
fib(15);
"#;

    group.bench_function("tree_walk", |b| b.iter(|| run_tree_walk(black_box(source))));
    group.bench_function("bytecode", |b| b.iter(|| run_bytecode(black_box(source))));

    group.finish();
}

/// Recursive summation - tests tail-heavy call chains.
fn sum_recursive(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_recursive");

    let source = r#"
let sumTo = fn(n, acc) {
    if (n == 0) { acc } else { sumTo(n - 1, acc + n) }
};
sumTo(200, 0);
"#;

    group.bench_function("tree_walk", |b| b.iter(|| run_tree_walk(black_box(source))));
    group.bench_function("bytecode", |b| b.iter(|| run_bytecode(black_box(source))));

    group.finish();
}

/// Higher-order array traversal - tests closures and builtins together.
fn array_map_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_reduce");

    let source = r#"
let map = fn(arr, f) {
    let iter = fn(arr, accumulated) {
        if (len(arr) == 0) { accumulated }
        else { iter(rest(arr), push(accumulated, f(first(arr)))) }
    };
    iter(arr, []);
};
let reduce = fn(arr, initial, f) {
    let iter = fn(arr, result) {
        if (len(arr) == 0) { result }
        else { iter(rest(arr), f(result, first(arr))) }
    };
    iter(arr, initial);
};
let doubled = map([1, 2, 3, 4, 5, 6, 7, 8, 9, 10], fn(x) { x * 2 });
reduce(doubled, 0, fn(acc, x) { acc + x });
"#;

    group.bench_function("tree_walk", |b| b.iter(|| run_tree_walk(black_box(source))));
    group.bench_function("bytecode", |b| b.iter(|| run_bytecode(black_box(source))));

    group.finish();
}

/// Comparison across different fib(N) values.
fn fib_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("fib_scaling");
    group.sample_size(10); // Reduce sample size for slower benchmarks

    for n in [10, 15, 20].iter() {
        let source = format!(
            r#"
let fib = fn(n) {{
    if (n < 2) {{ n }} else {{ fib(n - 1) + fib(n - 2) }}
}};
fib({});
"#,
            n
        );

        group.bench_with_input(BenchmarkId::new("tree_walk", n), &source, |b, src| {
            b.iter(|| run_tree_walk(black_box(src)))
        });

        group.bench_with_input(BenchmarkId::new("bytecode", n), &source, |b, src| {
            b.iter(|| run_bytecode(black_box(src)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    fibonacci_recursive,
    sum_recursive,
    array_map_reduce,
    fib_scaling,
);

criterion_main!(benches);
