use criterion::{black_box, criterion_group, criterion_main, Criterion};

use answerkey_core::compiler::{compile_line, compile_solution_text};
use answerkey_core::traits::IdentityExpander;

fn bench_compile_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_line");

    let plain = "342.57 ; range 1.0";
    let shorthand = "4,5 & 5,4|(5,4)|(4,5) ; Values are switched! ; 0.5";
    let long = "1/3, -7/2 & -7/2, 1/3 & 0.33, -3.5 & -3.5, 0.33 & -1/3, 7/2; 0.5 ; Swap minus sign \
                & 7/2, -1/3;0.5;Swap minus sign & -0.33, 3.5;0.5;Swap minus sign & 3.5,-1/3;0.5;Swap minus sign";

    group.bench_function("plain", |b| {
        b.iter(|| compile_line(black_box(plain), &IdentityExpander))
    });

    group.bench_function("shorthand", |b| {
        b.iter(|| compile_line(black_box(shorthand), &IdentityExpander))
    });

    group.bench_function("long", |b| {
        b.iter(|| compile_line(black_box(long), &IdentityExpander))
    });

    group.finish();
}

fn bench_compile_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_solution_text");

    let small = generate_solution_text(10);
    let large = generate_solution_text(200);

    group.bench_function("10_problems", |b| {
        b.iter(|| compile_solution_text(black_box(&small), &IdentityExpander))
    });

    group.bench_function("200_problems", |b| {
        b.iter(|| compile_solution_text(black_box(&large), &IdentityExpander))
    });

    group.finish();
}

fn generate_solution_text(n: usize) -> String {
    (1..=n)
        .map(|i| format!("{i}. {i} & {}|{}.0 ; Off by one ; 0.5\n", i + 1, i + 1))
        .collect()
}

criterion_group!(benches, bench_compile_line, bench_compile_file);
criterion_main!(benches);
