use criterion::{criterion_group, criterion_main, Criterion};
use ricis_engine::{find_roots, Expr, Simplifier};
use std::hint::black_box;
use std::rc::Rc;

fn x() -> Rc<Expr> {
    Expr::var("x")
}

/// `(x - 1)(x - 2)...(x - n)`
fn falling_product(n: i64) -> Rc<Expr> {
    (2..=n).fold(Expr::sub(x(), Expr::num(1)), |acc, r| {
        Expr::mul(acc, Expr::sub(x(), Expr::num(r)))
    })
}

fn benchmark_reduction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduction");
    let simplifier = Simplifier::new();

    group.bench_function("cancel_degree_8", |b| {
        let e = Expr::div(falling_product(8), Expr::sub(x(), Expr::num(4)));
        b.iter(|| black_box(simplifier.simplify(&e)))
    });

    group.bench_function("self_quotient_degree_6", |b| {
        let d = falling_product(6);
        let e = Expr::div(Rc::clone(&d), d);
        b.iter(|| black_box(simplifier.simplify(&e)))
    });

    group.finish();
}

fn benchmark_singularities(c: &mut Criterion) {
    let mut group = c.benchmark_group("singularities");
    let simplifier = Simplifier::new();

    group.bench_function("sine_limit", |b| {
        let e = Expr::div(Expr::sin(x()), x());
        b.iter(|| black_box(simplifier.simplify(&e)))
    });

    group.sample_size(20);
    group.bench_function("numeric_pole", |b| {
        let den = Expr::sub(Expr::pow(x(), Expr::num(3)), Expr::num(2));
        let e = Expr::div(Expr::num(1), den);
        b.iter(|| black_box(simplifier.simplify(&e)))
    });

    group.bench_function("sum_of_poles", |b| {
        let e = (1..=10).fold(Expr::num(0), |acc, r| {
            Expr::add(acc, Expr::div(Expr::num(r), Expr::sub(x(), Expr::num(r))))
        });
        b.iter(|| black_box(simplifier.simplify(&e)))
    });

    group.finish();
}

fn benchmark_roots(c: &mut Criterion) {
    let mut group = c.benchmark_group("roots");

    group.bench_function("rational_roots_degree_8", |b| {
        let p = falling_product(8);
        b.iter(|| black_box(find_roots(&p, "x")))
    });

    group.bench_function("numeric_scan_cosine", |b| {
        let e = Expr::sub(Expr::cos(x()), x());
        b.iter(|| black_box(find_roots(&e, "x")))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_reduction,
    benchmark_singularities,
    benchmark_roots
);
criterion_main!(benches);
