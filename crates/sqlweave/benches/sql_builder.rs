use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::{
    Builder, CompilerConfig, KeywordClauses, PlaceholderStyle, Predicate, Scalar, Sql, TableRef,
};

/// `n` equality predicates: col0 = 0 AND col1 = 1 ...
fn predicates(n: usize) -> Vec<Predicate> {
    (0..n)
        .map(|i| Predicate::new(format!("col{i}"), i as i64))
        .collect()
}

fn bench_select_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select_compile");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut qb = Builder::new();
                qb.filter(predicates(n));
                qb.select(
                    vec![
                        TableRef::aliased("users", "u"),
                        TableRef::aliased("roles", "r").left_join("u.role_id = r.id"),
                    ],
                    ["u.id", "r.name"],
                    KeywordClauses::new().order_by("u.id").limit(10),
                )
                .unwrap();
                black_box(qb.compile());
            });
        });
    }

    group.finish();
}

fn bench_parameterized_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/parameterized_build");
    let config = CompilerConfig::parameterized(PlaceholderStyle::Numbered);

    for n in [1, 5, 10, 50, 100] {
        let mut qb = Builder::with_config(config);
        qb.filter(predicates(n));
        qb.select("t", "*", KeywordClauses::new()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.build()));
        });
    }

    group.finish();
}

fn bench_insert_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert_values");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        let columns: Vec<String> = (0..n).map(|i| format!("c{i}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut qb = Builder::new();
                qb.insert("t", values.clone(), columns.clone());
                black_box(qb.compile());
            });
        });
    }

    group.finish();
}

fn bench_sql_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/sql_render");

    for n in [1, 10, 100] {
        let mut sql = Sql::new("SELECT * FROM t WHERE ");
        for i in 0..n {
            if i > 0 {
                sql.push(" AND ");
            }
            sql.push(&format!("col{i} = "));
            sql.push_bind(Scalar::Int(i as i64));
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &sql, |b, sql| {
            b.iter(|| black_box(sql.to_sql()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_select_compile,
    bench_parameterized_build,
    bench_insert_values,
    bench_sql_render
);
criterion_main!(benches);
