/// SQL builder benchmarks
/// Measures condition rendering and batch insert assembly
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use lesson_store::application::conditions::{
    AssessmentOutcomeCondition, OutcomeCondition, Pager,
};
use lesson_store::domain::value_objects::PublishStatus;
use lesson_store::infrastructure::persistence::build_select;
use lesson_store::sql::{sql_batch_insert, SqlValue};

fn condition_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition_render");

    let outcome = OutcomeCondition {
        org_id: Some("org-1".to_string()),
        author_id: Some("author-1".to_string()),
        publish_statuses: Some(vec![PublishStatus::Draft, PublishStatus::Published]),
        keywords: Some("fractions".to_string()),
        assessed: Some(true),
        pager: Pager::new(3, 20),
        ..Default::default()
    };
    group.bench_function("outcome_search_select", |b| {
        b.iter(|| build_select("learning_outcomes", "*", black_box(&outcome)).unwrap())
    });

    for pairs in [1usize, 16, 256] {
        let condition = AssessmentOutcomeCondition {
            pairs: Some(
                (0..pairs)
                    .map(|i| (format!("a{}", i), format!("o{}", i)))
                    .collect(),
            ),
            ..Default::default()
        };
        group.throughput(Throughput::Elements(pairs as u64));
        group.bench_with_input(BenchmarkId::new("pair_group", pairs), &condition, |b, cond| {
            b.iter(|| build_select("assessments_outcomes", "*", black_box(cond)).unwrap())
        });
    }

    group.finish();
}

fn batch_insert_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_insert");
    let columns = ["assessment_id", "outcome_id", "checked", "create_at"];

    for rows in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| {
                let matrix: Vec<Vec<SqlValue>> = (0..rows)
                    .map(|i| {
                        vec![
                            SqlValue::from("assessment"),
                            SqlValue::from(format!("outcome-{}", i)),
                            SqlValue::from(true),
                            SqlValue::from(i as i64),
                        ]
                    })
                    .collect();
                sql_batch_insert("assessments_outcomes", &columns, matrix).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, condition_benchmarks, batch_insert_benchmarks);
criterion_main!(benches);
