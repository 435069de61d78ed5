//! Derivation and rendering throughput over wide tables.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lemoe_crud::derive::{RuleMode, derive_ui_descriptors, derive_validation_rules};
use lemoe_crud::schema::{ClassifiedTable, ColumnRecord, EntityNames};
use lemoe_crud::template::{Renderer, TeraRenderer, context};

const SHAPES: &[(&str, &str)] = &[
    ("varchar(64)", "名称"),
    ("decimal(10,2)", "价格"),
    ("bigint unsigned", "分类"),
    ("tinyint unsigned", "状态"),
    ("datetime", "时间"),
    ("json", "扩展"),
    ("text", "描述"),
    ("int", "数量"),
];

fn wide_table(width: usize) -> ClassifiedTable {
    let columns = (0..width)
        .map(|idx| {
            let (raw_type, comment) = SHAPES[idx % SHAPES.len()];
            ColumnRecord::new(format!("field{idx}_id"), raw_type, idx % 3 == 0, comment)
        })
        .collect();
    ClassifiedTable::new(EntityNames::new("product"), columns)
}

fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");
    for width in [8, 64, 256] {
        let table = wide_table(width);
        group.bench_with_input(BenchmarkId::new("validation", width), &table, |b, table| {
            b.iter(|| derive_validation_rules(black_box(table), RuleMode::Update))
        });
        group.bench_with_input(BenchmarkId::new("ui", width), &table, |b, table| {
            b.iter(|| derive_ui_descriptors(black_box(table)))
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let renderer = TeraRenderer::builtin().expect("built-in templates");
    let table = wide_table(64);
    let store = context::request_context(&table, "商品", context::RequestKind::StoreRequest);
    let structure = context::structure_context(&table, "商品");

    let mut group = c.benchmark_group("render");
    group.bench_function("store_request", |b| {
        b.iter(|| renderer.render("php/request/StoreRequest.php", black_box(&store)))
    });
    group.bench_function("structure", |b| {
        b.iter(|| renderer.render("web/structure.js", black_box(&structure)))
    });
    group.finish();
}

criterion_group!(benches, bench_derive, bench_render);
criterion_main!(benches);
