//! 搜索与导出性能基准测试

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Map, Value, json};

use policy_handbook::content::{CATEGORY_KIND, ContentSnapshot, POLICY_KIND, RawNode};
use policy_handbook::services::{export_rows, search_nodes, write_csv};

fn fields(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// 生成 `categories` 个分类、每个分类 `per_category` 条 policy 的快照
fn create_snapshot(categories: usize, per_category: usize) -> ContentSnapshot {
    let children = (0..categories)
        .map(|c| RawNode {
            id: (c * 1000) as i64,
            name: format!("Category {}", c),
            kind: CATEGORY_KIND.to_string(),
            url: None,
            fields: fields(&[
                ("categoryTitle", json!(format!("Category {}", c))),
                ("categoryDescription", json!("Policies for a department")),
            ]),
            children: (0..per_category)
                .map(|p| RawNode {
                    id: (c * 1000 + p + 1) as i64,
                    name: format!("Policy {}-{}", c, p),
                    kind: POLICY_KIND.to_string(),
                    url: None,
                    fields: fields(&[
                        ("policyTitle", json!(format!("Policy {} of category {}", p, c))),
                        ("summary", json!("<p>Short <b>summary</b> of the rule.</p>")),
                        (
                            "fullPolicyText",
                            json!("<p>Employees must follow this policy at all times. ".repeat(20)),
                        ),
                        ("revisionDate", json!("2024-05-01")),
                    ]),
                    children: Vec::new(),
                })
                .collect(),
        })
        .collect();

    ContentSnapshot::from_roots(vec![RawNode {
        id: 1,
        name: "Handbook".to_string(),
        kind: "handbookHome".to_string(),
        url: None,
        fields: Map::new(),
        children,
    }])
}

/// 线性扫描搜索
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search/search_nodes");

    for (categories, per_category) in [(10, 10), (50, 40)] {
        let snapshot = create_snapshot(categories, per_category);
        let roots = snapshot.roots();
        group.throughput(Throughput::Elements(snapshot.len() as u64));

        // 命中很多（会提前截断）
        group.bench_with_input(
            BenchmarkId::new("common_term", snapshot.len()),
            &roots,
            |b, roots| b.iter(|| search_nodes(black_box(roots), "policy", 20)),
        );

        // 没有命中，必须扫描全部节点
        group.bench_with_input(
            BenchmarkId::new("no_match", snapshot.len()),
            &roots,
            |b, roots| b.iter(|| search_nodes(black_box(roots), "zzzz", 20)),
        );
    }

    group.finish();
}

/// CSV 导出
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export/csv");
    let snapshot = create_snapshot(50, 40);
    let roots = snapshot.roots();
    group.throughput(Throughput::Elements(snapshot.len() as u64));

    group.bench_function("export_rows", |b| {
        b.iter(|| export_rows(black_box(&roots)));
    });

    let rows = export_rows(&roots);
    group.bench_function("write_csv", |b| {
        b.iter(|| write_csv(black_box(&rows)));
    });

    group.finish();
}

criterion_group!(benches, bench_search, bench_export);
criterion_main!(benches);
