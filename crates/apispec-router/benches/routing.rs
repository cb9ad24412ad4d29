//! Endpoint router benchmarks.
//!
//! Run with: cargo bench -p apispec-router

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use apispec_router::{normalize_path, RouteEntry, Router};

const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

/// `count` endpoint templates, a quarter of them two parameters deep,
/// plus the built-in docs endpoints.
fn templates(count: usize) -> Vec<String> {
    let mut templates = vec![
        "/docs".to_string(),
        "/docs/json".to_string(),
        "/version".to_string(),
    ];
    for i in 0..count {
        templates.push(match i % 4 {
            0 => format!("/tenants/{{tenant}}/collection{i}/{{id}}"),
            1 => format!("/collection{i}/{{id}}"),
            _ => format!("/collection{i}"),
        });
    }
    templates
}

fn build(templates: &[String]) -> Router {
    let mut router = Router::new();
    for (index, template) in templates.iter().enumerate() {
        for method in METHODS.iter().take(1 + index % METHODS.len()) {
            router.insert(
                template,
                method,
                RouteEntry {
                    endpoint_index: index,
                    template: template.clone(),
                },
            );
        }
    }
    router
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for count in [16, 256, 2048] {
        let router = build(&templates(count));
        let last = count - 1;
        let requests = [
            ("builtin", "/docs/json".to_string(), "GET"),
            ("literal", format!("/collection{}", last - last % 4 + 2), "GET"),
            ("param", format!("/collection{}/42", last - last % 4 + 1), "GET"),
            ("nested_param", "/tenants/acme/collection0/42".to_string(), "GET"),
            ("trailing_slash", "/version/".to_string(), "GET"),
            ("method_not_allowed", "/docs".to_string(), "PATCH"),
            ("not_found", "/nowhere/at/all".to_string(), "GET"),
        ];

        for (name, path, method) in requests {
            group.bench_with_input(BenchmarkId::new(name, count), &router, |b, router| {
                b.iter(|| black_box(router.lookup(black_box(&path), method)));
            });
        }
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for count in [16, 256, 2048] {
        let templates = templates(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &templates, |b, t| {
            b.iter(|| black_box(build(t)));
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_path", |b| {
        b.iter(|| black_box(normalize_path(black_box("//tenants/acme//collection7/42/"))));
    });
}

criterion_group!(benches, bench_lookup, bench_build, bench_normalize);
criterion_main!(benches);
