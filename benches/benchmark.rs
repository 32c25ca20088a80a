// Scoring pipeline benchmarks over a generated vendor catalog
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use std::sync::Arc;
use vendorank::{
    Catalog, Embedder, HashEmbedder, QueryService, Ranker, ServiceConfig, SimilarityEngine, VendorQuery,
    VendorRecord,
};

const FEATURE_WORDS: &[&str] = &[
    "email", "marketing", "automation", "invoicing", "pipeline", "forecasting", "live", "chat", "ticketing",
    "analytics", "reporting", "lead", "scoring", "contact", "management", "mobile", "integration", "workflow",
];

const CATEGORIES: &[&str] = &["CRM", "Help Desk", "Marketing Automation", "Accounting"];

fn generate_feature_text(rng: &mut impl Rng) -> String {
    let count = rng.random_range(2..12);
    (0..count)
        .map(|_| FEATURE_WORDS[rng.random_range(0..FEATURE_WORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_catalog(size: usize) -> Catalog {
    let mut rng = rand::rng();
    (0..size)
        .map(|i| {
            let category = CATEGORIES[i % CATEGORIES.len()];
            let rating = rng.random_range(1.0f32..5.0f32);
            let reviews = rng.random_range(0..20_000u64);
            VendorRecord::new(&format!("vendor {}", i), category, "[]", Some(rating), reviews)
                .with_feature_text(generate_feature_text(&mut rng))
        })
        .collect()
}

fn crm_query() -> VendorQuery {
    VendorQuery {
        software_category: "crm".to_string(),
        capabilities: vec!["email marketing".to_string(), "lead scoring".to_string()],
    }
}

fn benchmark_embed(c: &mut Criterion) {
    let mut group = c.benchmark_group("embed");
    let embedder = HashEmbedder::default();
    let mut rng = rand::rng();

    for size in [10, 100, 1000].iter() {
        let texts: Vec<String> = (0..*size).map(|_| generate_feature_text(&mut rng)).collect();
        group.bench_with_input(BenchmarkId::new("trigram-hash", size), &texts, |b, texts| {
            b.iter(|| black_box(embedder.embed(texts).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_score_and_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_and_rank");
    let engine = SimilarityEngine::new(Arc::new(HashEmbedder::default()));
    let ranker = Ranker::default();
    let capabilities = crm_query().capabilities;

    for size in [100, 1000, 10000].iter() {
        let catalog = generate_catalog(*size);
        let candidates = catalog.by_category("CRM");

        group.bench_with_input(BenchmarkId::new("crm", size), &candidates, |b, candidates| {
            b.iter(|| {
                let scored = engine.score(candidates, &capabilities).unwrap();
                black_box(ranker.rank(scored))
            });
        });
    }

    group.finish();
}

fn benchmark_concurrent_queries(c: &mut Criterion) {
    let service = Arc::new(
        QueryService::new(
            Arc::new(generate_catalog(2000)),
            Arc::new(HashEmbedder::default()),
            ServiceConfig::default(),
        )
        .unwrap(),
    );

    c.bench_function("concurrent_queries_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let service = service.clone();
                    std::thread::spawn(move || service.query(&crm_query()).unwrap())
                })
                .collect();

            for handle in handles {
                black_box(handle.join().unwrap());
            }
        });
    });
}

criterion_group!(benches, benchmark_embed, benchmark_score_and_rank, benchmark_concurrent_queries);
criterion_main!(benches);
