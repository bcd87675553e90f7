// Criterion benchmarks for Cellar Proxy

use cellar_proxy::core::{extract::extract_suggestion, normalizer::normalize_messages, wine_for_food_prompt};
use cellar_proxy::models::{ChatMessage, ContentEntry, ContentPart, ProviderKind, ProxyRequest, Vintage, WineSummary};
use cellar_proxy::services::ProviderEndpoint;
use cellar_proxy::ModelResolver;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map};

fn create_wine(id: usize) -> WineSummary {
    WineSummary {
        name: Some(format!("Cuvée {}", id)),
        producer: Some("Domaine Test".to_string()),
        region: Some("Bourgogne".to_string()),
        color: Some(if id % 2 == 0 { "red" } else { "white" }.to_string()),
        year: Some(Vintage::Year(2000 + (id % 24) as u16)),
    }
}

fn create_contents(turns: usize) -> ProxyRequest {
    let contents = (0..turns)
        .map(|i| ContentEntry {
            role: Some(if i % 2 == 0 { "user" } else { "model" }.to_string()),
            parts: vec![
                ContentPart { text: Some(format!("turn {} part one", i)) },
                ContentPart { text: Some(format!("  turn {} part two  ", i)) },
            ],
        })
        .collect();

    ProxyRequest {
        contents: Some(contents),
        ..Default::default()
    }
}

fn bench_candidates(c: &mut Criterion) {
    let resolver = ModelResolver::new(ProviderKind::Gemini, Some("models/gemini-2.0-flash"));

    c.bench_function("resolve_candidates", |b| {
        b.iter(|| resolver.candidates(black_box(Some("models/gemini-x"))));
    });
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for turns in [1, 10, 50, 200].iter() {
        let request = create_contents(*turns);

        group.bench_with_input(BenchmarkId::new("contents", turns), turns, |b, _| {
            b.iter(|| normalize_messages(black_box(&request)));
        });
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let body = json!({
        "candidates": [{"content": {"parts": [{"text": "Roast duck with cherry sauce."}]}}],
        "usageMetadata": {"promptTokenCount": 42}
    });

    c.bench_function("extract_suggestion", |b| {
        b.iter(|| extract_suggestion(ProviderKind::Gemini, black_box(Some(&body))));
    });
}

fn bench_payload(c: &mut Criterion) {
    let endpoint = ProviderEndpoint::gemini("https://generativelanguage.googleapis.com", "v1beta");
    let wines: Vec<WineSummary> = (0..100).map(create_wine).collect();
    let request = cellar_proxy::PairingRequest {
        explicit_model: None,
        messages: vec![
            ChatMessage::new("system", "Answer as a sommelier."),
            ChatMessage::user(wine_for_food_prompt("Mushroom risotto", &wines)),
        ],
        passthrough: Map::new(),
    };

    c.bench_function("build_payload_100_wines", |b| {
        b.iter(|| endpoint.build_payload(black_box("gemini-2.5-flash"), black_box(&request)));
    });
}

criterion_group!(benches, bench_candidates, bench_normalize, bench_extract, bench_payload);

criterion_main!(benches);
