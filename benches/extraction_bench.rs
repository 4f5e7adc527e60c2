//! Benchmarks da normalização e da extração de ferramentas.
//!
//! Testa performance de:
//! - Detecção de formato + normalização de payloads
//! - Extração de ferramentas em textos curtos e longos
//!
//! Executar: `cargo bench --bench extraction_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use copilot_relay::extractor::extract_tools_used;
use copilot_relay::normalizer::normalize_response;
use serde_json::{json, Value};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HELPERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn output_payload(items: usize) -> Value {
    let output: Vec<Value> = (0..items)
        .map(|i| {
            if i % 3 == 0 {
                json!({"type": "function_call", "name": format!("tool_{}", i)})
            } else {
                json!({"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": format!("Step {}: I used the sql tool.", i)}
                ]})
            }
        })
        .collect();
    json!({ "output": output })
}

fn answer_text(sentences: usize) -> String {
    (0..sentences)
        .map(|i| match i % 4 {
            0 => "I'll use the vector_search tool to find similar rows.",
            1 => "The warehouse returned a table with 10 rows.",
            2 => "Nothing interesting happened in this sentence.",
            _ => "Let me call the mlflow registry for the model version.",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Normalização
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_response");

    for items in [1usize, 10, 100] {
        let payload = output_payload(items);
        group.bench_with_input(BenchmarkId::new("output_items", items), &payload, |b, p| {
            b.iter(|| normalize_response(black_box(p)))
        });
    }

    let choices = json!({"choices": [{"message": {"content": "ok"}}]});
    group.bench_function("choices", |b| b.iter(|| normalize_response(black_box(&choices))));

    group.finish();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Extração
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_tools_used");

    for sentences in [1usize, 20, 200] {
        let text = answer_text(sentences);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("sentences", sentences), &text, |b, t| {
            b.iter(|| extract_tools_used(black_box(t)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_extract);
criterion_main!(benches);
