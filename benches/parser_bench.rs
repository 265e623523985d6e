use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::Value;
use yastjson::{build_tree, parse, tokenize, JsonValue};

// A sample "medium" JSON document, restricted to what the tokenizer lexes
// (no exponents).
const MEDIUM_JSON: &str = r#"
{
    "name": "Babbage",
    "age": 30,
    "admin": true,
    "friends": ["Ada", "Charles", "Grace"],
    "tasks": [
        { "id": 1, "title": "Parse JSON", "done": false },
        { "id": 2, "title": "Write docs", "done": true }
    ],
    "nested": {"key": [null, 1, 12300.5, -0.25]}
}
"#;

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("JSON Parsing");

    group.bench_function("yastjson::parse", |b| {
        b.iter(|| parse(black_box(MEDIUM_JSON)).unwrap())
    });

    group.bench_function("serde_json::from_str", |b| {
        b.iter(|| {
            let _: Value = serde_json::from_str(black_box(MEDIUM_JSON)).unwrap();
        })
    });

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let tokens = tokenize(MEDIUM_JSON).unwrap();
    let tree = build_tree(&tokens).unwrap();

    let mut group = c.benchmark_group("Parse Stages");
    group.bench_function("tokenize", |b| {
        b.iter(|| tokenize(black_box(MEDIUM_JSON)).unwrap())
    });
    group.bench_function("build_tree", |b| {
        b.iter(|| build_tree(black_box(&tokens)).unwrap())
    });
    group.bench_function("materialize", |b| {
        b.iter(|| yastjson::materialize(black_box(&tree)).unwrap())
    });
    group.finish();
}

fn bench_stringifying(c: &mut Criterion) {
    let my_value: JsonValue = parse(MEDIUM_JSON).unwrap();
    let serde_value: Value = serde_json::from_str(MEDIUM_JSON).unwrap();

    let mut group = c.benchmark_group("JSON Stringify");

    group.bench_function("JsonValue::stringify", |b| {
        b.iter(|| {
            let _ = my_value.stringify();
        })
    });

    group.bench_function("serde_json::to_string", |b| {
        b.iter(|| {
            let _ = serde_json::to_string(&serde_value).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_stages, bench_stringifying);
criterion_main!(benches);
