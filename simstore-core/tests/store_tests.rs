use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use simstore_core::{
    EmbeddingStore, Error, Json, SearchOptions, SharedStore, StoreConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn random_embedding(rng: &mut StdRng, dim: usize) -> Vec<f32> {
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

#[test]
fn test_three_vector_scenario() {
    init_tracing();

    let mut store: EmbeddingStore<f32, String> = EmbeddingStore::new();
    store
        .append(vec![
            (vec![1.0, 0.0], "a".to_string()),
            (vec![0.0, 1.0], "b".to_string()),
            (vec![1.0, 1.0], "c".to_string()),
        ])
        .unwrap();

    let results = store.search(&[1.0, 0.0], &SearchOptions::default()).unwrap();
    let ranked: Vec<(&str, f32)> = results
        .iter()
        .map(|r| (r.payload.as_str(), r.score))
        .collect();
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].0, "a");
    assert!((ranked[0].1 - 1.0).abs() < 1e-6);
    assert_eq!(ranked[1].0, "c");
    assert!((ranked[1].1 - 0.7071).abs() < 1e-3);
    assert_eq!(ranked[2].0, "b");
    assert_eq!(ranked[2].1, 0.0);

    let options = SearchOptions::new().with_minimum_score(0.5);
    let results = store.search(&[1.0, 0.0], &options).unwrap();
    let payloads: Vec<&str> = results.iter().map(|r| r.payload.as_str()).collect();
    assert_eq!(payloads, vec!["a", "c"]);
}

#[test]
fn test_bulk_append_dump_reload() {
    init_tracing();

    let mut rng = StdRng::seed_from_u64(7);
    let items: Vec<(Vec<f32>, u32)> = (0..1000u32)
        .map(|i| (random_embedding(&mut rng, 16), i))
        .collect();

    let mut store: EmbeddingStore<f32, u32> = EmbeddingStore::new();
    store.append(items.clone()).unwrap();
    assert_eq!(store.size(), 1000);
    assert_eq!(store.dimension(), 16);

    let bytes = store.dump().unwrap();
    let mut restored: EmbeddingStore<f32, u32> = EmbeddingStore::new();
    restored.load(&bytes).unwrap();

    let expected: Vec<u32> = (0..1000).collect();
    assert_eq!(restored.payloads(), expected.as_slice());
    for (i, (row, _)) in items.iter().enumerate() {
        assert_eq!(restored.get(i).map(|(r, _)| r), Some(row.as_slice()));
    }

    // Same answers before and after the round trip
    let query = random_embedding(&mut rng, 16);
    let options = SearchOptions::new().with_maximum_results(10);
    assert_eq!(
        store.search(&query, &options).unwrap(),
        restored.search(&query, &options).unwrap()
    );
}

#[test]
fn test_incremental_batches_match_single_batch() {
    let mut rng = StdRng::seed_from_u64(11);
    let items: Vec<(Vec<f32>, usize)> = (0..300)
        .map(|i| (random_embedding(&mut rng, 8), i))
        .collect();

    let mut single: EmbeddingStore<f32, usize> = EmbeddingStore::new();
    single.append(items.clone()).unwrap();

    let mut chunked: EmbeddingStore<f32, usize> = EmbeddingStore::new();
    for chunk in items.chunks(17) {
        chunked.append(chunk.to_vec()).unwrap();
    }

    assert_eq!(single.matrix(), chunked.matrix());
    assert_eq!(single.payloads(), chunked.payloads());
}

#[test]
fn test_dump_on_fresh_store_fails() {
    let store: EmbeddingStore<f64, String> = EmbeddingStore::new();
    assert!(matches!(store.dump(), Err(Error::EmptyStore)));

    let shared: SharedStore<f64, String> = SharedStore::new();
    assert!(matches!(shared.dump(), Err(Error::EmptyStore)));
}

#[test]
fn test_search_on_empty_store_is_empty() {
    let store: EmbeddingStore<f32, String> = EmbeddingStore::new();
    assert!(store
        .search(&[0.3, 0.4], &SearchOptions::default())
        .unwrap()
        .is_empty());

    let pinned: EmbeddingStore<f32, String> =
        EmbeddingStore::with_config(StoreConfig::new().with_dimension(8)).unwrap();
    assert!(pinned
        .search(&[0.3, 0.4], &SearchOptions::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_default_result_cap() {
    let items: Vec<(Vec<f32>, usize)> = (0..40).map(|i| (vec![1.0, i as f32 / 100.0], i)).collect();
    let store: EmbeddingStore<f32, usize> = EmbeddingStore::from_items(items).unwrap();
    let results = store.search(&[1.0, 0.0], &SearchOptions::default()).unwrap();
    assert_eq!(results.len(), 16);
    let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
    assert_eq!(indices, (0..16).collect::<Vec<_>>());
}

#[test]
fn test_integer_embeddings() {
    let mut store: EmbeddingStore<i16, char> = EmbeddingStore::new();
    store
        .append(vec![
            (vec![3i16, 4], 'x'),
            (vec![-3, -4], 'y'),
            (vec![4, -3], 'z'),
        ])
        .unwrap();

    let options = SearchOptions::new().with_minimum_score(-1.0);
    let results = store.search(&[6, 8], &options).unwrap();
    let payloads: Vec<char> = results.iter().map(|r| r.payload).collect();
    assert_eq!(payloads, vec!['x', 'z', 'y']);
    assert!((results[2].score + 1.0).abs() < 1e-6);

    let bytes = store.dump().unwrap();
    let mut restored: EmbeddingStore<i16, char> = EmbeddingStore::new();
    restored.load(&bytes).unwrap();
    assert_eq!(restored.matrix(), store.matrix());
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Document {
    title: String,
    tags: Vec<String>,
    year: Option<u16>,
}

#[test]
fn test_structured_payloads_with_json_codec() {
    let docs = vec![
        Document {
            title: "Rust ownership".into(),
            tags: vec!["rust".into()],
            year: Some(2021),
        },
        Document {
            title: "Cosine similarity".into(),
            tags: vec!["math".into(), "search".into()],
            year: None,
        },
    ];

    let mut store: EmbeddingStore<f64, Document, Json> =
        EmbeddingStore::with_codec(StoreConfig::default(), Json).unwrap();
    store
        .append(vec![
            (vec![0.9, 0.1, 0.0], docs[0].clone()),
            (vec![0.0, 0.2, 0.8], docs[1].clone()),
        ])
        .unwrap();

    let bytes = store.dump().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["data"][1]["title"], "Cosine similarity");
    assert_eq!(value["embeddings"][0][0], 0.9);

    let mut restored: EmbeddingStore<f64, Document, Json> =
        EmbeddingStore::with_codec(StoreConfig::default(), Json).unwrap();
    restored.load(&bytes).unwrap();
    assert_eq!(restored.payloads(), docs.as_slice());

    let results = restored
        .search(&[0.0, 0.0, 1.0], &SearchOptions::new().with_maximum_results(1))
        .unwrap();
    assert_eq!(results[0].payload, docs[1]);
}

#[test]
fn test_failed_load_keeps_previous_state() {
    let mut store: EmbeddingStore<f32, String> = EmbeddingStore::new();
    store
        .append(vec![(vec![1.0, 2.0], "kept".to_string())])
        .unwrap();

    let truncated = {
        let bytes = store.dump().unwrap();
        bytes[..bytes.len() / 2].to_vec()
    };
    let err = store.load(&truncated).unwrap_err();
    assert!(matches!(err, Error::CorruptData(_)));

    let other_shape = rmp_serde::to_vec_named(&serde_json::json!({ "rows": [[1.0]] })).unwrap();
    let err = store.load(&other_shape).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));

    assert_eq!(store.size(), 1);
    assert_eq!(store.payloads(), &["kept".to_string()]);
}
