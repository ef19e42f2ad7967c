//! Artifact cache behaviour observed through a counting store

mod support;

use fraudscan_classifiers::{ArtifactCache, ModelRegistry};
use fraudscan_core::{ArtifactError, Error};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use support::CountingStore;

fn cache_over(store: &Arc<CountingStore>) -> ArtifactCache {
    ArtifactCache::new(ModelRegistry::builtin(), store.clone())
}

#[tokio::test]
async fn test_second_resolve_is_served_from_memory() {
    let store = Arc::new(CountingStore::builtin());
    let cache = cache_over(&store);

    let first = cache.resolve("nb_bow").await.unwrap();
    assert_eq!(store.total_loads(), 2);

    let second = cache.resolve("nb_bow").await.unwrap();
    assert_eq!(store.total_loads(), 2, "cached model must not touch the store");
    assert!(Arc::ptr_eq(&first.classifier, &second.classifier));
    assert_eq!(cache.loaded_models().await, vec!["nb_bow".to_string()]);
}

#[tokio::test]
async fn test_unknown_model_never_touches_store() {
    let store = Arc::new(CountingStore::builtin());
    let cache = cache_over(&store);

    let err = cache.resolve("made_up_model").await.unwrap_err();
    assert!(err.is_client_error());
    match err {
        Error::UnknownModel { label, available } => {
            assert_eq!(label, "made_up_model");
            assert_eq!(available, ModelRegistry::builtin().model_names());
        }
        other => panic!("expected UnknownModel, got {other:?}"),
    }
    assert_eq!(store.total_loads(), 0);
}

#[tokio::test]
async fn test_identifiers_share_vectorizer_instance() {
    let store = Arc::new(CountingStore::builtin());
    let cache = cache_over(&store);

    let nb = cache.resolve("nb_bow").await.unwrap();
    let lr = cache.resolve("lr_bow_res").await.unwrap();

    assert!(Arc::ptr_eq(&nb.transformer, &lr.transformer));
    assert_eq!(store.loads_of("bow_vectorizer.json"), 1);
    assert_eq!(store.loads_of("nb_model_bow.json"), 1);
    assert_eq!(store.loads_of("lr_model_bow_res.json"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_requests_load_once() {
    let store = Arc::new(CountingStore::builtin().with_latency(Duration::from_millis(25)));
    let cache = Arc::new(cache_over(&store));

    let tasks = (0..16).map(|i| {
        let cache = Arc::clone(&cache);
        let identifier = if i % 2 == 0 { "nb_tfidf" } else { "lr_tfidf" };
        tokio::spawn(async move { cache.resolve(identifier).await })
    });

    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(store.loads_of("nb_model_tfidf.json"), 1);
    assert_eq!(store.loads_of("lr_model_tfidf.json"), 1);
    assert_eq!(store.loads_of("tfidf_vectorizer.json"), 1);
    assert_eq!(
        cache.loaded_models().await,
        vec!["lr_tfidf".to_string(), "nb_tfidf".to_string()]
    );
}

#[tokio::test]
async fn test_failed_load_is_retried() {
    let store = Arc::new(CountingStore::builtin());
    let artifacts = support::builtin_artifacts();
    store.remove("nb_model_bow.json");
    let cache = cache_over(&store);

    let err = cache.resolve("nb_bow").await.unwrap_err();
    assert!(!err.is_client_error());
    assert!(matches!(
        &err,
        Error::ArtifactMissing { model, source: ArtifactError::NotFound(name) }
            if model == "nb_bow" && name == "nb_model_bow.json"
    ));
    assert!(cache.loaded_models().await.is_empty());

    store.insert("nb_model_bow.json", artifacts["nb_model_bow.json"].clone());
    cache.resolve("nb_bow").await.unwrap();

    assert_eq!(store.loads_of("nb_model_bow.json"), 2);
    assert_eq!(store.loads_of("bow_vectorizer.json"), 1);
}

#[tokio::test]
async fn test_corrupt_artifact_reports_decode_error() {
    let store = Arc::new(CountingStore::builtin());
    store.insert("lr_model_bow.json", b"{\"kind\": \"logistic_regression\"".to_vec());
    let cache = cache_over(&store);

    let err = cache.resolve("lr_bow").await.unwrap_err();
    assert!(matches!(
        err,
        Error::ArtifactMissing { source: ArtifactError::Decode { .. }, .. }
    ));
    assert!(err.to_string().contains("lr_bow"));
}

#[tokio::test]
async fn test_preload_warms_cache() {
    let store = Arc::new(CountingStore::builtin());
    let cache = cache_over(&store);

    let all = cache.available_models();
    cache.preload(&all).await.unwrap();
    assert_eq!(cache.loaded_models().await, all);

    // two vectorizers, eight classifiers
    assert_eq!(store.total_loads(), 10);
}
