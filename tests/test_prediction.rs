//! Integration test: bundled model artifact through the prediction path

use house_price::artifact::{ModelPackage, ModelStore, DEFAULT_MODEL_PATH};
use house_price::inference::predict_price;
use house_price::validation::{validate_input, RawFields};
use house_price::PredictorError;
use std::path::PathBuf;

fn bundled_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_MODEL_PATH)
}

fn request(neighborhood: &str) -> RawFields {
    [
        ("overall_qual", "7"),
        ("gr_liv_area", "2000"),
        ("total_bsmt_sf", "1000"),
        ("garage_cars", "2"),
        ("year_built", "2005"),
        ("neighborhood", neighborhood),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[test]
fn test_bundled_artifact_loads() {
    let package = ModelPackage::load(bundled_model_path()).unwrap();

    assert_eq!(package.feature_columns.len(), 6);
    assert!(package.model.n_estimators() > 0);
    assert!(package.sorted_neighborhoods().contains(&"NAmes".to_string()));
    assert!(package.metrics.test.r2 > 0.0 && package.metrics.test.r2 <= 1.0);
}

#[test]
fn test_bundled_artifact_predicts_interval() {
    let package = ModelPackage::load(bundled_model_path()).unwrap();
    let features = validate_input(&request("NAmes")).unwrap();

    let prediction = predict_price(&package, &features).unwrap();

    assert_eq!(prediction.confidence, 95);
    assert!(prediction.predicted_price > 0.0);
    assert!(prediction.lower_bound >= 0.0);
    assert!(prediction.lower_bound <= prediction.predicted_price);
    assert!(prediction.predicted_price <= prediction.upper_bound);
}

#[test]
fn test_unknown_neighborhood_uses_first_class_code() {
    let package = ModelPackage::load(bundled_model_path()).unwrap();
    let first_class = package.label_encoder.classes()[0].clone();

    let unknown = predict_price(&package, &validate_input(&request("Atlantis")).unwrap()).unwrap();
    let first = predict_price(&package, &validate_input(&request(&first_class)).unwrap()).unwrap();

    assert_eq!(unknown, first);
}

#[tokio::test]
async fn test_store_shares_one_package() {
    let store = ModelStore::new(bundled_model_path());
    assert!(!store.is_loaded());

    let first = store.get().await.unwrap();
    let second = store.get().await.unwrap();

    assert!(store.is_loaded());
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_first_calls_share_one_load() {
    let store = std::sync::Arc::new(ModelStore::new(bundled_model_path()));

    let (first, second) = tokio::join!(
        tokio::spawn({
            let store = std::sync::Arc::clone(&store);
            async move { store.get().await }
        }),
        tokio::spawn({
            let store = std::sync::Arc::clone(&store);
            async move { store.get().await }
        }),
    );

    let first = first.unwrap().unwrap();
    let second = second.unwrap().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_joined_first_calls_share_one_load() {
    let store = ModelStore::new(bundled_model_path());

    let (first, second) = tokio::join!(store.get(), store.get());

    assert!(std::sync::Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
}

#[test]
fn test_bundled_artifact_tree_structure() {
    let package = ModelPackage::load(bundled_model_path()).unwrap();
    assert!(package.model.max_depth() >= 2);
    assert!(package.model.n_leaves() >= package.model.n_estimators());
}

#[test]
fn test_missing_artifact_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nowhere.json");

    match ModelPackage::load(&path) {
        Err(PredictorError::ArtifactNotFound(p)) => assert_eq!(p, path),
        other => panic!("expected ArtifactNotFound, got {:?}", other),
    }
}
