use std::collections::HashMap;
use std::fs;

use intentio::dataset::assembler::{AssembleOptions, assemble};
use intentio::dataset::synthetic::SyntheticConfig;
use intentio::dataset::{Dataset, LabeledSample, SampleSource};
use intentio::error::IntentioError;
use intentio::ml::SplitConfig;
use intentio::predictor::Predictor;
use intentio::registry::TrackingStore;
use intentio::train::{TrainOptions, TrainingReport, train};
use tempfile::TempDir;

fn train_autosample(store: &TrackingStore) -> TrainingReport {
    let (dataset, fingerprint) = assemble(&AssembleOptions {
        use_synthetic: true,
        template_path: std::path::PathBuf::from("definitely-missing-template.csv"),
        synthetic: SyntheticConfig::default(),
        user_path: None,
    })
    .unwrap();

    train(
        &dataset,
        &fingerprint,
        &TrainOptions {
            max_iter: 100,
            ..TrainOptions::default()
        },
        store,
    )
    .unwrap()
}

#[test]
fn test_autosample_training_end_to_end() {
    let dir = TempDir::new().unwrap();
    let store = TrackingStore::new(dir.path()).unwrap();
    let report = train_autosample(&store);

    assert!((0.0..=1.0).contains(&report.accuracy));
    assert!((0.0..=1.0).contains(&report.f1_macro));
    assert_eq!(report.dataset_rows, 240);
    assert_eq!(report.labels.len(), 8);
    assert_eq!(report.n_train + report.n_test, 240);

    // The run directory carries the logged surface: tags, params,
    // metrics, and the expected artifact files.
    let run_dir = dir
        .path()
        .join("ai-learning-intent")
        .join(&report.run_id);
    let tags: HashMap<String, String> =
        serde_json::from_str(&fs::read_to_string(run_dir.join("tags.json")).unwrap()).unwrap();
    assert_eq!(tags["dataset_rows"], "240");
    assert_eq!(tags["dataset_version"], report.dataset_version);
    assert!(!tags["git_sha"].is_empty());

    let params: HashMap<String, serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(run_dir.join("params.json")).unwrap()).unwrap();
    assert_eq!(params["model"], "LogisticRegression");
    assert_eq!(params["tfidf_max_features"], 30000);
    assert_eq!(params["tfidf_ngram"], "1-2");

    let artifacts = run_dir.join("artifacts");
    assert!(artifacts.join("labels.txt").is_file());
    assert!(artifacts.join("confusion_matrix.csv").is_file());
    assert!(artifacts.join("classification_report.json").is_file());
    assert!(artifacts.join("model").join("model.json").is_file());
    assert!(artifacts.join("model").join("signature.json").is_file());

    let labels_txt = fs::read_to_string(artifacts.join("labels.txt")).unwrap();
    assert_eq!(labels_txt.lines().count(), 8);
}

#[test]
fn test_predict_against_tracked_model() {
    let dir = TempDir::new().unwrap();
    let store = TrackingStore::new(dir.path()).unwrap();
    let report = train_autosample(&store);

    // "Restart": resolve the model URI against a fresh store handle.
    let store = TrackingStore::new(dir.path()).unwrap();
    let predictor = Predictor::load(&store, &report.model_uri).unwrap();
    assert_eq!(predictor.classes().len(), 8);

    let prediction = predictor.predict("给个sklearn逻辑回归示例").unwrap();
    assert!(report.labels.contains(&prediction.label));
    assert_eq!(prediction.topk.len(), 8);

    let sum: f64 = prediction.topk.iter().map(|s| s.probability).sum();
    assert!((sum - 1.0).abs() < 1e-9);
    for pair in prediction.topk.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }
}

#[test]
fn test_predict_long_input_succeeds() {
    let dir = TempDir::new().unwrap();
    let store = TrackingStore::new(dir.path()).unwrap();
    let report = train_autosample(&store);
    let predictor = Predictor::load(&store, &report.model_uri).unwrap();

    let long = "学".repeat(5000);
    let prediction = predictor.predict(&long).unwrap();
    assert!(report.labels.contains(&prediction.label));
    assert_eq!(prediction.topk.len(), 8);
}

#[test]
fn test_predict_empty_input_rejected() {
    let dir = TempDir::new().unwrap();
    let store = TrackingStore::new(dir.path()).unwrap();
    let report = train_autosample(&store);
    let predictor = Predictor::load(&store, &report.model_uri).unwrap();

    let err = predictor.predict("").unwrap_err();
    assert!(matches!(err, IntentioError::InvalidInput(_)));
    let err = predictor.predict("   \n ").unwrap_err();
    assert!(matches!(err, IntentioError::InvalidInput(_)));
}

#[test]
fn test_unresolvable_model_reference() {
    let dir = TempDir::new().unwrap();
    let store = TrackingStore::new(dir.path()).unwrap();
    let err = Predictor::load(&store, "runs:/no-such-run/model").unwrap_err();
    assert!(matches!(err, IntentioError::ModelUnavailable(_)));
}

#[test]
fn test_singleton_label_fails_stratification() {
    let dir = TempDir::new().unwrap();
    let store = TrackingStore::new(dir.path()).unwrap();

    let mut dataset = Dataset::new();
    for i in 0..10 {
        dataset.push(LabeledSample::new(
            format!("question number {i}"),
            "概念解释",
            SampleSource::UserProvided,
        ));
    }
    dataset.push(LabeledSample::new(
        "lonely row",
        "资料推荐",
        SampleSource::UserProvided,
    ));
    let fingerprint = intentio::dataset::fingerprint::of_dataset(&dataset).unwrap();

    let err = train(
        &dataset,
        &fingerprint,
        &TrainOptions {
            split: SplitConfig::default(),
            ..TrainOptions::default()
        },
        &store,
    )
    .unwrap_err();
    assert!(matches!(err, IntentioError::Stratification(_)));
}
