//! Training and evaluation pipeline.
//!
//! One invocation: stratified split, fit the TF-IDF + logistic-regression
//! pipeline on the training partition, evaluate on the held-out partition,
//! and log parameters, metrics, tags, diagnostic artifacts and the fitted
//! model to the tracking store. The pipeline itself holds no state between
//! invocations; run-scoping lives in the store and is defensively reset
//! when a run starts.

use std::collections::HashMap;
use std::process::Command;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::dataset::{Dataset, Fingerprint};
use crate::error::Result;
use crate::ml::{
    IntentPipeline, LogisticConfig, LogisticRegression, SplitConfig, TfIdfConfig,
    TfIdfVectorizer, metrics, stratified_split,
};
use crate::registry::{ModelSignature, RunStatus, TrackingStore};

/// Default experiment name.
pub const DEFAULT_EXPERIMENT: &str = "ai-learning-intent";

/// Options for one training invocation.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Experiment the run is filed under.
    pub experiment: String,
    /// Run name; defaults to `intent_<fingerprint>` when empty.
    pub run_name: Option<String>,
    /// Optimizer step budget for the classifier.
    pub max_iter: usize,
    /// Vectorizer settings.
    pub tfidf: TfIdfConfig,
    /// Split settings.
    pub split: SplitConfig,
}

impl Default for TrainOptions {
    fn default() -> Self {
        TrainOptions {
            experiment: DEFAULT_EXPERIMENT.to_string(),
            run_name: None,
            max_iter: 200,
            tfidf: TfIdfConfig::default(),
            split: SplitConfig::default(),
        }
    }
}

/// What one training run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub run_id: String,
    pub model_uri: String,
    pub accuracy: f64,
    pub f1_macro: f64,
    /// Whether the optimizer settled within its step budget. A `false`
    /// here is advisory; the logged model is still usable.
    pub converged: bool,
    pub n_train: usize,
    pub n_test: usize,
    pub labels: Vec<String>,
    pub dataset_version: String,
    pub dataset_rows: usize,
}

/// Train, evaluate, and log one model.
pub fn train(
    dataset: &Dataset,
    fingerprint: &Fingerprint,
    options: &TrainOptions,
    store: &TrackingStore,
) -> Result<TrainingReport> {
    let run_name = options
        .run_name
        .clone()
        .unwrap_or_else(|| format!("intent_{fingerprint}"));
    let run = store.start_run(&options.experiment, &run_name)?;

    let outcome = run_training(dataset, fingerprint, options, &run);
    match outcome {
        Ok(report) => {
            run.finish(RunStatus::Finished)?;
            Ok(report)
        }
        Err(e) => {
            let _ = run.finish(RunStatus::Failed);
            Err(e)
        }
    }
}

fn run_training(
    dataset: &Dataset,
    fingerprint: &Fingerprint,
    options: &TrainOptions,
    run: &crate::registry::RunHandle,
) -> Result<TrainingReport> {
    run.set_tags(&HashMap::from([
        ("dataset_version".to_string(), fingerprint.to_string()),
        ("dataset_rows".to_string(), dataset.len().to_string()),
        ("git_sha".to_string(), git_sha()),
    ]))?;

    run.log_params(&HashMap::from([
        ("model".to_string(), json!("LogisticRegression")),
        (
            "tfidf_max_features".to_string(),
            json!(options.tfidf.max_features),
        ),
        (
            "tfidf_ngram".to_string(),
            json!(format!("1-{}", options.tfidf.max_ngram)),
        ),
        ("max_iter".to_string(), json!(options.max_iter)),
    ]))?;

    let labels = dataset.unique_labels();
    run.log_artifact("labels.txt", labels.join("\n").as_bytes())?;

    let (train_idx, test_idx) = stratified_split(dataset, &options.split)?;
    let samples = dataset.samples();
    let train_texts: Vec<&str> = train_idx.iter().map(|&i| samples[i].text.as_str()).collect();
    let train_labels: Vec<&str> = train_idx.iter().map(|&i| samples[i].label.as_str()).collect();
    let test_texts: Vec<&str> = test_idx.iter().map(|&i| samples[i].text.as_str()).collect();
    let test_labels: Vec<&str> = test_idx.iter().map(|&i| samples[i].label.as_str()).collect();

    info!(
        "training on {} rows, evaluating on {} rows, {} labels",
        train_texts.len(),
        test_texts.len(),
        labels.len()
    );

    let mut vectorizer = TfIdfVectorizer::new(options.tfidf);
    vectorizer.fit(&train_texts);
    let train_features = vectorizer.transform_batch(&train_texts);

    let mut classifier = LogisticRegression::new();
    let fit_summary = classifier.fit(
        &train_features,
        &train_labels,
        vectorizer.vocabulary_size(),
        &LogisticConfig {
            max_iter: options.max_iter,
            ..LogisticConfig::default()
        },
    )?;

    let test_features = vectorizer.transform_batch(&test_texts);
    let predictions: Vec<&str> = test_features
        .iter()
        .map(|x| {
            let idx = classifier.predict_index(x);
            classifier.classes()[idx].as_str()
        })
        .collect();

    let evaluation = metrics::evaluate(&test_texts, &test_labels, &predictions, &labels);
    info!(
        "evaluation: accuracy {:.4}, f1_macro {:.4}",
        evaluation.accuracy, evaluation.f1_macro
    );

    run.log_metrics(&HashMap::from([
        ("accuracy".to_string(), evaluation.accuracy),
        ("f1_macro".to_string(), evaluation.f1_macro),
    ]))?;
    run.set_tags(&HashMap::from([(
        "converged".to_string(),
        fit_summary.converged.to_string(),
    )]))?;

    run.log_artifact(
        "confusion_matrix.csv",
        evaluation.confusion_matrix_csv()?.as_bytes(),
    )?;
    run.log_artifact(
        "classification_report.json",
        serde_json::to_string_pretty(&evaluation.classification_report_json())?.as_bytes(),
    )?;
    let misclassified = evaluation.misclassified_csv()?;
    if !misclassified.is_empty() {
        run.log_artifact("misclassified_samples.csv", misclassified.as_bytes())?;
    }

    let signature = ModelSignature {
        inputs: test_texts.iter().take(3).map(|t| t.to_string()).collect(),
        outputs: predictions.iter().take(3).map(|p| p.to_string()).collect(),
    };

    let pipeline = IntentPipeline::new(vectorizer, classifier);
    let model_uri = run.log_model(&pipeline, &signature)?;

    Ok(TrainingReport {
        run_id: run.run_id().to_string(),
        model_uri,
        accuracy: evaluation.accuracy,
        f1_macro: evaluation.f1_macro,
        converged: fit_summary.converged,
        n_train: train_texts.len(),
        n_test: test_texts.len(),
        labels,
        dataset_version: fingerprint.to_string(),
        dataset_rows: dataset.len(),
    })
}

/// Best-effort source-commit identifier: `GITHUB_SHA`, then the local git
/// HEAD, then `"unknown"`.
fn git_sha() -> String {
    if let Ok(sha) = std::env::var("GITHUB_SHA") {
        if !sha.trim().is_empty() {
            return sha.trim().to_string();
        }
    }
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
