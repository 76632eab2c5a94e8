//! Command implementations for the intentio CLI.

use std::fs::File;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::dataset::assembler::{AssembleOptions, assemble};
use crate::dataset::synthetic::{self, SyntheticConfig};
use crate::error::Result;
use crate::predictor;
use crate::registry::TrackingStore;
use crate::train::{TrainOptions, train};

/// Execute a CLI command.
pub fn execute_command(args: IntentioArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => run_train(train_args.clone(), &args),
        Command::Predict(predict_args) => run_predict(predict_args.clone(), &args),
        Command::Generate(generate_args) => run_generate(generate_args.clone(), &args),
    }
}

fn open_store(tracking_dir: &Option<std::path::PathBuf>) -> Result<TrackingStore> {
    match tracking_dir {
        Some(dir) => TrackingStore::new(dir),
        None => TrackingStore::from_env(),
    }
}

/// Assemble the dataset, train a model, and print the training report.
fn run_train(args: TrainArgs, cli_args: &IntentioArgs) -> Result<()> {
    let mut options = AssembleOptions {
        user_path: args.data.clone(),
        use_synthetic: args.autosample,
        ..AssembleOptions::default()
    };
    if let Some(template) = &args.template {
        options.template_path = template.clone();
    }

    let (dataset, fingerprint) = assemble(&options)?;

    let base_name = match &args.data {
        Some(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string()),
        None => "autosample".to_string(),
    };
    let run_name = args
        .run_name
        .clone()
        .unwrap_or_else(|| format!("intent_{base_name}_{fingerprint}"));

    let store = open_store(&args.tracking_dir)?;
    let report = train(
        &dataset,
        &fingerprint,
        &TrainOptions {
            experiment: args.experiment.clone(),
            run_name: Some(run_name),
            max_iter: args.max_iter,
            ..TrainOptions::default()
        },
        &store,
    )?;

    output_result(
        &TrainResult {
            run_id: report.run_id,
            model_uri: report.model_uri,
            accuracy: report.accuracy,
            f1_macro: report.f1_macro,
            converged: report.converged,
            dataset_version: report.dataset_version,
            dataset_rows: report.dataset_rows,
            n_train: report.n_train,
            n_test: report.n_test,
        },
        cli_args,
    )
}

/// Classify a text with the referenced model.
fn run_predict(args: PredictArgs, cli_args: &IntentioArgs) -> Result<()> {
    let store = open_store(&args.tracking_dir)?;
    let predictor = predictor::global::get_or_load(&store, &args.model)?;
    let prediction = predictor.predict(&args.text)?;

    output_result(
        &PredictResult {
            label: prediction.label,
            topk: prediction.topk,
        },
        cli_args,
    )
}

/// Write a synthetic dataset CSV.
fn run_generate(args: GenerateArgs, cli_args: &IntentioArgs) -> Result<()> {
    let dataset = synthetic::generate(&SyntheticConfig {
        n_per_label: args.size,
        seed: args.seed,
        ..SyntheticConfig::default()
    });

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_writer(File::create(&args.output)?);
    writer.write_record(["text", "label", "source", "lang"])?;
    for sample in dataset.samples() {
        writer.write_record([
            sample.text.as_str(),
            sample.label.as_str(),
            sample.source.as_str(),
            sample.lang.as_str(),
        ])?;
    }
    writer.flush()?;
    info!("generated {} rows with seed {}", dataset.len(), args.seed);

    output_result(
        &GenerateResult {
            path: args.output.to_string_lossy().into_owned(),
            rows: dataset.len(),
        },
        cli_args,
    )
}
