//! Command line argument parsing for the intentio CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::registry::TRACKING_DIR_ENV;
use crate::train::DEFAULT_EXPERIMENT;

/// Environment variable naming the default model reference for `predict`.
pub const MODEL_URI_ENV: &str = "INTENTIO_MODEL_URI";

/// intentio - intent classification: dataset assembly, training, prediction
#[derive(Parser, Debug, Clone)]
#[command(name = "intentio")]
#[command(about = "Intent classification pipeline: assemble, train, predict")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct IntentioArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl IntentioArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Output formats for command results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Assemble a dataset, train a model, and log it to the tracking store
    Train(TrainArgs),

    /// Classify a text with a tracked model
    Predict(PredictArgs),

    /// Write a synthetic dataset to a CSV file
    Generate(GenerateArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Path to a CSV/JSONL dataset with text,label columns
    #[arg(short, long, value_name = "DATA_FILE")]
    pub data: Option<PathBuf>,

    /// Include seeded synthetic rows
    #[arg(long)]
    pub autosample: bool,

    /// Experiment name
    #[arg(long = "exp", default_value = DEFAULT_EXPERIMENT)]
    pub experiment: String,

    /// Run name (defaults to intent_<dataset>_<version>)
    #[arg(long = "run")]
    pub run_name: Option<String>,

    /// Optimizer step budget
    #[arg(long, default_value_t = 200)]
    pub max_iter: usize,

    /// Tracking-store root directory
    #[arg(long, env = TRACKING_DIR_ENV)]
    pub tracking_dir: Option<PathBuf>,

    /// Template CSV merged into the dataset when present on disk
    #[arg(long, value_name = "TEMPLATE_FILE")]
    pub template: Option<PathBuf>,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Model reference: runs:/<run_id>/model URI or a filesystem path
    #[arg(short, long, env = MODEL_URI_ENV, value_name = "MODEL_REF")]
    pub model: String,

    /// Tracking-store root directory
    #[arg(long, env = TRACKING_DIR_ENV)]
    pub tracking_dir: Option<PathBuf>,

    /// Text to classify
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Arguments for synthetic dataset generation
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Output CSV path
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: PathBuf,

    /// Rows to generate per label
    #[arg(long, default_value_t = 120)]
    pub size: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train() {
        let args =
            IntentioArgs::parse_from(["intentio", "train", "--autosample", "--max-iter", "50"]);
        match args.command {
            Command::Train(train) => {
                assert!(train.autosample);
                assert_eq!(train.max_iter, 50);
                assert_eq!(train.experiment, DEFAULT_EXPERIMENT);
            }
            _ => panic!("expected train command"),
        }
    }

    #[test]
    fn test_parse_predict() {
        let args = IntentioArgs::parse_from([
            "intentio",
            "predict",
            "--model",
            "runs:/abc/model",
            "什么是交叉熵",
        ]);
        match args.command {
            Command::Predict(predict) => {
                assert_eq!(predict.model, "runs:/abc/model");
                assert_eq!(predict.text, "什么是交叉熵");
            }
            _ => panic!("expected predict command"),
        }
    }

    #[test]
    fn test_verbosity() {
        let args = IntentioArgs::parse_from(["intentio", "-vv", "generate", "-o", "out.csv"]);
        assert_eq!(args.verbosity(), 2);
        let args = IntentioArgs::parse_from(["intentio", "-q", "generate", "-o", "out.csv"]);
        assert_eq!(args.verbosity(), 0);
    }
}
