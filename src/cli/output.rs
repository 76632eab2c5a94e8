//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{IntentioArgs, OutputFormat};
use crate::error::Result;
use crate::predictor::LabelScore;

/// Result structure for training runs.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResult {
    pub run_id: String,
    pub model_uri: String,
    pub accuracy: f64,
    pub f1_macro: f64,
    pub converged: bool,
    pub dataset_version: String,
    pub dataset_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
}

/// Result structure for predictions.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResult {
    pub label: String,
    pub topk: Vec<LabelScore>,
}

/// Result structure for dataset generation.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResult {
    pub path: String,
    pub rows: usize,
}

/// Render a command result to stdout in the configured format.
pub fn output_result<T: Serialize + HumanDisplay>(result: &T, args: &IntentioArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => {
            let json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{json}");
        }
        OutputFormat::Human => {
            println!("{}", result.human());
        }
    }
    Ok(())
}

/// Human-readable rendering of a result structure.
pub trait HumanDisplay {
    fn human(&self) -> String;
}

impl HumanDisplay for TrainResult {
    fn human(&self) -> String {
        let mut lines = vec![
            format!("run:             {}", self.run_id),
            format!("model:           {}", self.model_uri),
            format!("accuracy:        {:.4}", self.accuracy),
            format!("f1_macro:        {:.4}", self.f1_macro),
            format!("dataset_version: {}", self.dataset_version),
            format!("dataset_rows:    {}", self.dataset_rows),
            format!("split:           {} train / {} test", self.n_train, self.n_test),
        ];
        if !self.converged {
            lines.push("warning: optimizer did not converge within budget".to_string());
        }
        lines.join("\n")
    }
}

impl HumanDisplay for PredictResult {
    fn human(&self) -> String {
        let mut lines = vec![format!("label: {}", self.label)];
        for score in &self.topk {
            lines.push(format!("  {:<24} {:.4}", score.label, score.probability));
        }
        lines.join("\n")
    }
}

impl HumanDisplay for GenerateResult {
    fn human(&self) -> String {
        format!("wrote {} rows to {}", self.rows, self.path)
    }
}
