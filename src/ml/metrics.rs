//! Held-out evaluation metrics.
//!
//! Produces accuracy, macro-averaged F1, a confusion matrix over the sorted
//! label set, a per-class precision/recall/F1 report, and a bounded sample
//! of misclassified rows, plus renderers for the artifact files logged to
//! the tracking store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;

/// Cap on retained misclassified examples.
const MAX_MISCLASSIFIED: usize = 100;

/// Precision/recall/F1 for one class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1: f64,
    pub support: usize,
}

/// A misclassified test row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Misclassified {
    pub text: String,
    #[serde(rename = "true")]
    pub true_label: String,
    #[serde(rename = "pred")]
    pub predicted_label: String,
}

/// Full evaluation of a model on a held-out partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub f1_macro: f64,
    /// Sorted label set the confusion matrix is indexed by.
    pub labels: Vec<String>,
    /// `confusion[i][j]` = rows with true label `i` predicted as `j`.
    pub confusion: Vec<Vec<usize>>,
    /// Per-class metrics keyed like `labels`.
    pub per_class: Vec<ClassMetrics>,
    /// Up to 100 misclassified rows in test order.
    pub misclassified: Vec<Misclassified>,
}

/// Evaluate predictions against ground truth.
///
/// `labels` is the sorted label set to index the confusion matrix by; any
/// prediction outside it is counted in accuracy but not in the matrix
/// (which cannot happen when the model was trained on the same set).
pub fn evaluate(
    texts: &[&str],
    y_true: &[&str],
    y_pred: &[&str],
    labels: &[String],
) -> Evaluation {
    let index: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let n = y_true.len();
    let mut confusion = vec![vec![0usize; labels.len()]; labels.len()];
    let mut correct = 0;
    let mut misclassified = Vec::new();

    for i in 0..n {
        if y_true[i] == y_pred[i] {
            correct += 1;
        } else if misclassified.len() < MAX_MISCLASSIFIED {
            misclassified.push(Misclassified {
                text: texts[i].to_string(),
                true_label: y_true[i].to_string(),
                predicted_label: y_pred[i].to_string(),
            });
        }
        if let (Some(&t), Some(&p)) = (index.get(y_true[i]), index.get(y_pred[i])) {
            confusion[t][p] += 1;
        }
    }

    let mut per_class = Vec::with_capacity(labels.len());
    for (i, _) in labels.iter().enumerate() {
        let tp = confusion[i][i];
        let support: usize = confusion[i].iter().sum();
        let predicted: usize = confusion.iter().map(|row| row[i]).sum();

        let precision = ratio(tp, predicted);
        let recall = ratio(tp, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        per_class.push(ClassMetrics {
            precision,
            recall,
            f1,
            support,
        });
    }

    let accuracy = ratio(correct, n);
    let f1_macro = if per_class.is_empty() {
        0.0
    } else {
        per_class.iter().map(|m| m.f1).sum::<f64>() / per_class.len() as f64
    };

    Evaluation {
        accuracy,
        f1_macro,
        labels: labels.to_vec(),
        confusion,
        per_class,
        misclassified,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Evaluation {
    /// Render the confusion matrix as CSV: header row of labels, one row
    /// per true label with its label in the first column.
    pub fn confusion_matrix_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header = vec![String::new()];
        header.extend(self.labels.iter().cloned());
        writer.write_record(&header)?;
        for (label, row) in self.labels.iter().zip(self.confusion.iter()) {
            let mut record = vec![label.clone()];
            record.extend(row.iter().map(|c| c.to_string()));
            writer.write_record(&record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| crate::error::IntentioError::training(e.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Render the per-class report as JSON, including overall accuracy and
    /// the macro average.
    pub fn classification_report_json(&self) -> Value {
        let mut report = serde_json::Map::new();
        for (label, metrics) in self.labels.iter().zip(self.per_class.iter()) {
            report.insert(label.clone(), json!(metrics));
        }
        report.insert("accuracy".to_string(), json!(self.accuracy));

        let total_support: usize = self.per_class.iter().map(|m| m.support).sum();
        let macro_avg = ClassMetrics {
            precision: mean(self.per_class.iter().map(|m| m.precision)),
            recall: mean(self.per_class.iter().map(|m| m.recall)),
            f1: self.f1_macro,
            support: total_support,
        };
        report.insert("macro avg".to_string(), json!(macro_avg));
        Value::Object(report)
    }

    /// Render the misclassified-sample table as CSV, empty string when
    /// there is nothing to report.
    pub fn misclassified_csv(&self) -> Result<String> {
        if self.misclassified.is_empty() {
            return Ok(String::new());
        }
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["text", "true", "pred"])?;
        for row in &self.misclassified {
            writer.write_record([&row.text, &row.true_label, &row.predicted_label])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| crate::error::IntentioError::training(e.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        0.0
    } else {
        collected.iter().sum::<f64>() / collected.len() as f64
    }
}
