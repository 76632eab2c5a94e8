//! Multinomial logistic regression over sparse feature vectors.
//!
//! Trained by batch gradient descent with an L2 penalty, bounded by
//! `max_iter` optimizer steps. Failing to converge within the budget is a
//! soft condition: the partially-optimized model is kept and the fit
//! summary records `converged: false`.

use std::collections::HashMap;
use std::time::Instant;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{IntentioError, Result};
use crate::ml::vectorizer::SparseVector;

/// Hyperparameters for [`LogisticRegression::fit`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Optimizer step budget.
    pub max_iter: usize,
    /// Gradient-descent step size.
    pub learning_rate: f64,
    /// L2 regularization strength.
    pub l2: f64,
    /// Convergence tolerance on the largest per-step weight update.
    pub tolerance: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        LogisticConfig {
            max_iter: 200,
            learning_rate: 1.0,
            l2: 1e-4,
            tolerance: 1e-4,
        }
    }
}

/// Outcome of a fit: how hard the optimizer worked and whether it settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSummary {
    /// Optimizer steps actually taken.
    pub iterations: usize,
    /// Whether the update norm dropped below tolerance within budget.
    pub converged: bool,
    /// Regularized negative log-likelihood after the final step.
    pub final_loss: f64,
    /// Wall-clock fit time.
    pub training_time_ms: u64,
}

/// Multinomial (softmax) logistic regression.
///
/// Class ordering is the lexicographically sorted label list established at
/// fit time; it is stable across processes and is the tie-break order for
/// equal probabilities.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogisticRegression {
    classes: Vec<String>,
    /// Per-class weight rows, indexed `[class][feature]`.
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    n_features: usize,
    fit_summary: Option<FitSummary>,
}

impl LogisticRegression {
    /// Create an untrained classifier.
    pub fn new() -> Self {
        LogisticRegression {
            classes: Vec::new(),
            weights: Vec::new(),
            intercepts: Vec::new(),
            n_features: 0,
            fit_summary: None,
        }
    }

    /// Fit on sparse feature vectors and their labels.
    ///
    /// `n_features` is the vectorizer's vocabulary size (sparse indices must
    /// be below it). At least two distinct labels are required.
    pub fn fit(
        &mut self,
        features: &[SparseVector],
        labels: &[&str],
        n_features: usize,
        config: &LogisticConfig,
    ) -> Result<FitSummary> {
        if features.len() != labels.len() {
            return Err(IntentioError::training(format!(
                "feature/label length mismatch: {} vs {}",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(IntentioError::training("no training examples"));
        }

        let mut classes: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        classes.sort();
        classes.dedup();
        if classes.len() < 2 {
            return Err(IntentioError::training(
                "need at least two distinct labels to fit a classifier",
            ));
        }

        let class_index: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let targets: Vec<usize> = labels.iter().map(|l| class_index[l]).collect();

        let n_classes = classes.len();
        let n_samples = features.len();
        let mut weights = vec![vec![0.0; n_features]; n_classes];
        let mut intercepts = vec![0.0; n_classes];

        let start = Instant::now();
        let mut iterations = 0;
        let mut converged = false;
        let mut final_loss = f64::INFINITY;

        for _ in 0..config.max_iter {
            iterations += 1;

            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];
            let mut loss = 0.0;

            for (x, &target) in features.iter().zip(targets.iter()) {
                let probs = softmax(&logits(x, &weights, &intercepts));
                loss -= probs[target].max(1e-12).ln();

                for (c, &p) in probs.iter().enumerate() {
                    let err = p - if c == target { 1.0 } else { 0.0 };
                    grad_b[c] += err;
                    for &(idx, value) in x {
                        grad_w[c][idx] += err * value;
                    }
                }
            }

            let scale = config.learning_rate / n_samples as f64;
            let mut max_update: f64 = 0.0;
            for c in 0..n_classes {
                for j in 0..n_features {
                    let update = scale * (grad_w[c][j] + config.l2 * n_samples as f64 * weights[c][j]);
                    if update.abs() > max_update {
                        max_update = update.abs();
                    }
                    weights[c][j] -= update;
                }
                let update = scale * grad_b[c];
                if update.abs() > max_update {
                    max_update = update.abs();
                }
                intercepts[c] -= update;
            }

            let penalty: f64 = weights
                .iter()
                .flat_map(|row| row.iter())
                .map(|w| w * w)
                .sum::<f64>()
                * config.l2
                / 2.0;
            final_loss = loss / n_samples as f64 + penalty;

            if max_update < config.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                "logistic regression did not converge within {} iterations (final loss {final_loss:.6}); keeping partially-optimized model",
                config.max_iter
            );
        }

        let summary = FitSummary {
            iterations,
            converged,
            final_loss,
            training_time_ms: start.elapsed().as_millis() as u64,
        };

        self.classes = classes;
        self.weights = weights;
        self.intercepts = intercepts;
        self.n_features = n_features;
        self.fit_summary = Some(summary.clone());
        Ok(summary)
    }

    /// Class probabilities for a sparse feature vector, in class order.
    pub fn predict_proba(&self, x: &SparseVector) -> Vec<f64> {
        softmax(&logits(x, &self.weights, &self.intercepts))
    }

    /// Predicted class index (arg-max probability, first on ties).
    pub fn predict_index(&self, x: &SparseVector) -> usize {
        let probs = self.predict_proba(x);
        let mut best = 0;
        for (i, &p) in probs.iter().enumerate() {
            if p > probs[best] {
                best = i;
            }
        }
        best
    }

    /// Predicted class label.
    pub fn predict(&self, x: &SparseVector) -> &str {
        &self.classes[self.predict_index(x)]
    }

    /// Sorted class labels, in probability-vector order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the classifier has been fit.
    pub fn is_trained(&self) -> bool {
        !self.weights.is_empty()
    }

    /// Summary of the most recent fit, if any.
    pub fn fit_summary(&self) -> Option<&FitSummary> {
        self.fit_summary.as_ref()
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

fn logits(x: &SparseVector, weights: &[Vec<f64>], intercepts: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .zip(intercepts.iter())
        .map(|(row, &b)| x.iter().map(|&(idx, value)| row[idx] * value).sum::<f64>() + b)
        .collect()
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|&z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
