//! The trained model artifact: frozen vectorizer + classifier.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IntentioError, Result};
use crate::ml::logistic::LogisticRegression;
use crate::ml::vectorizer::TfIdfVectorizer;

/// A fitted two-stage pipeline. Immutable after training; cheap to share
/// behind an `Arc` and safe for concurrent read-only use.
#[derive(Debug, Serialize, Deserialize)]
pub struct IntentPipeline {
    vectorizer: TfIdfVectorizer,
    classifier: LogisticRegression,
}

impl IntentPipeline {
    /// Assemble a pipeline from fitted stages.
    pub fn new(vectorizer: TfIdfVectorizer, classifier: LogisticRegression) -> Self {
        IntentPipeline {
            vectorizer,
            classifier,
        }
    }

    /// The class labels, in stable (sorted) probability order.
    pub fn classes(&self) -> &[String] {
        self.classifier.classes()
    }

    /// Class probabilities for a text, in [`Self::classes`] order.
    pub fn predict_proba(&self, text: &str) -> Vec<f64> {
        let features = self.vectorizer.transform(text);
        self.classifier.predict_proba(&features)
    }

    /// Predicted label for a text.
    pub fn predict(&self, text: &str) -> &str {
        let features = self.vectorizer.transform(text);
        self.classifier.predict(&features)
    }

    /// The frozen vectorizer.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// The frozen classifier.
    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    /// Serialize the pipeline to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Write the pipeline to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_json_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a pipeline from a file.
    ///
    /// Any failure (missing file, malformed JSON) is reported as
    /// [`IntentioError::ModelUnavailable`]; this is a terminal condition
    /// for serving, not something to retry.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IntentioError::model_unavailable(format!("{}: {e}", path.display()))
        })?;
        let pipeline: IntentPipeline = serde_json::from_str(&content).map_err(|e| {
            IntentioError::model_unavailable(format!("{}: {e}", path.display()))
        })?;
        Ok(pipeline)
    }
}
