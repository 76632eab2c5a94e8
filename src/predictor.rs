//! Serving-side intent prediction.
//!
//! A [`Predictor`] wraps one frozen [`IntentPipeline`] loaded from the
//! tracking store. Loading happens once; a failed load is terminal for
//! serving until the process restarts with a valid reference, so nothing
//! here retries. Prediction is bounded, synchronous computation with no
//! I/O and no mutation of the loaded artifact, so one predictor is safe to
//! share across threads.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{IntentioError, Result};
use crate::ml::IntentPipeline;
use crate::registry::TrackingStore;

/// One label with its predicted probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub probability: f64,
}

/// A classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// The arg-max label.
    pub label: String,
    /// Every class, ranked by descending probability. Ties keep the
    /// classifier's stable class order (sorted label list); probabilities
    /// sum to 1 within floating tolerance.
    pub topk: Vec<LabelScore>,
}

/// A loaded, immutable model ready to answer queries.
#[derive(Debug)]
pub struct Predictor {
    pipeline: Arc<IntentPipeline>,
    reference: String,
}

impl Predictor {
    /// Resolve `reference` against the store and load the pipeline.
    ///
    /// Failure is [`IntentioError::ModelUnavailable`]; the caller decides
    /// how to surface it (a serving boundary maps it to a 5xx-class
    /// response rather than crashing).
    pub fn load(store: &TrackingStore, reference: &str) -> Result<Self> {
        let path = store.resolve_model(reference)?;
        let pipeline = IntentPipeline::load(&path)?;
        info!(
            "loaded model {reference} ({} classes) from {}",
            pipeline.classes().len(),
            path.display()
        );
        Ok(Predictor {
            pipeline: Arc::new(pipeline),
            reference: reference.to_string(),
        })
    }

    /// Wrap an already-loaded pipeline (tests, embedded use).
    pub fn from_pipeline(pipeline: IntentPipeline, reference: &str) -> Self {
        Predictor {
            pipeline: Arc::new(pipeline),
            reference: reference.to_string(),
        }
    }

    /// The reference this predictor was loaded from.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// The class labels the model was trained on.
    pub fn classes(&self) -> &[String] {
        self.pipeline.classes()
    }

    /// Classify a text.
    ///
    /// The input must be non-empty after trimming; there is no upper
    /// length bound here (out-of-vocabulary content simply contributes
    /// nothing).
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IntentioError::invalid_input(
                "prediction text must be non-empty",
            ));
        }

        let probs = self.pipeline.predict_proba(trimmed);
        let mut topk: Vec<LabelScore> = self
            .pipeline
            .classes()
            .iter()
            .zip(probs.iter())
            .map(|(label, &probability)| LabelScore {
                label: label.clone(),
                probability,
            })
            .collect();
        // Stable sort: equal probabilities keep class order.
        topk.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap());

        Ok(Prediction {
            label: topk[0].label.clone(),
            topk,
        })
    }
}

/// Process-lifetime predictor handle.
///
/// Serving layers call [`get_or_load`] on each request; the first call
/// loads, later calls return the cached handle. The load itself runs under
/// a mutex so concurrent first requests cannot load twice, and a failed
/// load leaves the cell empty for the boundary to report.
pub mod global {
    use std::sync::{Mutex, OnceLock};

    use super::{Arc, Predictor, Result, TrackingStore};

    static PREDICTOR: OnceLock<Arc<Predictor>> = OnceLock::new();
    static LOAD_GUARD: Mutex<()> = Mutex::new(());

    /// Get the cached predictor, loading it on first use.
    pub fn get_or_load(store: &TrackingStore, reference: &str) -> Result<Arc<Predictor>> {
        if let Some(predictor) = PREDICTOR.get() {
            return Ok(Arc::clone(predictor));
        }
        let _guard = LOAD_GUARD.lock().unwrap();
        if let Some(predictor) = PREDICTOR.get() {
            return Ok(Arc::clone(predictor));
        }
        let predictor = Arc::new(Predictor::load(store, reference)?);
        let _ = PREDICTOR.set(Arc::clone(&predictor));
        Ok(predictor)
    }

    /// Whether a predictor is already cached.
    pub fn is_loaded() -> bool {
        PREDICTOR.get().is_some()
    }
}
