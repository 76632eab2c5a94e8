//! Experiment tracking and model artifact registry.
//!
//! A [`TrackingStore`] is a filesystem-backed store of training runs laid
//! out as `<root>/<experiment>/<run_id>/` with JSON files for run metadata,
//! parameters, metrics and tags, an `artifacts/` directory for diagnostic
//! files, and `artifacts/model/` for the loadable pipeline. Model
//! references are either `runs:/<run_id>/model` URIs resolved against the
//! store or plain filesystem paths; both are treated as opaque strings by
//! everything upstream.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{IntentioError, Result};
use crate::ml::IntentPipeline;

/// Environment variable naming the tracking-store root directory.
pub const TRACKING_DIR_ENV: &str = "INTENTIO_TRACKING_DIR";

/// Default tracking-store root when the environment does not name one.
pub const DEFAULT_TRACKING_DIR: &str = "intentio_runs";

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// Run metadata persisted as `meta.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub run_name: String,
    pub experiment: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Input/output example stored next to a logged model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSignature {
    /// Example input texts.
    pub inputs: Vec<String>,
    /// Labels the model predicted for those inputs.
    pub outputs: Vec<String>,
}

/// Filesystem-backed tracking store.
pub struct TrackingStore {
    root: PathBuf,
    /// Path of the currently active run's directory, if any. Guarded so a
    /// new run can defensively close a stale predecessor.
    active: Arc<Mutex<Option<PathBuf>>>,
}

impl TrackingStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(TrackingStore {
            root,
            active: Arc::new(Mutex::new(None)),
        })
    }

    /// Open the store named by `INTENTIO_TRACKING_DIR`, falling back to
    /// the default directory.
    pub fn from_env() -> Result<Self> {
        let root = std::env::var(TRACKING_DIR_ENV)
            .unwrap_or_else(|_| DEFAULT_TRACKING_DIR.to_string());
        TrackingStore::new(root)
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a new run under `experiment`.
    ///
    /// Any run still active in this store instance is finished first; a
    /// crash-interrupted invocation must not leak its run scope into the
    /// next one.
    pub fn start_run(&self, experiment: &str, run_name: &str) -> Result<RunHandle> {
        {
            let mut active = self.active.lock().unwrap();
            if let Some(stale) = active.take() {
                warn!("closing stale active run at {}", stale.display());
                let _ = finish_run_dir(&stale, RunStatus::Finished);
            }
        }

        let run_id = Uuid::new_v4().simple().to_string();
        let dir = self.root.join(experiment).join(&run_id);
        fs::create_dir_all(dir.join("artifacts"))?;

        let meta = RunMeta {
            run_id: run_id.clone(),
            run_name: run_name.to_string(),
            experiment: experiment.to_string(),
            status: RunStatus::Running,
            started_at: Utc::now(),
            ended_at: None,
        };
        write_json(&dir.join("meta.json"), &meta)?;
        *self.active.lock().unwrap() = Some(dir.clone());
        debug!("started run {run_id} ({run_name}) in experiment {experiment}");

        Ok(RunHandle {
            run_id,
            dir,
            active: Arc::clone(&self.active),
        })
    }

    /// Resolve a model reference to the path of its `model.json`.
    ///
    /// `runs:/<run_id>/<artifact_path>` references are searched across all
    /// experiments under the root; anything else is treated as a direct
    /// filesystem path (a model directory or the file itself).
    pub fn resolve_model(&self, reference: &str) -> Result<PathBuf> {
        let candidate = if let Some(rest) = reference.strip_prefix("runs:/") {
            let (run_id, artifact_path) = rest
                .split_once('/')
                .ok_or_else(|| model_unavailable(reference, "malformed runs URI"))?;
            self.find_run_dir(run_id)
                .ok_or_else(|| model_unavailable(reference, "run not found"))?
                .join("artifacts")
                .join(artifact_path)
        } else {
            PathBuf::from(reference)
        };

        let model_file = if candidate.is_dir() {
            candidate.join("model.json")
        } else {
            candidate
        };

        if !model_file.is_file() {
            return Err(model_unavailable(reference, "artifact does not exist"));
        }
        Ok(model_file)
    }

    fn find_run_dir(&self, run_id: &str) -> Option<PathBuf> {
        let experiments = fs::read_dir(&self.root).ok()?;
        for experiment in experiments.flatten() {
            let candidate = experiment.path().join(run_id);
            if candidate.is_dir() {
                return Some(candidate);
            }
        }
        None
    }
}

/// A handle on one active run.
pub struct RunHandle {
    run_id: String,
    dir: PathBuf,
    active: Arc<Mutex<Option<PathBuf>>>,
}

impl RunHandle {
    /// This run's identifier.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// This run's directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Merge parameters into `params.json`.
    pub fn log_params(&self, params: &HashMap<String, serde_json::Value>) -> Result<()> {
        merge_json_map(&self.dir.join("params.json"), params)
    }

    /// Merge metrics into `metrics.json`.
    pub fn log_metrics(&self, metrics: &HashMap<String, f64>) -> Result<()> {
        let values: HashMap<String, serde_json::Value> = metrics
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::json!(v)))
            .collect();
        merge_json_map(&self.dir.join("metrics.json"), &values)
    }

    /// Merge tags into `tags.json`.
    pub fn set_tags(&self, tags: &HashMap<String, String>) -> Result<()> {
        let values: HashMap<String, serde_json::Value> = tags
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::json!(v)))
            .collect();
        merge_json_map(&self.dir.join("tags.json"), &values)
    }

    /// Write an artifact file under `artifacts/`.
    pub fn log_artifact(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.dir.join("artifacts").join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Log the fitted pipeline plus its signature example under
    /// `artifacts/model/`; returns the `runs:/` URI of the model.
    pub fn log_model(
        &self,
        pipeline: &IntentPipeline,
        signature: &ModelSignature,
    ) -> Result<String> {
        let model_dir = self.dir.join("artifacts").join("model");
        fs::create_dir_all(&model_dir)?;
        fs::write(model_dir.join("model.json"), pipeline.to_json_bytes()?)?;
        write_json(&model_dir.join("signature.json"), signature)?;
        Ok(format!("runs:/{}/model", self.run_id))
    }

    /// Finish the run and release the active-run slot.
    pub fn finish(self, status: RunStatus) -> Result<()> {
        finish_run_dir(&self.dir, status)?;
        let mut active = self.active.lock().unwrap();
        if active.as_ref() == Some(&self.dir) {
            *active = None;
        }
        Ok(())
    }
}

fn finish_run_dir(dir: &Path, status: RunStatus) -> Result<()> {
    let meta_path = dir.join("meta.json");
    let content = fs::read_to_string(&meta_path)
        .map_err(|e| IntentioError::tracking(format!("{}: {e}", meta_path.display())))?;
    let mut meta: RunMeta = serde_json::from_str(&content)?;
    meta.status = status;
    meta.ended_at = Some(Utc::now());
    write_json(&meta_path, &meta)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)
        .map_err(|e| IntentioError::tracking(format!("{}: {e}", path.display())))?;
    Ok(())
}

fn merge_json_map(path: &Path, values: &HashMap<String, serde_json::Value>) -> Result<()> {
    let mut merged: HashMap<String, serde_json::Value> = if path.exists() {
        serde_json::from_str(&fs::read_to_string(path)?)?
    } else {
        HashMap::new()
    };
    for (key, value) in values {
        merged.insert(key.clone(), value.clone());
    }
    write_json(path, &merged)
}

fn model_unavailable(reference: &str, reason: &str) -> IntentioError {
    IntentioError::model_unavailable(format!("{reference}: {reason}"))
}
