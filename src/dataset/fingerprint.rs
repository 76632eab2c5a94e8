//! Deterministic dataset fingerprinting.
//!
//! A fingerprint is the first 8 hex characters of a SHA-256 digest over a
//! canonical description of the dataset: row count plus a JSON preview of
//! the first and last 5 rows for file-backed datasets, or the literal
//! `autosample-{rows}` string for pure-synthetic ones. Identical content in
//! identical order always hashes identically, across processes.

use sha2::{Digest, Sha256};

use crate::dataset::types::{Dataset, LabeledSample};
use crate::error::Result;

/// Number of rows included in each preview window.
const PREVIEW_ROWS: usize = 5;

/// A short content hash identifying a dataset version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The hex digits of the fingerprint.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// First 8 hex characters of the SHA-256 digest of `content`.
pub fn short_sha(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    let hex = format!("{digest:x}");
    hex[..8].to_string()
}

/// Fingerprint for a pure-synthetic dataset: hashes `autosample-{rows}`.
pub fn of_synthetic(dataset: &Dataset) -> Fingerprint {
    Fingerprint(short_sha(&format!("autosample-{}", dataset.len())))
}

/// Fingerprint for a file-backed (or merged) dataset: hashes
/// `{rows}-{json(first 5 rows)}-{json(last 5 rows)}`.
pub fn of_dataset(dataset: &Dataset) -> Result<Fingerprint> {
    let samples = dataset.samples();
    let head: Vec<&LabeledSample> = samples.iter().take(PREVIEW_ROWS).collect();
    let tail_start = samples.len().saturating_sub(PREVIEW_ROWS);
    let tail: Vec<&LabeledSample> = samples[tail_start..].iter().collect();

    let head_json = serde_json::to_string(&head)?;
    let tail_json = serde_json::to_string(&tail)?;
    let content = format!("{}-{}-{}", samples.len(), head_json, tail_json);
    Ok(Fingerprint(short_sha(&content)))
}
