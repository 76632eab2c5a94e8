//! Dataset assembly from multiple sources.
//!
//! Merge order is fixed and deterministic: user file, then the on-disk
//! template (when present), then synthetic rows. Relative row order within
//! each source is preserved. The order itself carries no meaning beyond
//! keeping the fingerprint reproducible.

use std::path::{Path, PathBuf};

use log::info;

use crate::dataset::fingerprint::{self, Fingerprint};
use crate::dataset::loader;
use crate::dataset::synthetic::{self, SyntheticConfig};
use crate::dataset::types::{Dataset, SampleSource};
use crate::error::{IntentioError, Result};

/// Default location of the builtin template file, relative to the
/// working directory. Merged only when the file actually exists.
pub const DEFAULT_TEMPLATE_PATH: &str = "data/intent_template.csv";

/// Options for [`assemble`].
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Optional user-supplied CSV/JSONL file.
    pub user_path: Option<PathBuf>,
    /// Whether to include synthetic rows.
    pub use_synthetic: bool,
    /// Location of the optional template CSV.
    pub template_path: PathBuf,
    /// Synthetic generation parameters.
    pub synthetic: SyntheticConfig,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        AssembleOptions {
            user_path: None,
            use_synthetic: false,
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl AssembleOptions {
    /// Pure-synthetic assembly with default generation parameters.
    pub fn synthetic_only() -> Self {
        AssembleOptions {
            use_synthetic: true,
            ..AssembleOptions::default()
        }
    }

    /// Assembly from a user file.
    pub fn from_user_file<P: AsRef<Path>>(path: P) -> Self {
        AssembleOptions {
            user_path: Some(path.as_ref().to_path_buf()),
            ..AssembleOptions::default()
        }
    }
}

/// Assemble a dataset from the configured sources and fingerprint it.
///
/// A pure-synthetic request (synthetic on, no user file) short-circuits:
/// the template is not merged and the fingerprint is the `autosample`
/// form. Otherwise sources concatenate user → template → synthetic and
/// the fingerprint covers row count plus head/tail previews.
pub fn assemble(options: &AssembleOptions) -> Result<(Dataset, Fingerprint)> {
    if options.use_synthetic && options.user_path.is_none() {
        let dataset = synthetic::generate(&options.synthetic);
        let fp = fingerprint::of_synthetic(&dataset);
        info!("assembled synthetic dataset: {} rows, version {fp}", dataset.len());
        return Ok((dataset, fp));
    }

    let mut dataset = Dataset::new();
    let mut any_source = false;

    if let Some(user_path) = &options.user_path {
        dataset.extend(loader::load_file(user_path, SampleSource::UserProvided)?);
        any_source = true;
    }

    if options.template_path.exists() {
        dataset.extend(loader::load_csv(
            &options.template_path,
            SampleSource::Template,
        )?);
        any_source = true;
    }

    if options.use_synthetic {
        dataset.extend(synthetic::generate(&options.synthetic));
        any_source = true;
    }

    if !any_source {
        return Err(IntentioError::empty_dataset("no dataset provided or found"));
    }
    if dataset.is_empty() {
        return Err(IntentioError::empty_dataset(
            "no source yielded any usable row",
        ));
    }

    let fp = fingerprint::of_dataset(&dataset)?;
    info!("assembled dataset: {} rows, version {fp}", dataset.len());
    Ok((dataset, fp))
}
