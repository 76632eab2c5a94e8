//! Stratified train/test splitting.

use std::collections::BTreeMap;

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::dataset::Dataset;
use crate::error::{IntentioError, Result};

/// Configuration for [`stratified_split`].
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    /// Fraction of each label routed to the test partition.
    pub test_ratio: f64,
    /// RNG seed for the per-label shuffles.
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            test_ratio: 0.2,
            seed: 42,
        }
    }
}

/// Split dataset row indices into `(train, test)`, preserving each label's
/// relative frequency in both partitions.
///
/// Every label gets at least one row in each partition, which requires at
/// least 2 rows per label; a singleton label fails with a stratification
/// error. Labels are processed in sorted order off one seeded RNG, so the
/// split is deterministic for a given dataset and seed.
pub fn stratified_split(dataset: &Dataset, config: &SplitConfig) -> Result<(Vec<usize>, Vec<usize>)> {
    let mut by_label: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, sample) in dataset.samples().iter().enumerate() {
        by_label.entry(sample.label.as_str()).or_default().push(idx);
    }

    for (label, indices) in &by_label {
        if indices.len() < 2 {
            return Err(IntentioError::stratification(format!(
                "label '{label}' has {} example(s); at least 2 are required to stratify",
                indices.len()
            )));
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (_, mut indices) in by_label {
        indices.shuffle(&mut rng);
        let count = indices.len();
        let n_test = ((count as f64) * config.test_ratio).round() as usize;
        let n_test = n_test.clamp(1, count - 1);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{LabeledSample, SampleSource};

    fn dataset_with_counts(counts: &[(&str, usize)]) -> Dataset {
        let mut dataset = Dataset::new();
        for (label, count) in counts {
            for i in 0..*count {
                dataset.push(LabeledSample::new(
                    format!("{label} {i}"),
                    *label,
                    SampleSource::Synthetic,
                ));
            }
        }
        dataset
    }

    #[test]
    fn test_every_label_in_both_partitions() {
        let dataset = dataset_with_counts(&[("a", 10), ("b", 5), ("c", 2)]);
        let (train, test) = stratified_split(&dataset, &SplitConfig::default()).unwrap();
        assert_eq!(train.len() + test.len(), dataset.len());

        for label in ["a", "b", "c"] {
            let in_train = train
                .iter()
                .any(|&i| dataset.samples()[i].label == label);
            let in_test = test.iter().any(|&i| dataset.samples()[i].label == label);
            assert!(in_train, "label {label} missing from train");
            assert!(in_test, "label {label} missing from test");
        }
    }

    #[test]
    fn test_ratio_respected() {
        let dataset = dataset_with_counts(&[("a", 100)]);
        let (train, test) = stratified_split(&dataset, &SplitConfig::default()).unwrap();
        assert_eq!(test.len(), 20);
        assert_eq!(train.len(), 80);
    }

    #[test]
    fn test_singleton_label_rejected() {
        let dataset = dataset_with_counts(&[("a", 10), ("rare", 1)]);
        let err = stratified_split(&dataset, &SplitConfig::default()).unwrap_err();
        assert!(matches!(err, IntentioError::Stratification(_)));
        assert!(err.to_string().contains("rare"));
    }

    #[test]
    fn test_split_deterministic() {
        let dataset = dataset_with_counts(&[("a", 20), ("b", 20)]);
        let a = stratified_split(&dataset, &SplitConfig::default()).unwrap();
        let b = stratified_split(&dataset, &SplitConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_index_duplicated() {
        let dataset = dataset_with_counts(&[("a", 13), ("b", 7)]);
        let (train, test) = stratified_split(&dataset, &SplitConfig::default()).unwrap();
        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), dataset.len());
    }
}
