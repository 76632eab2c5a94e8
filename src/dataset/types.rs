//! Core dataset types.

use serde::{Deserialize, Serialize};

/// The builtin closed set of intent categories.
///
/// Labels are carried as plain strings throughout the pipeline (a
/// user-supplied dataset may introduce labels outside this set); the
/// builtin set drives the synthetic generator and is what the bundled
/// model is trained on.
pub struct IntentLabel;

impl IntentLabel {
    /// All builtin intent labels, in generation order.
    pub const ALL: [&'static str; 8] = [
        "概念解释",
        "学习路径建议",
        "示例代码",
        "报错排查",
        "工具安装配置",
        "作业/考试题解读",
        "复习总结/要点",
        "资料推荐",
    ];
}

/// Where a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleSource {
    /// Generated by the builtin synthetic sampler.
    Synthetic,
    /// Loaded from a user-supplied file.
    UserProvided,
    /// Loaded from the builtin template file.
    Template,
}

impl SampleSource {
    /// The serialized tag for this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleSource::Synthetic => "synthetic",
            SampleSource::UserProvided => "user-provided",
            SampleSource::Template => "template",
        }
    }

    /// Parse a source tag from a dataset file, if it matches a known value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "synthetic" => Some(SampleSource::Synthetic),
            "user-provided" | "user_provided" | "user" => Some(SampleSource::UserProvided),
            "template" => Some(SampleSource::Template),
            _ => None,
        }
    }
}

/// Language tag for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Chinese (any non-ASCII text).
    Zh,
    /// English (pure ASCII text).
    En,
}

impl Language {
    /// The serialized tag for this language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Derive the language tag from text content: `Zh` if any character is
    /// outside the ASCII range, `En` otherwise.
    pub fn detect(text: &str) -> Self {
        if text.chars().any(|c| !c.is_ascii()) {
            Language::Zh
        } else {
            Language::En
        }
    }

    /// Parse a language tag from a dataset file, if it matches a known value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zh" => Some(Language::Zh),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// A single labeled example. Immutable once created.
///
/// Field order is part of the fingerprint contract: rows serialize as
/// `{"text": ..., "label": ..., "source": ..., "lang": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    /// The raw text.
    pub text: String,
    /// The intent label.
    pub label: String,
    /// Which source produced this row.
    pub source: SampleSource,
    /// Language tag.
    pub lang: Language,
}

impl LabeledSample {
    /// Create a sample, deriving the language tag from the text.
    pub fn new<T: Into<String>, L: Into<String>>(text: T, label: L, source: SampleSource) -> Self {
        let text = text.into();
        let lang = Language::detect(&text);
        LabeledSample {
            text,
            label: label.into(),
            source,
            lang,
        }
    }
}

/// An ordered collection of labeled samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    samples: Vec<LabeledSample>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Dataset {
            samples: Vec::new(),
        }
    }

    /// Create a dataset from existing samples, preserving order.
    pub fn from_samples(samples: Vec<LabeledSample>) -> Self {
        Dataset { samples }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append a sample.
    pub fn push(&mut self, sample: LabeledSample) {
        self.samples.push(sample);
    }

    /// Append all samples of another dataset, preserving their order.
    pub fn extend(&mut self, other: Dataset) {
        self.samples.extend(other.samples);
    }

    /// All samples in order.
    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    /// The text column.
    pub fn texts(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.text.as_str()).collect()
    }

    /// The label column.
    pub fn labels(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }

    /// Sorted, deduplicated label set.
    pub fn unique_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.samples.iter().map(|s| s.label.clone()).collect();
        labels.sort();
        labels.dedup();
        labels
    }

    /// Count of rows per label.
    pub fn label_counts(&self) -> std::collections::HashMap<String, usize> {
        let mut counts = std::collections::HashMap::new();
        for sample in &self.samples {
            *counts.entry(sample.label.clone()).or_insert(0) += 1;
        }
        counts
    }
}
