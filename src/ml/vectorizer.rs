//! TF-IDF vectorizer for text feature extraction.
//!
//! Vocabulary and document frequencies are fit once on the training
//! partition and frozen thereafter. Transforming is pure: out-of-vocabulary
//! terms are ignored, so arbitrarily long inputs reduce to whatever of
//! their content the vocabulary knows.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::NgramTokenizer;

/// Sparse feature vector: `(vocabulary index, weight)` pairs sorted by index.
pub type SparseVector = Vec<(usize, f64)>;

/// Configuration for [`TfIdfVectorizer`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TfIdfConfig {
    /// Vocabulary size cap; the highest-frequency terms are kept.
    pub max_features: usize,
    /// Largest n-gram emitted by the tokenizer.
    pub max_ngram: usize,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        TfIdfConfig {
            max_features: 30_000,
            max_ngram: 2,
        }
    }
}

/// TF-IDF vectorizer over word unigrams and bigrams.
#[derive(Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    config: TfIdfConfig,
    /// Term -> column index mapping, assigned in sorted term order.
    vocabulary: HashMap<String, usize>,
    /// Smoothed inverse document frequency per column.
    idf: Vec<f64>,
    /// Number of documents seen during fitting.
    n_documents: usize,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("max_features", &self.config.max_features)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: TfIdfConfig) -> Self {
        TfIdfVectorizer {
            config,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
        }
    }

    /// Fit vocabulary and document frequencies on training documents.
    ///
    /// When more distinct terms exist than `max_features`, the terms with
    /// the highest corpus frequency are kept, ties broken lexicographically
    /// so fitting stays deterministic. Column indices follow sorted term
    /// order.
    pub fn fit(&mut self, documents: &[&str]) {
        let tokenizer = NgramTokenizer::with_max_ngram(self.config.max_ngram);
        self.n_documents = documents.len();

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = tokenizer.terms(doc);
            for term in &terms {
                *corpus_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            let unique: HashSet<String> = terms.into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let mut selected: Vec<(String, usize)> = corpus_frequency.into_iter().collect();
        if selected.len() > self.config.max_features {
            selected.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            selected.truncate(self.config.max_features);
        }

        let mut terms: Vec<String> = selected.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = vec![0.0; terms.len()];
        for (idx, term) in terms.into_iter().enumerate() {
            let df = *document_frequency.get(&term).unwrap_or(&0);
            idf[idx] =
                (((self.n_documents as f64) + 1.0) / ((df as f64) + 1.0)).ln() + 1.0;
            vocabulary.insert(term, idx);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
    }

    /// Transform a document into an L2-normalized sparse tf-idf vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let tokenizer = NgramTokenizer::with_max_ngram(self.config.max_ngram);
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in tokenizer.terms(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        vector.sort_by_key(|&(idx, _)| idx);

        let norm: f64 = vector.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }

    /// Transform a batch of documents in parallel.
    pub fn transform_batch(&self, documents: &[&str]) -> Vec<SparseVector> {
        documents.par_iter().map(|doc| self.transform(doc)).collect()
    }

    /// Size of the fitted vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents the vectorizer was fit on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}
