//! Dataset assembly for intent classification.
//!
//! A dataset is built from up to three sources: a user-supplied CSV/JSONL
//! file, an on-disk template CSV, and a seeded synthetic generator. Sources
//! are concatenated in a fixed, documented order and the result carries a
//! deterministic content fingerprint for reproducibility.

pub mod assembler;
pub mod fingerprint;
pub mod loader;
pub mod synthetic;
pub mod types;

pub use assembler::{AssembleOptions, assemble};
pub use fingerprint::Fingerprint;
pub use loader::load_file;
pub use synthetic::SyntheticConfig;
pub use types::{Dataset, IntentLabel, LabeledSample, Language, SampleSource};
