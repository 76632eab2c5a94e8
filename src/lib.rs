//! # intentio
//!
//! An intent classification pipeline for learning-assistant queries.
//!
//! ## Features
//!
//! - Dataset assembly from CSV/JSONL files, a template file, and a seeded
//!   synthetic generator, with deterministic content fingerprinting
//! - TF-IDF (word unigrams + bigrams) feature extraction
//! - Multinomial logistic regression with stratified train/test evaluation
//! - Filesystem-backed experiment tracking and model artifact registry
//! - A load-once predictor returning the top label plus a ranked
//!   confidence list over the full label set

pub mod analysis;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod ml;
pub mod predictor;
pub mod registry;
pub mod train;

pub mod prelude {}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
