// TCM Knowledge Base Core Library
//
// Turns a Word document of exam notes into disease and syndrome records.
// Main interface: DocumentProcessor (document -> fragments -> Dataset).

pub mod types;
pub mod error;
pub mod config;
pub mod normalizer;
pub mod classifier;
pub mod preprocessors;
pub mod rules;
pub mod dataset;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::ImportError;
pub use config::ParsingConfig;
pub use classifier::{LineClassifier, LineRole};
pub use preprocessors::{DocxPreprocessor, Preprocessor};
pub use rules::{DebugConfig, RuleEngine};
pub use dataset::{DatasetBuilder, SavedArtifacts};
pub use processor::{DocumentProcessor, PipelineStages, StepProfiler};
