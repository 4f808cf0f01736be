pub mod builder;
pub mod serialization;

pub use builder::DatasetBuilder;
pub use serialization::{SavedArtifacts, DISEASES_FILE, REPORT_FILE, SYNDROMES_FILE};
