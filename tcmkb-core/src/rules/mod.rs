// Main rules module - delegates to semantic sub-modules
// This file coordinates the rule system but actual implementations are in:
// - engine.rs: RuleEngine and debug tracing
// - cursor.rs: forward-only walker over a section's lines
// - section_detection.rs: title detection and disease sections
// - entry_parser.rs: syndrome entries inside one section

pub mod cursor;
pub mod engine;
pub mod entry_parser;
pub mod section_detection;

pub use engine::*;
pub use entry_parser::{EntryParseOutcome, EntryParser, FieldScan};
pub use section_detection::{extract_disease_name, SectionSplit, SectionSplitter, SkippedTitle};
