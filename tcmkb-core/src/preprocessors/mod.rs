//! Document Preprocessors
//!
//! This module provides the preprocessing layer for converting a source
//! document into the flat list of text fragments the rule pipeline reads.
//!
//! ## Architecture
//!
//! ```text
//! Document (DOCX)
//!     ↓
//! [Format-specific Preprocessor]
//!     ↓
//! Vec<String> fragments
//!     ↓
//! [RuleEngine] → [DatasetBuilder]
//!     ↓
//! Dataset
//! ```
//!
//! ## Available Preprocessors
//!
//! - `DocxPreprocessor` - Word documents, text runs of `word/document.xml`

pub mod docx;
pub mod traits;

// Re-export main types
pub use docx::DocxPreprocessor;
pub use traits::Preprocessor;
