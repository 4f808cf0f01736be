// Preprocessor abstraction for document processing
//
// This module defines the boundary between document preprocessing
// (container bytes -> text fragments) and the rule pipeline
// (fragments -> records). Everything after this point works with plain
// strings and is format-agnostic.

use anyhow::Result;
use std::path::Path;

use crate::error::ImportError;

/// Preprocessor trait - converts documents to raw text fragments
///
/// The preprocessing happens in two clear steps:
/// 1. Document -> Markup Language (e.g., DOCX -> WordprocessingML)
/// 2. Markup Language -> text fragments in document order
pub trait Preprocessor {
    /// Step 1: Pull the markup out of the document container
    fn extract_markup(&self, document_bytes: &[u8]) -> Result<String>;

    /// Step 2: Collect text runs from the markup, cleaned, empties dropped
    fn parse_markup(&self, markup: &str) -> Result<Vec<String>>;

    /// Full document processing (combines both steps)
    fn process(&self, document_bytes: &[u8]) -> Result<Vec<String>> {
        let markup = self.extract_markup(document_bytes)?;
        self.parse_markup(&markup)
    }

    /// Reads file and processes the bytes
    fn process_file(&self, input: &Path) -> Result<Vec<String>> {
        if !input.is_file() {
            return Err(ImportError::SourceNotFound(input.to_path_buf()).into());
        }
        let document_bytes = std::fs::read(input).map_err(ImportError::SourceRead)?;
        self.process(&document_bytes)
    }

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;

    /// Check if preprocessor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}
