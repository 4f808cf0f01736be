use crate::config::VocabularyConfig;
use crate::error::ImportError;
use regex::Regex;

const FULL_WIDTH_SPACE: char = '\u{3000}';

/// Remove full-width and ASCII spaces anywhere in the fragment, then trim.
pub fn clean_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|&c| c != FULL_WIDTH_SPACE && c != ' ')
        .collect();
    stripped.trim().to_string()
}

/// Cleans raw fragments and drops watermark and attribution lines.
pub struct Normalizer {
    noise_patterns: Vec<Regex>,
}

impl Normalizer {
    pub fn new(vocabulary: &VocabularyConfig) -> Result<Self, ImportError> {
        let noise_patterns = vocabulary
            .noise_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ImportError::InvalidPattern {
                field: "noise_patterns",
                source,
            })?;

        Ok(Self { noise_patterns })
    }

    pub fn is_noise(&self, line: &str) -> bool {
        self.noise_patterns.iter().any(|pattern| pattern.is_match(line))
    }

    /// Cleaned, non-empty, non-noise fragments in their original order.
    pub fn normalize_lines<S: AsRef<str>>(&self, raw: &[S]) -> Vec<String> {
        raw.iter()
            .map(|fragment| clean_text(fragment.as_ref()))
            .filter(|line| !line.is_empty() && !self.is_noise(line))
            .collect()
    }
}
