use crate::classifier::{LineClassifier, LineRole};
use crate::config::ParsingConfig;
use crate::normalizer::Normalizer;
use crate::types::Section;
use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::entry_parser::{EntryParseOutcome, EntryParser};
use super::section_detection::{SectionSplit, SectionSplitter};

// Debug configuration for pipeline tracing
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub filter_patterns: Vec<String>,
}

impl DebugConfig {
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        Self {
            enabled,
            filter_patterns,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            filter_patterns: Vec::new(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        self.filter_patterns.iter().any(|pattern| {
            // Try regex first, fall back to simple string contains
            if let Ok(regex) = Regex::new(pattern) {
                regex.is_match(text)
            } else {
                text.contains(pattern.as_str())
            }
        })
    }
}

/// A normalized line together with the role the classifier gives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub index: usize,
    pub text: String,
    pub role: LineRole,
}

/// Debug utility function to trace lines through the pipeline
pub fn debug_pipeline_lines(stage_name: &str, lines: &[ClassifiedLine], debug_config: &DebugConfig) {
    if !debug_config.enabled || debug_config.filter_patterns.is_empty() {
        return;
    }

    let matching: Vec<&ClassifiedLine> = lines
        .iter()
        .filter(|line| debug_config.matches(&line.text))
        .collect();

    if !matching.is_empty() {
        println!("🔍 [{}] {} matching lines:", stage_name, matching.len());
        for line in matching {
            let preview = if line.text.chars().count() > 30 {
                format!("{}...", line.text.chars().take(27).collect::<String>())
            } else {
                line.text.clone()
            };
            println!("  Line {}: \"{}\" ({:?})", line.index, preview, line.role);
        }
        println!();
    }
}

/// Owns the compiled rules and runs them stage by stage.
pub struct RuleEngine {
    config: ParsingConfig,
    normalizer: Normalizer,
    classifier: LineClassifier,
    debug_config: DebugConfig,
}

impl RuleEngine {
    /// Compiles every configured pattern; an invalid one fails here, before
    /// any document is read.
    pub fn new(config: ParsingConfig) -> Result<Self> {
        let normalizer = Normalizer::new(&config.vocabulary)?;
        let classifier = LineClassifier::new(&config)?;

        Ok(Self {
            config,
            normalizer,
            classifier,
            debug_config: DebugConfig::disabled(),
        })
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.debug_config = debug_config;
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    pub fn normalize<S: AsRef<str>>(&self, fragments: &[S]) -> Vec<String> {
        self.normalizer.normalize_lines(fragments)
    }

    pub fn classify_lines(&self, lines: &[String]) -> Vec<ClassifiedLine> {
        lines
            .iter()
            .enumerate()
            .map(|(index, text)| ClassifiedLine {
                index,
                text: text.clone(),
                role: self.classifier.classify(text),
            })
            .collect()
    }

    pub fn split_sections(&self, lines: &[String]) -> SectionSplit {
        if self.debug_config.enabled {
            debug_pipeline_lines("SectionSplit", &self.classify_lines(lines), &self.debug_config);
        }
        SectionSplitter::new(&self.classifier).split(lines)
    }

    pub fn parse_section(&self, section: &Section) -> EntryParseOutcome {
        let outcome = EntryParser::new(&self.classifier, &self.config)
            .parse(&section.disease_name, &section.lines);

        if self.debug_config.enabled && self.debug_config.matches(&section.disease_name) {
            println!(
                "🔍 [EntryParser] {}: {} syndromes, {} warnings",
                section.disease_name,
                outcome.drafts.len(),
                outcome.warnings.len()
            );
            for draft in &outcome.drafts {
                println!(
                    "  {} | {} | {}",
                    draft.syndrome_name, draft.treatment_method, draft.prescription.primary
                );
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_config_regex_and_substring() {
        let config = DebugConfig::new(true, vec!["^考点\\d".to_string(), "[".to_string()]);
        assert!(config.matches("考点1感冒"));
        assert!(config.matches("a[b"));
        assert!(!config.matches("风寒证"));
    }

    #[test]
    fn test_classify_lines_keeps_order() {
        let engine = RuleEngine::new(ParsingConfig::default()).unwrap();
        let lines = vec!["考点1感冒".to_string(), "风寒证".to_string(), "恶寒，发热。".to_string()];
        let classified = engine.classify_lines(&lines);
        let roles: Vec<LineRole> = classified.iter().map(|l| l.role).collect();
        assert_eq!(roles, vec![LineRole::DiseaseTitle, LineRole::ShortToken, LineRole::Prose]);
        assert_eq!(classified[2].index, 2);
    }

    #[test]
    fn test_invalid_title_pattern_fails_construction() {
        let mut config = ParsingConfig::default();
        config.vocabulary.disease_title_pattern = "(".to_string();
        let err = RuleEngine::new(config).err().unwrap();
        assert!(err.to_string().contains("disease_title_pattern"));
    }

    #[test]
    fn test_parse_section_runs_entry_parser() {
        let engine = RuleEngine::new(ParsingConfig::default()).unwrap();
        let section = Section {
            disease_name: "感冒".to_string(),
            lines: vec!["风寒证".to_string(), "恶寒发热。".to_string()],
        };
        let outcome = engine.parse_section(&section);
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].syndrome_name, "风寒证");
    }
}
