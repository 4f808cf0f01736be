use anyhow::Result;
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_header_words() -> Vec<String> {
    strings(&["证型", "证候", "证机概要", "治法", "方药"])
}

fn default_noise_patterns() -> Vec<String> {
    strings(&["微信公众号", "医心执考"])
}

fn default_prescription_hints() -> Vec<String> {
    strings(&["汤", "散", "饮", "丸", "方", "颗粒", "合"])
}

fn default_prescription_modifiers() -> Vec<String> {
    strings(&["加减", "加味"])
}

fn default_prescription_addition_marker() -> String {
    "加".to_string()
}

fn default_treatment_hints() -> Vec<String> {
    strings(&[
        "解表", "止咳", "宣肺", "清热", "祛湿", "化痰", "滋阴", "益气", "温", "补", "活血", "通络",
    ])
}

fn default_disease_title_pattern() -> String {
    r"^考点\s*(\d+)[★☆\s]*(.+)$".to_string()
}

fn default_stray_title_prefix() -> String {
    "考点".to_string()
}

fn default_pulse_pattern() -> String {
    r"(脉[^，。；;]*)".to_string()
}

fn default_clause_marks() -> Vec<char> {
    vec!['，', '。']
}

fn default_sentence_end_marks() -> Vec<char> {
    vec!['。']
}

fn default_symptom_separators() -> Vec<char> {
    vec!['，', ',', '、', '；', ';', '。']
}

fn default_alternative_marker() -> String {
    "或".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Label words, hints and patterns the classifier votes with
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    /// Length and count limits used by the entry parser
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Constants written into records
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Literal field labels that are skipped rather than treated as content
    #[serde(default = "default_header_words")]
    pub header_words: Vec<String>,

    /// Regex patterns; a fragment matching any of them is dropped as noise
    #[serde(default = "default_noise_patterns")]
    pub noise_patterns: Vec<String>,

    /// Endings that mark a token as a formula name (汤, 散, ...)
    #[serde(default = "default_prescription_hints")]
    pub prescription_hints: Vec<String>,

    /// Trailing modifiers ignored before checking prescription endings
    #[serde(default = "default_prescription_modifiers")]
    pub prescription_modifiers: Vec<String>,

    /// Marker of an added-herb tail (小青龙汤加石膏); the part before it is
    /// checked for a formula ending
    #[serde(default = "default_prescription_addition_marker")]
    pub prescription_addition_marker: String,

    /// Fragments of treatment verbs (解表, 清热, ...)
    #[serde(default = "default_treatment_hints")]
    pub treatment_hints: Vec<String>,

    /// Disease title regex; capture group 2 is the title tail
    #[serde(default = "default_disease_title_pattern")]
    pub disease_title_pattern: String,

    /// Prefix of stray title-like lines skipped inside a section
    #[serde(default = "default_stray_title_prefix")]
    pub stray_title_prefix: String,

    /// Pulse description regex; capture group 1 is the description
    #[serde(default = "default_pulse_pattern")]
    pub pulse_pattern: String,

    /// Clause punctuation probed in the token after a syndrome name
    #[serde(default = "default_clause_marks")]
    pub clause_marks: Vec<char>,

    /// Marks that close a sentence
    #[serde(default = "default_sentence_end_marks")]
    pub sentence_end_marks: Vec<char>,

    /// Separators for splitting symptom text into items
    #[serde(default = "default_symptom_separators")]
    pub symptom_separators: Vec<char>,

    /// Word separating a primary formula from its alternative
    #[serde(default = "default_alternative_marker")]
    pub alternative_marker: String,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            header_words: default_header_words(),
            noise_patterns: default_noise_patterns(),
            prescription_hints: default_prescription_hints(),
            prescription_modifiers: default_prescription_modifiers(),
            prescription_addition_marker: default_prescription_addition_marker(),
            treatment_hints: default_treatment_hints(),
            disease_title_pattern: default_disease_title_pattern(),
            stray_title_prefix: default_stray_title_prefix(),
            pulse_pattern: default_pulse_pattern(),
            clause_marks: default_clause_marks(),
            sentence_end_marks: default_sentence_end_marks(),
            symptom_separators: default_symptom_separators(),
            alternative_marker: default_alternative_marker(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Longest token (in chars) still considered a short label
    pub short_token_max_chars: usize,
    /// Longest token (in chars) that can be a treatment phrase
    pub treatment_max_chars: usize,
    /// Maximum number of tokens joined into a syndrome name
    pub name_max_tokens: usize,
    /// Pathogenesis stops at a sentence end once this many chars are collected
    pub pathogenesis_min_chars: usize,
    /// Treatment stops once this many chars are collected
    pub treatment_stop_chars: usize,
    /// Maximum number of tokens joined into a prescription
    pub prescription_max_tokens: usize,
    /// Number of leading symptom items flagged as key
    pub key_item_count: usize,
    /// Number of symptom items joined into a disease's key symptoms
    pub summary_item_count: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            short_token_max_chars: 8,
            treatment_max_chars: 16,
            name_max_tokens: 3,
            pathogenesis_min_chars: 6,
            treatment_stop_chars: 12,
            prescription_max_tokens: 3,
            key_item_count: 3,
            summary_item_count: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// "To be supplemented" marker for fields that could not be extracted
    pub placeholder: String,
    pub prescription_placeholder: String,
    pub category: String,
    pub key_symptom_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            placeholder: "待补充".to_string(),
            prescription_placeholder: "待补充方药".to_string(),
            category: "内科".to_string(),
            key_symptom_separator: "、".to_string(),
        }
    }
}

impl ParsingConfig {
    /// Load config from file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ParsingConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                eprintln!("⚠️  Failed to load config from {}, using defaults: {}", p, e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "thresholds:\n  short_token_max_chars: 10\noutput:\n  category: 外科\n";
        let config: ParsingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.thresholds.short_token_max_chars, 10);
        assert_eq!(config.thresholds.treatment_max_chars, 16);
        assert_eq!(config.output.category, "外科");
        assert_eq!(config.output.placeholder, "待补充");
        assert_eq!(config.vocabulary.header_words.len(), 5);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config: ParsingConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.vocabulary.alternative_marker, "或");
        assert_eq!(config.vocabulary.stray_title_prefix, "考点");
        assert_eq!(config.thresholds.prescription_max_tokens, 3);
    }

    #[test]
    fn test_load_with_fallback_on_missing_file() {
        let config = ParsingConfig::load_with_fallback(Some("/nonexistent/tcmkb.yaml"));
        assert_eq!(config.output.prescription_placeholder, "待补充方药");
    }
}
