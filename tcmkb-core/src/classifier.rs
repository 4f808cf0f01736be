use crate::config::ParsingConfig;
use crate::error::ImportError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role of a single line, decided by the first predicate in
/// [`ROLE_PRIORITY`] that accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRole {
    Header,
    DiseaseTitle,
    Treatment,
    Prescription,
    ShortToken,
    Prose,
}

type RolePredicate = fn(&LineClassifier, &str) -> bool;

/// Priority table. Treatment and prescription outrank the short-token rule,
/// so a short formula name is never taken for a syndrome name.
const ROLE_PRIORITY: [(LineRole, RolePredicate); 5] = [
    (LineRole::Header, LineClassifier::is_header_word),
    (LineRole::DiseaseTitle, LineClassifier::looks_like_new_disease),
    (LineRole::Treatment, LineClassifier::looks_like_treatment),
    (LineRole::Prescription, LineClassifier::looks_like_prescription),
    (LineRole::ShortToken, LineClassifier::is_short_token),
];

/// Letters and digits of the source script: CJK unified ideographs
/// (U+4E00..=U+9FA5) plus ASCII alphanumerics.
pub fn is_word_char(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c) || c.is_ascii_alphanumeric()
}

/// Stateless line predicates used by the section splitter and entry parser.
pub struct LineClassifier {
    header_words: HashSet<String>,
    disease_title: Regex,
    stray_title_prefix: String,
    prescription_hints: Vec<String>,
    prescription_modifiers: Vec<String>,
    prescription_addition_marker: String,
    treatment_hints: Vec<String>,
    clause_marks: Vec<char>,
    sentence_end_marks: Vec<char>,
    short_token_max_chars: usize,
    treatment_max_chars: usize,
}

impl LineClassifier {
    pub fn new(config: &ParsingConfig) -> Result<Self, ImportError> {
        let vocabulary = &config.vocabulary;
        let disease_title = Regex::new(&vocabulary.disease_title_pattern).map_err(|source| {
            ImportError::InvalidPattern {
                field: "disease_title_pattern",
                source,
            }
        })?;

        Ok(Self {
            header_words: vocabulary.header_words.iter().cloned().collect(),
            disease_title,
            stray_title_prefix: vocabulary.stray_title_prefix.clone(),
            prescription_hints: vocabulary.prescription_hints.clone(),
            prescription_modifiers: vocabulary.prescription_modifiers.clone(),
            prescription_addition_marker: vocabulary.prescription_addition_marker.clone(),
            treatment_hints: vocabulary.treatment_hints.clone(),
            clause_marks: vocabulary.clause_marks.clone(),
            sentence_end_marks: vocabulary.sentence_end_marks.clone(),
            short_token_max_chars: config.thresholds.short_token_max_chars,
            treatment_max_chars: config.thresholds.treatment_max_chars,
        })
    }

    pub fn classify(&self, line: &str) -> LineRole {
        ROLE_PRIORITY
            .iter()
            .find(|(_, predicate)| predicate(self, line))
            .map(|(role, _)| *role)
            .unwrap_or(LineRole::Prose)
    }

    pub fn is_short_token(&self, line: &str) -> bool {
        !line.is_empty()
            && line.chars().count() <= self.short_token_max_chars
            && line.chars().all(is_word_char)
    }

    pub fn is_header_word(&self, line: &str) -> bool {
        self.header_words.contains(line)
    }

    /// Ends with a formula suffix such as 汤 or 散, ignoring trailing clause
    /// punctuation and a trailing modifier like 加减 or 加味. A formula
    /// followed by an added-herb tail (汤加石膏) also counts.
    pub fn looks_like_prescription(&self, line: &str) -> bool {
        let trimmed = line.trim_end_matches(|c: char| {
            self.clause_marks.contains(&c) || self.sentence_end_marks.contains(&c)
        });
        let stem = self
            .prescription_modifiers
            .iter()
            .find_map(|modifier| trimmed.strip_suffix(modifier.as_str()))
            .unwrap_or(trimmed);
        if self.has_formula_ending(stem) {
            return true;
        }

        let marker = self.prescription_addition_marker.as_str();
        !marker.is_empty()
            && stem
                .match_indices(marker)
                .any(|(idx, _)| idx > 0 && self.has_formula_ending(&stem[..idx]))
    }

    fn has_formula_ending(&self, text: &str) -> bool {
        self.prescription_hints
            .iter()
            .any(|hint| text.ends_with(hint.as_str()))
    }

    pub fn looks_like_treatment(&self, line: &str) -> bool {
        line.chars().count() <= self.treatment_max_chars
            && self
                .treatment_hints
                .iter()
                .any(|hint| line.contains(hint.as_str()))
    }

    pub fn looks_like_new_disease(&self, line: &str) -> bool {
        self.disease_title.is_match(line)
    }

    /// Text following the label, index and decoration of a title line.
    pub fn title_tail<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.disease_title
            .captures(line)
            .and_then(|caps| caps.get(2))
            .map(|tail| tail.as_str())
    }

    pub fn is_stray_title(&self, line: &str) -> bool {
        !self.stray_title_prefix.is_empty() && line.starts_with(&self.stray_title_prefix)
    }

    pub fn has_clause_mark(&self, line: &str) -> bool {
        line.chars().any(|c| self.clause_marks.contains(&c))
    }

    pub fn has_sentence_end(&self, line: &str) -> bool {
        line.chars().any(|c| self.sentence_end_marks.contains(&c))
    }

    /// A syndrome name may start at `idx`: the token is a short, unlabeled,
    /// non-field-like word, followed by punctuated prose or another short word.
    pub fn could_be_new_syndrome(&self, lines: &[String], idx: usize) -> bool {
        let Some(token) = lines.get(idx) else {
            return false;
        };
        if self.is_header_word(token) || !self.is_short_token(token) {
            return false;
        }
        if self.looks_like_treatment(token) || self.looks_like_prescription(token) {
            return false;
        }
        match lines.get(idx + 1) {
            Some(next) => self.has_clause_mark(next) || self.is_short_token(next),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new(&ParsingConfig::default()).unwrap()
    }

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_short_token() {
        let c = classifier();
        assert!(c.is_short_token("风寒证"));
        assert!(c.is_short_token("ABC123"));
        assert!(c.is_short_token("一二三四五六七八"));
        assert!(!c.is_short_token("一二三四五六七八九"));
        assert!(!c.is_short_token("恶寒，发热"));
        assert!(!c.is_short_token(""));
    }

    #[test]
    fn test_prescription_suffixes() {
        let c = classifier();
        assert!(c.looks_like_prescription("麻黄汤"));
        assert!(c.looks_like_prescription("银翘散"));
        assert!(c.looks_like_prescription("小柴胡汤或大柴胡汤"));
        assert!(c.looks_like_prescription("荆防败毒散加减"));
        assert!(c.looks_like_prescription("玉屏风颗粒。"));
        assert!(!c.looks_like_prescription("解表散寒，宣肺止咳"));
        assert!(!c.looks_like_prescription("风寒证"));
    }

    #[test]
    fn test_prescription_with_added_herbs() {
        let c = classifier();
        assert!(c.looks_like_prescription("逍遥散加味"));
        assert!(c.looks_like_prescription("小青龙汤加石膏"));
        assert!(c.looks_like_prescription("桂枝汤加葛根，"));
        assert!(!c.looks_like_prescription("加味"));
        assert!(!c.looks_like_prescription("温阳加强"));
        assert_eq!(c.classify("逍遥散加味"), LineRole::Prescription);
    }

    #[test]
    fn test_treatment_hints_and_length() {
        let c = classifier();
        assert!(c.looks_like_treatment("解表散寒，宣肺止咳"));
        assert!(c.looks_like_treatment("温补肾阳"));
        assert!(!c.looks_like_treatment("外感风寒，卫表不和。"));
        assert!(!c.looks_like_treatment("清热解毒清热解毒清热解毒清热解毒清"));
    }

    #[test]
    fn test_disease_title() {
        let c = classifier();
        assert!(c.looks_like_new_disease("考点1风寒感冒"));
        assert!(c.looks_like_new_disease("考点12★★咳嗽"));
        assert!(!c.looks_like_new_disease("考点风寒"));
        assert!(!c.looks_like_new_disease("风寒感冒"));
        assert_eq!(c.title_tail("考点3☆ 哮病（重点）"), Some("哮病（重点）"));
    }

    #[test]
    fn test_header_words_are_exact() {
        let c = classifier();
        assert!(c.is_header_word("证机概要"));
        assert!(!c.is_header_word("证机概要："));
    }

    #[test]
    fn test_classify_priority() {
        let c = classifier();
        assert_eq!(c.classify("治法"), LineRole::Header);
        assert_eq!(c.classify("考点1感冒"), LineRole::DiseaseTitle);
        assert_eq!(c.classify("温阳"), LineRole::Treatment);
        assert_eq!(c.classify("麻黄汤"), LineRole::Prescription);
        assert_eq!(c.classify("风寒证"), LineRole::ShortToken);
        assert_eq!(c.classify("恶寒发热，鼻塞流涕。"), LineRole::Prose);
    }

    #[test]
    fn test_new_syndrome_followed_by_prose() {
        let c = classifier();
        let block = lines(&["风寒证", "恶寒发热，鼻塞流涕。"]);
        assert!(c.could_be_new_syndrome(&block, 0));
        assert!(!c.could_be_new_syndrome(&block, 1));
    }

    #[test]
    fn test_new_syndrome_followed_by_short_token() {
        let c = classifier();
        assert!(c.could_be_new_syndrome(&lines(&["风寒", "束表"]), 0));
    }

    #[test]
    fn test_new_syndrome_rejects_field_like_tokens() {
        let c = classifier();
        assert!(!c.could_be_new_syndrome(&lines(&["证型", "恶寒，发热"]), 0));
        assert!(!c.could_be_new_syndrome(&lines(&["麻黄汤", "恶寒，发热"]), 0));
        assert!(!c.could_be_new_syndrome(&lines(&["温肺", "恶寒，发热"]), 0));
        // last token has nothing to look ahead at
        assert!(!c.could_be_new_syndrome(&lines(&["风寒证"]), 0));
        assert!(!c.could_be_new_syndrome(&lines(&["风寒证"]), 5));
    }

    #[test]
    fn test_new_syndrome_rejects_unpunctuated_long_follower() {
        let c = classifier();
        assert!(!c.could_be_new_syndrome(&lines(&["风寒证", "恶寒发热鼻塞流涕头痛身痛"]), 0));
    }
}
