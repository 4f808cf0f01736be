use serde::{Deserialize, Serialize};
use std::fmt;

// ===== INTERMEDIATE TYPES =====
// Sections and drafts are transient: produced and consumed inside one
// pipeline run. Only the records, warnings and report outlive it.

/// Lines belonging to one disease, between its title and the next title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub disease_name: String,
    pub lines: Vec<String>,
}

/// One clause of a symptom description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomItem {
    pub text: String,
    pub is_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptoms {
    pub full_text: String,
    pub items: Vec<SymptomItem>,
}

impl Symptoms {
    /// Build from the joined symptom text. The text is replaced by the
    /// placeholder when blank, and the first `key_count` clauses are flagged.
    pub fn from_full_text(
        full_text: &str,
        separators: &[char],
        key_count: usize,
        placeholder: &str,
    ) -> Self {
        let full_text = non_empty_or(full_text, placeholder);

        let clauses: Vec<&str> = full_text
            .split(|c: char| separators.contains(&c))
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .collect();

        let items = if clauses.is_empty() {
            vec![SymptomItem {
                text: placeholder.to_string(),
                is_key: true,
            }]
        } else {
            let key_limit = key_count.min(clauses.len());
            clauses
                .into_iter()
                .enumerate()
                .map(|(index, clause)| SymptomItem {
                    text: clause.to_string(),
                    is_key: index < key_limit,
                })
                .collect()
        };

        Self { full_text, items }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub primary: String,
    /// Serialized as `null` when absent
    pub alternative: Option<String>,
}

impl Prescription {
    /// Split a raw prescription run into primary and alternative formulas.
    ///
    /// Clause punctuation in `strip` is removed first. When the text splits on
    /// `marker` into at least two non-empty parts, the first is the primary and
    /// the second the alternative; otherwise the whole text is the primary.
    pub fn from_text(text: &str, strip: &[char], marker: &str, placeholder: &str) -> Self {
        let cleaned: String = text.chars().filter(|c| !strip.contains(c)).collect();

        if cleaned.contains(marker) {
            let parts: Vec<&str> = cleaned
                .split(marker)
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect();
            if parts.len() >= 2 {
                return Self {
                    primary: parts[0].to_string(),
                    alternative: Some(parts[1].to_string()),
                };
            }
        }

        Self {
            primary: non_empty_or(&cleaned, placeholder),
            alternative: None,
        }
    }
}

/// One syndrome's five fields before identifiers are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyndromeDraft {
    pub syndrome_name: String,
    pub symptoms: Symptoms,
    pub pathogenesis: String,
    pub treatment_method: String,
    pub prescription: Prescription,
}

// ===== OUTPUT RECORDS =====

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    pub disease_id: String,
    pub disease_name: String,
    pub key_symptoms: String,
    pub key_pulse: String,
    pub category: String,
    /// Reserved for later enrichment; always empty here
    pub related_diseases: Vec<String>,
    pub syndromes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syndrome {
    pub syndrome_id: String,
    pub disease_id: String,
    pub syndrome_name: String,
    pub symptoms: Symptoms,
    pub pathogenesis: String,
    pub treatment_method: String,
    pub prescription: Prescription,
    /// Reserved for later enrichment; always empty here
    pub key_symptom_analysis: Vec<String>,
}

// ===== WARNINGS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A syndrome boundary was found but no symptom text followed it
    EntrySkipped,
    /// A disease produced no syndromes and was left out
    DiseaseSkipped,
}

/// Advisory diagnostic. Never blocks processing of later entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportWarning {
    pub kind: WarningKind,
    pub disease: String,
    pub syndrome: Option<String>,
}

impl ImportWarning {
    pub fn entry_skipped(disease: &str, syndrome: &str) -> Self {
        Self {
            kind: WarningKind::EntrySkipped,
            disease: disease.to_string(),
            syndrome: Some(syndrome.to_string()),
        }
    }

    pub fn disease_skipped(disease: &str) -> Self {
        Self {
            kind: WarningKind::DiseaseSkipped,
            disease: disease.to_string(),
            syndrome: None,
        }
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.syndrome) {
            (WarningKind::EntrySkipped, Some(syndrome)) => {
                write!(f, "{}-{}: 未识别到证候，已跳过", self.disease, syndrome)
            }
            (WarningKind::EntrySkipped, None) => {
                write!(f, "{}: 未识别到证候，已跳过", self.disease)
            }
            (WarningKind::DiseaseSkipped, _) => {
                write!(f, "{}: 未解析出证型，已跳过病种", self.disease)
            }
        }
    }
}

/// Everything the pipeline produces for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub diseases: Vec<Disease>,
    pub syndromes: Vec<Syndrome>,
    pub warnings: Vec<ImportWarning>,
}

impl Dataset {
    pub fn syndromes_of<'a>(&'a self, disease_id: &'a str) -> impl Iterator<Item = &'a Syndrome> {
        self.syndromes
            .iter()
            .filter(move |syndrome| syndrome.disease_id == disease_id)
    }

    pub fn to_report(&self, source: &str) -> ImportReport {
        ImportReport {
            source: source.to_string(),
            disease_count: self.diseases.len(),
            syndrome_count: self.syndromes.len(),
            warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Contents of `report.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub source: String,
    pub disease_count: usize,
    pub syndrome_count: usize,
    pub warnings: Vec<String>,
}

/// Trimmed `text`, or `placeholder` when nothing is left.
pub fn non_empty_or(text: &str, placeholder: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}
