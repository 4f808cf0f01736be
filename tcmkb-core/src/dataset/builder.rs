use crate::config::{OutputConfig, ParsingConfig};
use crate::error::ImportError;
use crate::rules::{EntryParseOutcome, SectionSplit};
use crate::types::*;
use regex::Regex;

/// Assigns identifiers and derives the per-disease summary fields.
pub struct DatasetBuilder {
    pulse: Regex,
    output: OutputConfig,
    summary_item_count: usize,
}

impl DatasetBuilder {
    pub fn new(config: &ParsingConfig) -> Result<Self, ImportError> {
        let pulse = Regex::new(&config.vocabulary.pulse_pattern).map_err(|source| {
            ImportError::InvalidPattern {
                field: "pulse_pattern",
                source,
            }
        })?;

        Ok(Self {
            pulse,
            output: config.output.clone(),
            summary_item_count: config.thresholds.summary_item_count,
        })
    }

    /// Walk the sections in order, parsing each with `parse_section`.
    ///
    /// Disease ids count accepted diseases only, so a skipped section leaves
    /// no gap. Warnings come out in the order their cause appears in the
    /// source: a dropped empty title is reported where it was closed.
    pub fn build<F>(&self, split: &SectionSplit, mut parse_section: F) -> Dataset
    where
        F: FnMut(&Section) -> EntryParseOutcome,
    {
        let mut dataset = Dataset::default();
        let mut skipped = split.skipped_titles.iter().peekable();

        for (position, section) in split.sections.iter().enumerate() {
            while let Some(title) = skipped.next_if(|t| t.sections_before <= position) {
                dataset
                    .warnings
                    .push(ImportWarning::disease_skipped(&title.disease_name));
            }

            let outcome = parse_section(section);
            dataset.warnings.extend(outcome.warnings);

            if outcome.drafts.is_empty() {
                dataset
                    .warnings
                    .push(ImportWarning::disease_skipped(&section.disease_name));
                continue;
            }

            let disease_id = format!("D{:03}", dataset.diseases.len() + 1);
            let syndromes: Vec<Syndrome> = outcome
                .drafts
                .into_iter()
                .enumerate()
                .map(|(index, draft)| Syndrome {
                    syndrome_id: format!("{}_S{:02}", disease_id, index + 1),
                    disease_id: disease_id.clone(),
                    syndrome_name: draft.syndrome_name,
                    symptoms: draft.symptoms,
                    pathogenesis: draft.pathogenesis,
                    treatment_method: draft.treatment_method,
                    prescription: draft.prescription,
                    key_symptom_analysis: Vec::new(),
                })
                .collect();

            dataset.diseases.push(Disease {
                disease_id,
                disease_name: section.disease_name.clone(),
                key_symptoms: self.key_symptoms(&syndromes[0]),
                key_pulse: self.key_pulse(&syndromes[0]),
                category: self.output.category.clone(),
                related_diseases: Vec::new(),
                syndromes: syndromes.iter().map(|s| s.syndrome_id.clone()).collect(),
            });
            dataset.syndromes.extend(syndromes);
        }

        for title in skipped {
            dataset
                .warnings
                .push(ImportWarning::disease_skipped(&title.disease_name));
        }

        dataset
    }

    fn key_symptoms(&self, first: &Syndrome) -> String {
        let items: Vec<&str> = first
            .symptoms
            .items
            .iter()
            .take(self.summary_item_count)
            .map(|item| item.text.as_str())
            .collect();
        non_empty_or(
            &items.join(self.output.key_symptom_separator.as_str()),
            &self.output.placeholder,
        )
    }

    fn key_pulse(&self, first: &Syndrome) -> String {
        self.pulse
            .captures(&first.symptoms.full_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| self.output.placeholder.clone())
    }
}
