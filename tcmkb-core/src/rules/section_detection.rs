use crate::classifier::{is_word_char, LineClassifier};
use crate::types::Section;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// Parenthetical annotations such as （重点） or (补充) after a title
static ANNOTATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[（(].*?[）)]").unwrap());

const DECORATION: char = '★';

/// Disease name from a title tail: annotations and decoration removed, then
/// the leading run of word characters.
pub fn extract_disease_name(title_tail: &str) -> String {
    let without_notes = ANNOTATION_REGEX.replace_all(title_tail, "");
    let title = without_notes.replace(DECORATION, "");
    let title = title.trim();

    let leading: String = title.chars().take_while(|&c| is_word_char(c)).collect();
    if leading.is_empty() {
        title.to_string()
    } else {
        leading
    }
}

/// A title that was closed by the next title before any line arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTitle {
    pub disease_name: String,
    /// Number of sections emitted before this title was dropped
    pub sections_before: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionSplit {
    pub sections: Vec<Section>,
    pub skipped_titles: Vec<SkippedTitle>,
}

struct OpenSection {
    disease_name: String,
    lines: Vec<String>,
}

// SectionSplitter - carves the normalized line stream into disease sections
pub struct SectionSplitter<'a> {
    classifier: &'a LineClassifier,
}

impl<'a> SectionSplitter<'a> {
    pub fn new(classifier: &'a LineClassifier) -> Self {
        Self { classifier }
    }

    /// Single forward pass. Lines before the first title are discarded and a
    /// title needs at least one following line to become a section.
    pub fn split(&self, lines: &[String]) -> SectionSplit {
        let mut split = SectionSplit::default();
        let mut current: Option<OpenSection> = None;

        for line in lines {
            if let Some(tail) = self.classifier.title_tail(line) {
                if let Some(open) = current.take() {
                    if open.lines.is_empty() {
                        split.skipped_titles.push(SkippedTitle {
                            disease_name: open.disease_name,
                            sections_before: split.sections.len(),
                        });
                    } else {
                        split.sections.push(Section {
                            disease_name: open.disease_name,
                            lines: open.lines,
                        });
                    }
                }

                // A title whose name comes out empty swallows its lines
                let disease_name = extract_disease_name(tail);
                if !disease_name.is_empty() {
                    current = Some(OpenSection {
                        disease_name,
                        lines: Vec::new(),
                    });
                }
                continue;
            }

            if let Some(open) = current.as_mut() {
                open.lines.push(line.clone());
            }
        }

        // Trailing title without content is dropped silently
        if let Some(open) = current {
            if !open.lines.is_empty() {
                split.sections.push(Section {
                    disease_name: open.disease_name,
                    lines: open.lines,
                });
            }
        }

        split
    }
}
