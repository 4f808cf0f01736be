use crate::types::*;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DISEASES_FILE: &str = "diseases.json";
pub const SYNDROMES_FILE: &str = "syndromes.json";
pub const REPORT_FILE: &str = "report.json";

/// Paths of the three artifacts written by [`Dataset::save_to_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifacts {
    pub diseases: PathBuf,
    pub syndromes: PathBuf,
    pub report: PathBuf,
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

impl Dataset {
    /// Write diseases, syndromes and the import report into an existing
    /// directory. Files already there are overwritten.
    pub fn save_to_dir(&self, output_dir: &Path, source: &str) -> Result<SavedArtifacts> {
        let artifacts = SavedArtifacts {
            diseases: output_dir.join(DISEASES_FILE),
            syndromes: output_dir.join(SYNDROMES_FILE),
            report: output_dir.join(REPORT_FILE),
        };

        write_json(&artifacts.diseases, &self.diseases)?;
        write_json(&artifacts.syndromes, &self.syndromes)?;
        write_json(&artifacts.report, &self.to_report(source))?;

        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_three_files() {
        let dir = std::env::temp_dir().join("tcmkb_save_test");
        std::fs::create_dir_all(&dir).unwrap();

        let dataset = Dataset {
            warnings: vec![ImportWarning::disease_skipped("咳嗽")],
            ..Dataset::default()
        };
        let artifacts = dataset.save_to_dir(&dir, "内科.docx").unwrap();

        let diseases = std::fs::read_to_string(&artifacts.diseases).unwrap();
        assert_eq!(diseases.trim(), "[]");

        let report = std::fs::read_to_string(&artifacts.report).unwrap();
        // non-ASCII text is written as-is
        assert!(report.contains("咳嗽: 未解析出证型，已跳过病种"));
        let parsed: ImportReport = serde_json::from_str(&report).unwrap();
        assert_eq!(parsed.source, "内科.docx");
        assert_eq!(parsed.disease_count, 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = std::env::temp_dir().join("tcmkb_no_such_dir").join("nested");
        assert!(Dataset::default().save_to_dir(&dir, "x.docx").is_err());
    }
}
