use super::cursor::LineCursor;
use crate::classifier::LineClassifier;
use crate::config::ParsingConfig;
use crate::types::{non_empty_or, ImportWarning, Prescription, SyndromeDraft, Symptoms};

/// Result of scanning one field from the front of the remaining lines.
///
/// `consumed` counts every line the cursor moves past, including skipped
/// header words; `token_count` counts only the lines that went into `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldScan {
    pub consumed: usize,
    pub token_count: usize,
    pub text: String,
}

impl FieldScan {
    fn take(&mut self, token: &str) {
        self.text.push_str(token);
        self.token_count += 1;
        self.consumed += 1;
    }

    fn skip(&mut self) {
        self.consumed += 1;
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Drafts parsed from one section plus the entries that were given up on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryParseOutcome {
    pub drafts: Vec<SyndromeDraft>,
    pub warnings: Vec<ImportWarning>,
}

// EntryParser - splits a disease section into syndrome drafts.
//
// Each scanner below is a pure function of the remaining lines. A stop
// condition either fires before the token is taken (the next field sees the
// same token) or right after taking it; which one is part of each field's
// contract.
pub struct EntryParser<'a> {
    classifier: &'a LineClassifier,
    config: &'a ParsingConfig,
}

impl<'a> EntryParser<'a> {
    pub fn new(classifier: &'a LineClassifier, config: &'a ParsingConfig) -> Self {
        Self { classifier, config }
    }

    pub fn parse(&self, disease_name: &str, lines: &[String]) -> EntryParseOutcome {
        let mut outcome = EntryParseOutcome::default();
        let mut cursor = LineCursor::new(lines);

        while let Some(line) = cursor.peek() {
            if self.classifier.is_header_word(line)
                || self.classifier.looks_like_new_disease(line)
                || self.classifier.is_stray_title(line)
            {
                cursor.advance();
                continue;
            }
            if !self.classifier.could_be_new_syndrome(cursor.remaining(), 0) {
                cursor.advance();
                continue;
            }

            let name = self.scan_name(cursor.remaining());
            cursor.advance_by(name.consumed);

            let symptoms = self.scan_symptoms(cursor.remaining());
            cursor.advance_by(symptoms.consumed);
            if symptoms.token_count == 0 {
                outcome
                    .warnings
                    .push(ImportWarning::entry_skipped(disease_name, &name.text));
                continue;
            }

            let pathogenesis = self.scan_pathogenesis(cursor.remaining());
            cursor.advance_by(pathogenesis.consumed);

            let treatment = self.scan_treatment(cursor.remaining());
            cursor.advance_by(treatment.consumed);

            let prescription = self.scan_prescription(cursor.remaining());
            cursor.advance_by(prescription.consumed);

            outcome.drafts.push(self.build_draft(
                name.text,
                &symptoms.text,
                &pathogenesis.text,
                &treatment.text,
                &prescription.text,
            ));
        }

        outcome
    }

    fn build_draft(
        &self,
        syndrome_name: String,
        symptoms: &str,
        pathogenesis: &str,
        treatment: &str,
        prescription: &str,
    ) -> SyndromeDraft {
        let vocabulary = &self.config.vocabulary;
        let output = &self.config.output;

        let mut strip = vocabulary.clause_marks.clone();
        strip.extend(vocabulary.sentence_end_marks.iter().copied());

        SyndromeDraft {
            syndrome_name,
            symptoms: Symptoms::from_full_text(
                symptoms,
                &vocabulary.symptom_separators,
                self.config.thresholds.key_item_count,
                &output.placeholder,
            ),
            pathogenesis: non_empty_or(pathogenesis, &output.placeholder),
            treatment_method: non_empty_or(treatment, &output.placeholder),
            prescription: Prescription::from_text(
                prescription,
                &strip,
                &vocabulary.alternative_marker,
                &output.prescription_placeholder,
            ),
        }
    }

    /// Boundary token plus following short words, up to the configured
    /// maximum. Stops after a word whose follower carries clause punctuation.
    pub fn scan_name(&self, rest: &[String]) -> FieldScan {
        let c = self.classifier;
        let mut scan = FieldScan::default();
        let Some(first) = rest.first() else {
            return scan;
        };
        scan.take(first);

        while let Some(token) = rest.get(scan.consumed) {
            if !c.is_short_token(token) || scan.token_count >= self.config.thresholds.name_max_tokens {
                break;
            }
            if c.is_header_word(token) || c.looks_like_treatment(token) || c.looks_like_prescription(token) {
                break;
            }
            scan.take(token);
            if rest.get(scan.consumed).is_some_and(|next| c.has_clause_mark(next)) {
                break;
            }
        }

        scan
    }

    pub fn scan_symptoms(&self, rest: &[String]) -> FieldScan {
        let c = self.classifier;
        let mut scan = FieldScan::default();

        while let Some(token) = rest.get(scan.consumed) {
            if c.is_header_word(token) {
                scan.skip();
                continue;
            }
            if c.looks_like_new_disease(token) {
                break;
            }
            if scan.token_count > 0 && c.could_be_new_syndrome(rest, scan.consumed) {
                break;
            }
            scan.take(token);
            if c.has_sentence_end(token) {
                break;
            }
        }

        scan
    }

    pub fn scan_pathogenesis(&self, rest: &[String]) -> FieldScan {
        let c = self.classifier;
        let min_chars = self.config.thresholds.pathogenesis_min_chars;
        let mut scan = FieldScan::default();

        while let Some(token) = rest.get(scan.consumed) {
            if c.is_header_word(token) {
                scan.skip();
                continue;
            }
            if scan.token_count > 0 && c.looks_like_treatment(token) {
                break;
            }
            if c.looks_like_new_disease(token) || c.could_be_new_syndrome(rest, scan.consumed) {
                break;
            }
            scan.take(token);
            if c.has_sentence_end(token) && scan.char_count() >= min_chars {
                break;
            }
        }

        scan
    }

    pub fn scan_treatment(&self, rest: &[String]) -> FieldScan {
        let c = self.classifier;
        let stop_chars = self.config.thresholds.treatment_stop_chars;
        let mut scan = FieldScan::default();

        while let Some(token) = rest.get(scan.consumed) {
            if c.is_header_word(token) {
                scan.skip();
                continue;
            }
            if c.looks_like_prescription(token) {
                break;
            }
            if c.looks_like_new_disease(token) || c.could_be_new_syndrome(rest, scan.consumed) {
                break;
            }
            scan.take(token);
            if scan.char_count() >= stop_chars {
                break;
            }
        }

        scan
    }

    pub fn scan_prescription(&self, rest: &[String]) -> FieldScan {
        let c = self.classifier;
        let max_tokens = self.config.thresholds.prescription_max_tokens;
        let mut scan = FieldScan::default();

        while let Some(token) = rest.get(scan.consumed) {
            if c.is_header_word(token) {
                scan.skip();
                continue;
            }
            if c.looks_like_new_disease(token) || c.could_be_new_syndrome(rest, scan.consumed) {
                break;
            }
            scan.take(token);
            if scan.token_count >= max_tokens {
                break;
            }
            if c.looks_like_prescription(&scan.text) && c.could_be_new_syndrome(rest, scan.consumed) {
                break;
            }
        }

        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn parse(values: &[&str]) -> EntryParseOutcome {
        let config = ParsingConfig::default();
        let classifier = LineClassifier::new(&config).unwrap();
        EntryParser::new(&classifier, &config).parse("感冒", &lines(values))
    }

    fn with_parser<R>(f: impl FnOnce(&EntryParser) -> R) -> R {
        let config = ParsingConfig::default();
        let classifier = LineClassifier::new(&config).unwrap();
        let parser = EntryParser::new(&classifier, &config);
        f(&parser)
    }

    #[test]
    fn test_single_entry_all_fields() {
        let outcome = parse(&[
            "风寒证",
            "恶寒发热，鼻塞流涕。",
            "外感风寒，卫表不和。",
            "解表散寒，宣肺止咳",
            "麻黄汤",
        ]);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.drafts.len(), 1);

        let draft = &outcome.drafts[0];
        assert_eq!(draft.syndrome_name, "风寒证");
        assert_eq!(draft.symptoms.full_text, "恶寒发热，鼻塞流涕。");
        assert_eq!(draft.pathogenesis, "外感风寒，卫表不和。");
        assert_eq!(draft.treatment_method, "解表散寒，宣肺止咳");
        assert_eq!(draft.prescription.primary, "麻黄汤");
        assert_eq!(draft.prescription.alternative, None);
    }

    #[test]
    fn test_labelled_entries_with_headers() {
        let outcome = parse(&[
            "证型",
            "风寒束表",
            "证候",
            "恶寒重，发热轻，无汗，脉浮紧。",
            "证机概要",
            "风寒外束，卫阳被郁。",
            "治法",
            "辛温解表",
            "方药",
            "荆防败毒散",
            "风热犯表",
            "身热较著，微恶风，脉浮数。",
            "风热犯表，热郁肌腠。",
            "辛凉解表",
            "银翘散或葱豉桔梗汤",
        ]);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.drafts.len(), 2);

        let first = &outcome.drafts[0];
        assert_eq!(first.syndrome_name, "风寒束表");
        assert_eq!(first.symptoms.full_text, "恶寒重，发热轻，无汗，脉浮紧。");
        assert_eq!(first.pathogenesis, "风寒外束，卫阳被郁。");
        assert_eq!(first.treatment_method, "辛温解表");
        assert_eq!(first.prescription.primary, "荆防败毒散");

        let second = &outcome.drafts[1];
        assert_eq!(second.syndrome_name, "风热犯表");
        assert_eq!(second.treatment_method, "辛凉解表");
        assert_eq!(second.prescription.primary, "银翘散");
        assert_eq!(second.prescription.alternative.as_deref(), Some("葱豉桔梗汤"));
    }

    #[test]
    fn test_entry_without_symptoms_is_skipped_with_warning() {
        let outcome = parse(&["风寒证", "证候"]);
        assert!(outcome.drafts.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].to_string(), "感冒-风寒证: 未识别到证候，已跳过");
    }

    #[test]
    fn test_short_followers_join_the_name() {
        let outcome = parse(&["风寒", "束表"]);
        assert!(outcome.drafts.is_empty());
        assert_eq!(outcome.warnings[0].syndrome.as_deref(), Some("风寒束表"));
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let outcome = parse(&["风寒证", "恶寒发热，鼻塞流涕。"]);
        let draft = &outcome.drafts[0];
        assert_eq!(draft.pathogenesis, "待补充");
        assert_eq!(draft.treatment_method, "待补充");
        assert_eq!(draft.prescription.primary, "待补充方药");
        assert_eq!(draft.prescription.alternative, None);
    }

    #[test]
    fn test_pathogenesis_stops_before_treatment_phrase() {
        let outcome = parse(&[
            "风寒证",
            "恶寒发热。",
            "外感风寒，肺气失于宣降",
            "宣肺止咳",
            "麻黄汤",
        ]);
        let draft = &outcome.drafts[0];
        assert_eq!(draft.pathogenesis, "外感风寒，肺气失于宣降");
        assert_eq!(draft.treatment_method, "宣肺止咳");
        assert_eq!(draft.prescription.primary, "麻黄汤");
    }

    #[test]
    fn test_modified_formula_ends_treatment() {
        let outcome = parse(&[
            "风寒证",
            "恶寒发热。",
            "外感风寒，卫表不和。",
            "辛温解表",
            "逍遥散加味",
        ]);
        let draft = &outcome.drafts[0];
        assert_eq!(draft.treatment_method, "辛温解表");
        assert_eq!(draft.prescription.primary, "逍遥散加味");

        let outcome = parse(&[
            "外寒内饮证",
            "恶寒发热，喘咳。",
            "外寒束表，内有痰浊。",
            "解表化痰",
            "小青龙汤加石膏",
        ]);
        let draft = &outcome.drafts[0];
        assert_eq!(draft.treatment_method, "解表化痰");
        assert_eq!(draft.prescription.primary, "小青龙汤加石膏");
    }

    #[test]
    fn test_treatment_consumes_until_length_reached() {
        let outcome = parse(&[
            "风寒证",
            "恶寒发热。",
            "风寒袭肺，肺气失宣。",
            "温散风寒",
            "宣肺止咳",
            "化痰平喘",
            "杏苏散",
        ]);
        let draft = &outcome.drafts[0];
        assert_eq!(draft.treatment_method, "温散风寒宣肺止咳化痰平喘");
        assert_eq!(draft.prescription.primary, "杏苏散");
    }

    #[test]
    fn test_prescription_capped_at_three_tokens() {
        let outcome = parse(&[
            "风寒证",
            "恶寒发热。",
            "外感风寒，卫表不和。",
            "辛温解表",
            "麻黄汤，",
            "加杏仁，",
            "甘草，",
            "生姜",
        ]);
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].prescription.primary, "麻黄汤加杏仁甘草");
    }

    #[test]
    fn test_stray_titles_and_headers_skipped_before_entry() {
        let outcome = parse(&[
            "考点说明",
            "方药",
            "风寒证",
            "恶寒发热。",
        ]);
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].syndrome_name, "风寒证");
    }

    #[test]
    fn test_symptoms_stop_at_title_without_consuming() {
        with_parser(|parser| {
            let scan = parser.scan_symptoms(&lines(&["恶寒", "考点2咳嗽", "发热。"]));
            assert_eq!(scan.text, "恶寒");
            assert_eq!(scan.consumed, 1);
        });
    }

    #[test]
    fn test_symptoms_stop_at_next_syndrome_once_started() {
        with_parser(|parser| {
            let scan = parser.scan_symptoms(&lines(&["恶寒发热，头痛", "风热证", "身热，咽痛。"]));
            assert_eq!(scan.text, "恶寒发热，头痛");
            assert_eq!(scan.consumed, 1);
        });
    }

    #[test]
    fn test_symptoms_take_boundary_like_first_token() {
        with_parser(|parser| {
            let scan = parser.scan_symptoms(&lines(&["风热证", "身热，咽痛。"]));
            assert_eq!(scan.text, "风热证身热，咽痛。");
            assert_eq!(scan.consumed, 2);
        });
    }

    #[test]
    fn test_symptoms_skip_headers_but_count_them_consumed() {
        with_parser(|parser| {
            let scan = parser.scan_symptoms(&lines(&["证候", "治法"]));
            assert_eq!(scan.token_count, 0);
            assert_eq!(scan.consumed, 2);
        });
    }

    #[test]
    fn test_pathogenesis_short_sentence_keeps_going() {
        with_parser(|parser| {
            let scan = parser.scan_pathogenesis(&lines(&["风寒。", "卫表不和。", "辛温解表"]));
            assert_eq!(scan.text, "风寒。卫表不和。");
            assert_eq!(scan.consumed, 2);
        });
    }

    #[test]
    fn test_name_stops_when_follower_is_punctuated() {
        with_parser(|parser| {
            let scan = parser.scan_name(&lines(&["风寒", "束表", "恶寒，发热。", "其他"]));
            assert_eq!(scan.text, "风寒束表");
            assert_eq!(scan.consumed, 2);
        });
    }

    #[test]
    fn test_name_capped_at_three_tokens() {
        with_parser(|parser| {
            let scan = parser.scan_name(&lines(&["甲", "乙", "丙", "丁", "恶寒，发热。"]));
            assert_eq!(scan.text, "甲乙丙");
            assert_eq!(scan.consumed, 3);
        });
    }
}
