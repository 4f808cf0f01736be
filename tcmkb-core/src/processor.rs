use crate::config::ParsingConfig;
use crate::dataset::DatasetBuilder;
use crate::preprocessors::{DocxPreprocessor, Preprocessor};
use crate::rules::{ClassifiedLine, DebugConfig, RuleEngine, SectionSplit};
use crate::types::*;
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used for testing and diagnostics, e.g. by `--dump-stages`
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub fragments: Vec<String>,
    pub lines: Vec<ClassifiedLine>,
    pub sections: SectionSplit,
    pub dataset: Dataset,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        println!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

pub struct DocumentProcessor {
    preprocessor: Box<dyn Preprocessor>,
    rule_engine: RuleEngine,
    dataset_builder: DatasetBuilder,
}

impl DocumentProcessor {
    /// Create DocumentProcessor with full dependency injection
    pub fn new_with_dependencies(
        preprocessor: Box<dyn Preprocessor>,
        config: ParsingConfig,
    ) -> Result<Self> {
        let dataset_builder = DatasetBuilder::new(&config)?;
        Ok(Self {
            preprocessor,
            rule_engine: RuleEngine::new(config)?,
            dataset_builder,
        })
    }

    /// Word document pipeline with the given parsing config
    pub fn new(config: ParsingConfig) -> Result<Self> {
        Self::new_with_dependencies(Box::new(DocxPreprocessor::new()), config)
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.rule_engine.set_debug_config(debug_config);
    }

    pub fn config(&self) -> &ParsingConfig {
        self.rule_engine.config()
    }

    /// Pure part of the pipeline: fragments in, records and warnings out.
    pub fn process_fragments<S: AsRef<str>>(&self, fragments: &[S]) -> Dataset {
        let lines = self.rule_engine.normalize(fragments);
        let split = self.rule_engine.split_sections(&lines);
        self.dataset_builder
            .build(&split, |section| self.rule_engine.parse_section(section))
    }

    pub fn process_document(&self, input_path: &Path) -> Result<Dataset> {
        self.process_document_with_profiling(input_path, false)
    }

    /// Process document with per-stage timings when `enable_profiling` is set
    pub fn process_document_with_profiling(
        &self,
        input_path: &Path,
        enable_profiling: bool,
    ) -> Result<Dataset> {
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(enable_profiling);

        println!(
            "📄 Processing document with {} preprocessor: {}",
            self.preprocessor.name(),
            input_path.display()
        );
        if !self.preprocessor.supports_file_type(input_path) {
            println!("⚠️  Unexpected file extension, trying anyway");
        }

        let fragments = profiler.time_step("1. Document → Fragments", || {
            self.preprocessor.process_file(input_path)
        })?;
        println!("   ✅ {} text fragments", fragments.len());

        let lines = profiler.time_step("2. Normalize", || self.rule_engine.normalize(&fragments));
        println!("   ✅ {} lines after normalization", lines.len());

        let split = profiler.time_step("3. Section Split", || {
            self.rule_engine.split_sections(&lines)
        });
        println!("   ✅ {} disease sections", split.sections.len());

        let dataset = profiler.time_step("4. Entry Parsing + Assembly", || {
            self.dataset_builder
                .build(&split, |section| self.rule_engine.parse_section(section))
        });
        println!(
            "   ✅ {} diseases, {} syndromes, {} warnings",
            dataset.diseases.len(),
            dataset.syndromes.len(),
            dataset.warnings.len()
        );

        profiler.print_summary();
        println!(
            "⏱️  Total processing time: {:.0}ms",
            start_time.elapsed().as_millis()
        );
        Ok(dataset)
    }

    /// Run the pipeline and keep every intermediate boundary for inspection
    pub fn process_document_capture_stages(&self, input_path: &Path) -> Result<PipelineStages> {
        let fragments = self.preprocessor.process_file(input_path)?;
        let normalized = self.rule_engine.normalize(&fragments);
        let lines = self.rule_engine.classify_lines(&normalized);
        let sections = self.rule_engine.split_sections(&normalized);
        let dataset = self
            .dataset_builder
            .build(&sections, |section| self.rule_engine.parse_section(section));

        Ok(PipelineStages {
            fragments,
            lines,
            sections,
            dataset,
        })
    }
}
