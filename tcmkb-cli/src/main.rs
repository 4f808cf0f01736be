use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::{Path, PathBuf};

// Import from tcmkb-core
use tcmkb_core::{DebugConfig, DocumentProcessor, ParsingConfig, PipelineStages};

const USAGE: &str = "用法: tcmkb <docx_path> <output_dir>";

#[derive(Parser)]
#[command(name = "tcmkb")]
#[command(version)]
#[command(about = "Import a syndrome study guide (.docx) into disease and syndrome JSON")]
struct Args {
    /// Path to the .docx file to import
    source: PathBuf,

    /// Directory for diseases.json, syndromes.json and report.json (created if missing)
    output_dir: PathBuf,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Dump all intermediate pipeline stage outputs to a directory
    /// Captures: fragments, classified lines, sections, and the final dataset
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output (default: test_outputs/stages)
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Trace lines matching these patterns (regex, or plain text when the regex is invalid)
    #[arg(long = "debug-filter", num_args = 1..)]
    debug_filter: Vec<String>,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("{err}");
            println!("{USAGE}");
            std::process::exit(1);
        }
    };

    println!("🦀 TCM Knowledge Base Importer");

    // Check if input file exists
    if !args.source.is_file() {
        println!("文件不存在: {}", absolute(&args.source).display());
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("❌ Import failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let source = absolute(&args.source);

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("failed to create output directory {}", args.output_dir.display())
    })?;
    let output_dir = absolute(&args.output_dir);

    // Load config using new functional pattern
    let config = ParsingConfig::load_with_fallback(args.config.as_deref());
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    let mut processor = DocumentProcessor::new(config)?;
    if !args.debug_filter.is_empty() {
        processor.set_debug_config(DebugConfig::new(true, args.debug_filter.clone()));
    }

    // Stage dump mode: capture and save all intermediates, then reuse the dataset
    let dataset = if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        let stages = processor.process_document_capture_stages(&source)?;
        save_stages(&stages, &source, &args.stages_dir)?;
        println!("\n✅ All stages dumped to: {}", args.stages_dir);
        stages.dataset
    } else {
        processor.process_document_with_profiling(&source, args.profile)?
    };

    let artifacts = dataset.save_to_dir(&output_dir, &source.display().to_string())?;

    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("导入完成: {}", file_name);
    println!("- 病种: {}", dataset.diseases.len());
    println!("- 证型: {}", dataset.syndromes.len());
    println!("- 警告: {}", dataset.warnings.len());
    println!("- 输出目录: {}", output_dir.display());
    println!("- 报告文件: {}", artifacts.report.display());

    Ok(())
}

/// Absolute form of `path` for reporting; falls back to the path as given.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn save_stages(stages: &PipelineStages, source: &Path, output_dir: &str) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;

    // Stage 1: Raw fragments
    let fragments_path = format!("{}/stage1_fragments.json", output_dir);
    fs::write(&fragments_path, serde_json::to_string_pretty(&stages.fragments)?)?;
    println!("  💾 {} ({} fragments)", fragments_path, stages.fragments.len());

    // Stage 2: Normalized lines with roles
    let lines_path = format!("{}/stage2_lines.json", output_dir);
    fs::write(&lines_path, serde_json::to_string_pretty(&stages.lines)?)?;
    println!("  💾 {} ({} lines)", lines_path, stages.lines.len());

    // Stage 3: Disease sections
    let sections_path = format!("{}/stage3_sections.json", output_dir);
    fs::write(&sections_path, serde_json::to_string_pretty(&stages.sections)?)?;
    println!("  💾 {} ({} sections)", sections_path, stages.sections.sections.len());

    // Stage 4: Final dataset
    let dataset_path = format!("{}/stage4_dataset.json", output_dir);
    fs::write(&dataset_path, serde_json::to_string_pretty(&stages.dataset)?)?;
    println!(
        "  💾 {} ({} diseases, {} syndromes)",
        dataset_path,
        stages.dataset.diseases.len(),
        stages.dataset.syndromes.len()
    );

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "source": source.display().to_string(),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "fragments": stages.fragments.len(),
            "lines": stages.lines.len(),
            "sections": stages.sections.sections.len(),
            "skipped_titles": stages.sections.skipped_titles.len(),
            "diseases": stages.dataset.diseases.len(),
            "syndromes": stages.dataset.syndromes.len(),
            "warnings": stages.dataset.warnings.len(),
        }
    });
    let summary_path = format!("{}/summary.json", output_dir);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path);

    Ok(())
}
