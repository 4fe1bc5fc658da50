//! Command-line interface for codegrade.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{self, RubricConfig};
use crate::dispatch::Engine;
use crate::error::ScanError;
use crate::language::Language;
use crate::report::{self, ScanEntry, ScanSummary};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default input size bound (1 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

/// Directories `scan` never descends into.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "venv",
    ".venv",
    "__pycache__",
    "dist",
    "build",
];

const FORMATS: &[&str] = &["pretty", "json", "text"];

/// Rubric-based code quality scoring for Python and JavaScript.
///
/// Scores a source file from 0 to 100 across six categories (naming,
/// modularity, comments, formatting, reusability and best practices) and
/// lists what to fix.
#[derive(Parser)]
#[command(name = "codegrade")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by CODEGRADE_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a single file
    Analyze(AnalyzeArgs),
    /// Score every supported file under a directory
    Scan(ScanArgs),
    /// Write the default rubric as YAML
    Init(InitArgs),
}

/// Options shared by `analyze` and `scan`.
#[derive(Args)]
pub struct OutputArgs {
    /// Output format: pretty, json, or text
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to rubric YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum acceptable score (exit 1 if any file scores below it)
    #[arg(long)]
    pub min_score: Option<u32>,

    /// Refuse files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// File to score (.py, .js or .jsx)
    pub file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Directory to scan
    pub path: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "codegrade.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

fn check_format(format: &str) -> anyhow::Result<()> {
    if !FORMATS.contains(&format) {
        anyhow::bail!(
            "invalid format {:?}, must be 'pretty', 'json', or 'text'",
            format
        );
    }
    Ok(())
}

/// Load the rubric from `explicit`, or discover one in `search_dir`, or fall
/// back to the defaults. The result is validated.
pub fn load_config(explicit: Option<&Path>, search_dir: &Path) -> anyhow::Result<RubricConfig> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => RubricConfig::discover(search_dir)
            .or_else(|| RubricConfig::discover(Path::new("."))),
    };

    let config = match path {
        Some(p) => {
            tracing::debug!(config = %p.display(), "loading rubric");
            let config = RubricConfig::parse_file(&p)?;
            config::validate(&config).with_context(|| format!("invalid rubric {}", p.display()))?;
            config
        }
        None => RubricConfig::default(),
    };
    Ok(config)
}

/// Read a file, refusing anything larger than `max_bytes`.
pub fn read_bounded(path: &Path, max_bytes: u64) -> anyhow::Result<Vec<u8>> {
    let file = fs::File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut bytes = Vec::new();
    file.take(max_bytes.saturating_add(1))
        .read_to_end(&mut bytes)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if bytes.len() as u64 > max_bytes {
        anyhow::bail!(
            "{} is larger than {} bytes (raise --max-bytes to analyze it)",
            path.display(),
            max_bytes
        );
    }
    Ok(bytes)
}

/// Collect supported files under `root`, sorted by path.
pub fn collect_files(root: &Path, config: &RubricConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !(name.starts_with('.') || SKIPPED_DIRS.iter().any(|dir| name == *dir))
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() || Language::from_path(entry.path()).is_none() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if config.is_path_excluded(relative) {
            tracing::debug!(path = %relative.display(), "excluded by rubric");
            continue;
        }
        files.push(entry.path().to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    let out = &args.output;
    check_format(&out.format)?;

    let search_dir = args
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let config = load_config(out.config.as_deref(), search_dir)?;
    let bytes = read_bounded(&args.file, out.max_bytes)?;

    let path_str = args.file.to_string_lossy().to_string();
    let engine = Engine::new(config);
    let analysis = match engine.run(&path_str, &bytes) {
        Ok(analysis) => analysis,
        Err(err) => {
            if out.format == "json" {
                println!("{}", report::error_to_json(&err)?);
            } else {
                eprintln!("Error: {}: {}", err.code(), err);
            }
            return Ok(EXIT_ERROR);
        }
    };

    match out.format.as_str() {
        "json" => report::write_json(&analysis)?,
        "text" => report::write_text(&path_str, &analysis),
        _ => report::write_pretty(&path_str, &analysis, out.min_score),
    }

    match out.min_score {
        Some(min) if analysis.overall_score < min => Ok(EXIT_FAILED),
        _ => Ok(EXIT_SUCCESS),
    }
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    let out = &args.output;
    check_format(&out.format)?;

    let metadata = fs::metadata(&args.path)
        .with_context(|| format!("cannot access path {}", args.path.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!(
            "{} is not a directory (use 'codegrade analyze' for single files)",
            args.path.display()
        );
    }

    let config = load_config(out.config.as_deref(), &args.path)?;
    let files = collect_files(&args.path, &config)?;
    if files.is_empty() {
        eprintln!("Warning: no .py, .js or .jsx files found");
        return Ok(EXIT_SUCCESS);
    }

    let engine = Engine::new(config);
    let entries = scan_files(&engine, &args.path, &files, out.max_bytes);

    let summary = ScanSummary::from_entries(&entries);
    tracing::info!(
        files = summary.files,
        analyzed = summary.analyzed,
        errors = summary.errors,
        average = summary.average_score,
        "scan finished"
    );

    let root = args.path.to_string_lossy().to_string();
    match out.format.as_str() {
        "json" => report::write_scan_json(&entries)?,
        "text" => report::write_scan_text(&entries),
        _ => report::write_scan_pretty(&root, &entries, out.min_score),
    }

    match (out.min_score, summary.lowest_score) {
        (Some(min), Some(lowest)) if lowest < min => Ok(EXIT_FAILED),
        _ => Ok(EXIT_SUCCESS),
    }
}

/// Analyze `files` in parallel. Entries come back in the order of `files`,
/// with paths relative to `root`.
pub fn scan_files(engine: &Engine, root: &Path, files: &[PathBuf], max_bytes: u64) -> Vec<ScanEntry> {
    files
        .par_iter()
        .map(|file| {
            let path = file
                .strip_prefix(root)
                .unwrap_or(file)
                .to_string_lossy()
                .to_string();
            let result = match read_bounded(file, max_bytes) {
                Ok(bytes) => engine.run(&path, &bytes).map_err(ScanError::from),
                Err(e) => Err(ScanError::Read {
                    reason: format!("{:#}", e),
                }),
            };
            ScanEntry { path, result }
        })
        .collect()
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or pass --force to overwrite");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    fs::write(&args.output, default_rubric_yaml()?)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to tune weights and thresholds", args.output.display());
    println!("  2. Run: codegrade scan . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

/// The default rubric as commented YAML.
pub fn default_rubric_yaml() -> anyhow::Result<String> {
    let body = serde_yaml::to_string(&RubricConfig::default())?;
    Ok(format!(
        "# codegrade rubric\n#\n# Every field is optional; omitted fields keep these defaults.\n{}",
        body
    ))
}
