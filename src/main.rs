use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dataset_loader::{
    save_dataset_json, DatasetFormat, DatasetLoader, DatasetRecord, LoaderConfig, OpinionScores,
    DEFAULT_INDENT,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "dataset-loader", version, about = "Load and check subjective-quality dataset files")]
struct Cli {
    /// Python interpreter for legacy .py datasets (default: $DATASET_LOADER_PYTHON or python3)
    #[arg(long, global = true)]
    python: Option<String>,

    /// Run the schema checks on legacy .py datasets too
    #[arg(long, global = true)]
    validate_legacy: bool,

    /// Refuse to execute legacy .py datasets
    #[arg(long, global = true)]
    no_legacy: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a dataset and print a summary
    Inspect { file: PathBuf },
    /// Load each dataset and report whether it is valid
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Load a dataset in any format and write it out as JSON
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = DEFAULT_INDENT)]
        indent: usize,
    },
    /// Load every dataset file under a directory
    Check { dir: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let loader = DatasetLoader::new(config_from(&cli));

    match cli.command {
        Command::Inspect { file } => inspect(&loader, &file),
        Command::Validate { files } => validate_all(&loader, &files),
        Command::Convert {
            input,
            output,
            indent,
        } => convert(&loader, &input, &output, indent),
        Command::Check { dir } => check_dir(&loader, &dir),
    }
}

fn config_from(cli: &Cli) -> LoaderConfig {
    let mut config = LoaderConfig::from_env();
    if let Some(python) = &cli.python {
        config = config.python(python.clone());
    }
    if cli.validate_legacy {
        config = config.validate_legacy(true);
    }
    if cli.no_legacy {
        config = config.allow_legacy_python(false);
    }
    config
}

fn inspect(loader: &DatasetLoader, file: &Path) -> Result<()> {
    let record = loader
        .load(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    print_summary(&record);
    Ok(())
}

fn print_summary(record: &DatasetRecord) {
    println!("=== {} ===", record.dataset_name().unwrap_or("<unnamed>"));
    if let Some(source) = record.source() {
        println!("Source:         {} ({})", source.path.display(), source.format);
        println!("SHA-256:        {}", source.sha256);
    }
    match record.ref_score() {
        Some(score) => println!("Ref score:      {}", score),
        None => println!("Ref score:      -"),
    }
    println!("Ref videos:     {}", record.ref_videos().len());
    println!("Dis videos:     {}", record.dis_videos().len());

    let (mut ratings, mut keyed) = (0usize, 0usize);
    for asset in record.dis_assets() {
        if let Some(scores) = asset.opinion_scores() {
            ratings += scores.len();
            if matches!(scores, OpinionScores::Keyed(_)) {
                keyed += 1;
            }
        }
    }
    println!("Ratings:        {} ({} keyed by rater)", ratings, keyed);

    let extra: Vec<&str> = record.extra_fields().map(|(k, _)| k).collect();
    if !extra.is_empty() {
        println!("Extra fields:   {}", extra.join(", "));
    }
    if !record.opaque_fields().is_empty() {
        let names: Vec<String> = record
            .opaque_fields()
            .iter()
            .map(|o| format!("{} ({})", o.name, o.type_name))
            .collect();
        println!("Opaque:         {}", names.join(", "));
    }

    let dangling = record.dangling_content_ids();
    if !dangling.is_empty() {
        println!("Warning: dis_videos reference unknown content_id {:?}", dangling);
    }
}

fn validate_all(loader: &DatasetLoader, files: &[PathBuf]) -> Result<()> {
    let mut failures = 0;
    for file in files {
        match loader.load(file) {
            Ok(record) => println!(
                "✓ {} ({} ref, {} dis)",
                file.display(),
                record.ref_videos().len(),
                record.dis_videos().len()
            ),
            Err(e) => {
                failures += 1;
                println!("✗ {}: {}", file.display(), e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} datasets failed to load", failures, files.len());
    }
    Ok(())
}

fn convert(loader: &DatasetLoader, input: &Path, output: &Path, indent: usize) -> Result<()> {
    let record = loader
        .load(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let report = save_dataset_json(&record, output, indent)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✓ Wrote {} fields to {}",
        report.written_fields,
        report.path.display()
    );
    if !report.dropped.is_empty() {
        println!("  Skipped: {}", report.dropped.join(", "));
    }
    Ok(())
}

fn check_dir(loader: &DatasetLoader, dir: &Path) -> Result<()> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() && DatasetFormat::from_path(entry.path()).is_ok() {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        println!("No dataset files found under {}", dir.display());
        return Ok(());
    }
    validate_all(loader, &files)
}
