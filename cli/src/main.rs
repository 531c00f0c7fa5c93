//! unoutline CLI - document title and outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use crossbeam_channel::RecvTimeoutError;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use unoutline::classify::{collect_lines, filter_noise, DocumentKind, FontProfile};
use unoutline::render::{to_json, JsonFormat};
use unoutline::{read_document, ExtractOptions, ExtractionResult, OutlineExtractor, RawDocument};

#[derive(Parser)]
#[command(name = "unoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract document titles and heading outlines to JSON", long_about = None)]
struct Cli {
    /// Input block dump, or a directory of them
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file, or output directory for batch input
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Extraction options file (JSON)
    #[arg(long, value_name = "FILE", env = "UNOUTLINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one document
    Extract {
        /// Input block dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Extraction options file (JSON)
        #[arg(long, value_name = "FILE", env = "UNOUTLINE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Extract outlines for every document in a directory
    Batch {
        /// Directory of block dumps (*.json)
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for the outline files
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Extraction options file (JSON)
        #[arg(long, value_name = "FILE", env = "UNOUTLINE_CONFIG")]
        config: Option<PathBuf>,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// Time budget per document in seconds
        #[arg(long, value_name = "SECS", default_value = "10")]
        budget: u64,
    },

    /// Show document statistics
    Info {
        /// Input block dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the default extraction options
    Config,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            compact,
            config,
        }) => cmd_extract(&input, output.as_deref(), compact, config.as_deref()),
        Some(Commands::Batch {
            input,
            output,
            config,
            sequential,
            budget,
        }) => cmd_batch(&input, &output, config.as_deref(), sequential, budget).map(|_| ()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Config) => cmd_config(),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: batch for directories, single extract for files
            match cli.input {
                Some(input) if input.is_dir() => {
                    let output = cli.output.unwrap_or_else(|| PathBuf::from("output"));
                    cmd_batch(&input, &output, cli.config.as_deref(), false, 10).map(|_| ())
                }
                Some(input) => cmd_extract(&input, cli.output.as_deref(), false, cli.config.as_deref()),
                None => {
                    println!("{}", "Usage: unoutline <INPUT> [OUTPUT]".yellow());
                    println!("       unoutline --help for more information");
                    Ok(())
                }
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_options(config: Option<&Path>) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
    match config {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(ExtractOptions::from_json(&json)?)
        }
        None => Ok(ExtractOptions::default()),
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = load_options(config)?;
    let doc = read_document(input)?;
    let result = unoutline::extract_with_options(&doc, &options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = to_json(&result, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

/// Outcome of one batch document.
struct BatchOutcome {
    input: PathBuf,
    result: Result<PathBuf, String>,
}

/// Totals of a batch run.
#[derive(Debug, PartialEq, Eq)]
struct BatchSummary {
    succeeded: usize,
    failed: usize,
}

fn cmd_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: Option<&Path>,
    sequential: bool,
    budget_secs: u64,
) -> Result<BatchSummary, Box<dyn std::error::Error>> {
    let options = load_options(config)?.with_parallel(!sequential);
    options.validate()?;

    fs::create_dir_all(output_dir)?;
    if fs::canonicalize(input_dir)? == fs::canonicalize(output_dir)? {
        return Err("output directory must differ from the input directory".into());
    }

    let files = discover_inputs(input_dir)?;
    if files.is_empty() {
        println!("{} {}", "No block dumps found in".yellow(), input_dir.display());
        return Ok(BatchSummary {
            succeeded: 0,
            failed: 0,
        });
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Extracting outlines...");

    let budget = Duration::from_secs(budget_secs);
    let run = |path: &PathBuf| {
        let outcome = BatchOutcome {
            input: path.clone(),
            result: process_file(path, output_dir, &options, budget),
        };
        pb.inc(1);
        outcome
    };
    let outcomes: Vec<BatchOutcome> = if options.parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };
    pb.finish_with_message("Done!");

    let mut summary = BatchSummary {
        succeeded: 0,
        failed: 0,
    };
    println!();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(path) => {
                summary.succeeded += 1;
                println!("  {} {}", "├─".dimmed(), path.display());
            }
            Err(reason) => {
                summary.failed += 1;
                log::warn!("Skipped {}: {}", outcome.input.display(), reason);
                println!(
                    "  {} {} {}",
                    "├─".dimmed(),
                    outcome.input.display().to_string().red(),
                    format!("({})", reason).dimmed()
                );
            }
        }
    }
    println!(
        "\n{} {} written, {} skipped",
        "Batch complete:".green().bold(),
        summary.succeeded,
        summary.failed
    );

    Ok(summary)
}

/// Block dumps in a directory, sorted by path.
fn discover_inputs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Output path for an input: same base name, `.json` extension.
fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.json", stem))
}

/// Extract one file and write its outline. Nothing is written on failure.
fn process_file(
    input: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
    budget: Duration,
) -> Result<PathBuf, String> {
    let doc = read_document(input).map_err(|e| e.to_string())?;
    let result = extract_within_budget(doc, options.clone(), budget)?;
    let json = to_json(&result, JsonFormat::Pretty).map_err(|e| e.to_string())?;

    let path = output_path(input, output_dir);
    fs::write(&path, json).map_err(|e| format!("failed to write {}: {}", path.display(), e))?;
    Ok(path)
}

/// Run extraction on a worker thread, abandoning it once the budget runs out.
fn extract_within_budget(
    doc: RawDocument,
    options: ExtractOptions,
    budget: Duration,
) -> Result<ExtractionResult, String> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    std::thread::spawn(move || {
        let result = OutlineExtractor::with_options(options).extract(&doc);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(budget) {
        Ok(result) => Ok(result),
        Err(RecvTimeoutError::Timeout) => {
            Err(format!("exceeded the {}s time budget", budget.as_secs()))
        }
        Err(RecvTimeoutError::Disconnected) => Err("extraction worker stopped unexpectedly".to_string()),
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = read_document(input)?;
    let options = ExtractOptions::default();
    let lines = collect_lines(&doc);
    let collected = lines.len();
    let (lines, noise) = filter_noise(lines, options.min_repeat_pages);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Blocks".bold(), doc.block_count());
    println!("{}: {}", "Lines".bold(), collected);
    println!(
        "{}: {} running, {} page numbers",
        "Noise removed".bold(),
        noise.running_lines,
        noise.page_numbers
    );

    if let Some(profile) = FontProfile::from_lines(&lines) {
        println!("{}: {:.1}pt", "Body size".bold(), profile.body_size);
        println!("{}: {:.1}pt", "Largest size".bold(), profile.max_size);
        println!(
            "{}: {:.1} / {:.1} / {:.1}",
            "Heading tiers".bold(),
            profile.tier_thresholds[0],
            profile.tier_thresholds[1],
            profile.tier_thresholds[2]
        );
    }
    println!("{}: {:?}", "Kind".bold(), DocumentKind::detect(&lines));

    let result = OutlineExtractor::with_options(options).extract(&doc);
    if !result.title.is_empty() {
        println!("{}: {}", "Title".bold(), result.title);
    }
    println!("{}: {}", "Headings".bold(), result.outline.len());

    Ok(())
}

fn cmd_config() -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&ExtractOptions::default())?;
    println!("{}", json);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document title and outline extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unoutline".dimmed());
    println!("License: MIT");
}
