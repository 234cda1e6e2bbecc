//! # CLI Module
//!
//! Command-line interface for the file librarian.
//!
//! ## Usage
//! ```bash
//! # Sort the configured input folders
//! shelver run
//!
//! # Preview without touching anything
//! shelver run --dry-run
//!
//! # Copy instead of move
//! shelver run --copy
//!
//! # JSON report for scripting
//! shelver run --output json
//!
//! # Write a starter configuration
//! shelver init
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use shelver::config::Config;
use shelver::core::Processor;
use shelver::error::Result;
use shelver::events::{Event, EventChannel, RunReport};
use std::path::PathBuf;
use std::thread;

/// Shelver - Sort incoming files into your media library
#[derive(Parser, Debug)]
#[command(name = "shelver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sort the configured input folders once
    Run {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Compute and report everything, change nothing on disk
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Copy files to their destinations instead of moving them
        #[arg(long)]
        copy: bool,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write a starter configuration file
    Init {
        /// Where to write it
        #[arg(default_value = "shelver.toml")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            dry_run,
            copy,
            output,
            verbose,
        } => run_sort(config, dry_run, copy, output, verbose),
        Commands::Init { path } => run_init(path),
    }
}

fn run_init(path: PathBuf) -> Result<()> {
    let term = Term::stderr();
    Config::write_template(&path)?;
    term.write_line(&format!(
        "{} wrote starter configuration to {}",
        style("✓").green().bold(),
        style(path.display()).cyan()
    ))
    .ok();
    Ok(())
}

fn run_sort(
    config_path: Option<PathBuf>,
    dry_run: bool,
    copy: bool,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    // Print header
    if matches!(output, OutputFormat::Pretty) {
        let mode = if dry_run { " (dry run)" } else { "" };
        term.write_line(&format!(
            "{}{}",
            style("Shelver").bold().cyan(),
            style(mode).yellow()
        ))
        .ok();
        term.write_line("").ok();
    }

    let config = Config::load(config_path.as_deref())?;
    let processor = Processor::new(config).dry_run(dry_run).copy_only(copy);

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::FileFound { path, index, total } => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total as u64);
                        pb.set_position(index as u64);
                        pb.set_message(
                            path.file_name().unwrap_or_default().to_string_lossy().into_owned(),
                        );
                    }
                }
                Event::FileProcessed {
                    classification,
                    summary,
                } => {
                    if let Some(ref pb) = progress_clone {
                        if verbose {
                            pb.println(format!(
                                "  {} {} -> {} [{}]",
                                style(summary.action).green(),
                                summary.input_file_name,
                                summary.output_folder.join(&summary.output_file_name).display(),
                                classification.category,
                            ));
                        }
                    }
                }
                Event::FileUnknown { path, action } => {
                    if let Some(ref pb) = progress_clone {
                        pb.println(format!(
                            "  {} no rule matched {} ({})",
                            style("?").yellow().bold(),
                            path.display(),
                            action
                        ));
                    }
                }
                Event::FileErrored { path, cause, .. } => {
                    if let Some(ref pb) = progress_clone {
                        pb.println(format!(
                            "  {} {}: {}",
                            style("✗").red().bold(),
                            path.display(),
                            cause
                        ));
                    }
                }
                Event::RunFinished { .. } => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    let report = processor.run_with_events(&sender)?;

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    match output {
        OutputFormat::Pretty => print_pretty_report(&term, &report, dry_run),
        OutputFormat::Json => print_json_report(&report),
    }

    Ok(())
}

fn print_pretty_report(term: &Term, report: &RunReport, dry_run: bool) {
    term.write_line("").ok();
    term.write_line(&format!("{} Run Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files seen in {:.1}s",
        style(report.total_files).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!("  {} shelved", style(report.processed).cyan()))
        .ok();

    if report.unknown > 0 {
        term.write_line(&format!("  {} unknown", style(report.unknown).yellow()))
            .ok();
    }
    if report.duplicates > 0 {
        term.write_line(&format!(
            "  {} duplicates",
            style(report.duplicates).yellow()
        ))
        .ok();
    }
    if report.errored > 0 {
        term.write_line(&format!("  {} errors", style(report.errored).red()))
            .ok();
    }

    if dry_run {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Dry run: no files were moved.").dim()
        ))
        .ok();
    }
}

fn print_json_report(report: &RunReport) {
    let output = serde_json::json!({
        "total_files": report.total_files,
        "processed": report.processed,
        "unknown": report.unknown,
        "duplicates": report.duplicates,
        "errored": report.errored,
        "duration_ms": report.duration_ms,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
