//! bmt - reconstruct periodical issues from METS and ALTO
//!
//! Parses a data root of issue directories into one CSV record per section,
//! then optionally disambiguates author names and counts collaborations.

use anyhow::{Context, Result};
use bmt_core::Diagnostics;
use bmt_names::{collaborators, unique_names, write_collaborators_file, DisambiguationTable};
use bmt_pipeline::records::{read_records_file, write_records_file};
use bmt_pipeline::{process_issue, run_batch, Config, IssueDir};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "bmt",
    about = "Reconstruct periodical issues from METS and ALTO",
    long_about = "Reconstruct the sections of digitized periodical issues from their METS\n\
                  structure and ALTO OCR files, one CSV record per section.\n\
                  \n\
                  Settings are read from ./bmt.toml when present, or from --config.",
    version
)]
struct Args {
    /// Configuration file (default: ./bmt.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Prefix for output file names
    #[arg(long, global = true, value_name = "NAME")]
    name: Option<String>,

    /// Directory for output files (overrides the config)
    #[arg(short, long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Write the log to this file (truncated) instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse every issue below a data root into the data CSV
    Parse {
        /// Root directory holding one directory per issue
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,
    },

    /// Resolve author names with a disambiguation table
    Disambiguate {
        /// Table with columns "Unique Names" and "NameCopy"
        #[arg(value_name = "TABLE")]
        table: PathBuf,

        /// Data CSV to disambiguate (default: the parse output)
        #[arg(long, value_name = "CSV")]
        data: Option<PathBuf>,
    },

    /// Count pairs of authors appearing in the same issue
    Collaborators {
        /// Data CSV (default: the disambiguated output if present, else the
        /// parse output)
        #[arg(long, value_name = "CSV")]
        data: Option<PathBuf>,
    },

    /// Parse a single issue and print its records as JSON
    Issue {
        /// METS document of the issue
        #[arg(value_name = "METS")]
        mets: PathBuf,

        /// Directory of the issue's ALTO files
        #[arg(value_name = "ALTO_DIR")]
        alto_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut config = Config::discover(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(output_dir) = &args.output_dir {
        config.output_dir.clone_from(output_dir);
    }
    let name = args.name.as_deref();

    match args.command {
        Commands::Parse { data_dir } => parse(&data_dir, &config, name),
        Commands::Disambiguate { table, data } => disambiguate(&table, data, &config, name),
        Commands::Collaborators { data } => count_collaborators(data, &config, name),
        Commands::Issue { mets, alto_dir } => issue(mets, alto_dir, &config),
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let default_filter = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .write_style(env_logger::WriteStyle::Never);
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }
    builder.init();
    Ok(())
}

fn parse(data_dir: &Path, config: &Config, name: Option<&str>) -> Result<()> {
    let report = run_batch(data_dir, config)
        .with_context(|| format!("Failed to read data directory: {}", data_dir.display()))?;

    let output = config.output_path(&config.paths.data, name);
    write_records_file(&output, &report.records, config.separator_byte())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Parsed {} of {} issues ({} sections) into {}",
        report.succeeded,
        report.total(),
        report.records.len(),
        output.display()
    );
    for failure in &report.failures {
        println!(
            "  failed: issue {} ({}): {}",
            failure.issue_id,
            failure.issue.document_name(),
            failure.error
        );
    }
    Ok(())
}

fn disambiguate(
    table_path: &Path,
    data: Option<PathBuf>,
    config: &Config,
    name: Option<&str>,
) -> Result<()> {
    let data = data.unwrap_or_else(|| config.output_path(&config.paths.data, name));
    let separator = config.separator_byte();

    let mut records = read_records_file(&data, separator)
        .with_context(|| format!("Failed to read data file: {}", data.display()))?;
    let mut table = DisambiguationTable::load_file(table_path, separator)
        .with_context(|| format!("Failed to read disambiguation table: {}", table_path.display()))?;

    let mut diagnostics = Diagnostics::new(table_path.display().to_string());
    table.prepare(&unique_names(&records, &config.author_separator), &mut diagnostics);
    table.apply(&mut records, &config.author_separator, &mut diagnostics);

    let names_path = config.output_path(&config.paths.names, name);
    table
        .write_file(&names_path, separator)
        .with_context(|| format!("Failed to write {}", names_path.display()))?;

    let output = config.output_path(&config.paths.disambiguated, name);
    write_records_file(&output, &records, separator)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Disambiguated {} records with {} names into {}",
        records.len(),
        table.len(),
        output.display()
    );
    Ok(())
}

fn count_collaborators(data: Option<PathBuf>, config: &Config, name: Option<&str>) -> Result<()> {
    let data = data.unwrap_or_else(|| {
        let disambiguated = config.output_path(&config.paths.disambiguated, name);
        if disambiguated.exists() {
            disambiguated
        } else {
            config.output_path(&config.paths.data, name)
        }
    });
    log::info!("Counting collaborations in {}", data.display());

    let separator = config.separator_byte();
    let records = read_records_file(&data, separator)
        .with_context(|| format!("Failed to read data file: {}", data.display()))?;
    let pairs = collaborators(&records, &config.author_separator);

    let output = config.output_path(&config.paths.collaborators, name);
    write_collaborators_file(&output, &pairs, separator)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Wrote {} author pairs to {}", pairs.len(), output.display());
    Ok(())
}

fn issue(mets: PathBuf, alto_dir: PathBuf, config: &Config) -> Result<()> {
    let issue = IssueDir::new(mets, alto_dir);
    let mut diagnostics = Diagnostics::new(issue.document_name());
    let records = process_issue(&issue, 1, config, &mut diagnostics)
        .with_context(|| format!("Failed to parse issue {}", issue.mets.display()))?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
