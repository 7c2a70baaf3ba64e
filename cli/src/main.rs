use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use sitedump_core::{DocumentKind, ValidationError, validate_overview, validate_referrals};
use sitedump_extract::config::Thresholds;
use sitedump_extract::output::{OutputFormat, format_overview, format_referrals, format_report};
use sitedump_extract::report::ExtractionReport;
use sitedump_extract::{extract_overview_with, extract_referrals_with};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sitedump")]
#[command(about = "Recover structured analytics data from flattened page dumps")]
struct Cli {
    /// Log scanner decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract the site overview from a page dump.
    Overview(OverviewArgs),
    /// Rebuild the incoming referrals table from a page dump.
    Referrals(ReferralsArgs),
    /// Print the report URL a page dump is captured from.
    Url(UrlArgs),
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Page dump to read (default: stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Directory to write the document into (default: stdout).
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// YAML file with scan thresholds.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the scalar look-ahead window.
    #[arg(long)]
    window: Option<usize>,
    /// Override the overview table row cap.
    #[arg(long)]
    row_cap: Option<usize>,
    /// Override the consecutive misses that end a column.
    #[arg(long)]
    miss_run: Option<usize>,
    /// Also emit the extraction report.
    #[arg(long)]
    with_report: bool,
}

#[derive(Debug, Args)]
struct OverviewArgs {
    /// Domain the overview page belongs to.
    #[arg(long)]
    domain: String,
    /// Output format (default: markdown).
    #[arg(long)]
    format: Option<OutputFormat>,
    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Debug, Args)]
struct ReferralsArgs {
    /// Domain the referrals page belongs to (recorded in the report).
    #[arg(long)]
    domain: Option<String>,
    /// Output format (default: csv).
    #[arg(long)]
    format: Option<OutputFormat>,
    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PageKind {
    Overview,
    Referrals,
}

impl From<PageKind> for DocumentKind {
    fn from(kind: PageKind) -> Self {
        match kind {
            PageKind::Overview => DocumentKind::Overview,
            PageKind::Referrals => DocumentKind::Referrals,
        }
    }
}

#[derive(Debug, Args)]
struct UrlArgs {
    /// Page to build the URL for.
    #[arg(long, value_enum)]
    kind: PageKind,
    /// Subject domain.
    #[arg(long)]
    domain: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Overview(args) => run_overview(args),
        Command::Referrals(args) => run_referrals(args),
        Command::Url(args) => run_url(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_overview(args: OverviewArgs) -> Result<(), String> {
    if args.domain.trim().is_empty() {
        return Err("--domain cannot be empty".to_string());
    }
    let thresholds = resolve_thresholds(&args.scan)?;
    let raw = read_input(args.scan.input.as_deref())?;

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::default_for(DocumentKind::Overview));

    let run = extract_overview_with(&args.domain, &raw, &thresholds);
    check_valid(validate_overview(&run.overview))?;
    let body = format_overview(&run.overview, format)?;

    emit(DocumentKind::Overview, format, &body, &args.scan, &run.report)
}

fn run_referrals(args: ReferralsArgs) -> Result<(), String> {
    let thresholds = resolve_thresholds(&args.scan)?;
    let raw = read_input(args.scan.input.as_deref())?;

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::default_for(DocumentKind::Referrals));

    let run = extract_referrals_with(&raw, args.domain.as_deref(), &thresholds)
        .map_err(|err| err.to_string())?;
    check_valid(validate_referrals(&run.table))?;
    let body = format_referrals(&run.table, format)?;

    emit(DocumentKind::Referrals, format, &body, &args.scan, &run.report)
}

fn run_url(args: UrlArgs) -> Result<(), String> {
    if args.domain.trim().is_empty() {
        return Err("--domain cannot be empty".to_string());
    }
    println!("{}", DocumentKind::from(args.kind).report_url(args.domain.trim()));
    Ok(())
}

/// Defaults, then the YAML file, then individual flag overrides.
fn resolve_thresholds(scan: &ScanArgs) -> Result<Thresholds, String> {
    let mut thresholds = match &scan.config {
        Some(path) => Thresholds::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => Thresholds::default(),
    };
    if let Some(window) = scan.window {
        thresholds.value_window = window;
    }
    if let Some(row_cap) = scan.row_cap {
        thresholds.row_cap = row_cap;
    }
    if let Some(miss_run) = scan.miss_run {
        thresholds.miss_run = miss_run;
    }
    thresholds.validate().map_err(|err| err.to_string())?;
    debug!(?thresholds, "Resolved thresholds");
    Ok(thresholds)
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            Ok(raw)
        }
    }
}

fn check_valid(errors: Vec<ValidationError>) -> Result<(), String> {
    if errors.is_empty() {
        return Ok(());
    }
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    Err(format!("extracted document is invalid: {}", messages.join("; ")))
}

/// Writes the document and optional report, then prints the summary line.
fn emit(
    kind: DocumentKind,
    format: OutputFormat,
    body: &str,
    scan: &ScanArgs,
    report: &ExtractionReport,
) -> Result<(), String> {
    match &scan.output_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|err| {
                format!("Failed to create output directory '{}': {err}", dir.display())
            })?;
            let path = dir.join(format!("{}.{}", kind.file_stem(), format.extension()));
            fs::write(&path, body)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            eprintln!("Wrote {}", path.display());

            if scan.with_report {
                let report_path = dir.join(format!("{}-report.json", kind.file_stem()));
                let json = format_report(report, OutputFormat::Json)?;
                fs::write(&report_path, json).map_err(|err| {
                    format!("Failed to write '{}': {err}", report_path.display())
                })?;
                eprintln!("Wrote {}", report_path.display());
            }
        }
        None => {
            print!("{body}");
            if scan.with_report {
                eprintln!("{}", format_report(report, OutputFormat::Json)?);
            }
        }
    }

    eprintln!("{}", report.summary());
    Ok(())
}
