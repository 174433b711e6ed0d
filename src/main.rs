//! csv-lint CLI - validate CSV files

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use csv_lint::telemetry::{EventKind, emit};
use csv_lint::{
    AnalysisResult, Analyzer, CancellationToken, JsonLinesSink, Severity, TelemetryEvent,
    TelemetrySink, TracingSink, issues_to_csv,
};
use tracing_subscriber::EnvFilter;

/// Validate delimiter-separated files and report every defect found.
///
/// Checks encoding, line endings, header names, row widths, quoting and
/// per-column value types in one pass.
#[derive(Parser, Debug)]
#[command(name = "csv-lint")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file(s) to validate
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Force specific delimiter (single character)
    #[arg(short = 'd', long)]
    delimiter: Option<char>,

    /// Minimum non-empty values before a column's type mix is judged
    #[arg(long, default_value_t = csv_lint::DEFAULT_MIN_TYPE_SAMPLES)]
    min_type_samples: usize,

    /// Output format: text (default), json, or csv
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Append telemetry events as JSON lines to this file
    #[arg(long)]
    telemetry: Option<PathBuf>,

    /// Also fail when warnings are found
    #[arg(long)]
    strict: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "csv_lint=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn telemetry_sink(path: Option<&Path>) -> Result<Arc<dyn TelemetrySink>, std::io::Error> {
    match path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(Arc::new(JsonLinesSink::new(file)))
        }
        None => Ok(Arc::new(TracingSink)),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let sink = match telemetry_sink(args.telemetry.as_deref()) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("Error opening telemetry file: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut analyzer = Analyzer::new();
    analyzer
        .min_type_samples(args.min_type_samples)
        .telemetry(Arc::clone(&sink));
    if let Some(delim) = args.delimiter {
        if !delim.is_ascii() {
            eprintln!("Error: delimiter must be a single ASCII character");
            return ExitCode::FAILURE;
        }
        analyzer.delimiter(delim as u8);
    }
    if let Err(e) = analyzer.validate() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let cancel = CancellationToken::new();
    let results = analyzer.analyze_paths(&args.files, &cancel);

    let mut exit_code = ExitCode::SUCCESS;
    let mut json_results = Vec::new();

    for (path, result) in args.files.iter().zip(results) {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error processing {}: {}", path.display(), e);
                exit_code = ExitCode::FAILURE;
                continue;
            }
        };

        if result.has_errors() || (args.strict && result.count_by_severity(Severity::Warning) > 0)
        {
            exit_code = ExitCode::FAILURE;
        }

        match args.format {
            OutputFormat::Text => print_text_output(path, &result),
            OutputFormat::Json => json_results.push(result),
            OutputFormat::Csv => {
                if let Err(e) = print_csv_output(&result, sink.as_ref()) {
                    eprintln!("Error exporting {}: {}", path.display(), e);
                    exit_code = ExitCode::FAILURE;
                }
            }
        }
    }

    if args.format == OutputFormat::Json {
        match serde_json::to_string_pretty(&json_results) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing results: {e}");
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    exit_code
}

fn print_text_output(path: &Path, result: &AnalysisResult) {
    let count = |n: Option<usize>| n.map_or_else(|| "n/a".to_string(), |n| n.to_string());

    println!("File: {}", path.display());
    println!("  Encoding: {}{}", result.encoding, if result.had_bom { " (BOM)" } else { "" });
    println!("  Line endings: {}", result.newline_style);
    println!("  Delimiter: {:?}", result.delimiter);
    println!("  Rows: {}", count(result.row_count));
    println!("  Columns: {}", count(result.column_count));
    println!(
        "  Issues: {} error(s), {} warning(s), {} info",
        result.count_by_severity(Severity::Error),
        result.count_by_severity(Severity::Warning),
        result.count_by_severity(Severity::Info)
    );

    for issue in &result.issues {
        let location = match (issue.row_number, issue.column_name.as_deref()) {
            (Some(row), Some(col)) => format!("row {row}, column '{col}'"),
            (Some(row), None) => format!("row {row}"),
            (None, Some(col)) => format!("column '{col}'"),
            (None, None) => "file".to_string(),
        };
        println!(
            "    [{}] {} ({}): {}",
            issue.severity, issue.kind, location, issue.message
        );
        if let Some(sample) = &issue.sample {
            println!("        sample: {sample}");
        }
    }

    println!();
}

fn print_csv_output(result: &AnalysisResult, sink: &dyn TelemetrySink) -> csv_lint::Result<()> {
    let csv = issues_to_csv(&result.issues)?;
    print!("{csv}");
    emit(
        sink,
        TelemetryEvent::new(EventKind::IssuesExported, result.byte_size)
            .with_message(format!("{} issue(s) from {}", result.issues.len(), result.file_name)),
    );
    Ok(())
}
