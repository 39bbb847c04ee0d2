//! luaflex CLI
//!
//! Command-line interface for the Lua lexical analyzer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use luaflex::report::vocabulary;
use luaflex::{CategoryFilter, Diagnostic, Lexer, Report, ReportConfig};

/// luaflex - lexical analysis of Lua 5.1 source files
///
/// Prints every token of the input with its category, table index, value
/// and line, followed by the symbol and error counts.
#[derive(Parser, Debug)]
#[command(name = "luaflex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A lexical analyzer for Lua 5.1 source files", long_about = None)]
struct Cli {
    /// Lua source file to analyze
    #[arg(required_unless_present = "keywords")]
    file: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only list tokens of one category (all, keywords, operators,
    /// delimiters, errors, constants, strings, identifiers)
    #[arg(short, long, default_value = "all")]
    filter: CategoryFilter,

    /// Print only the error list and the summary, with source context
    #[arg(short, long)]
    errors: bool,

    /// Print the reserved keywords, operators and delimiters and exit
    #[arg(long)]
    keywords: bool,

    /// Enable verbose output
    #[arg(short, long, env = "LUAFLEX_VERBOSE")]
    verbose: bool,

    /// Disable color output
    #[arg(long, env = "LUAFLEX_NO_COLOR")]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color)?;

    // Reports written to a file are never colored
    let color = !cli.no_color && cli.output.is_none();
    if !color {
        colored::control::set_override(false);
    }

    if cli.keywords {
        for line in vocabulary() {
            println!("{}", line);
        }
        return Ok(());
    }

    let Some(path) = cli.file.as_deref() else {
        anyhow::bail!("no input file given");
    };

    let config = ReportConfig {
        filter: cli.filter,
        errors_only: cli.errors,
        color,
    };

    match cli.output.as_deref() {
        Some(output) => {
            let file = File::create(output)
                .with_context(|| format!("failed to create '{}'", output.display()))?;
            let mut writer = BufWriter::new(file);
            analyze(path, &config, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("failed to write '{}'", output.display()))?;
            tracing::info!(output = %output.display(), "report written");
        }
        None => {
            let stdout = io::stdout();
            analyze(path, &config, &mut stdout.lock())?;
        }
    }

    Ok(())
}

/// Initialize the logging system
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}

/// Analyze `path` and write its report to `writer`
fn analyze<W: Write>(path: &Path, config: &ReportConfig, writer: &mut W) -> Result<()> {
    let mut lexer = Lexer::from_path(path)?;
    tracing::debug!(encoding = ?lexer.encoding(), "analyzing {}", path.display());

    let report = Report::collect(&mut lexer).context("failed to resolve tokens")?;

    if config.errors_only {
        print_diagnostics(&lexer, &report);
    }

    report
        .write_to(writer, config)
        .context("failed to write report")?;

    let summary = report.summary();
    tracing::debug!(symbols = summary.symbols, errors = summary.errors, "analysis finished");

    Ok(())
}

/// Print every error token with its source context to stderr
fn print_diagnostics(lexer: &Lexer, report: &Report) {
    let source = lexer.source_text();
    for entry in report.entries() {
        if let Some(diagnostic) = Diagnostic::from_token_info(&entry.info, lexer.filename()) {
            eprintln!("{}", diagnostic.with_source(&source));
        }
    }
}
