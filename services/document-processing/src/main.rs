//! coacheck - Certificate of Analysis checker
//!
//! Usage:
//!   coacheck analyze [-i FILE] [-o CSV]   Analyze one COA (sample when no input)
//!   coacheck batch DIR                    Analyze every PDF/TXT in a directory
//!   coacheck serve [--port N]             Run the HTTP analysis service

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coacheck_models::Report;
use coacheck_utils::{
    init_logging, render_batch_summary, render_report, to_json, write_csv, AppConfig,
    CoaAnalyzer, CoaError, RenderOptions, SAMPLE_COA,
};
use colored::Colorize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod input;
mod pdf_processor;
mod service;

use input::{is_supported, read_input_file};
use service::{router, CoaService};

#[derive(Parser)]
#[command(name = "coacheck")]
#[command(about = "Certificate of Analysis (COA) analyzer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file layered over config/ and the environment
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single COA file (txt or pdf)
    Analyze {
        /// Input file; the built-in sample COA is used when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Write results as CSV
        #[arg(short, long, value_name = "CSV")]
        output: Option<PathBuf>,
        /// Write the full report as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
        /// Show ASCII visualization of results
        #[arg(short, long)]
        visualize: bool,
        /// Disable colored output
        #[arg(long = "no-color")]
        no_color: bool,
    },
    /// Analyze every PDF and TXT file in a directory
    Batch {
        /// Directory to scan
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Write <name>_results.csv next to each input
        #[arg(long)]
        write_csv: bool,
    },
    /// Run the HTTP analysis service
    Serve {
        /// Listen port (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            let code = err
                .downcast_ref::<CoaError>()
                .map(CoaError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.debug {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging)?;

    let analyzer = CoaAnalyzer::new(config.analyzer.clone());

    match cli.command {
        Commands::Analyze {
            input,
            output,
            json,
            visualize,
            no_color,
        } => {
            let mut options = RenderOptions::from(&config.output);
            options.visualize |= visualize;
            options.color &= !no_color;

            cmd_analyze(&analyzer, input.as_deref(), output.as_deref(), json.as_deref(), &options)
        }
        Commands::Batch { dir, write_csv: write } => cmd_batch(Arc::new(analyzer), &dir, write).await,
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            cmd_serve(analyzer, &config, port).await
        }
    }
}

fn cmd_analyze(
    analyzer: &CoaAnalyzer,
    input: Option<&Path>,
    output: Option<&Path>,
    json: Option<&Path>,
    options: &RenderOptions,
) -> Result<ExitCode> {
    let (text, source) = match input {
        Some(path) => {
            let text = read_input_file(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (text, file_label(path))
        }
        None => {
            info!("Using sample COA data. Use --input to specify a file.");
            (SAMPLE_COA.to_string(), "sample".to_string())
        }
    };

    let report = analyzer.analyze(&text, &source);
    if report.is_empty() {
        eprintln!("Error: {}.", CoaError::no_results("the input"));
        return Ok(ExitCode::FAILURE);
    }

    print!("{}", render_report(&report, options));

    if let Some(path) = output {
        save_csv(&report, path)?;
        println!("\nResults saved to {}", path.display());
    }

    if let Some(path) = json {
        fs::write(path, to_json(&report)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "report written as JSON");
    }

    print!("{}", render_batch_summary(&[(source, report)]));
    Ok(ExitCode::SUCCESS)
}

async fn cmd_batch(analyzer: Arc<CoaAnalyzer>, dir: &Path, write: bool) -> Result<ExitCode> {
    if !dir.is_dir() {
        return Err(CoaError::not_found(format!("input directory {}", dir.display())).into());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_supported(path))
        .collect();
    paths.sort();

    if paths.is_empty() {
        warn!(dir = %dir.display(), "no PDF or TXT files found");
        return Ok(ExitCode::FAILURE);
    }

    info!(files = paths.len(), dir = %dir.display(), "processing batch");

    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let analyzer = Arc::clone(&analyzer);
            tokio::task::spawn_blocking(move || analyze_file(&analyzer, &path, write))
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await.context("Batch worker panicked")? {
            Ok(entry) => reports.push(entry),
            Err(err) => warn!(error = %err, "skipping file"),
        }
    }

    print!("{}", render_batch_summary(&reports));

    let any_results = reports.iter().any(|(_, report)| !report.is_empty());
    Ok(if any_results {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn analyze_file(analyzer: &CoaAnalyzer, path: &Path, write: bool) -> Result<(String, Report), CoaError> {
    let label = file_label(path);
    info!(file = %label, "processing");

    let text = read_input_file(path)?;
    let report = analyzer.analyze(&text, &label);

    if report.is_empty() {
        warn!(file = %label, "no valid test results found");
    } else if write {
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("coa");
        let csv_path = path.with_file_name(format!("{stem}_results.csv"));
        let file = File::create(&csv_path)
            .map_err(|e| CoaError::io(csv_path.display().to_string(), e.to_string()))?;
        write_csv(&report, BufWriter::new(file))?;
        info!(path = %csv_path.display(), "results saved");
    }

    Ok((label, report))
}

async fn cmd_serve(analyzer: CoaAnalyzer, config: &AppConfig, port: u16) -> Result<ExitCode> {
    let service = CoaService::new(analyzer);
    let app = router(service, config.server.max_request_size);

    let addr: SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, port))?;
    let listener = TcpListener::bind(&addr).await?;
    info!("coacheck service listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(ExitCode::SUCCESS)
}

fn save_csv(report: &Report, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(report, BufWriter::new(file))?;
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::try_parse_from(["coacheck", "--debug", "analyze", "-i", "coa.pdf", "-v"]).unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Analyze { input, visualize, no_color, .. } => {
                assert_eq!(input, Some(PathBuf::from("coa.pdf")));
                assert!(visualize);
                assert!(!no_color);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_file_label() {
        assert_eq!(file_label(Path::new("/tmp/a/coa.pdf")), "coa.pdf");
    }

    #[test]
    fn test_analyze_file_writes_csv() {
        let dir = std::env::temp_dir().join(format!("coacheck-batch-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.txt");
        fs::write(&path, SAMPLE_COA).unwrap();

        let (label, report) = analyze_file(&CoaAnalyzer::default(), &path, true).unwrap();
        let csv_exists = dir.join("sample_results.csv").exists();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(label, "sample.txt");
        assert_eq!(report.verdicts.len(), 8);
        assert!(csv_exists);
    }
}
