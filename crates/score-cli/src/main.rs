//! lician-score: score request bundles and print Lician Scores.
//!
//! Each input is a JSON file holding one `ScoreRequest` or an array of them.
//! Tickers are scored in parallel; results keep input order.
//!
//! Usage:
//!   lician-score --input bundle.json
//!   lician-score --input a.json --input b.json --sector Technology --output text
//!   cat bundle.json | lician-score --at 2025-01-15T16:00:00Z

mod config;

use analysis_core::{AnalysisError, LicianScore, ScoreRequest};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use config::{CliConfig, OutputFormat};
use lician_score::LicianScoreEngine;
use rayon::prelude::*;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum RequestBundle {
    Many(Vec<ScoreRequest>),
    One(Box<ScoreRequest>),
}

impl RequestBundle {
    fn into_vec(self) -> Vec<ScoreRequest> {
        match self {
            RequestBundle::Many(requests) => requests,
            RequestBundle::One(request) => vec![*request],
        }
    }
}

fn init_tracing() {
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "lician_score=info,score_cli=info".into())
    };
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // stdout carries results, so logs go to stderr
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  lician-score [--input FILE]...     Score request bundles (stdin when no input is given)");
    eprintln!("");
    eprintln!("Options:");
    eprintln!("  --sector NAME      Sector for requests that do not name one (LICIAN_DEFAULT_SECTOR)");
    eprintln!("  --medians FILE     JSON benchmarks overriding the sector table (LICIAN_MEDIANS_FILE)");
    eprintln!("  --output FORMAT    json, pretty or text (LICIAN_OUTPUT, default json)");
    eprintln!("  --at TIMESTAMP     RFC 3339 scoring time, for reproducible output");
}

fn parse_bundle(raw: &str, source: &str) -> Result<Vec<ScoreRequest>> {
    let bundle: RequestBundle =
        serde_json::from_str(raw).with_context(|| format!("failed to parse score requests from {}", source))?;
    Ok(bundle.into_vec())
}

fn load_file(path: &Path) -> Result<Vec<ScoreRequest>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_bundle(&raw, &path.display().to_string())
}

fn load_requests(config: &CliConfig) -> Result<Vec<ScoreRequest>> {
    if config.inputs.is_empty() {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        return parse_bundle(&raw, "stdin");
    }

    let mut requests = Vec::new();
    for path in &config.inputs {
        let loaded = load_file(path)?;
        tracing::info!("Loaded {} request(s) from {}", loaded.len(), path.display());
        requests.extend(loaded);
    }
    Ok(requests)
}

/// How benchmarks are chosen for each request
enum Benchmarks {
    /// Explicit medians file: applies to every request
    Fixed(LicianScoreEngine),
    /// Request sector first, then the default sector engine
    BySector(LicianScoreEngine),
}

impl Benchmarks {
    fn from_config(config: &CliConfig) -> Result<Self> {
        if let Some(medians) = config.load_medians()? {
            tracing::info!("Using benchmark override from {:?}", config.medians_file);
            return Ok(Benchmarks::Fixed(LicianScoreEngine::with_medians(medians)?));
        }
        let engine = match config.default_sector.as_deref() {
            Some(sector) => {
                if lician_score::lookup_sector(sector).is_none() {
                    tracing::warn!("Unknown default sector '{}', using market-wide benchmarks", sector);
                }
                LicianScoreEngine::for_sector(sector)
            }
            None => LicianScoreEngine::new(),
        };
        Ok(Benchmarks::BySector(engine))
    }

    fn score(&self, request: &ScoreRequest, timestamp: DateTime<Utc>) -> Result<LicianScore, AnalysisError> {
        match self {
            Benchmarks::Fixed(engine) => {
                request.validate()?;
                Ok(engine.score_at(request.ticker.trim(), &request.as_input(), timestamp))
            }
            Benchmarks::BySector(engine) => engine.score_request_at(request, timestamp),
        }
    }
}

fn render_text(score: &LicianScore) -> String {
    let mut out = format!(
        "{}  {}/10 ({})  confidence {:.0}%\n",
        score.ticker,
        score.overall_score,
        score.rating_label(),
        score.overall_confidence * 100.0
    );
    for dim in score.dimensions() {
        out.push_str(&format!(
            "  {:<9} {:>2}  [{}/{}]  {}\n",
            dim.dimension.label(),
            dim.score,
            dim.data_points,
            dim.max_data_points,
            dim.explanation
        ));
    }
    out.push_str(&format!("  {}\n", score.summary));
    out
}

fn render(score: &LicianScore, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(score)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(score)?,
        OutputFormat::Text => render_text(score),
    })
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let mut config = CliConfig::from_env()?;
    if let Err(e) = config.apply_args(&args) {
        print_usage();
        return Err(e);
    }

    let benchmarks = Benchmarks::from_config(&config)?;
    let requests = load_requests(&config)?;
    let timestamp = config.at.unwrap_or_else(Utc::now);
    tracing::info!("Scoring {} ticker(s)", requests.len());

    let results: Vec<Result<LicianScore, AnalysisError>> = requests
        .par_iter()
        .map(|request| benchmarks.score(request, timestamp))
        .collect();

    let mut failed = 0usize;
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(score) => println!("{}", render(&score, config.output)?),
            Err(e) => {
                failed += 1;
                tracing::error!("Skipping request for '{}': {}", request.ticker, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} request(s) could not be scored", failed, requests.len());
    }
    Ok(())
}
