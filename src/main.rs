//! Materna: Maternal risk assessment engine.
//!
//! Command-line entry point for health-worker tooling.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use materna::adapters::csv_store::CsvHistoryStore;
use materna::adapters::sanitize::SanitizingMakeWriter;
use materna::adapters::softmax::SoftmaxClassifier;
use materna::adapters::text_report::TextReportRenderer;
use materna::application::Engine;
use materna::MeasurementInput;

const USAGE: &str = "Usage: materna <command>

Commands:
  assess <age> <weight-kg> <height-cm> <systolic> <diastolic> [<blood-sugar> <hemoglobin>]
  history
  dashboard
  next-id

Environment:
  MATERNA_MODEL_DIR     directory holding model_full.json and model_basic.json (default: models)
  MATERNA_HISTORY_FILE  CSV history path (default: assessment_history.csv)
  MATERNA_REPORT_DIR    report output directory (default: reports)
  MATERNA_LOG_MODE      auto | file | stdout (default: auto)
  MATERNA_LOG_FILE      log path in file mode (default: materna.log)";

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Default behavior:
    // - interactive TTY: log to a file, keeping terminal output clean
    // - non-interactive: log to stdout (so container logs work)
    let log_mode = env_or("MATERNA_LOG_MODE", "auto");

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stdout" => false,
        // auto
        _ => interactive,
    };

    let (writer, guard) = if use_file {
        let log_file = env_or("MATERNA_LOG_FILE", "materna.log");

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}

fn build_engine() -> Result<Engine<SoftmaxClassifier, CsvHistoryStore, TextReportRenderer>> {
    let model_dir = env_or("MATERNA_MODEL_DIR", "models");
    let history_file = env_or("MATERNA_HISTORY_FILE", "assessment_history.csv");
    let report_dir = env_or("MATERNA_REPORT_DIR", "reports");

    let classifier = SoftmaxClassifier::load(std::path::Path::new(&model_dir))
        .with_context(|| format!("Loading model exports from {model_dir:?}"))?;

    Ok(Engine::new(
        Arc::new(classifier),
        Arc::new(CsvHistoryStore::new(history_file)),
        TextReportRenderer::new(report_dir),
    ))
}

fn parse_f64(args: &[String], index: usize, name: &str) -> Result<f64> {
    let raw = args
        .get(index)
        .with_context(|| format!("Missing argument <{name}>"))?;
    raw.parse::<f64>()
        .with_context(|| format!("Invalid {name}: {raw:?}"))
}

fn cmd_assess(args: &[String]) -> Result<()> {
    let engine = build_engine()?;

    let age = args
        .first()
        .context("Missing argument <age>")?
        .parse::<u32>()
        .context("Invalid age")?;
    let weight_kg = parse_f64(args, 1, "weight-kg")?;
    let height_cm = parse_f64(args, 2, "height-cm")?;
    let systolic = parse_f64(args, 3, "systolic")?;
    let diastolic = parse_f64(args, 4, "diastolic")?;

    let lab_available = args.len() > 5;
    let (blood_sugar, hemoglobin) = if lab_available {
        (
            Some(parse_f64(args, 5, "blood-sugar")?),
            Some(parse_f64(args, 6, "hemoglobin")?),
        )
    } else {
        (None, None)
    };

    let input = MeasurementInput {
        age,
        weight_kg,
        height_cm,
        systolic,
        diastolic,
        blood_sugar,
        hemoglobin,
        lab_available,
    };

    let result = engine.assess_risk(&input)?;
    println!("Risk level:  {}", result.risk_level);
    println!("             {}", result.risk_level.description());
    println!("Confidence:  {:.1}%", result.confidence);
    println!(
        "Probability: Low {:.1}% / Moderate {:.1}% / High {:.1}%",
        result.probabilities.low, result.probabilities.moderate, result.probabilities.high
    );
    println!("BMI:         {:.1} kg/m²", result.bmi);
    println!("Model:       {}", result.model_used);
    Ok(())
}

fn cmd_history() -> Result<()> {
    let engine = build_engine()?;
    let records = engine.load_history()?;

    if records.is_empty() {
        println!("No assessments recorded yet.");
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {:<12}  {:<8}  {}  ({})",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.patient_id,
            record.risk_level,
            record.confidence,
            record.model_used
        );
    }
    println!("{} assessment(s).", records.len());
    Ok(())
}

fn cmd_dashboard() -> Result<()> {
    let engine = build_engine()?;
    let stats = engine.dashboard_stats();

    println!("Total assessments: {}", stats.total_assessments);
    println!(
        "High risk:         {} ({:.1}%)",
        stats.high_risk_count, stats.high_risk_percentage
    );
    println!("Avg confidence:    {:.1}%", stats.avg_confidence);
    println!("Last 7 days:       {}", stats.last_7_days);
    println!(
        "Distribution:      Low {} / Moderate {} / High {}",
        stats.risk_distribution.low, stats.risk_distribution.moderate, stats.risk_distribution.high
    );

    if !stats.weekly_trend.is_empty() {
        println!("Weekly trend:");
        for week in &stats.weekly_trend {
            println!("  {}-W{:02}: {}", week.year, week.week, week.count);
        }
    }
    if !stats.risk_factors.is_empty() {
        println!("Risk factors among high-risk assessments:");
        for factor in &stats.risk_factors {
            println!(
                "  {:<32} {} ({:.1}%)",
                factor.label, factor.count, factor.percentage
            );
        }
    }
    Ok(())
}

fn cmd_next_id() -> Result<()> {
    let engine = build_engine()?;
    let outcome = engine.generate_patient_id();

    println!("{}", outcome.patient_id);
    if let Some(error) = outcome.error {
        tracing::warn!("Identifier allocated without history: {error}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let _guard = init_logging()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return Ok(());
    };

    match command.as_str() {
        "assess" => cmd_assess(&args[1..]),
        "history" => cmd_history(),
        "dashboard" => cmd_dashboard(),
        "next-id" => cmd_next_id(),
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        other => bail!("Unknown command {other:?}\n\n{USAGE}"),
    }
}
