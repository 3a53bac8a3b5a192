//! CLI tool for routing signals through the intent dispatcher
//!
//! Usage:
//!   dispatch "cria despesa de 36 eur no continente"     # Text summary
//!   dispatch --signal voice "lembra-me ligar ao banco"  # Voice signal
//!   dispatch --format json "recibo pngo doce 23.4"      # JSON result
//!   dispatch --input signal.json                        # DispatcherInput document
//!   dispatch --corpus tests/golden_corpus/seed.yaml     # Replay a corpus

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use signal_dispatch::{
    DispatcherConfig, DispatcherInput, DispatcherResult, IntentDispatcher, SignalType,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SignalArg {
    Voice,
    Text,
    Ocr,
}

impl From<SignalArg> for SignalType {
    fn from(arg: SignalArg) -> Self {
        match arg {
            SignalArg::Voice => SignalType::Voice,
            SignalArg::Text => SignalType::Text,
            SignalArg::Ocr => SignalType::Ocr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "dispatch")]
#[command(about = "Route a signal to a dashboard module")]
struct Args {
    /// Normalized signal text
    text: Option<String>,

    /// Signal origin
    #[arg(short = 's', long, value_enum, default_value = "text")]
    signal: SignalArg,

    /// Reflex threshold override (0.0-1.0)
    #[arg(short = 't', long, env = "DISPATCH_REFLEX_THRESHOLD")]
    threshold: Option<f32>,

    /// Dispatcher config YAML
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Read a DispatcherInput JSON document instead of positional text
    #[arg(short = 'i', long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Replay a golden corpus YAML and report mismatches
    #[arg(long, conflicts_with_all = ["text", "input"])]
    corpus: Option<PathBuf>,

    /// Print the full reason trail in text mode
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// One golden corpus case.
#[derive(Debug, Deserialize)]
struct CorpusCase {
    id: String,
    #[serde(default = "default_signal_type")]
    signal_type: SignalType,
    input: String,
    expected_module: String,
    expected_strategy: Option<String>,
}

fn default_signal_type() -> SignalType {
    SignalType::Text
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let dispatcher = build_dispatcher(args)?;

    if let Some(ref corpus) = args.corpus {
        return replay_corpus(&dispatcher, corpus, args.format);
    }

    let input = match (&args.input, &args.text) {
        (Some(path), _) => read_input(path)?,
        (None, Some(text)) => DispatcherInput::new(args.signal.into(), text.as_str()),
        (None, None) => bail!("Provide signal text, --input or --corpus"),
    };

    let result = dispatcher.evaluate(&input);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_result(&input, &result, args.verbose),
    }

    Ok(ExitCode::SUCCESS)
}

fn build_dispatcher(args: &Args) -> Result<IntentDispatcher> {
    let mut config = match args.config {
        Some(ref path) => DispatcherConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DispatcherConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.reflex_threshold = threshold;
    }

    Ok(IntentDispatcher::from_config(&config)?)
}

fn read_input(path: &Path) -> Result<DispatcherInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn replay_corpus(
    dispatcher: &IntentDispatcher,
    path: &Path,
    format: OutputFormat,
) -> Result<ExitCode> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let cases: Vec<CorpusCase> =
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    let mut failures = Vec::new();
    for case in &cases {
        let result = dispatcher.evaluate(&DispatcherInput::new(case.signal_type, case.input.as_str()));

        let module_ok = result.module.as_str() == case.expected_module;
        let strategy_ok = case
            .expected_strategy
            .as_deref()
            .map_or(true, |s| s == result.strategy.as_str());

        if format == OutputFormat::Text {
            let status = if module_ok && strategy_ok { "PASS" } else { "FAIL" };
            println!(
                "[{}] {} -> {} / {} ({:.2})",
                status, case.id, result.module, result.strategy, result.confidence
            );
        }
        if !(module_ok && strategy_ok) {
            failures.push(serde_json::json!({
                "id": case.id,
                "input": case.input,
                "expectedModule": case.expected_module,
                "expectedStrategy": case.expected_strategy,
                "module": result.module,
                "strategy": result.strategy,
                "confidence": result.confidence,
            }));
        }
    }

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "total": cases.len(),
                "failed": failures.len(),
                "failures": failures,
            }))?
        ),
        OutputFormat::Text => println!(
            "\n{} cases, {} passed, {} failed",
            cases.len(),
            cases.len() - failures.len(),
            failures.len()
        ),
    }

    Ok(if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_result(input: &DispatcherInput, result: &DispatcherResult, verbose: bool) {
    println!("Signal:     {} \"{}\"", input.signal_type, input.normalized_text);
    println!("Module:     {}", result.module);
    println!("Strategy:   {}", result.strategy);
    println!("Confidence: {:.2}", result.confidence);
    println!("Strict:     {}", result.strict_parameters_met);
    if !result.extracted.is_empty() {
        if let Ok(fields) = serde_json::to_string(&result.extracted) {
            println!("Extracted:  {}", fields);
        }
    }
    if verbose {
        println!("Reason:");
        for line in &result.reason {
            println!("  - {}", line);
        }
    }
}
