//! Binary entry point for the Neuron Conversation Engine.
//!
//! Loads a `.brain` graph and a `.nol` vocabulary, then runs an interactive
//! loop that prints each response followed by its thought trace and stage
//! timings.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use nce_core::format::{brain, nol};
use nce_core::{NceConfig, Session, TurnReport};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// NCE - a graph-based conversational engine driven by spreading activation.
#[derive(Parser)]
#[command(name = "nce")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Concept graph to load.
    #[arg(long, env = "NCE_BRAIN", default_value = "data/example.brain")]
    brain: PathBuf,

    /// Vocabulary and templates to load.
    #[arg(long, env = "NCE_NOL", default_value = "data/example.nol")]
    nol: PathBuf,

    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "NCE_CONFIG")]
    config: Option<PathBuf>,

    /// Print each turn report as JSON instead of the pretty trace.
    #[arg(long)]
    json: bool,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => NceConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => NceConfig::default(),
    };
    init_tracing(&config, cli.verbose)?;

    let mut session = load_session(&cli.brain, &cli.nol, &config)?;
    println!("Neuron Conversation Engine");
    println!(
        "Loaded {} nodes, {} edges, {} responses, {} words. Type 'quit' to exit.",
        session.graph().node_count(),
        session.graph().edge_count(),
        session.graph().response_count(),
        session.vocabulary().vocab.len(),
    );

    repl(&mut session, cli.json)
}

fn init_tracing(config: &NceConfig, verbose: bool) -> Result<()> {
    let fallback = if verbose { "debug" } else { config.general.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .with_context(|| format!("invalid log level '{fallback}'"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .try_init()
        .context("failed to install tracing subscriber")
}

fn load_session(brain_path: &Path, nol_path: &Path, config: &NceConfig) -> Result<Session> {
    let graph = brain::load(brain_path)
        .with_context(|| format!("failed to load brain file {}", brain_path.display()))?;
    let vocab = nol::load(nol_path)
        .with_context(|| format!("failed to load vocabulary file {}", nol_path.display()))?;
    Ok(Session::new(graph, vocab, config))
}

fn repl(session: &mut Session, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        print!("\nYou> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "quit" | "exit") {
            break;
        }

        let report = session.run_turn(input);
        debug!(turn = report.turn, rule = %report.rule_id, "Responded");
        print_report(&report, json)?;
    }

    println!("Goodbye.");
    Ok(())
}

fn print_report(report: &TurnReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }
    println!("NCE> {}", report.response_text);
    println!();
    println!("{}", report.thought_trace);
    println!("{}", report.profiling.summary());
    Ok(())
}
