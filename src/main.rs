use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use skykit::io;
use skykit::model::reference::ReferenceData;
use skykit::simulation::config::EngineConfig;
use skykit::simulation::engine::Session;
use skykit::transport::{HttpRoundService, RoundService, SimulatedService};

struct Options {
    data_dir: PathBuf,
    report_path: Option<PathBuf>,
    offline: bool,
    offline_seed: u64,
    base_url: String,
    api_key: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            report_path: None,
            offline: false,
            offline_seed: 1,
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
        }
    }
}

fn parse_args() -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "--offline" => options.offline = true,
            "--seed" => options.offline_seed = value("--seed")?.parse()?,
            "--data" => options.data_dir = PathBuf::from(value("--data")?),
            "--report" => options.report_path = Some(PathBuf::from(value("--report")?)),
            "--base-url" => options.base_url = value("--base-url")?,
            "--api-key" => options.api_key = Some(value("--api-key")?),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?} (try --help)"),
        }
    }

    Ok(options)
}

fn print_usage() {
    println!("Usage: skykit [OPTIONS]");
    println!();
    println!("  --data <DIR>       reference-data directory (default: data)");
    println!("  --report <FILE>    export the per-round history as CSV");
    println!("  --offline          play against the built-in simulated service");
    println!("  --seed <N>         RNG seed for the simulated service (default: 1)");
    println!("  --base-url <URL>   evaluation service base URL");
    println!("  --api-key <KEY>    evaluation service API key");
    println!();
    println!("Logging is controlled via RUST_LOG (e.g. RUST_LOG=skykit=debug).");
}

fn build_service(
    options: &Options,
    config: &EngineConfig,
    reference: &ReferenceData,
) -> anyhow::Result<Box<dyn RoundService>> {
    if options.offline {
        return Ok(Box::new(SimulatedService::new(
            reference.clone(),
            config.total_days,
            options.offline_seed,
        )));
    }
    let api_key = options
        .api_key
        .clone()
        .or_else(|| env::var("SKYKIT_API_KEY").ok())
        .context("an API key is required (use --api-key or SKYKIT_API_KEY)")?;
    Ok(Box::new(HttpRoundService::new(
        options.base_url.clone(),
        api_key,
    )))
}

fn run() -> anyhow::Result<()> {
    let options = parse_args()?;
    let config = EngineConfig::default();

    let reference = io::load_reference_data(&options.data_dir)
        .with_context(|| format!("loading reference data from {}", options.data_dir.display()))?;
    let service = build_service(&options, &config, &reference)?;

    let mut session = Session::new(config, reference, service);
    let outcome = session.run()?;

    if let Some(path) = &options.report_path {
        io::write_round_log(path, session.history())?;
    }

    println!("Session {} complete.", outcome.session_id);
    println!("  rounds played:   {}", outcome.rounds_played);
    println!("  kits purchased:  {}", outcome.kits_purchased);
    println!("  total cost:      {:.2}", outcome.total_cost);
    if !outcome.penalty_totals.is_empty() {
        println!("  penalties by code:");
        for (code, amount) in &outcome.penalty_totals {
            println!("    {code}: {amount:.2}");
        }
    }
    let summary = session.tuner_summary();
    println!(
        "  final strategy:  {} (buffer x{:.2}, economy boost {:.2})",
        summary.mode, summary.buffer_multiplier, summary.economy_boost
    );
    if !summary.high_risk_airports.is_empty() {
        println!("  high-risk airports: {}", summary.high_risk_airports.join(", "));
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
