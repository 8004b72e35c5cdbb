//! Entry point. Reads commands from argv or stdin -> Parser -> Dispatcher -> Report.

use dotenvy::dotenv;
use std::io::{self, BufRead};
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use chrono::Local;
use realty_calc::catalog::YamlCatalog;
use realty_calc::config::AppConfig;
use realty_calc::dispatch::Dispatcher;
use realty_calc::parser::parse_request;
use realty_calc::{report, CommandError};

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .init();

    // Load config (REALTY_CONFIG -> ./config.yaml -> platform dir -> defaults)
    let explicit = std::env::var("REALTY_CONFIG").ok();
    let cfg = match AppConfig::locate(explicit.as_deref()) {
        Some(path) => {
            info!("Using config {}", path.display());
            AppConfig::load(&path)?
        }
        None => {
            warn!("No config file found, using built-in defaults");
            AppConfig::default()
        }
    };
    let catalog = YamlCatalog::load(&cfg.catalog.path)?;
    let dispatcher = Dispatcher::new(cfg.policy, catalog);

    // One command from argv, else a line-oriented session on stdin
    let argv: Vec<String> = std::env::args().skip(1).map(quote_arg).collect();
    if !argv.is_empty() {
        let line = argv.join(" ");
        println!("{}", run_line(&dispatcher, &cfg.currency, &line)?);
        return Ok(());
    }

    info!("Reading commands from stdin ('help' for a list)");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let t = line.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        match run_line(&dispatcher, &cfg.currency, t) {
            Ok(out) => println!("{out}\n"),
            Err(e) => error!("'{}' rejected: {}", t, e),
        }
    }
    Ok(())
}

fn run_line(
    dispatcher: &Dispatcher<YamlCatalog>,
    currency: &str,
    line: &str,
) -> Result<String, CommandError> {
    let req = parse_request(line)?;
    let outcome = dispatcher.execute(&req)?;
    if req.wants_json() {
        // serializing plain records cannot fail
        return Ok(serde_json::to_string_pretty(&outcome).unwrap_or_default());
    }
    Ok(report::render(&outcome, currency, Local::now().date_naive()))
}

/// The shell has already split words; re-quote values that contained spaces.
fn quote_arg(arg: String) -> String {
    if let Some((k, v)) = arg.split_once('=') {
        if v.contains(char::is_whitespace) {
            return format!("{k}=\"{v}\"");
        }
    }
    arg
}
