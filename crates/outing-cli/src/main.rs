use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use outing_acquire::{Fetcher, SourceConfig};
use outing_model::{StartUrl, Suggestion};

#[derive(Parser)]
#[command(name = "outing")]
#[command(about = "Find a day when three friends can see a movie and then have dinner")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Start page linking to the calendar, cinema and dinner sites
    url: String,

    /// JSON file overriding the built-in source settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn init_logging(cli: &Cli) {
    // HTML parsing crates are noisy below warn
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z".to_string();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if cli.utc {
        builder
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format))
            .init();
    } else {
        builder
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format))
            .init();
    }
}

async fn run(cli: &Cli) -> Result<Vec<Suggestion>> {
    let start = StartUrl::parse(&cli.url).context("Invalid start URL")?;
    let config = match &cli.config {
        Some(path) => SourceConfig::load(path)?,
        None => SourceConfig::default(),
    };

    tracing::info!(url = %start, "Planning outing");
    let fetcher = Fetcher::new()?;
    let suggestions = outing_acquire::plan(&fetcher, &start, &config)
        .await
        .with_context(|| format!("Could not plan an outing from {start}"))?;
    Ok(suggestions)
}

fn render(suggestions: &[Suggestion]) -> String {
    let mut out = String::from("Suggestions\n===========\n");
    for suggestion in suggestions {
        out.push_str(&suggestion.to_string());
        out.push('\n');
    }
    out
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli).await {
        Ok(suggestions) => {
            print!("{}", render(&suggestions));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
