//! MarketLens CLI: analyze and config commands.
//!
//! Commands:
//! - `analyze` — fetch daily + 4h candles per symbol, run the analysis pipeline, print the report
//! - `config` — print the effective default configuration as TOML

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use marketlens_core::config::{DataSource, OutputFormat};
use marketlens_core::data::{BinanceProvider, CsvProvider, MarketDataProvider};
use marketlens_core::domain::Interval;
use marketlens_core::report::{MarkdownRenderer, PlainTextRenderer, Report, ReportRenderer};
use marketlens_core::{AppConfig, Analyzer};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "marketlens",
    about = "MarketLens CLI — market-structure analysis reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more symbols and print a report for each.
    Analyze {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbols to analyze (repeatable). Overrides the config's symbol list.
        #[arg(long = "symbol")]
        symbols: Vec<String>,

        /// Candle source.
        #[arg(long, value_enum)]
        source: Option<SourceArg>,

        /// Directory of `<SYMBOL>_<interval>.csv` files (csv source).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Debug logging (overridden by RUST_LOG).
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
    /// Print the default configuration as TOML.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Csv,
    Binance,
}

impl From<SourceArg> for DataSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Csv => DataSource::Csv,
            SourceArg::Binance => DataSource::Binance,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Markdown,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            config,
            symbols,
            source,
            data_dir,
            format,
            verbose,
        } => {
            init_tracing(verbose);
            let config = build_config(config, symbols, source, data_dir, format)?;
            let failures = run_analyze(&config)?;
            if failures > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", AppConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only reports.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file (or defaults) and apply command-line overrides.
fn build_config(
    path: Option<PathBuf>,
    symbols: Vec<String>,
    source: Option<SourceArg>,
    data_dir: Option<PathBuf>,
    format: Option<FormatArg>,
) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };

    if !symbols.is_empty() {
        config.symbols = symbols;
    }
    if let Some(source) = source {
        config.data.source = source.into();
    }
    if let Some(dir) = data_dir {
        config.data.csv_dir = dir;
    }
    if let Some(format) = format {
        config.output.format = format.into();
    }

    config.validate()?;
    Ok(config)
}

fn build_provider(config: &AppConfig) -> Result<Box<dyn MarketDataProvider>> {
    let provider: Box<dyn MarketDataProvider> = match config.data.source {
        DataSource::Csv => Box::new(CsvProvider::new(config.data.csv_dir.clone())),
        DataSource::Binance => Box::new(BinanceProvider::new(
            config.data.base_url.clone(),
            Duration::from_secs(config.data.timeout_secs),
        )?),
    };
    Ok(provider)
}

/// Analyze every configured symbol. Returns how many failed.
fn run_analyze(config: &AppConfig) -> Result<usize> {
    let provider = build_provider(config)?;
    let analyzer = Analyzer::new(&config.indicators)?;
    info!(
        provider = provider.name(),
        symbols = config.symbols.len(),
        "starting analysis"
    );

    let mut failures = 0;
    for symbol in &config.symbols {
        match analyze_symbol(config, provider.as_ref(), &analyzer, symbol) {
            Ok(report) => println!("{}", render(config.output.format, &report)?),
            Err(err) => {
                eprintln!("Error for {symbol}: {err:#}");
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn analyze_symbol(
    config: &AppConfig,
    provider: &dyn MarketDataProvider,
    analyzer: &Analyzer,
    symbol: &str,
) -> Result<Report> {
    let daily = provider
        .fetch(symbol, Interval::Daily, config.data.daily_limit)
        .with_context(|| format!("fetching {symbol} daily candles"))?;
    let h4 = provider
        .fetch(symbol, Interval::FourHour, config.data.h4_limit)
        .with_context(|| format!("fetching {symbol} 4h candles"))?;

    let report = analyzer.analyze(symbol, &daily, &h4, chrono::Utc::now())?;
    Ok(report)
}

fn render(format: OutputFormat, report: &Report) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => PlainTextRenderer.render(report),
        OutputFormat::Markdown => MarkdownRenderer.render(report),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    })
}
