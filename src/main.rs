//! Roda Rent interactive till.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use roda::assistant::{self, Assistant, ContextError, GeminiClient, UnconfiguredAssistant};
use roda::catalog::{Catalog, CatalogError};
use roda::input::StdConsole;
use roda::pricing::{PricingEngine, Tariff, TariffError};
use roda::session::{RentalSession, SessionError};

const CATALOG_FIXTURE_YAML: &str = include_str!("../fixtures/catalog.yml");
const TARIFF_FIXTURE_YAML: &str = include_str!("../fixtures/tariff.yml");

#[derive(Debug, Parser)]
#[command(name = "roda", about = "Kasir interaktif Roda Rent", version)]
struct Cli {
    /// Context document handed to the AI assistant
    #[arg(long, default_value = "context.txt")]
    context: PathBuf,

    /// Receipt artifact path, overwritten each run
    #[arg(long, default_value = "struk_penyewaan.txt")]
    receipt: PathBuf,

    /// Catalog configuration override (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Tariff configuration override (defaults to the built-in tariff)
    #[arg(long)]
    tariff: Option<PathBuf>,

    /// API key for the AI assistant
    #[arg(long, env = "RODA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

/// Fatal startup and session failures surfaced to the operator.
#[derive(Debug, Error)]
enum AppError {
    /// A configuration override file could not be read.
    #[error("failed to read configuration file `{path}`")]
    ConfigRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Tariff(#[from] TariffError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");

            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let catalog_source = read_override(cli.catalog.as_ref(), CATALOG_FIXTURE_YAML)?;
    let catalog = Catalog::from_yaml(&catalog_source)?;

    let tariff_source = read_override(cli.tariff.as_ref(), TARIFF_FIXTURE_YAML)?;
    let tariff = Tariff::from_yaml(&tariff_source)?;

    // Missing context document is fatal: the assistant side-channel cannot
    // run without it.
    let context = assistant::load_context_doc(&cli.context)?;

    let assistant: Box<dyn Assistant> = match cli.api_key {
        Some(key) => Box::new(GeminiClient::new(key)),
        None => {
            tracing::warn!("no API key configured, assistant replies will be unavailable");

            Box::new(UnconfiguredAssistant)
        }
    };

    let engine = PricingEngine::new(tariff);
    let mut console = StdConsole;

    let session = RentalSession::new(
        &catalog,
        &engine,
        assistant.as_ref(),
        &context,
        &mut console,
        &cli.receipt,
    );

    session.run()?;

    Ok(())
}

fn read_override(path: Option<&PathBuf>, fallback: &str) -> Result<String, AppError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.display().to_string(),
            source,
        }),
        None => Ok(fallback.to_string()),
    }
}
