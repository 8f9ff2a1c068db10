use std::sync::Arc;

use clap::{Parser, Subcommand};
use pricewatch::{
    config::AppConfig,
    http_client::create_retryable_http_client,
    notification::PushedClient,
    persistence::{ThresholdFile, ThresholdStore},
    providers::RestQuoteSource,
    supervisor::Supervisor,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing app.yaml.
    #[arg(long)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the price watch supervisor.
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_supervisor(cli.config_dir.as_deref()).await?,
    }

    Ok(())
}

async fn run_supervisor(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = AppConfig::new(config_dir)?;
    tracing::debug!(symbol = %config.symbol, quote_url = %config.quote_url, "Configuration loaded.");

    // Resolving the threshold storage location is the only fatal startup
    // step; without it even the default could not be persisted.
    let threshold_file = ThresholdFile::new(&config.threshold_path);
    threshold_file.ensure_parent_dir().await?;

    let initial_threshold = match threshold_file.load().await {
        Ok(value) => {
            tracing::info!(value, path = %threshold_file.path().display(), "Loaded persisted threshold.");
            value
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                default = config.default_threshold,
                "Could not load persisted threshold, falling back to the default."
            );
            config.default_threshold
        }
    };
    let threshold = Arc::new(ThresholdStore::new(initial_threshold));

    let http_client = create_retryable_http_client(&config.http_retry, reqwest::Client::new());
    let quote_source = RestQuoteSource::new(http_client.clone(), config.quote_url.clone());
    let push_sink = PushedClient::new(config.push.clone(), http_client)?;

    let supervisor = Supervisor::builder()
        .config(config)
        .threshold_store(threshold)
        .threshold_file(threshold_file)
        .quote_source(Arc::new(quote_source))
        .push_sink(Arc::new(push_sink))
        .build()?;

    tracing::info!("Supervisor initialized, starting price watch...");

    supervisor.run().await?;

    Ok(())
}
