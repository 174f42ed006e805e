use anyhow::Result;
use clap::Parser;
use gradecast_api::{ClientConfig, PredictClient};
use tracing::Level;

/// Student performance prediction client.
///
/// Without flags this opens the interactive form; `--check` probes the
/// service health endpoint and exits.
#[derive(Debug, Parser)]
#[command(name = "gradecast", version, about)]
struct Args {
    /// Base URL of the prediction service; falls back to GRADECAST_API_BASE
    #[arg(long)]
    base_url: Option<String>,

    /// Probe GET /health and exit instead of opening the form
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = ClientConfig::resolve(args.base_url)?;
    let client = PredictClient::new(&config)?;

    if args.check {
        return run_check(&client).await;
    }

    gradecast_tui::run(client).await
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_check(client: &PredictClient) -> Result<()> {
    match client.health().await {
        Ok(true) => {
            println!("ok: {}", client.base_url);
            Ok(())
        }
        Ok(false) => anyhow::bail!("service at {} answered but did not report ok", client.base_url),
        Err(e) => anyhow::bail!("health check failed: {e}"),
    }
}
