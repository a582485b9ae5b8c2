use dotenvy::dotenv;
use s3_hygiene::infrastructure::storage;
use s3_hygiene::{HygieneConfig, RunOrchestrator, RunSettings, cli};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3_hygiene=info,s3_quarantine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::parse_args();
    info!("🛡️  Starting quarantine of flagged objects...");

    let config = HygieneConfig::from_env()?;
    let store = storage::setup_storage(&config).await?;

    let settings = RunSettings::from_config(&config, args.dry_run);
    let mut run = RunOrchestrator::new(store.as_ref(), settings);
    let report = run.run_quarantine().await?;

    println!("{report}");
    if report.success() {
        info!("All flagged objects were handled.");
    } else {
        error!("❌ Failed to remove all malicious files.");
    }

    Ok(())
}
