use dotenvy::dotenv;
use s3_hygiene::infrastructure::storage;
use s3_hygiene::services::staging;
use s3_hygiene::{HygieneConfig, RunOrchestrator, RunSettings, cli};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3_hygiene=info,s3_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::parse_args();
    let config = HygieneConfig::from_env()?;
    info!(
        "🚀 Syncing {} into bucket {}...",
        config.staging_dir.display(),
        config.bucket
    );

    // Local inventory first so a bad staging dir fails before any AWS call
    let files = staging::discover_files(&config.staging_dir)
        .await
        .map_err(s3_hygiene::HygieneError::Staging)?;
    let store = storage::setup_storage(&config).await?;

    let settings = RunSettings::from_config(&config, args.dry_run);
    let mut run = RunOrchestrator::new(store.as_ref(), settings);
    let report = run.run_sync(&files).await?;

    println!("{report}");
    if !report.success() {
        error!("❌ Some files could not be uploaded.");
    }

    Ok(())
}
