use crate::config::HygieneConfig;
use crate::error::HygieneError;
use crate::services::storage::S3StorageService;
use aws_config::sts::AssumeRoleProvider;
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::info;

/// Assumes the configured role and returns a client for the configured bucket.
///
/// The bucket is probed once so bad credentials surface here, before any
/// object is looked at.
pub async fn setup_storage(config: &HygieneConfig) -> Result<Arc<S3StorageService>, HygieneError> {
    let mut base_loader = aws_config::from_env();
    if let Some(region) = &config.region {
        base_loader = base_loader.region(Region::new(region.clone()));
    }
    let base_config = base_loader.load().await;

    info!(
        "🔑 Assuming role {} (session: {})",
        config.role_arn, config.role_session_name
    );
    let role_provider = AssumeRoleProvider::builder(config.role_arn.clone())
        .session_name(config.role_session_name.clone())
        .configure(&base_config)
        .build()
        .await;

    let mut loader = aws_config::from_env().credentials_provider(role_provider);
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();
    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    info!(
        "☁️  S3 Storage: {} (Bucket: {})",
        config.endpoint_url.as_deref().unwrap_or("aws"),
        config.bucket
    );

    match s3_client.head_bucket().bucket(&config.bucket).send().await {
        Ok(_) => info!("✅ Bucket '{}' is reachable", config.bucket),
        Err(e) => {
            return Err(HygieneError::Setup(format!(
                "cannot access bucket '{}' with role {}: {}",
                config.bucket,
                config.role_arn,
                aws_sdk_s3::error::DisplayErrorContext(&e)
            )));
        }
    }

    Ok(Arc::new(S3StorageService::new(
        s3_client,
        config.bucket.clone(),
    )))
}
