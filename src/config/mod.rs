use crate::error::HygieneError;
use std::env;
use std::path::PathBuf;

/// Runtime configuration shared by both workflows
#[derive(Debug, Clone, PartialEq)]
pub struct HygieneConfig {
    /// Role assumed for all bucket access (required)
    pub role_arn: String,

    /// STS session name (default: "s3rw-session")
    pub role_session_name: String,

    /// Target bucket (default: "s3-static-website-bucket-7950")
    pub bucket: String,

    /// Region override, SDK default chain when unset
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores, path-style addressing
    pub endpoint_url: Option<String>,

    /// Listing prefix for the quarantine workflow (default: all objects)
    pub object_prefix: String,

    /// Local directory holding files to upload (default: "to_upload")
    pub staging_dir: PathBuf,

    /// Uploaded files are moved here when set
    pub uploaded_dir: Option<PathBuf>,

    /// Value of the provenance tag (default: "s3-hygiene")
    pub provenance_tag_value: String,
}

impl HygieneConfig {
    pub const DEFAULT_BUCKET: &'static str = "s3-static-website-bucket-7950";
    pub const DEFAULT_SESSION_NAME: &'static str = "s3rw-session";
    pub const DEFAULT_STAGING_DIR: &'static str = "to_upload";
    pub const DEFAULT_PROVENANCE: &'static str = "s3-hygiene";

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, HygieneError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, HygieneError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let role_arn = var("ROLE_ARN")
            .ok_or_else(|| HygieneError::Config("ROLE_ARN must be set".to_string()))?;

        Ok(Self {
            role_arn,
            role_session_name: var("ROLE_SESSION_NAME")
                .unwrap_or_else(|| Self::DEFAULT_SESSION_NAME.to_string()),
            bucket: var("BUCKET_NAME").unwrap_or_else(|| Self::DEFAULT_BUCKET.to_string()),
            region: var("AWS_REGION"),
            endpoint_url: var("S3_ENDPOINT"),
            object_prefix: var("OBJECT_PREFIX").unwrap_or_default(),
            staging_dir: var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_STAGING_DIR)),
            uploaded_dir: var("UPLOADED_DIR").map(PathBuf::from),
            provenance_tag_value: var("PROVENANCE_TAG_VALUE")
                .unwrap_or_else(|| Self::DEFAULT_PROVENANCE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            HygieneConfig::from_lookup(lookup(&[("ROLE_ARN", "arn:aws:iam::1:role/rw")])).unwrap();
        assert_eq!(config.role_arn, "arn:aws:iam::1:role/rw");
        assert_eq!(config.role_session_name, "s3rw-session");
        assert_eq!(config.bucket, "s3-static-website-bucket-7950");
        assert_eq!(config.staging_dir, PathBuf::from("to_upload"));
        assert_eq!(config.provenance_tag_value, "s3-hygiene");
        assert!(config.region.is_none());
        assert!(config.endpoint_url.is_none());
        assert!(config.uploaded_dir.is_none());
        assert_eq!(config.object_prefix, "");
    }

    #[test]
    fn test_missing_role_arn_is_fatal() {
        let err = HygieneConfig::from_lookup(lookup(&[("BUCKET_NAME", "b")])).unwrap_err();
        assert!(matches!(err, HygieneError::Config(_)));

        let err = HygieneConfig::from_lookup(lookup(&[("ROLE_ARN", "  ")])).unwrap_err();
        assert!(matches!(err, HygieneError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let config = HygieneConfig::from_lookup(lookup(&[
            ("ROLE_ARN", "arn"),
            ("BUCKET_NAME", "uploads"),
            ("S3_ENDPOINT", "http://127.0.0.1:9000"),
            ("STAGING_DIR", "/tmp/stage"),
            ("UPLOADED_DIR", "/tmp/done"),
            ("OBJECT_PREFIX", "public/"),
            ("PROVENANCE_TAG_VALUE", "ci"),
        ]))
        .unwrap();
        assert_eq!(config.bucket, "uploads");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(config.staging_dir, PathBuf::from("/tmp/stage"));
        assert_eq!(config.uploaded_dir, Some(PathBuf::from("/tmp/done")));
        assert_eq!(config.object_prefix, "public/");
        assert_eq!(config.provenance_tag_value, "ci");
    }
}
