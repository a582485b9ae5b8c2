//! Decides what each workflow should do with every key, without touching the store.
//!
//! Keys are probed one at a time in input order. Probe or tag-fetch failures
//! never fall back to a default decision: the key is set aside as
//! indeterminate and logged.

use crate::models::{
    Indeterminate, ObjectKey, SCAN_STATUS_TAG_KEY, SyncClassification, THREATS_FOUND, TagSet,
    ThreatClassification,
};
use crate::services::storage::StorageService;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatVerdict {
    Malicious,
    Safe,
    /// No scan-status tag at all. Treated as safe.
    Unscanned,
}

/// Only the scan-status tag matters, and only an exact `THREATS_FOUND` is malicious.
pub fn verdict(tags: &TagSet) -> ThreatVerdict {
    match tags.get(SCAN_STATUS_TAG_KEY) {
        None => ThreatVerdict::Unscanned,
        Some(value) if value == THREATS_FOUND => ThreatVerdict::Malicious,
        Some(_) => ThreatVerdict::Safe,
    }
}

pub async fn classify_existence(
    store: &dyn StorageService,
    keys: &[ObjectKey],
) -> SyncClassification {
    let mut result = SyncClassification::default();

    for key in keys {
        match store.file_exists(key).await {
            Ok(true) => {
                debug!("Already present in bucket: {}", key);
                result.already_present.push(key.clone());
            }
            Ok(false) => {
                debug!("Not in bucket, will upload: {}", key);
                result.to_upload.push(key.clone());
            }
            Err(e) => {
                warn!("⚠️  Existence check failed for '{}', leaving it alone: {:#}", key, e);
                result.indeterminate.push(Indeterminate {
                    key: key.clone(),
                    reason: format!("existence check failed: {e:#}"),
                });
            }
        }
    }

    result
}

pub async fn classify_threats(
    store: &dyn StorageService,
    keys: &[ObjectKey],
) -> ThreatClassification {
    let mut result = ThreatClassification::default();

    for key in keys {
        let tags = match store.get_tags(key).await {
            Ok(tags) => tags,
            Err(e) => {
                warn!("⚠️  Could not read tags of '{}', leaving it alone: {:#}", key, e);
                result.indeterminate.push(Indeterminate {
                    key: key.clone(),
                    reason: format!("tag fetch failed: {e:#}"),
                });
                continue;
            }
        };

        match verdict(&tags) {
            ThreatVerdict::Malicious => {
                warn!("🦠 Scanner has identified a malicious object: {}", key);
                result.malicious.push(key.clone());
            }
            ThreatVerdict::Safe => result.safe.push(key.clone()),
            ThreatVerdict::Unscanned => {
                warn!("⚠️  Could not find {} tag on object: {}", SCAN_STATUS_TAG_KEY, key);
                result.unscanned.push(key.clone());
                result.safe.push(key.clone());
            }
        }
    }

    result
}
