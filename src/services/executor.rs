use crate::models::{ItemOutcome, LocalFile, ObjectKey, PROVENANCE_TAG_KEY, RunReport, TagSet};
use crate::services::staging;
use crate::services::storage::StorageService;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Applies upload or delete actions one key at a time.
///
/// A failing key never stops the batch. The dry-run flag is fixed at
/// construction and no store mutation is issued while it is set.
pub struct ActionExecutor<'a> {
    store: &'a dyn StorageService,
    dry_run: bool,
    provenance: TagSet,
    archive_dir: Option<PathBuf>,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(store: &'a dyn StorageService, dry_run: bool, provenance_value: &str) -> Self {
        Self {
            store,
            dry_run,
            provenance: TagSet::from([(
                PROVENANCE_TAG_KEY.to_string(),
                provenance_value.to_string(),
            )]),
            archive_dir: None,
        }
    }

    /// Uploaded files are moved into `dir` afterwards.
    pub fn with_archive_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.archive_dir = dir;
        self
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub async fn upload_all(&self, files: &[LocalFile], report: &mut RunReport) {
        for file in files {
            let outcome = self.upload_one(file, report).await;
            report.record(file.key(), outcome);
        }
    }

    pub async fn delete_all(&self, keys: &[ObjectKey], report: &mut RunReport) {
        for key in keys {
            let outcome = self.delete_one(key).await;
            report.record(key.as_str(), outcome);
        }
    }

    async fn upload_one(&self, file: &LocalFile, report: &mut RunReport) -> ItemOutcome {
        let key = file.key();
        if self.dry_run {
            info!("[dry run] Would upload {}", key);
            return ItemOutcome::SkippedDryRun;
        }

        let data = match file.read().await {
            Ok(data) => data,
            Err(e) => {
                error!("❌ Failed to read {}: {}", file.path.display(), e);
                return ItemOutcome::Failed(format!("read failed: {e}"));
            }
        };
        let content_type = file.content_type.as_ref().map(|m| m.essence_str());

        if let Err(e) = self.store.upload_file(key, data, content_type).await {
            error!("❌ Failed to upload {}: {:#}", key, e);
            return ItemOutcome::Failed(format!("upload failed: {e:#}"));
        }
        info!("⬆️  Uploaded {}", key);

        // Tagging and archiving are best effort once the bytes are in the bucket
        if let Err(e) = self.store.put_tags(key, &self.provenance).await {
            warn!("⚠️  Uploaded {} but tagging failed: {:#}", key, e);
            report.warn(key, format!("tagging failed: {e:#}"));
        }

        if let Some(dir) = &self.archive_dir {
            match staging::archive_file(file, dir).await {
                Ok(target) => info!("📦 Moved {} to {}", key, target.display()),
                Err(e) => {
                    warn!("⚠️  Uploaded {} but could not move it to {}: {}", key, dir.display(), e);
                    report.warn(key, format!("archive failed: {e}"));
                }
            }
        }

        ItemOutcome::Succeeded
    }

    async fn delete_one(&self, key: &str) -> ItemOutcome {
        if self.dry_run {
            info!("[dry run] Would delete {}", key);
            return ItemOutcome::SkippedDryRun;
        }

        match self.store.delete_file(key).await {
            Ok(()) => {
                info!("🗑️  Deleted object: {}", key);
                ItemOutcome::Succeeded
            }
            Err(e) => {
                error!("❌ Failed to delete object {}: {:#}", key, e);
                ItemOutcome::Failed(format!("delete failed: {e:#}"))
            }
        }
    }
}
