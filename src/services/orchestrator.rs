use crate::config::HygieneConfig;
use crate::error::HygieneError;
use crate::models::{
    ItemOutcome, LocalFile, ObjectKey, RunReport, SCAN_STATUS_TAG_KEY, Workflow,
};
use crate::services::classifier;
use crate::services::executor::ActionExecutor;
use crate::services::storage::StorageService;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Phases of a single invocation. Strictly forward, `Reported` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Classifying,
    Executing,
    Reported,
}

impl RunState {
    fn next(self) -> Option<RunState> {
        match self {
            RunState::Idle => Some(RunState::Classifying),
            RunState::Classifying => Some(RunState::Executing),
            RunState::Executing => Some(RunState::Reported),
            RunState::Reported => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub dry_run: bool,
    pub provenance_tag_value: String,
    pub archive_dir: Option<PathBuf>,
    pub object_prefix: String,
}

impl RunSettings {
    pub fn from_config(config: &HygieneConfig, dry_run: bool) -> Self {
        Self {
            dry_run,
            provenance_tag_value: config.provenance_tag_value.clone(),
            archive_dir: config.uploaded_dir.clone(),
            object_prefix: config.object_prefix.clone(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            dry_run: false,
            provenance_tag_value: HygieneConfig::DEFAULT_PROVENANCE.to_string(),
            archive_dir: None,
            object_prefix: String::new(),
        }
    }
}

/// Runs one workflow: classify every key, act on the ones that need it, report.
pub struct RunOrchestrator<'a> {
    store: &'a dyn StorageService,
    settings: RunSettings,
    state: RunState,
}

impl<'a> RunOrchestrator<'a> {
    pub fn new(store: &'a dyn StorageService, settings: RunSettings) -> Self {
        Self {
            store,
            settings,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn advance(&mut self, to: RunState) -> Result<(), HygieneError> {
        if self.state.next() != Some(to) {
            return Err(HygieneError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        debug!("Run state {:?} -> {:?}", self.state, to);
        self.state = to;
        Ok(())
    }

    /// Sync workflow: upload every local file the bucket does not have yet.
    pub async fn run_sync(&mut self, files: &[LocalFile]) -> Result<RunReport, HygieneError> {
        self.advance(RunState::Classifying)?;
        let input: Vec<ObjectKey> = files.iter().map(|f| f.name.clone()).collect();
        info!("🔍 Checking {} local files against the bucket", input.len());
        let classification = classifier::classify_existence(self.store, &input).await;

        self.advance(RunState::Executing)?;
        let executor = self.executor();
        let mut report = RunReport::new(Workflow::Sync, executor.dry_run());
        report.add_group("to_upload", classification.to_upload.len());
        report.add_group("already_present", classification.already_present.len());
        report.add_group("indeterminate", classification.indeterminate.len());

        let upload: HashSet<&str> = classification.to_upload.iter().map(String::as_str).collect();
        let to_upload: Vec<LocalFile> = files
            .iter()
            .filter(|f| upload.contains(f.key()))
            .cloned()
            .collect();
        executor.upload_all(&to_upload, &mut report).await;

        for item in classification.indeterminate {
            report.record(item.key, ItemOutcome::Indeterminate(item.reason));
        }
        report.sort_by_input(&input);

        self.advance(RunState::Reported)?;
        self.log_summary(&report);
        Ok(report)
    }

    /// Quarantine workflow: delete every object the scanner flagged.
    pub async fn run_quarantine(&mut self) -> Result<RunReport, HygieneError> {
        if self.state != RunState::Idle {
            return Err(HygieneError::InvalidTransition {
                from: self.state,
                to: RunState::Classifying,
            });
        }
        let input = self
            .store
            .list_objects(&self.settings.object_prefix)
            .await
            .map_err(HygieneError::Listing)?;

        self.advance(RunState::Classifying)?;
        info!("🔍 Checking scan status of {} objects", input.len());
        let classification = classifier::classify_threats(self.store, &input).await;

        self.advance(RunState::Executing)?;
        let executor = self.executor();
        let mut report = RunReport::new(Workflow::Quarantine, executor.dry_run());
        report.add_group("safe", classification.safe.len());
        report.add_group("malicious", classification.malicious.len());
        report.add_group("unscanned", classification.unscanned.len());
        report.add_group("indeterminate", classification.indeterminate.len());

        for key in &classification.unscanned {
            report.warn(key.as_str(), format!("missing {SCAN_STATUS_TAG_KEY} tag"));
        }

        if classification.malicious.is_empty() {
            info!("No malicious files found in the bucket.");
        } else {
            info!(
                "Identified {} malicious files to be removed:",
                classification.malicious.len()
            );
            for key in &classification.malicious {
                info!("- '{}'", key);
            }
        }
        executor.delete_all(&classification.malicious, &mut report).await;

        for item in classification.indeterminate {
            report.record(item.key, ItemOutcome::Indeterminate(item.reason));
        }
        report.sort_by_input(&input);

        self.advance(RunState::Reported)?;
        self.log_summary(&report);
        Ok(report)
    }

    fn executor(&self) -> ActionExecutor<'a> {
        ActionExecutor::new(
            self.store,
            self.settings.dry_run,
            &self.settings.provenance_tag_value,
        )
        .with_archive_dir(self.settings.archive_dir.clone())
    }

    fn log_summary(&self, report: &RunReport) {
        let failed = report.count("failed");
        let indeterminate = report.count("indeterminate");
        if report.dry_run {
            info!(
                "🧪 Dry run: {} actions skipped, nothing was changed",
                report.count("skipped-dry-run")
            );
        }
        if failed > 0 || indeterminate > 0 {
            warn!(
                "⚠️  {} run finished with {} failed and {} indeterminate items",
                report.workflow, failed, indeterminate
            );
        } else {
            info!(
                "✅ {} run finished: {} succeeded",
                report.workflow,
                report.count("succeeded")
            );
        }
    }
}
