use super::{ObjectKey, Workflow};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Succeeded,
    Failed(String),
    SkippedDryRun,
    Indeterminate(String),
}

impl ItemOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ItemOutcome::Succeeded => "succeeded",
            ItemOutcome::Failed(_) => "failed",
            ItemOutcome::SkippedDryRun => "skipped-dry-run",
            ItemOutcome::Indeterminate(_) => "indeterminate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub key: ObjectKey,
    pub outcome: ItemOutcome,
}

/// Non-fatal problem that leaves the item outcome untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemWarning {
    pub key: ObjectKey,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub name: &'static str,
    pub count: usize,
}

/// Result of one workflow invocation.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub workflow: Workflow,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub groups: Vec<GroupCount>,
    pub items: Vec<ItemReport>,
    pub warnings: Vec<ItemWarning>,
}

impl RunReport {
    pub fn new(workflow: Workflow, dry_run: bool) -> Self {
        Self {
            workflow,
            dry_run,
            started_at: Utc::now(),
            groups: Vec::new(),
            items: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record(&mut self, key: impl Into<ObjectKey>, outcome: ItemOutcome) {
        self.items.push(ItemReport {
            key: key.into(),
            outcome,
        });
    }

    pub fn warn(&mut self, key: impl Into<ObjectKey>, message: impl Into<String>) {
        self.warnings.push(ItemWarning {
            key: key.into(),
            message: message.into(),
        });
    }

    pub fn add_group(&mut self, name: &'static str, count: usize) {
        self.groups.push(GroupCount { name, count });
    }

    pub fn group(&self, name: &str) -> Option<usize> {
        self.groups.iter().find(|g| g.name == name).map(|g| g.count)
    }

    pub fn outcome(&self, key: &str) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| &item.outcome)
    }

    /// True iff no attempted action failed. Skipped and indeterminate items do not count.
    pub fn success(&self) -> bool {
        !self
            .items
            .iter()
            .any(|item| matches!(item.outcome, ItemOutcome::Failed(_)))
    }

    pub fn count(&self, label: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.outcome.label() == label)
            .count()
    }

    pub fn keys_with(&self, label: &str) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.outcome.label() == label)
            .map(|item| item.key.as_str())
            .collect()
    }

    /// Reorders items to follow `order`. Keys missing from `order` keep their
    /// relative position at the end.
    pub fn sort_by_input(&mut self, order: &[ObjectKey]) {
        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i))
            .collect();
        self.items
            .sort_by_key(|item| position.get(item.key.as_str()).copied().unwrap_or(usize::MAX));
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} run started {} (dry run: {})",
            self.workflow,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.dry_run
        )?;

        for group in &self.groups {
            writeln!(f, "  {:<16} {}", group.name, group.count)?;
        }

        if self.workflow == Workflow::Quarantine && self.group("malicious") == Some(0) {
            writeln!(f, "No malicious files found in the bucket.")?;
        }

        for label in ["succeeded", "failed", "skipped-dry-run", "indeterminate"] {
            writeln!(f, "  {:<16} {}", label, self.count(label))?;
        }

        for item in &self.items {
            match &item.outcome {
                ItemOutcome::Failed(reason) => writeln!(f, "  FAILED        '{}': {}", item.key, reason)?,
                ItemOutcome::Indeterminate(reason) => {
                    writeln!(f, "  INDETERMINATE '{}': {}", item.key, reason)?
                }
                ItemOutcome::SkippedDryRun => writeln!(f, "  SKIPPED       '{}'", item.key)?,
                ItemOutcome::Succeeded => {}
            }
        }

        for warning in &self.warnings {
            writeln!(f, "  WARNING       '{}': {}", warning.key, warning.message)?;
        }

        write!(f, "Overall success: {}", self.success())
    }
}
