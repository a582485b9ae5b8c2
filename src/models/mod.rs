pub mod report;

pub use report::{GroupCount, ItemOutcome, ItemReport, ItemWarning, RunReport};

use mime::Mime;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Tag written after a successful upload, recording which tool performed the write.
pub const PROVENANCE_TAG_KEY: &str = "Orchestration";

/// Tag written by the external malware scanner.
pub const SCAN_STATUS_TAG_KEY: &str = "GuardDutyMalwareScanStatus";

/// Scan verdict that marks an object for deletion.
pub const THREATS_FOUND: &str = "THREATS_FOUND";

pub type ObjectKey = String;

/// Tag key -> tag value. Keys are unique, order carries no meaning.
pub type TagSet = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Sync,
    Quarantine,
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Workflow::Sync => write!(f, "sync"),
            Workflow::Quarantine => write!(f, "quarantine"),
        }
    }
}

/// A file discovered under the staging directory. The object key is the file name.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub name: String,
    pub path: PathBuf,
    pub content_type: Option<Mime>,
}

impl LocalFile {
    pub fn new(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        let content_type = mime_guess::from_path(&path).first();
        Some(Self {
            name,
            path,
            content_type,
        })
    }

    pub fn key(&self) -> &str {
        &self.name
    }

    /// Bytes are only loaded here, right before the upload.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// A key that could not be classified because the store call itself failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indeterminate {
    pub key: ObjectKey,
    pub reason: String,
}

/// Outcome of the existence probe over the local file names.
///
/// Every input key lands in exactly one of the three lists, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncClassification {
    pub to_upload: Vec<ObjectKey>,
    pub already_present: Vec<ObjectKey>,
    pub indeterminate: Vec<Indeterminate>,
}

impl SyncClassification {
    pub fn len(&self) -> usize {
        self.to_upload.len() + self.already_present.len() + self.indeterminate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of reading the scan-status tag of every remote object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreatClassification {
    pub safe: Vec<ObjectKey>,
    pub malicious: Vec<ObjectKey>,
    pub indeterminate: Vec<Indeterminate>,
    /// Subset of `safe`: objects the scanner never tagged.
    pub unscanned: Vec<ObjectKey>,
}

impl ThreatClassification {
    pub fn len(&self) -> usize {
        self.safe.len() + self.malicious.len() + self.indeterminate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
