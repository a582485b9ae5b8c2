#![allow(dead_code)]

use async_trait::async_trait;
use s3_hygiene::models::{ObjectKey, TagSet};
use s3_hygiene::services::storage::StorageService;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

/// Bucket kept in memory. Keys listed in the `fail_*` sets error on that call.
#[derive(Default)]
pub struct MockStorageService {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    pub content_types: Mutex<HashMap<String, String>>,
    pub tags: Mutex<HashMap<String, TagSet>>,
    pub fail_head: HashSet<String>,
    pub fail_put: HashSet<String>,
    pub fail_tagging: HashSet<String>,
    pub fail_delete: HashSet<String>,
    pub writes: Mutex<Vec<String>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, tags: &[(&str, &str)]) {
        self.files.lock().unwrap().insert(key.to_string(), Vec::new());
        self.tags.lock().unwrap().insert(
            key.to_string(),
            tags.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
    }

    pub fn has(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn list_objects(&self, prefix: &str) -> anyhow::Result<Vec<ObjectKey>> {
        let mut keys: Vec<_> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn file_exists(&self, key: &str) -> anyhow::Result<bool> {
        if self.fail_head.contains(key) {
            return Err(anyhow::anyhow!("403 Forbidden"));
        }
        Ok(self.has(key))
    }

    async fn get_tags(&self, key: &str) -> anyhow::Result<TagSet> {
        Ok(self.tags.lock().unwrap().get(key).cloned().unwrap_or_default())
    }

    async fn upload_file(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> anyhow::Result<()> {
        self.writes.lock().unwrap().push(format!("put {key}"));
        if self.fail_put.contains(key) {
            return Err(anyhow::anyhow!("503 SlowDown"));
        }
        self.files.lock().unwrap().insert(key.to_string(), data);
        if let Some(content_type) = content_type {
            self.content_types
                .lock()
                .unwrap()
                .insert(key.to_string(), content_type.to_string());
        }
        Ok(())
    }

    async fn put_tags(&self, key: &str, tags: &TagSet) -> anyhow::Result<()> {
        self.writes.lock().unwrap().push(format!("tag {key}"));
        if self.fail_tagging.contains(key) {
            return Err(anyhow::anyhow!("403 Forbidden"));
        }
        self.tags.lock().unwrap().insert(key.to_string(), tags.clone());
        Ok(())
    }

    async fn delete_file(&self, key: &str) -> anyhow::Result<()> {
        self.writes.lock().unwrap().push(format!("delete {key}"));
        if self.fail_delete.contains(key) {
            return Err(anyhow::anyhow!("403 Forbidden"));
        }
        self.files.lock().unwrap().remove(key);
        self.tags.lock().unwrap().remove(key);
        Ok(())
    }
}

pub fn write_files(dir: &Path, files: &[(&str, &[u8])]) {
    for (name, content) in files {
        std::fs::write(dir.join(name), content).unwrap();
    }
}

