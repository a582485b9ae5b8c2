use crate::models::{ObjectKey, TagSet};
use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Tag, Tagging};

/// Primitive operations against a single bucket.
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectKey>>;
    /// `Ok(false)` only when the store reports the key as missing.
    async fn file_exists(&self, key: &str) -> Result<bool>;
    async fn get_tags(&self, key: &str) -> Result<TagSet>;
    async fn upload_file(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()>;
    async fn put_tags(&self, key: &str, tags: &TagSet) -> Result<()>;
    async fn delete_file(&self, key: &str) -> Result<()>;
}

pub struct S3StorageService {
    client: Client,
    bucket: String,
}

impl S3StorageService {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectKey>> {
        let mut objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let res = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token)
                .send()
                .await?;

            if let Some(contents) = res.contents {
                for object in contents {
                    if let Some(key) = object.key {
                        objects.push(key);
                    }
                }
            }

            if res.is_truncated.unwrap_or(false) {
                continuation_token = res.next_continuation_token;
            } else {
                break;
            }
        }

        Ok(objects)
    }

    async fn file_exists(&self, key: &str) -> Result<bool> {
        let res = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(anyhow::anyhow!(service_error))
                }
            }
        }
    }

    async fn get_tags(&self, key: &str) -> Result<TagSet> {
        let res = self
            .client
            .get_object_tagging()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;

        Ok(res
            .tag_set()
            .iter()
            .map(|tag| (tag.key().to_string(), tag.value().to_string()))
            .collect())
    }

    async fn upload_file(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(data))
            .send()
            .await?;
        Ok(())
    }

    async fn put_tags(&self, key: &str, tags: &TagSet) -> Result<()> {
        let tag_set = tags
            .iter()
            .map(|(k, v)| Tag::builder().key(k).value(v).build())
            .collect::<Result<Vec<_>, _>>()?;
        let tagging = Tagging::builder().set_tag_set(Some(tag_set)).build()?;

        let res = self
            .client
            .put_object_tagging()
            .bucket(&self.bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await;

        if let Err(e) = res {
            tracing::error!(
                "S3 put_object_tagging failed: {}/{}, error={:?}",
                self.bucket,
                key,
                e
            );
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete_file(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}

/// In-memory bucket with per-key failure injection.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockStorageService {
        pub objects: Mutex<HashMap<String, (Vec<u8>, Option<String>)>>,
        pub tags: Mutex<HashMap<String, TagSet>>,
        pub fail_probe: HashSet<String>,
        pub fail_get_tags: HashSet<String>,
        pub fail_upload: HashSet<String>,
        pub fail_put_tags: HashSet<String>,
        pub fail_delete: HashSet<String>,
        pub mutations: Mutex<Vec<String>>,
    }

    impl MockStorageService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_object(self, key: &str) -> Self {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (Vec::new(), None));
            self
        }

        pub fn with_tag(self, key: &str, tag_key: &str, tag_value: &str) -> Self {
            self.tags
                .lock()
                .unwrap()
                .entry(key.to_string())
                .or_default()
                .insert(tag_key.to_string(), tag_value.to_string());
            self
        }

        pub fn mutation_count(&self) -> usize {
            self.mutations.lock().unwrap().len()
        }

        pub fn contains(&self, key: &str) -> bool {
            self.objects.lock().unwrap().contains_key(key)
        }

        pub fn tags_of(&self, key: &str) -> TagSet {
            self.tags.lock().unwrap().get(key).cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl StorageService for MockStorageService {
        async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectKey>> {
            let mut keys: Vec<_> = self
                .objects
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect();
            keys.sort();
            Ok(keys)
        }

        async fn file_exists(&self, key: &str) -> Result<bool> {
            if self.fail_probe.contains(key) {
                anyhow::bail!("AccessDenied");
            }
            Ok(self.contains(key))
        }

        async fn get_tags(&self, key: &str) -> Result<TagSet> {
            if self.fail_get_tags.contains(key) {
                anyhow::bail!("AccessDenied");
            }
            Ok(self.tags_of(key))
        }

        async fn upload_file(
            &self,
            key: &str,
            data: Vec<u8>,
            content_type: Option<&str>,
        ) -> Result<()> {
            self.mutations.lock().unwrap().push(format!("put:{key}"));
            if self.fail_upload.contains(key) {
                anyhow::bail!("SlowDown");
            }
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (data, content_type.map(str::to_string)));
            Ok(())
        }

        async fn put_tags(&self, key: &str, tags: &TagSet) -> Result<()> {
            self.mutations.lock().unwrap().push(format!("tag:{key}"));
            if self.fail_put_tags.contains(key) {
                anyhow::bail!("AccessDenied");
            }
            self.tags.lock().unwrap().insert(key.to_string(), tags.clone());
            Ok(())
        }

        async fn delete_file(&self, key: &str) -> Result<()> {
            self.mutations.lock().unwrap().push(format!("delete:{key}"));
            if self.fail_delete.contains(key) {
                anyhow::bail!("AccessDenied");
            }
            self.objects.lock().unwrap().remove(key);
            self.tags.lock().unwrap().remove(key);
            Ok(())
        }
    }
}
