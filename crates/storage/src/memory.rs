use crate::client::{AclRule, StorageClient, StoredObject};
use crate::StorageError;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

struct Entry {
    data: Bytes,
    acl: Vec<AclRule>,
}

/// In-process object store keyed by (bucket, name)
///
/// Behaves like a remote store for the connector: missing objects report
/// `NotFound`, listings come back in name order, and every call fails once
/// the client is closed.
pub struct InMemoryClient {
    objects: RwLock<BTreeMap<(String, String), Entry>>,
    closed: AtomicBool,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// ACL stored with an object, if the object exists
    pub fn acl_of(&self, bucket: &str, path: &str) -> Option<Vec<AclRule>> {
        self.objects
            .read()
            .get(&(bucket.to_string(), path.to_string()))
            .map(|entry| entry.acl.clone())
    }

    /// Number of objects across all buckets
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::BackendUnavailable(
                "in-memory client is closed".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StorageClient for InMemoryClient {
    async fn write_object(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        acl: &[AclRule],
    ) -> Result<StoredObject, StorageError> {
        self.ensure_open()?;

        let size = data.len() as u64;
        self.objects.write().insert(
            (bucket.to_string(), path.to_string()),
            Entry {
                data,
                acl: acl.to_vec(),
            },
        );

        Ok(StoredObject {
            bucket: bucket.to_string(),
            name: path.to_string(),
            size,
        })
    }

    async fn read_object(&self, bucket: &str, path: &str) -> Result<Bytes, StorageError> {
        self.ensure_open()?;

        self.objects
            .read()
            .get(&(bucket.to_string(), path.to_string()))
            .map(|entry| entry.data.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete_object(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        self.ensure_open()?;

        self.objects
            .write()
            .remove(&(bucket.to_string(), path.to_string()))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        self.ensure_open()?;

        let objects = self.objects.read();
        Ok(objects
            .iter()
            .filter(|((b, name), _)| b == bucket && name.starts_with(prefix))
            .map(|((b, name), entry)| StoredObject {
                bucket: b.clone(),
                name: name.clone(),
                size: entry.data.len() as u64,
            })
            .collect())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_is_scoped_to_bucket_and_prefix() {
        let client = InMemoryClient::new();
        client.write_object("a", "img/1", Bytes::from_static(b"1"), &[]).await.unwrap();
        client.write_object("a", "img/2", Bytes::from_static(b"22"), &[]).await.unwrap();
        client.write_object("a", "doc/1", Bytes::from_static(b"3"), &[]).await.unwrap();
        client.write_object("b", "img/3", Bytes::from_static(b"4"), &[]).await.unwrap();

        let listed = client.list_objects("a", "img/").await.unwrap();
        let names: Vec<_> = listed.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["img/1", "img/2"]);
        assert_eq!(listed[1].size, 2);
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let client = InMemoryClient::new();

        assert!(matches!(
            client.delete_object("a", "nope").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            client.read_object("a", "nope").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_client_rejects_calls() {
        let client = InMemoryClient::new();
        client.close().await.unwrap();

        let result = client.write_object("a", "x", Bytes::new(), &[]).await;
        assert!(matches!(result, Err(StorageError::BackendUnavailable(_))));
    }
}
