use crate::client::{AclRule, StorageClient, StoredObject, PUBLIC_READ};
use crate::StorageError;
use bytes::Bytes;
use google_cloud_storage::client::google_cloud_auth::credentials::CredentialsFile;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::object_access_controls::PredefinedObjectAcl;
use google_cloud_storage::http::objects::delete::DeleteObjectRequest;
use google_cloud_storage::http::objects::download::Range;
use google_cloud_storage::http::objects::get::GetObjectRequest;
use google_cloud_storage::http::objects::list::ListObjectsRequest;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use google_cloud_storage::http::Error as GcsError;

/// Google Cloud Storage client authenticated with a service account file
pub struct GcsClient {
    client: Client,
}

impl GcsClient {
    pub async fn from_credentials_file(json_key: &str) -> Result<Self, StorageError> {
        let credentials = CredentialsFile::new_from_file(json_key.to_string())
            .await
            .map_err(|e| StorageError::Credentials(format!("{}: {}", json_key, e)))?;

        let config = ClientConfig::default()
            .with_credentials(credentials)
            .await
            .map_err(|e| StorageError::Credentials(format!("{}: {}", json_key, e)))?;

        Ok(Self {
            client: Client::new(config),
        })
    }
}

fn is_not_found(err: &GcsError) -> bool {
    match err {
        GcsError::Response(response) => response.code == 404,
        GcsError::HttpClient(e) => e.status().map(|s| s.as_u16()) == Some(404),
        _ => false,
    }
}

/// GCS only accepts canned ACLs on upload; map the rule set onto one.
fn predefined_acl(acl: &[AclRule]) -> Option<PredefinedObjectAcl> {
    if acl.contains(&PUBLIC_READ) {
        Some(PredefinedObjectAcl::PublicRead)
    } else {
        None
    }
}

#[async_trait::async_trait]
impl StorageClient for GcsClient {
    async fn write_object(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        acl: &[AclRule],
    ) -> Result<StoredObject, StorageError> {
        tracing::debug!("Uploading {} ({} bytes) to GCS bucket {}", path, data.len(), bucket);

        let request = UploadObjectRequest {
            bucket: bucket.to_string(),
            predefined_acl: predefined_acl(acl),
            ..Default::default()
        };
        let upload_type = UploadType::Simple(Media::new(path.to_string()));

        let object = self
            .client
            .upload_object(&request, data.to_vec(), &upload_type)
            .await
            .map_err(|e| StorageError::UploadError(path.to_string(), e.to_string()))?;

        Ok(StoredObject {
            bucket: object.bucket,
            name: object.name,
            size: object.size.max(0) as u64,
        })
    }

    async fn read_object(&self, bucket: &str, path: &str) -> Result<Bytes, StorageError> {
        let request = GetObjectRequest {
            bucket: bucket.to_string(),
            object: path.to_string(),
            ..Default::default()
        };

        match self.client.download_object(&request, &Range::default()).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if is_not_found(&e) => Err(StorageError::NotFound(path.to_string())),
            Err(e) => Err(StorageError::ReadError(path.to_string(), e.to_string())),
        }
    }

    async fn delete_object(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        tracing::debug!("Deleting {} from GCS bucket {}", path, bucket);

        let request = DeleteObjectRequest {
            bucket: bucket.to_string(),
            object: path.to_string(),
            ..Default::default()
        };

        match self.client.delete_object(&request).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Err(StorageError::NotFound(path.to_string())),
            Err(e) => Err(StorageError::DeleteError(path.to_string(), e.to_string())),
        }
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let request = ListObjectsRequest {
                bucket: bucket.to_string(),
                prefix: Some(prefix.to_string()),
                page_token: page_token.take(),
                ..Default::default()
            };

            let response = self
                .client
                .list_objects(&request)
                .await
                .map_err(|e| StorageError::ListError(prefix.to_string(), e.to_string()))?;

            objects.extend(response.items.unwrap_or_default().into_iter().map(|object| {
                StoredObject {
                    bucket: object.bucket,
                    name: object.name,
                    size: object.size.max(0) as u64,
                }
            }));

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!("Listed {} object(s) under '{}' in {}", objects.len(), prefix, bucket);
        Ok(objects)
    }

    async fn close(&self) -> Result<(), StorageError> {
        // The HTTP client holds no session; dropping it is enough
        Ok(())
    }

    fn name(&self) -> &'static str {
        "gcs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_read_maps_to_canned_acl() {
        assert!(matches!(
            predefined_acl(&[PUBLIC_READ]),
            Some(PredefinedObjectAcl::PublicRead)
        ));
        assert!(predefined_acl(&[]).is_none());
    }

    #[tokio::test]
    async fn test_missing_credentials_file_fails() {
        let result = GcsClient::from_credentials_file("/nonexistent/gcp.json").await;
        assert!(matches!(result, Err(StorageError::Credentials(_))));
    }
}
