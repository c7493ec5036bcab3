//! Blob storage for generated PDFs, past papers and note images.
//!
//! The core decides keys and prefixes; the backend is otherwise opaque.
//! Stored URLs may point at our own bucket (these get re-signed on every
//! read, since signed URLs are short-lived) or anywhere else (passed through
//! untouched). [`extract_own_key`] is the discriminator.

use crate::config::StorageConfig;
use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Blob storage is not configured")]
    NotConfigured,

    #[error("Blob storage error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstract blob store: upload, short-lived signed reads, delete.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store bytes under the given key; returns the key
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String>;

    /// A fresh signed GET URL for the key, or None when the backend cannot
    /// sign (Noop)
    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<Option<String>>;

    /// Delete the object; absent keys are not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// The storage key when the URL points at our own bucket, None for
    /// external URLs
    fn own_object_key(&self, url: &str) -> Option<String>;
}

/// Extract the object key from a URL that points at the given S3 bucket.
///
/// Recognizes both virtual-hosted style (`bucket.s3.region.amazonaws.com/key`)
/// and path style (`s3.region.amazonaws.com/bucket/key`). Anything else is
/// treated as an external URL.
pub fn extract_own_key(bucket: &str, url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    let key = if host.starts_with(&format!("{bucket}.")) {
        parsed.path().trim_start_matches('/').to_string()
    } else if host.contains("s3") {
        parsed.path().trim_start_matches('/').strip_prefix(&format!("{bucket}/"))?.to_string()
    } else {
        return None;
    };

    // Presigned URLs carry their query string; the key is just the path
    if key.is_empty() { None } else { Some(key) }
}

// ============================================================================
// S3 implementation
// ============================================================================

pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("put {key}: {e}")))?;

        Ok(key.to_string())
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> Result<Option<String>> {
        let config = PresigningConfig::expires_in(ttl).map_err(|e| StorageError::Backend(format!("presign config: {e}")))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| StorageError::Backend(format!("presign {key}: {e}")))?;

        Ok(Some(request.uri().to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("delete {key}: {e}")))?;

        Ok(())
    }

    fn own_object_key(&self, url: &str) -> Option<String> {
        extract_own_key(&self.bucket, url)
    }
}

// ============================================================================
// Noop implementation
// ============================================================================

/// No-op blob store for deployments without object storage (and for tests).
/// Uploads fail loudly; reads pass stored URLs through unsigned.
pub struct NoopStorage;

#[async_trait]
impl ObjectStorage for NoopStorage {
    async fn put(&self, _key: &str, _content_type: &str, _bytes: Vec<u8>) -> Result<String> {
        Err(StorageError::NotConfigured)
    }

    async fn signed_url(&self, _key: &str, _ttl: Duration) -> Result<Option<String>> {
        Ok(None)
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn own_object_key(&self, _url: &str) -> Option<String> {
        None
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Create a blob storage backend from configuration
pub async fn create_storage(config: &StorageConfig) -> Arc<dyn ObjectStorage> {
    match config {
        StorageConfig::S3 { bucket, region, .. } => {
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region.clone()))
                .load()
                .await;
            tracing::info!("Using S3 blob storage (bucket: {bucket})");
            Arc::new(S3Storage::new(aws_sdk_s3::Client::new(&aws_config), bucket.clone()))
        }
        StorageConfig::Noop => {
            tracing::warn!("Blob storage disabled; uploads will fail and stored URLs are served unsigned");
            Arc::new(NoopStorage)
        }
    }
}

/// Sanitize a display name into a storage key segment
pub fn key_segment(name: &str) -> String {
    name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_hosted_urls_yield_keys() {
        assert_eq!(
            extract_own_key("papers", "https://papers.s3.eu-west-2.amazonaws.com/mcqs/Mechanics_Kinematics.pdf"),
            Some("mcqs/Mechanics_Kinematics.pdf".to_string())
        );
        // Query strings (old presigned URLs) don't leak into the key
        assert_eq!(
            extract_own_key("papers", "https://papers.s3.amazonaws.com/a/b.pdf?X-Amz-Signature=abc"),
            Some("a/b.pdf".to_string())
        );
    }

    #[test]
    fn path_style_urls_yield_keys() {
        assert_eq!(
            extract_own_key("papers", "https://s3.eu-west-2.amazonaws.com/papers/notes/img.png"),
            Some("notes/img.png".to_string())
        );
        // A different bucket in path style is not ours
        assert_eq!(extract_own_key("papers", "https://s3.amazonaws.com/other/notes/img.png"), None);
    }

    #[test]
    fn external_urls_pass_through() {
        assert_eq!(extract_own_key("papers", "https://example.com/papers/file.pdf"), None);
        assert_eq!(extract_own_key("papers", "not a url"), None);
        assert_eq!(extract_own_key("papers", "https://papers.s3.amazonaws.com/"), None);
    }

    #[test]
    fn key_segments_are_filesystem_safe() {
        assert_eq!(key_segment("Mechanics - Kinematics (v2)"), "Mechanics___Kinematics__v2_");
        assert_eq!(key_segment("plain"), "plain");
    }

    #[tokio::test]
    async fn noop_storage_signs_nothing_and_rejects_uploads() {
        let storage = NoopStorage;
        assert!(matches!(storage.put("k", "application/pdf", vec![1]).await, Err(StorageError::NotConfigured)));
        assert_eq!(storage.signed_url("k", Duration::from_secs(60)).await.unwrap(), None);
        assert_eq!(storage.own_object_key("https://papers.s3.amazonaws.com/k"), None);
        storage.delete("k").await.unwrap();
    }
}
