use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::{Arc, Mutex};

/// StoredMedia
///
/// Result of a successful upload: the public URL served to clients and the reference
/// (the object key) needed to destroy the object later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub url: String,
    pub reference: String,
}

// 1. StorageService Contract
/// StorageService
///
/// Abstract contract for the media store holding property pictures and post covers.
/// The real S3 client (`S3StorageClient`) and the in-memory `MockStorageService` are
/// interchangeable behind `Arc<dyn StorageService>`.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used in the `Env::Local` setup to
    /// provision the bucket in MinIO.
    async fn ensure_bucket_exists(&self);

    /// Stores `bytes` under `<folder>/<key>`. Uploading to an existing key overwrites it.
    async fn upload(
        &self,
        folder: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredMedia, String>;

    /// Removes the object behind a reference returned by `upload`.
    async fn destroy(&self, reference: &str) -> Result<(), String>;
}

// 2. The Real Implementation (S3/MinIO)
/// S3StorageClient
///
/// Media store backed by an S3-compatible bucket. `force_path_style(true)` keeps it
/// compatible with MinIO.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    public_url: String,
}

impl S3StorageClient {
    /// new
    ///
    /// Constructs the S3 client using credentials and configuration from AppConfig.
    /// `public_url` is the base that object keys are appended to when building URLs.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_url: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            bucket_name: bucket.to_string(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// ensure_bucket_exists
    ///
    /// CreateBucket is idempotent for our purposes; an "already owned" error is ignored.
    async fn ensure_bucket_exists(&self) {
        if let Err(e) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            tracing::debug!(error = %e, bucket = %self.bucket_name, "create_bucket skipped");
        }
    }

    async fn upload(
        &self,
        folder: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredMedia, String> {
        let object_key = object_key(folder, key);

        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&object_key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        Ok(StoredMedia {
            url: format!("{}/{}", self.public_url, object_key),
            reference: object_key,
        })
    }

    async fn destroy(&self, reference: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(reference)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// sanitize_key
///
/// Removes directory navigation components (`..`, `.`) and empty segments from a key,
/// so user-influenced segments cannot escape the configured folder.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// The full object key `upload` stores `key` under, which is also its destroy reference.
pub fn object_key(folder: &str, key: &str) -> String {
    sanitize_key(&format!("{}/{}", folder, key))
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// In-memory `StorageService` for tests. Records every uploaded key and destroyed
/// reference; with `should_fail` set, every operation fails.
#[derive(Clone, Default)]
pub struct MockStorageService {
    pub should_fail: bool,
    uploads: Arc<Mutex<Vec<String>>>,
    destroyed: Arc<Mutex<Vec<String>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Object keys uploaded so far, in call order.
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploads.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn destroyed_references(&self) -> Vec<String> {
        self.destroyed.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn upload(
        &self,
        folder: &str,
        key: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredMedia, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        let object_key = object_key(folder, key);
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(object_key.clone());
        }

        Ok(StoredMedia {
            url: format!("http://localhost:9000/mock-bucket/{}", object_key),
            reference: object_key,
        })
    }

    async fn destroy(&self, reference: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        if let Ok(mut destroyed) = self.destroyed.lock() {
            destroyed.push(reference.to_string());
        }
        Ok(())
    }
}

/// StorageState
///
/// The concrete type used to share the media store across the application state.
pub type StorageState = Arc<dyn StorageService>;
