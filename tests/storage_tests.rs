use realty_portal::storage::{
    MockStorageService, S3StorageClient, StorageService, object_key, sanitize_key,
};

#[cfg(test)]
mod key_tests {
    use super::*;

    #[test]
    fn test_sanitize_key_strips_navigation() {
        assert_eq!(sanitize_key("../../etc/passwd"), "etc/passwd");
        assert_eq!(sanitize_key("a//./b/"), "a/b");
    }

    #[test]
    fn test_object_key_prefixes_folder() {
        assert_eq!(
            object_key("inmobiliaria", "posts/42"),
            "inmobiliaria/posts/42"
        );
        assert_eq!(object_key("media/", "/x.jpg"), "media/x.jpg");
    }
}

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_upload_records_key() {
        let mock = MockStorageService::new();
        let stored = mock
            .upload("inmobiliaria", "properties/p-1", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(stored.reference, "inmobiliaria/properties/p-1");
        assert!(stored.url.ends_with("/inmobiliaria/properties/p-1"));
        assert_eq!(mock.uploaded_keys(), vec!["inmobiliaria/properties/p-1"]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockStorageService::new_failing();
        assert!(mock.upload("f", "k", vec![], "image/png").await.is_err());
        assert!(mock.destroy("f/k").await.is_err());
        assert!(mock.uploaded_keys().is_empty());
    }

    #[tokio::test]
    async fn test_mock_sanitization() {
        let mock = MockStorageService::new();
        let stored = mock
            .upload("media", "../../etc/passwd", vec![], "text/plain")
            .await
            .unwrap();
        assert!(!stored.reference.contains(".."));
        assert!(!stored.url.contains(".."));
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let mock = MockStorageService::new();
        let clone = mock.clone();
        clone.destroy("media/posts/1").await.unwrap();
        assert_eq!(mock.destroyed_references(), vec!["media/posts/1"]);
    }
}

#[cfg(test)]
mod s3_tests {
    use super::*;

    #[tokio::test]
    async fn test_s3_client_creation() {
        let _client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "admin",
            "password",
            "realty-test",
            "http://localhost:9000/realty-test/",
        )
        .await;
    }

    #[tokio::test]
    #[ignore = "requires a running MinIO at localhost:9000"]
    async fn test_s3_upload_and_destroy_against_minio() {
        let client = S3StorageClient::new(
            "http://localhost:9000",
            "us-east-1",
            "admin",
            "password",
            "realty-test",
            "http://localhost:9000/realty-test",
        )
        .await;
        client.ensure_bucket_exists().await;

        let stored = client
            .upload("tests", "hello.txt", b"hello".to_vec(), "text/plain")
            .await
            .expect("upload to MinIO");
        assert_eq!(stored.url, "http://localhost:9000/realty-test/tests/hello.txt");

        client.destroy(&stored.reference).await.expect("delete from MinIO");
    }
}
