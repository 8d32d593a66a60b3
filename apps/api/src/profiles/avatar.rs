use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

/// Avatars up to 5 MB; anything larger is rejected before upload.
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Remote store for avatar images. Object-safe so handlers depend on the
/// seam, with the S3 client behind it.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Stores the bytes under `key` and returns the public URL.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String>;

    /// Removes the remote object. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// S3 / MinIO-backed implementation.
pub struct S3AvatarStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3AvatarStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base: String) -> Self {
        Self {
            client,
            bucket,
            public_base,
        }
    }
}

#[async_trait]
impl AvatarStore for S3AvatarStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        info!("Uploaded avatar to s3://{}/{}", self.bucket, key);
        Ok(format!(
            "{}/{}/{}",
            self.public_base.trim_end_matches('/'),
            self.bucket,
            key
        ))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 delete failed: {e}"))?;

        info!("Deleted avatar s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// File extension for the accepted image content types; `None` means the
/// upload is rejected.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

pub fn avatar_key(profile_id: Uuid, extension: &str) -> String {
    format!("avatars/{}/{}.{}", profile_id, Uuid::new_v4(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_accepted_types() {
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/webp"), Some("webp"));
        assert_eq!(extension_for("image/gif"), Some("gif"));
    }

    #[test]
    fn test_extension_for_rejects_everything_else() {
        assert_eq!(extension_for("image/svg+xml"), None);
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(extension_for(""), None);
    }

    #[test]
    fn test_avatar_key_shape() {
        let profile_id = Uuid::new_v4();
        let key = avatar_key(profile_id, "png");
        assert!(key.starts_with(&format!("avatars/{profile_id}/")));
        assert!(key.ends_with(".png"));
    }
}
