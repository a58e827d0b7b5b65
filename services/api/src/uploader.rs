//! Asset uploads to the object store
//!
//! Uploaded bytes are stored under a generated key (never under the
//! caller's filename) and addressed afterwards by a deterministic public
//! URL.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use common::config::StorageConfig;
use common::error::{StorageError, StorageResult};
use std::path::Path;
use tracing::{error, info};
use uuid::Uuid;

/// Prefix of every generated object key
const KEY_PREFIX: &str = "render-assets";

/// A stored asset and its public address
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    pub key: String,
    pub content_type: &'static str,
    pub url: String,
}

/// Object-store client bound to one bucket
#[derive(Clone)]
pub struct AssetStore {
    client: Client,
    bucket: String,
    region: String,
}

impl AssetStore {
    /// Create a new AssetStore from storage configuration
    pub async fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "render-service-env",
        );

        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        AssetStore {
            client: Client::new(&shared_config),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
        }
    }

    /// Upload one asset, returning its key and public URL
    pub async fn upload(&self, filename: &str, content: Vec<u8>) -> StorageResult<UploadedAsset> {
        let key = object_key(filename);
        let content_type = content_type_for(filename);
        let size = content.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(content))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 upload failed: {}",
                    e
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let url = public_url(&self.bucket, &self.region, &key);
        info!(filename = %filename, url = %url, size_bytes = size, "Uploaded asset");

        Ok(UploadedAsset {
            key,
            content_type,
            url,
        })
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Content type from file extension, case-insensitive
pub(crate) fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// Generate a unique object key, keeping only the original extension
pub(crate) fn object_key(filename: &str) -> String {
    let token = Uuid::new_v4().simple();
    match extension_of(filename) {
        Some(ext) => format!("{KEY_PREFIX}/{token}.{ext}"),
        None => format!("{KEY_PREFIX}/{token}"),
    }
}

/// Public URL of an object; the default region omits the region segment
pub(crate) fn public_url(bucket: &str, region: &str, key: &str) -> String {
    if region == "us-east-1" {
        format!("https://{bucket}.s3.amazonaws.com/{key}")
    } else {
        format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_for_known_extensions() {
        let cases = [
            ("clip.mp4", "video/mp4"),
            ("clip.webm", "video/webm"),
            ("clip.mov", "video/quicktime"),
            ("img.png", "image/png"),
            ("img.jpg", "image/jpeg"),
            ("img.jpeg", "image/jpeg"),
            ("img.gif", "image/gif"),
            ("img.webp", "image/webp"),
            ("track.mp3", "audio/mpeg"),
            ("track.wav", "audio/wav"),
        ];
        for (filename, expected) in cases {
            assert_eq!(content_type_for(filename), expected, "{filename}");
        }
    }

    #[test]
    fn content_type_is_case_insensitive() {
        assert_eq!(content_type_for("CLIP.MP4"), "video/mp4");
        assert_eq!(content_type_for("Photo.JPeG"), "image/jpeg");
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(content_type_for("archive.tar.xz"), "application/octet-stream");
        assert_eq!(content_type_for("no_extension"), "application/octet-stream");
    }

    #[test]
    fn object_keys_are_prefixed_and_keep_extension() {
        let key = object_key("My Video.MP4");
        assert!(key.starts_with("render-assets/"));
        assert!(key.ends_with(".mp4"));
        assert!(!key.contains("My Video"));
    }

    #[test]
    fn object_keys_are_unique() {
        assert_ne!(object_key("a.png"), object_key("a.png"));
    }

    #[test]
    fn public_url_by_region() {
        assert_eq!(
            public_url("my-bucket", "us-east-1", "render-assets/x.png"),
            "https://my-bucket.s3.amazonaws.com/render-assets/x.png"
        );
        assert_eq!(
            public_url("my-bucket", "eu-west-3", "render-assets/x.png"),
            "https://my-bucket.s3.eu-west-3.amazonaws.com/render-assets/x.png"
        );
    }
}
