//! Image upload to the platform's object storage.
//!
//! The storage endpoint accepts raw file bytes via PUT and the uploaded
//! object becomes publicly readable under a separate base URL. Bearer
//! authentication does not apply here; access control is the storage
//! endpoint's own concern.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use tracing::debug;

/// Upload timeout in seconds. Image files are larger than API payloads.
const UPLOAD_TIMEOUT_SECS: u64 = 120;

#[derive(Clone)]
pub struct MediaStore {
    client: Client,
    upload_base: String,
    public_base: String,
}

/// Build the object key: `<folder>/<millis>_<file_name>`. The timestamp
/// prefix keeps repeated uploads of the same file name distinct.
fn object_key(folder: &str, file_name: &str) -> String {
    format!(
        "{}/{}_{}",
        folder.trim_matches('/'),
        Utc::now().timestamp_millis(),
        file_name
    )
}

/// Guess a content type from the file extension.
fn content_type_for(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

impl MediaStore {
    pub fn new(upload_base: String, public_base: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .context("Failed to build upload client")?;

        Ok(Self {
            client,
            upload_base: upload_base.trim_end_matches('/').to_string(),
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    /// Upload raw bytes and return the public URL they are served from.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        folder: &str,
        file_name: &str,
    ) -> Result<String> {
        let key = object_key(folder, file_name);
        let url = format!("{}/{}", self.upload_base, key);

        debug!(key = %key, size = bytes.len(), "Uploading media object");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .context("Failed to send upload request")?;

        if !response.status().is_success() {
            anyhow::bail!("Upload failed with status {}", response.status());
        }

        Ok(format!("{}/{}", self.public_base, key))
    }

    /// Read a local file and upload it, guessing the content type from
    /// the extension.
    pub async fn upload_file(&self, path: &Path, folder: &str) -> Result<String> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Upload path has no file name")?
            .to_string();

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        self.upload(bytes, content_type_for(&file_name), folder, &file_name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_keys_are_folder_scoped_and_keep_the_name() {
        let key = object_key("meal_images", "lunch.png");
        assert!(key.starts_with("meal_images/"));
        assert!(key.ends_with("_lunch.png"));

        // Stray slashes on the folder are trimmed
        let key = object_key("/thumbs/", "a.jpg");
        assert!(key.starts_with("thumbs/"));
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.webp"), "image/webp");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
