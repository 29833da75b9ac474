use std::path::{Path, PathBuf};

use thiserror::Error;

/// Largest accepted cover image (1 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 1024 * 1024;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Why a file was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Images only (jpg, jpeg, png, gif)")]
    UnsupportedType,
    #[error("File exceeds the {} byte limit", MAX_UPLOAD_BYTES)]
    TooLarge,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct UploadValidator {
    max_bytes: u64,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self { max_bytes: MAX_UPLOAD_BYTES }
    }
}

impl UploadValidator {
    /// Extension gate, applied before any of the file body is read
    pub fn check_type(&self, file_name: &str) -> Result<(), Rejection> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or(Rejection::UnsupportedType)?;

        if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(())
        } else {
            Err(Rejection::UnsupportedType)
        }
    }

    pub fn check_size(&self, size: u64) -> Result<(), Rejection> {
        if size > self.max_bytes {
            Err(Rejection::TooLarge)
        } else {
            Ok(())
        }
    }

    pub fn validate(&self, file_name: &str, size: u64) -> Result<(), Rejection> {
        self.check_type(file_name)?;
        self.check_size(size)
    }
}

/// An accepted file held in memory until it is written out
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// `<field>-<millis><ext>`, keeping the extension exactly as uploaded
pub fn generated_name(field_name: &str, original_name: &str, timestamp_ms: i64) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    format!("{}-{}{}", field_name, timestamp_ms, ext)
}

/// Directory the accepted cover images are written to and served from
#[derive(Debug, Clone)]
pub struct UploadStorage {
    dir: PathBuf,
}

impl UploadStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the file under a generated name and return that name
    pub async fn persist(&self, file: &UploadedFile) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = generated_name(
            &file.field_name,
            &file.original_name,
            chrono::Utc::now().timestamp_millis(),
        );
        tokio::fs::write(self.dir.join(&name), &file.bytes).await?;
        tracing::debug!("Stored upload {} ({} bytes)", name, file.bytes.len());
        Ok(name)
    }

    /// Best-effort removal of a file whose article was never created
    pub async fn discard(&self, name: &str) {
        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::warn!("Failed to remove orphaned upload {}: {}", name, e);
        }
    }
}
