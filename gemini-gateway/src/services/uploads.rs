//! Transient storage for files attached to generation requests.
//!
//! Each upload lands in its own temporary directory under the store root, so
//! two requests carrying the same filename never overwrite each other. The
//! directory is removed when its [`UploadedFile`] is dropped, including when
//! the request future is cancelled by a client disconnect.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
const DEFAULT_FILE_NAME: &str = "unnamed";
const UPLOAD_DIR_PREFIX: &str = "upload-";

/// Name of the optional text field carried next to the file.
pub const PROMPT_FIELD: &str = "prompt";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Status the client should see for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::Multipart(err) => err.status(),
            UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A file received with the current request.
///
/// Owns its per-request directory: dropping the value deletes the file.
#[derive(Debug)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub original_name: String,
    pub mime_type: String,
    dir: TempDir,
}

impl UploadedFile {
    /// Read the whole stored file.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        fs::read(&self.path).await
    }

    /// Remove the stored file now, logging instead of silently ignoring a
    /// failed removal.
    pub fn discard(self) {
        let dir = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(
                path = %dir.display(),
                error = %e,
                "Failed to remove transient upload"
            );
        }
    }
}

/// Fields of a media request.
#[derive(Debug, Default)]
pub struct MediaForm {
    pub prompt: Option<String>,
    pub file: Option<UploadedFile>,
}

/// Local directory where uploads live while their request is handled.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drain `multipart`, storing the first file sent under `file_field`.
    ///
    /// Only parts carrying a filename are files; a plain text part named like
    /// the file field is ignored. Other fields, including further files, are
    /// ignored too. On error any file already stored is dropped, which removes
    /// it from disk.
    pub async fn receive(
        &self,
        mut multipart: Multipart,
        file_field: &str,
    ) -> Result<MediaForm, UploadError> {
        let mut form = MediaForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            let is_file = field.file_name().is_some();

            match name.as_deref() {
                Some(name) if name == file_field && is_file && form.file.is_none() => {
                    form.file = Some(self.write_field(field).await?);
                }
                Some(PROMPT_FIELD) if !is_file => {
                    form.prompt = Some(field.text().await?);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    async fn write_field(&self, mut field: Field<'_>) -> Result<UploadedFile, UploadError> {
        let original_name = field.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string();
        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let (dir, path) = self.allocate(&original_name)?;
        let file = UploadedFile {
            path,
            original_name,
            mime_type,
            dir,
        };

        // `file` removes the directory if any step below fails.
        let mut out = fs::File::create(&file.path).await?;
        let mut size = 0usize;
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len();
            out.write_all(&chunk).await?;
        }
        out.flush().await?;

        tracing::debug!(
            filename = %file.original_name,
            mime_type = %file.mime_type,
            size,
            "Upload stored"
        );
        Ok(file)
    }

    /// Fresh per-request directory and the file path for `original_name` in it.
    fn allocate(&self, original_name: &str) -> std::io::Result<(TempDir, PathBuf)> {
        let dir = tempfile::Builder::new()
            .prefix(UPLOAD_DIR_PREFIX)
            .tempdir_in(&self.root)?;
        let path = dir.path().join(sanitize_file_name(original_name));
        Ok((dir, path))
    }
}

/// Keep only the final path component so a client name can't escape the
/// upload directory.
fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string()
}
