//! Multipart form reading and upload staging.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::ApiError;

/// Name of the multipart part carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// An uploaded file sitting in the staging directory.
///
/// The file is deleted when the value is dropped, unless ownership was handed to an
/// upload job with [`StagedFile::into_path`].
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    file_name: String,
    size: u64,
    keep: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Client-supplied file name, reduced to its last path segment.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Copies the staged bytes to a fresh staging file, for fan-outs that need one
    /// upload per row.
    pub async fn duplicate(&self) -> Result<StagedFile, ApiError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let path = staging_path(dir);
        fs::copy(&self.path, &path).await?;
        Ok(StagedFile {
            path,
            file_name: self.file_name.clone(),
            size: self.size,
            keep: false,
        })
    }

    /// Releases the file from drop-cleanup; the caller now owns it.
    pub fn into_path(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Text parts by name (repeated names keep every value) plus the optional file part.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, Vec<String>>,
    pub file: Option<StagedFile>,
}

impl UploadForm {
    /// First value of a text part.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every non-empty value of a repeated text part. A single comma separated
    /// value is split too, since some clients send `platform=android,ios`.
    pub fn list(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .into_iter()
            .flatten()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn take_file(&mut self) -> Option<StagedFile> {
        self.file.take()
    }
}

fn staging_path(dir: &Path) -> PathBuf {
    dir.join(format!("{}.part", Uuid::new_v4()))
}

fn clean_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("upload.bin")
        .to_string()
}

/// Reads the whole multipart body, streaming the `file` part to `tmp_dir`.
///
/// A file larger than `max_bytes` fails with the error built by `too_large` and its
/// partial copy is removed. An empty `file` part counts as no file.
pub async fn read_upload_form(
    mut multipart: Multipart,
    tmp_dir: &Path,
    max_bytes: usize,
    too_large: fn() -> ApiError,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    fs::create_dir_all(tmp_dir).await?;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name != FILE_FIELD {
            let value = field.text().await?;
            form.fields.entry(name).or_default().push(value);
            continue;
        }

        let file_name = clean_file_name(field.file_name().unwrap_or_default());
        let mut staged = StagedFile {
            path: staging_path(tmp_dir),
            file_name,
            size: 0,
            keep: false,
        };
        let mut out = File::create(&staged.path).await?;

        while let Some(chunk) = field.chunk().await? {
            staged.size += chunk.len() as u64;
            if staged.size > max_bytes as u64 {
                tracing::debug!(max_bytes, "upload rejected, file too large");
                return Err(too_large());
            }
            out.write_all(&chunk).await?;
        }
        out.flush().await?;

        if staged.size > 0 {
            form.file = Some(staged);
        }
    }

    Ok(form)
}
