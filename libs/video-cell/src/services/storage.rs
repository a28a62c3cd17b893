use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// URL prefix under which the upload directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Keeps `[A-Za-z0-9._-]` from the last path component and replaces the rest
/// with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// The original file name without its extension.
pub fn default_title(file_name: &str) -> String {
    let path = Path::new(file_name);
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Opens a new file under a UUID-prefixed sanitized name. The caller
    /// streams the content in and then either finishes or discards it.
    pub async fn create(&self, original_name: &str) -> std::io::Result<PendingFile> {
        fs::create_dir_all(&self.root).await?;

        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = self.root.join(&stored_name);
        let file = fs::File::create(&path).await?;

        Ok(PendingFile {
            file,
            path,
            stored_name,
            written: 0,
        })
    }
}

pub struct PendingFile {
    file: fs::File,
    path: PathBuf,
    stored_name: String,
    written: u64,
}

impl PendingFile {
    pub async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flushes the file and returns its public URL path.
    pub async fn finish(mut self) -> std::io::Result<String> {
        self.file.flush().await?;
        debug!("Stored {} bytes at {}", self.written, self.path.display());
        Ok(format!("{}/{}", PUBLIC_PREFIX, self.stored_name))
    }

    /// Removes the partially written file.
    pub async fn discard(self) {
        drop(self.file);
        if let Err(e) = fs::remove_file(&self.path).await {
            warn!("Failed to remove partial upload {}: {}", self.path.display(), e);
        }
    }
}
