use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

pub struct UploadItem<'a> {
    pub body: Bytes,
    pub content_type: &'a str,
    pub file_name: &'a str,
}

/// Writes an uploaded photo under `upload_dir` with a generated name.
pub async fn save_upload(upload_dir: &Path, item: UploadItem<'_>) -> anyhow::Result<PathBuf> {
    anyhow::ensure!(!item.body.is_empty(), "empty upload");

    let ext = ext_from_mime(item.content_type)
        .map(str::to_string)
        .or_else(|| ext_from_file_name(item.file_name))
        .unwrap_or_else(|| "bin".into());
    let path = upload_dir.join(format!("{}.{}", Uuid::new_v4(), ext));

    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("create upload dir {}", upload_dir.display()))?;
    tokio::fs::write(&path, &item.body)
        .await
        .with_context(|| format!("write upload {}", path.display()))?;

    debug!(path = %path.display(), bytes = item.body.len(), "upload saved");
    Ok(path)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

fn ext_from_file_name(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
}
