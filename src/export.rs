use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes `value` as pretty JSON. The file is staged next to `path` and
/// renamed into place.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let payload = serde_json::to_string_pretty(value)?;
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, payload)
        .await
        .map_err(|source| ExportError::Io {
            action: "write",
            path: tmp_path.clone(),
            source,
        })?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|source| ExportError::Io {
            action: "finalize",
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), "export written");
    Ok(())
}

async fn ensure_dir(path: &Path) -> Result<(), ExportError> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| ExportError::Io {
            action: "create directory",
            path: path.to_path_buf(),
            source,
        })
}
