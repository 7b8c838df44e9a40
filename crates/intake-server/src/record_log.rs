//! Intake record log
//!
//! One JSON array file (2-space pretty printed). Appends are
//! read-modify-write of the whole file, serialized through an in-process
//! lock so concurrent requests cannot lose each other's records. The new
//! contents go to a temp file in the same directory which is then renamed
//! over the log, so readers only ever see the old or the new array.

use intake_forms::IntakeRecord;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Record log errors
#[derive(Error, Debug)]
pub enum RecordLogError {
    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Existing log is not a JSON array of objects
    #[error("malformed record log {path}: {source}")]
    Malformed {
        /// Log file
        path: PathBuf,
        /// Parse failure
        source: serde_json::Error,
    },

    /// Records could not be encoded
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only sequence of intake records
pub struct RecordLog {
    path: PathBuf,
    writer: Mutex<()>,
}

impl RecordLog {
    /// Log stored at `path`; the file is created by the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in append order; a missing file is an empty log
    pub async fn read_all(&self) -> Result<Vec<IntakeRecord>, RecordLogError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| RecordLogError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Append one record; returns the log length after the append
    pub async fn append(&self, record: IntakeRecord) -> Result<usize, RecordLogError> {
        let _writer = self.writer.lock().await;

        let mut records = self.read_all().await?;
        records.push(record);
        let content = serde_json::to_vec_pretty(&records)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &content))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;

        debug!("Record log {} now holds {} record(s)", self.path.display(), records.len());
        Ok(records.len())
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), RecordLogError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
