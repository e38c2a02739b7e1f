//! JSON-Lines hand-off between phases
//!
//! Files are named `<prefix>[-<holder_prefix>]-<phase>.jsonl` under the
//! output directory. Readers load a whole file at setup; writers only ever
//! append one newline-terminated record per iteration.

use crate::error::{ExchangeError, ExchangeResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Location of one phase's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseFile {
    path: PathBuf,
}

impl PhaseFile {
    /// `<dir>/<prefix>-<phase>.jsonl`
    pub fn new(dir: impl AsRef<Path>, prefix: &str, phase: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}-{}.jsonl", prefix, phase)),
        }
    }

    /// `<dir>/<issuer_prefix>-<holder_prefix>-<phase>.jsonl`
    pub fn paired(
        dir: impl AsRef<Path>,
        issuer_prefix: &str,
        holder_prefix: &str,
        phase: &str,
    ) -> Self {
        Self::new(dir, &format!("{}-{}", issuer_prefix, holder_prefix), phase)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Read every record, one JSON document per non-blank line
    pub async fn read_records<T: DeserializeOwned>(&self) -> ExchangeResult<Vec<T>> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ExchangeError::filesystem(&self.path, "read", e))?;

        let records = content
            .trim_end()
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(number, line)| {
                serde_json::from_str(line.trim()).map_err(|source| ExchangeError::Record {
                    path: self.path.display().to_string(),
                    line: number + 1,
                    source,
                })
            })
            .collect::<ExchangeResult<Vec<T>>>()?;

        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Truncate (or create) the file and return a shared appender
    pub async fn create_writer(&self) -> ExchangeResult<PhaseWriter> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ExchangeError::filesystem(parent, "create_dirs", e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .await
            .map_err(|e| ExchangeError::filesystem(&self.path, "create", e))?;

        Ok(PhaseWriter {
            path: self.path.clone(),
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Delete the file; a missing file is not an error
    pub async fn remove(&self) -> ExchangeResult<bool> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ExchangeError::filesystem(&self.path, "remove", e)),
        }
    }
}

/// Appender shared by every worker of a phase
#[derive(Debug, Clone)]
pub struct PhaseWriter {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl PhaseWriter {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line
    pub async fn append<T: Serialize>(&self, record: &T) -> ExchangeResult<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line)
            .await
            .map_err(|e| ExchangeError::filesystem(&self.path, "append", e))?;
        file.flush()
            .await
            .map_err(|e| ExchangeError::filesystem(&self.path, "flush", e))
    }
}
