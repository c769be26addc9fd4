//! JSON-lines snapshot journal, one file per ticker

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::EngineError;
use crate::models::SnapshotRecord;

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Append one evaluation record to the ticker's log
    async fn append(&self, record: &SnapshotRecord) -> Result<(), EngineError>;
}

/// Appends each record as one JSON line to `<dir>/<TICKER>.jsonl`
pub struct SnapshotJournal {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl SnapshotJournal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Journal file for a ticker; characters outside `[A-Za-z0-9.^-]` become `_`
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        let name: String = ticker
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.jsonl", name))
    }

    /// Read back every record of a ticker, oldest first
    pub async fn records(&self, ticker: &str) -> Result<Vec<SnapshotRecord>, EngineError> {
        let path = self.path_for(ticker);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    EngineError::Storage(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                })
            })
            .collect()
    }
}

#[async_trait]
impl SnapshotStore for SnapshotJournal {
    async fn append(&self, record: &SnapshotRecord) -> Result<(), EngineError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| EngineError::Storage(std::io::Error::other(e)))?;
        line.push('\n');

        let path = self.path_for(&record.ticker);
        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.dir).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(
            ticker = %record.ticker,
            path = %path.display(),
            "SnapshotJournal: appended record for {}",
            record.ticker
        );
        Ok(())
    }
}
