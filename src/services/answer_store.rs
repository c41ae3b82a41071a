use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::wizard::AnswerRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed answers file: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Answer log saved against a network once the wizard completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAnswers {
    pub saved_at: String,
    pub answers: Vec<AnswerRecord>,
}

/// Destination for completed answer logs, keyed by network id.
pub trait AnswerStore: Send + Sync {
    fn persist(&self, network_id: &str, records: &[AnswerRecord]) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn load(&self, network_id: &str) -> impl Future<Output = Result<Option<SavedAnswers>, StoreError>> + Send;
}

/// Returns the current UTC timestamp as an ISO-8601 string.
pub fn now_iso8601() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// In-process store; also counts writes so callers can assert on them.
#[derive(Clone, Debug, Default)]
pub struct MemoryAnswerStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    saved: HashMap<String, SavedAnswers>,
    writes: usize,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn persist_count(&self) -> usize {
        self.inner().writes
    }

    pub fn saved(&self, network_id: &str) -> Option<SavedAnswers> {
        self.inner().saved.get(network_id).cloned()
    }
}

impl AnswerStore for MemoryAnswerStore {
    async fn persist(&self, network_id: &str, records: &[AnswerRecord]) -> Result<(), StoreError> {
        let entry = SavedAnswers {
            saved_at: now_iso8601(),
            answers: records.to_vec(),
        };
        let mut inner = self.inner();
        inner.saved.insert(network_id.to_string(), entry);
        inner.writes += 1;
        Ok(())
    }

    async fn load(&self, network_id: &str) -> Result<Option<SavedAnswers>, StoreError> {
        Ok(self.saved(network_id))
    }
}

/// Store backed by a JSON object file: `{ "<network>": { saved_at, answers } }`.
#[derive(Debug)]
pub struct JsonFileAnswerStore {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file
    lock: tokio::sync::Mutex<()>,
}

impl JsonFileAnswerStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, SavedAnswers>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl AnswerStore for JsonFileAnswerStore {
    async fn persist(&self, network_id: &str, records: &[AnswerRecord]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut all = self.read_all().await?;
        all.insert(
            network_id.to_string(),
            SavedAnswers {
                saved_at: now_iso8601(),
                answers: records.to_vec(),
            },
        );
        let content = serde_json::to_string_pretty(&all)?;
        tokio::fs::write(&self.path, content).await?;
        tracing::info!(network = network_id, path = %self.path.display(), "Saved quick setup answers");
        Ok(())
    }

    async fn load(&self, network_id: &str) -> Result<Option<SavedAnswers>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(network_id))
    }
}
