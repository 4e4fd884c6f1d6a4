use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;

/// Storage abstraction for the public-display approval map so the service can
/// be exercised against an in-memory implementation in tests.
///
/// The pipeline only ever reads the map; writes happen through the toggle
/// endpoint and become visible on the next `get`.
pub trait ApprovalStore: Send + Sync {
    fn get(&self) -> Result<HashMap<i64, bool>, ApprovalStoreError>;
    fn set(&self, review_id: i64, display: bool) -> Result<(), ApprovalStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApprovalStoreError {
    #[error("failed to read approvals from {path}: {detail}")]
    Read { path: String, detail: String },
    #[error("failed to persist approvals to {path}: {detail}")]
    Write { path: String, detail: String },
}

/// Flat-file store holding a single JSON object mapping review id to the
/// approval flag. A missing file reads as an empty map.
pub struct FileApprovalStore {
    path: PathBuf,
}

impl FileApprovalStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> Result<BTreeMap<String, bool>, ApprovalStoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|err| ApprovalStoreError::Read {
            path: self.path.display().to_string(),
            detail: err.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|err| ApprovalStoreError::Read {
            path: self.path.display().to_string(),
            detail: err.to_string(),
        })
    }

    fn write_map(&self, map: &BTreeMap<String, bool>) -> Result<(), ApprovalStoreError> {
        let write_error = |detail: String| ApprovalStoreError::Write {
            path: self.path.display().to_string(),
            detail,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| write_error(err.to_string()))?;
            }
        }

        let content =
            serde_json::to_string_pretty(map).map_err(|err| write_error(err.to_string()))?;
        fs::write(&self.path, content).map_err(|err| write_error(err.to_string()))
    }
}

impl ApprovalStore for FileApprovalStore {
    fn get(&self) -> Result<HashMap<i64, bool>, ApprovalStoreError> {
        // JSON object keys are strings; entries that do not parse back to a
        // review id are skipped rather than failing the whole read.
        Ok(self
            .read_map()?
            .into_iter()
            .filter_map(|(key, value)| key.parse::<i64>().ok().map(|id| (id, value)))
            .collect())
    }

    fn set(&self, review_id: i64, display: bool) -> Result<(), ApprovalStoreError> {
        let mut map = self.read_map()?;
        map.insert(review_id.to_string(), display);
        self.write_map(&map)
    }
}
