use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::repository::{InMemoryUserRepository, StoreSnapshot};

/// JSON file holding a [`StoreSnapshot`].
///
/// Loading a missing file creates it with an empty snapshot. A file that no
/// longer parses is an error rather than silently starting empty.
#[derive(Clone, Debug)]
pub struct JsonSnapshotFile {
    file_path: PathBuf,
}

impl JsonSnapshotFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self { Self { file_path: path.into() } }

    pub fn path(&self) -> &Path { &self.file_path }

    /// Read the snapshot, writing an empty one first if the file is missing.
    pub async fn load(&self, first_id: u64) -> Result<StoreSnapshot, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| ServiceError::Storage(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.file_path.display(), "snapshot missing; starting empty");
                let empty = StoreSnapshot { next_id: first_id.max(1), users: Vec::new() };
                self.save(&empty).await?;
                Ok(empty)
            }
            Err(e) => Err(ServiceError::Storage(e.to_string())),
        }
    }

    pub async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        }
        let data = serde_json::to_vec_pretty(snapshot).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        info!(path = %self.file_path.display(), users = snapshot.users.len(), "snapshot_saved");
        Ok(())
    }

    /// Load and build a repository in one step.
    pub async fn open_repository(&self, first_id: u64) -> Result<InMemoryUserRepository, ServiceError> {
        let snapshot = self.load(first_id).await?;
        InMemoryUserRepository::from_snapshot(snapshot)
    }

    pub async fn persist(&self, repo: &InMemoryUserRepository) -> Result<(), ServiceError> {
        self.save(&repo.snapshot().await).await
    }
}
