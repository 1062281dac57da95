// touchline-core/src/infrastructure/adapters/local_store.rs

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, safe_join};
use crate::ports::storage::{ObjectRef, ObjectStore};

/// Object storage on the local filesystem: one directory per bucket under
/// `root`, keys are relative paths inside it.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, TouchlineError> {
        if bucket.contains('/') || bucket.contains('\\') {
            return Err(TouchlineError::UnsafePath(bucket.to_string()));
        }
        safe_join(&self.root, bucket)
    }

    fn path_of(&self, object: &ObjectRef) -> Result<PathBuf, TouchlineError> {
        safe_join(&self.bucket_dir(&object.bucket)?, &object.key)
    }
}

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(".tmp"))
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get(&self, object: &ObjectRef) -> Result<Vec<u8>, TouchlineError> {
        let path = self.path_of(object)?;
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(InfrastructureError::ObjectNotFound(object.to_string()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, object: &ObjectRef, body: &[u8]) -> Result<(), TouchlineError> {
        let path = self.path_of(object)?;
        atomic_write(&path, body)?;
        debug!(object = %object, bytes = body.len(), "Object written");
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, TouchlineError> {
        let dir = self.bucket_dir(bucket)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(false) {
            let entry = entry.map_err(|e| TouchlineError::from(std::io::Error::other(e)))?;
            if !entry.file_type().is_file() || is_temp_file(entry.path()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&dir)
                .map_err(|e| TouchlineError::InternalError(e.to_string()))?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, object: &ObjectRef) -> Result<bool, TouchlineError> {
        Ok(self.path_of(object)?.is_file())
    }
}
