//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::canvas::Project;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Keeps serialized projects in memory.
///
/// Projects go through the same JSON as the file backend, so anything that
/// would not survive a reload does not survive here either.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    projects: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error(e: impl std::fmt::Display) -> StorageError {
        StorageError::Other(format!("Lock error: {e}"))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, project: &Project) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let json = project.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            self.projects.write().map_err(Self::lock_error)?.insert(id, json);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Project>> {
        let id = id.to_string();
        Box::pin(async move {
            let projects = self.projects.read().map_err(Self::lock_error)?;
            let json = projects.get(&id).ok_or_else(|| StorageError::NotFound(id.clone()))?;
            Project::try_from_json(json).map_err(|e| StorageError::Serialization(e.to_string()))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            self.projects.write().map_err(Self::lock_error)?.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let projects = self.projects.read().map_err(Self::lock_error)?;
            Ok(projects.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let projects = self.projects.read().map_err(Self::lock_error)?;
            Ok(projects.contains_key(&id))
        })
    }
}
