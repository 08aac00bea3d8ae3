//! Periodic project persistence.

use crate::canvas::Project;
use crate::schedule::{Duration, Instant};
use crate::storage::{Storage, StorageResult};
use std::sync::Arc;

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key under which the most recently saved project is mirrored.
pub const LAST_PROJECT_KEY: &str = "__last_project__";

/// ID used when saving a project that was never given one.
pub const UNTITLED_PROJECT_ID: &str = "untitled";

/// Saves a project when it is dirty and the interval has passed.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    project_id: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            project_id: None,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Flag unsaved changes. Call after every committed or live edit.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_project_id(&mut self, id: Option<String>) {
        self.project_id = id;
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn should_save(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Save if dirty and the interval has elapsed. Returns whether it saved.
    pub async fn maybe_save(&mut self, project: &Project, now: Instant) -> StorageResult<bool> {
        if !self.should_save(now) {
            return Ok(false);
        }
        self.save(project, now).await?;
        Ok(true)
    }

    /// Save immediately, also mirroring to [`LAST_PROJECT_KEY`].
    pub async fn save(&mut self, project: &Project, now: Instant) -> StorageResult<()> {
        let id = self.project_id.as_deref().unwrap_or(UNTITLED_PROJECT_ID);
        self.storage.save(id, project).await?;
        self.storage.save(LAST_PROJECT_KEY, project).await?;
        log::debug!("Auto-saved project {id}");

        self.last_save = Some(now);
        self.dirty = false;
        Ok(())
    }

    pub async fn load(&mut self, id: &str, now: Instant) -> StorageResult<Project> {
        let project = self.storage.load(id).await?;
        self.project_id = Some(id.to_string());
        self.dirty = false;
        self.last_save = Some(now);
        Ok(project)
    }

    /// Restore whatever was saved last, if anything.
    pub async fn load_last(&mut self, now: Instant) -> Option<Project> {
        match self.storage.load(LAST_PROJECT_KEY).await {
            Ok(project) => {
                self.dirty = false;
                self.last_save = Some(now);
                Some(project)
            }
            Err(e) => {
                log::info!("No previous project to restore: {e}");
                None
            }
        }
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    /// Saved project IDs, without the last-project mirror.
    pub async fn list_projects(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list().await?;
        ids.retain(|id| id != LAST_PROJECT_KEY);
        Ok(ids)
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Auto-save manager over the native file backend.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformAutoSaveManager = AutoSaveManager<crate::storage::FileStorage>;

/// Auto-save manager writing to the default file location.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_autosave_manager() -> StorageResult<PlatformAutoSaveManager> {
    let storage = crate::storage::FileStorage::default_location()?;
    Ok(AutoSaveManager::new(Arc::new(storage)))
}
