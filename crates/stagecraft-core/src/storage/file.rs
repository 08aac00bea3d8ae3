//! File-based storage for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::canvas::Project;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each project as a pretty-printed JSON file in one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open storage in `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path)
            .map_err(|e| StorageError::Io(format!("Failed to create {}: {e}", base_path.display())))?;
        Ok(Self { base_path })
    }

    /// Storage under the platform's local data directory.
    ///
    /// On Linux: `~/.local/share/stagecraft/projects/`
    /// On Windows: `%LOCALAPPDATA%\stagecraft\projects\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("stagecraft").join("projects"))
    }

    fn project_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, project: &Project) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        let json = project.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))?;
            log::debug!("Saved project to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Project>> {
        let path = self.project_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
            Project::try_from_json(&json)
                .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {e}", path.display())))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.project_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| StorageError::Io(format!("Failed to delete {}: {e}", path.display())))?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            let entries =
                fs::read_dir(&base).map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;
            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.project_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, ElementType};
    use crate::storage::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let mut project = Project::new();
        project.active_canvas_mut().name = "Lobby".to_string();
        project
            .active_canvas_mut()
            .elements
            .push(Element::new(ElementType::Puzzle));

        block_on(storage.save("escape-room", &project)).unwrap();
        let loaded = block_on(storage.load("escape-room")).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn test_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        let result = block_on(storage.load("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let project = Project::new();

        block_on(storage.save("p2", &project)).unwrap();
        block_on(storage.save("p1", &project)).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(block_on(storage.list()).unwrap(), vec!["p1".to_string(), "p2".to_string()]);

        block_on(storage.delete("p1")).unwrap();
        assert!(!block_on(storage.exists("p1")).unwrap());
    }

    #[test]
    fn test_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let project = Project::new();

        block_on(storage.save("room/1:final*", &project)).unwrap();
        assert!(dir.path().join("room_1_final_.json").exists());
        assert_eq!(block_on(storage.load("room/1:final*")).unwrap(), project);
    }
}
