use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

pub const SETTINGS_FILE_NAME: &str = "jotter_settings.json";
pub const DEFAULT_OPEN_ENTRY_SHORTCUT: &str = "Alt+CommandOrControl+N";
pub const DEFAULT_SEARCH_ENTRY_SHORTCUT: &str = "Alt+CommandOrControl+F";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UserSettings {
    notebook_folder_path: Option<String>,
    open_entry_shortcut: Option<String>,
    search_entry_shortcut: Option<String>,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn read(&self) -> UserSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, apply: impl FnOnce(&mut UserSettings)) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut *guard);
        self.persist(&guard)
    }

    /// `None` until a notes folder has been chosen (first run).
    pub fn notes_folder_path(&self) -> Option<PathBuf> {
        self.read()
            .notebook_folder_path
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    pub fn set_notes_folder_path(&self, path: PathBuf) -> Result<()> {
        self.update(|settings| {
            settings.notebook_folder_path = Some(path.to_string_lossy().into_owned());
        })
    }

    pub fn open_entry_shortcut(&self) -> Option<String> {
        self.read().open_entry_shortcut.filter(|s| !s.is_empty())
    }

    pub fn set_open_entry_shortcut(&self, shortcut: String) -> Result<()> {
        self.update(|settings| settings.open_entry_shortcut = Some(shortcut))
    }

    /// Stored shortcut, or the default written back on first use.
    pub fn ensure_open_entry_shortcut(&self) -> Result<String> {
        if let Some(current) = self.open_entry_shortcut() {
            return Ok(current);
        }
        self.set_open_entry_shortcut(DEFAULT_OPEN_ENTRY_SHORTCUT.to_string())?;
        Ok(DEFAULT_OPEN_ENTRY_SHORTCUT.to_string())
    }

    pub fn search_entry_shortcut(&self) -> Option<String> {
        self.read().search_entry_shortcut.filter(|s| !s.is_empty())
    }

    pub fn set_search_entry_shortcut(&self, shortcut: String) -> Result<()> {
        self.update(|settings| settings.search_entry_shortcut = Some(shortcut))
    }

    pub fn ensure_search_entry_shortcut(&self) -> Result<String> {
        if let Some(current) = self.search_entry_shortcut() {
            return Ok(current);
        }
        self.set_search_entry_shortcut(DEFAULT_SEARCH_ENTRY_SHORTCUT.to_string())?;
        Ok(DEFAULT_SEARCH_ENTRY_SHORTCUT.to_string())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        (dir, store)
    }

    #[test]
    fn first_run_has_no_notes_folder() {
        let (_dir, store) = store();
        assert!(store.notes_folder_path().is_none());
    }

    #[test]
    fn shortcut_defaults_are_persisted_once() {
        let (dir, store) = store();
        assert!(store.open_entry_shortcut().is_none());
        assert_eq!(store.ensure_open_entry_shortcut().unwrap(), DEFAULT_OPEN_ENTRY_SHORTCUT);
        assert_eq!(store.ensure_search_entry_shortcut().unwrap(), DEFAULT_SEARCH_ENTRY_SHORTCUT);

        let reopened = SettingsStore::new(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert_eq!(
            reopened.open_entry_shortcut().as_deref(),
            Some(DEFAULT_OPEN_ENTRY_SHORTCUT)
        );
    }

    #[test]
    fn custom_shortcut_wins_over_default() {
        let (_dir, store) = store();
        store.set_search_entry_shortcut("Alt+Space".into()).unwrap();
        assert_eq!(store.ensure_search_entry_shortcut().unwrap(), "Alt+Space");
    }

    #[test]
    fn notes_folder_round_trips_through_disk() {
        let (dir, store) = store();
        store.set_notes_folder_path(dir.path().join("notes")).unwrap();

        let reopened = SettingsStore::new(dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert_eq!(reopened.notes_folder_path(), Some(dir.path().join("notes")));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{not json").unwrap();
        let store = SettingsStore::new(path).unwrap();
        assert!(store.notes_folder_path().is_none());
    }
}
