//! What the renderer pages can ask of the application: note CRUD, queries,
//! opening notes for edit and notes-folder management.

use std::{path::Path, sync::Arc};

use anyhow::{anyhow, Result};

use crate::{
    log_debug, log_info, log_warn,
    mode::{AppMode, ModeController, OpenOptions},
    models::{KeyboardModifiersState, NoteEditInfo, QueryResultItem, WindowId, WindowRole},
    services::{scan_note_files, Filer, Searcher},
    settings::SettingsStore,
    windows::WindowHost,
};

const ENABLE_LOGS: bool = true;

const DELETE_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this note?";

pub struct NoteRequests<H: WindowHost> {
    controller: ModeController<H>,
    filer: Arc<Filer>,
    settings: Arc<SettingsStore>,
}

impl<H: WindowHost> Clone for NoteRequests<H> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            filer: self.filer.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<H: WindowHost> NoteRequests<H> {
    pub fn new(controller: ModeController<H>, filer: Arc<Filer>, settings: Arc<SettingsStore>) -> Self {
        Self {
            controller,
            filer,
            settings,
        }
    }

    pub fn controller(&self) -> &ModeController<H> {
        &self.controller
    }

    fn searcher(&self) -> &Searcher {
        self.controller.searcher()
    }

    /// First launch goes to Intro to pick a notes folder; later launches
    /// index the saved folder and wait in the tray.
    pub async fn start(&self) -> Result<AppMode> {
        match self.settings.notes_folder_path() {
            Some(folder) => {
                self.load_notes_folder(&folder)?;
                Ok(AppMode::Closed)
            }
            None => {
                self.controller
                    .switch_to(AppMode::Intro, OpenOptions::default())
                    .await?;
                Ok(AppMode::Intro)
            }
        }
    }

    fn load_notes_folder(&self, folder: &Path) -> Result<()> {
        let docs = scan_note_files(folder)?;
        log_info!("Indexed {} notes from {}", docs.len(), folder.display());
        self.searcher().set_docs(docs);
        self.filer.set_notes_folder_path(folder.to_path_buf());
        Ok(())
    }

    /// Saves a new note and binds it to the window that wrote it.
    pub async fn create_note(&self, sender: WindowId, content: String) -> Result<NoteEditInfo> {
        let filepath = self.filer.create_note(&content)?;
        let searcher_index = self.searcher().create_note(&content, &filepath);
        self.controller.bind_note(sender, searcher_index).await;
        self.controller.retrigger_search().await;

        Ok(NoteEditInfo {
            content,
            filepath,
            searcher_index,
        })
    }

    /// Empty content deletes the note and returns `None`.
    pub async fn edit_note(&self, sender: WindowId, info: NoteEditInfo) -> Result<Option<NoteEditInfo>> {
        if info.content.is_empty() {
            self.delete_note(sender, info).await?;
            self.controller.retrigger_search().await;
            return Ok(None);
        }

        let filepath = self.filer.edit_note(&info.filepath, &info.content)?;
        let mut searcher_index = info.searcher_index;
        if !self
            .searcher()
            .edit_note(searcher_index, &filepath, &info.content)
        {
            log_debug!("Note {} vanished from the index; re-adding", searcher_index);
            searcher_index = self.searcher().create_note(&info.content, &filepath);
            self.controller.bind_note(sender, searcher_index).await;
        }
        self.controller.retrigger_search().await;

        Ok(Some(NoteEditInfo {
            content: info.content,
            filepath,
            searcher_index,
        }))
    }

    pub async fn delete_note(&self, sender: WindowId, info: NoteEditInfo) -> Result<()> {
        self.filer.delete_note(&info.filepath)?;
        self.searcher().delete_note(info.searcher_index);
        self.controller.unbind_note(sender).await;
        Ok(())
    }

    pub async fn query_notes(&self, query: String) -> Vec<QueryResultItem> {
        self.controller.save_search_query(&query).await;
        self.searcher().search(&query)
    }

    pub async fn get_recent_notes(&self) -> Vec<QueryResultItem> {
        self.controller.save_search_query("").await;
        self.searcher().get_recent_notes()
    }

    /// `None` when the app is not settled in Open mode; a search result
    /// clicked while the app closes opens nothing.
    pub async fn send_note_for_edit(&self, info: NoteEditInfo) -> Result<Option<WindowId>> {
        self.controller.send_note_for_edit(info).await
    }

    pub async fn open_write_window_for_note(&self, info: NoteEditInfo) -> Result<Option<WindowId>> {
        self.controller.open_write_window_for_note(info).await
    }

    /// Asks before deleting. Declining leaves disk, index and windows as
    /// they were. Focus goes back to the search window either way.
    pub async fn confirm_and_delete_note(&self, info: NoteEditInfo) -> Result<bool> {
        let parent = self.controller.unique_window(WindowRole::Search).await;
        let confirmed = self
            .controller
            .host()
            .confirm(parent, DELETE_CONFIRM_MESSAGE.to_string())
            .await;

        if confirmed {
            self.filer.delete_note(&info.filepath)?;
            self.searcher().delete_note(info.searcher_index);
            self.controller
                .close_windows_for_note(info.searcher_index)
                .await;
        }

        self.controller.focus_search_window().await;
        Ok(confirmed)
    }

    pub fn get_keyboard_modifiers_state(&self) -> KeyboardModifiersState {
        self.controller.keyboard().state()
    }

    pub fn get_notes_folder_path(&self) -> Option<String> {
        self.settings
            .notes_folder_path()
            .map(|path| path.to_string_lossy().into_owned())
    }

    /// Intro's folder choice. Returns `false` for an empty path.
    pub async fn initial_set_notes_folder_path(&self, path: String) -> Result<bool> {
        if path.is_empty() {
            return Ok(false);
        }
        let folder = Path::new(&path);
        self.load_notes_folder(folder)?;
        self.settings.set_notes_folder_path(folder.to_path_buf())?;
        Ok(true)
    }

    /// Switches notes folders. Open write windows belong to the old folder
    /// and are closed.
    pub async fn set_notes_folder_path(&self, path: String) -> Result<()> {
        let folder = Path::new(&path);
        self.load_notes_folder(folder)?;
        self.settings.set_notes_folder_path(folder.to_path_buf())?;
        self.controller.close_all_write_windows().await;
        self.controller.retrigger_search().await;
        Ok(())
    }

    /// Folder dialog parented to the asking window. `None` on cancel.
    pub async fn pick_notes_folder(&self, parent: Option<WindowRole>) -> Option<String> {
        let parent = match parent {
            Some(role) => self.controller.unique_window(role).await,
            None => None,
        };
        self.controller
            .host()
            .pick_folder(parent)
            .await
            .map(|path| path.to_string_lossy().into_owned())
    }

    pub fn open_notes_folder(&self) -> Result<()> {
        let folder = self
            .settings
            .notes_folder_path()
            .ok_or_else(|| anyhow!("No notes folder has been chosen"))?;
        self.controller.host().open_path(&folder)
    }

    pub async fn close_intro(&self) {
        self.controller.close_role(WindowRole::Intro).await;
    }

    pub async fn close_current_window(&self) {
        self.controller.close_focused_window().await;
    }

    pub async fn focus_search_window(&self) {
        self.controller.focus_search_window().await;
    }

    pub async fn retrigger_search(&self) {
        self.controller.retrigger_search().await;
    }

    pub async fn open_settings(&self) -> Result<bool> {
        let switched = self
            .controller
            .switch_to(AppMode::Settings, OpenOptions::default())
            .await?;
        if !switched {
            log_warn!("Settings request dropped: transition in progress");
        }
        Ok(switched)
    }
}
