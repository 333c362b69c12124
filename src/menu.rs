//! Application menu variants, one per window role.
//!
//! The entries are plain data here; the desktop shell turns them into
//! native menus and routes clicks back through [`MenuAction`].

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::{
    mode::{AppMode, ModeController, OpenOptions},
    models::WindowRole,
    windows::WindowHost,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MenuName {
    Write,
    Search,
    Settings,
    Intro,
    Default,
}

impl MenuName {
    pub fn for_role(role: WindowRole) -> Self {
        match role {
            WindowRole::Write => MenuName::Write,
            WindowRole::Search => MenuName::Search,
            WindowRole::Settings => MenuName::Settings,
            WindowRole::Intro => MenuName::Intro,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum MenuAction {
    WriteNote,
    NewNote,
    NewNoteWindow,
    SearchNotes,
    Close,
    /// The app lives in the tray; quitting from the menu only closes windows.
    Quit,
}

impl MenuAction {
    pub fn id(&self) -> &'static str {
        match self {
            MenuAction::WriteNote => "write-note",
            MenuAction::NewNote => "new-note",
            MenuAction::NewNoteWindow => "new-note-window",
            MenuAction::SearchNotes => "search-notes",
            MenuAction::Close => "close",
            MenuAction::Quit => "quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        ALL_ACTIONS.iter().copied().find(|action| action.id() == id)
    }
}

const ALL_ACTIONS: [MenuAction; 6] = [
    MenuAction::WriteNote,
    MenuAction::NewNote,
    MenuAction::NewNoteWindow,
    MenuAction::SearchNotes,
    MenuAction::Close,
    MenuAction::Quit,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        action: MenuAction,
        label: &'static str,
        accelerator: &'static str,
    },
    Separator,
}

fn item(action: MenuAction, label: &'static str, accelerator: &'static str) -> MenuEntry {
    MenuEntry::Item {
        action,
        label,
        accelerator,
    }
}

fn default_entries() -> Vec<MenuEntry> {
    vec![
        item(MenuAction::WriteNote, "Write", "Shift+CommandOrControl+E"),
        item(MenuAction::NewNote, "New note", "CommandOrControl+N"),
        item(
            MenuAction::NewNoteWindow,
            "New note window",
            "Shift+CommandOrControl+N",
        ),
        MenuEntry::Separator,
        item(MenuAction::SearchNotes, "Search notes", "Shift+CommandOrControl+F"),
        MenuEntry::Separator,
        item(MenuAction::Close, "Close", "Escape"),
        item(MenuAction::Quit, "Quit", "CommandOrControl+Q"),
    ]
}

/// Entries of the app submenu for a menu variant.
pub fn entries(menu: MenuName) -> Vec<MenuEntry> {
    let mut entries = default_entries();
    if menu == MenuName::Intro {
        // No notes folder yet: nothing to write into or search.
        entries.drain(0..5);
    }
    entries
}

/// Runs a menu selection. Note actions outside Open mode open the app
/// first, with the matching window in front.
pub async fn handle_menu_action<H: WindowHost>(
    controller: &ModeController<H>,
    action: MenuAction,
) -> Result<()> {
    let open = controller.mode().await == AppMode::Open;
    match action {
        MenuAction::WriteNote if open => {
            controller.focus_or_create_last_write().await?;
        }
        MenuAction::NewNote if open => {
            controller.handle_new_note().await?;
        }
        MenuAction::NewNoteWindow if open => {
            controller.open_write_window(None, true).await?;
        }
        MenuAction::SearchNotes if open => {
            controller.focus_or_create_search().await?;
        }
        MenuAction::WriteNote | MenuAction::NewNote => {
            controller
                .switch_to(AppMode::Open, OpenOptions::write_afterwards())
                .await?;
        }
        MenuAction::NewNoteWindow => {
            controller
                .switch_to(AppMode::Open, OpenOptions::new_write_window())
                .await?;
        }
        MenuAction::SearchNotes => {
            controller
                .switch_to(AppMode::Open, OpenOptions::search_afterwards())
                .await?;
        }
        MenuAction::Close | MenuAction::Quit => {
            controller
                .switch_to(AppMode::Closed, OpenOptions::default())
                .await?;
        }
    }
    Ok(())
}
