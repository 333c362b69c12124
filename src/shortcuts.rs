use anyhow::Result;

use crate::{
    log_info,
    mode::{AppMode, ModeController, OpenOptions},
    settings::SettingsStore,
    windows::WindowHost,
};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    /// Jump straight into writing.
    OpenEntry,
    SearchEntry,
}

/// Accelerator strings for the global hotkeys, as stored in settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutBindings {
    pub open_entry: String,
    pub search_entry: String,
}

impl ShortcutBindings {
    /// Reads both bindings, writing the defaults on first run.
    pub fn load(settings: &SettingsStore) -> Result<Self> {
        let bindings = Self {
            open_entry: settings.ensure_open_entry_shortcut()?,
            search_entry: settings.ensure_search_entry_shortcut()?,
        };
        log_info!(
            "Global shortcuts: open={} search={}",
            bindings.open_entry,
            bindings.search_entry
        );
        Ok(bindings)
    }

    pub fn pairs(&self) -> [(ShortcutAction, &str); 2] {
        [
            (ShortcutAction::OpenEntry, self.open_entry.as_str()),
            (ShortcutAction::SearchEntry, self.search_entry.as_str()),
        ]
    }
}

pub async fn handle_shortcut<H: WindowHost>(
    controller: &ModeController<H>,
    action: ShortcutAction,
) -> Result<()> {
    let open = controller.mode().await == AppMode::Open;
    match (action, open) {
        (ShortcutAction::OpenEntry, false) => {
            controller
                .switch_to(AppMode::Open, OpenOptions::write_afterwards())
                .await?;
        }
        (ShortcutAction::OpenEntry, true) => {
            controller.focus_or_create_last_write().await?;
        }
        (ShortcutAction::SearchEntry, false) => {
            controller
                .switch_to(AppMode::Open, OpenOptions::search_afterwards())
                .await?;
        }
        (ShortcutAction::SearchEntry, true) => {
            controller.focus_or_create_search().await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        keyboard::KeyboardModifiers,
        models::WindowRole,
        services::Searcher,
        settings::{DEFAULT_OPEN_ENTRY_SHORTCUT, DEFAULT_SEARCH_ENTRY_SHORTCUT, SETTINGS_FILE_NAME},
        windows::host::fake::FakeHost,
    };

    fn controller() -> ModeController<FakeHost> {
        ModeController::new(
            Arc::new(FakeHost::default()),
            Arc::new(Searcher::new()),
            Arc::new(KeyboardModifiers::new()),
        )
        .with_show_delay(Duration::ZERO)
    }

    #[test]
    fn bindings_default_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::new(dir.path().join(SETTINGS_FILE_NAME)).unwrap();

        let bindings = ShortcutBindings::load(&settings).unwrap();
        assert_eq!(
            bindings,
            ShortcutBindings {
                open_entry: DEFAULT_OPEN_ENTRY_SHORTCUT.to_string(),
                search_entry: DEFAULT_SEARCH_ENTRY_SHORTCUT.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn open_entry_ends_on_a_write_window() {
        let controller = controller();
        handle_shortcut(&controller, ShortcutAction::OpenEntry)
            .await
            .unwrap();

        let last = *controller.focus_history().await.last().unwrap();
        assert_eq!(
            controller.window(last).await.unwrap().role,
            WindowRole::Write
        );
    }

    #[tokio::test]
    async fn search_entry_recreates_a_closed_search_window() {
        let controller = controller();
        handle_shortcut(&controller, ShortcutAction::SearchEntry)
            .await
            .unwrap();
        let search = controller.unique_window(WindowRole::Search).await.unwrap();
        assert_eq!(controller.focus_history().await.last(), Some(&search));

        controller.on_window_closed(search).await.unwrap();
        handle_shortcut(&controller, ShortcutAction::SearchEntry)
            .await
            .unwrap();

        let recreated = controller.unique_window(WindowRole::Search).await.unwrap();
        assert_ne!(recreated, search);
        assert_eq!(controller.mode().await, AppMode::Open);
        assert_eq!(controller.focus_history().await.last(), Some(&recreated));
    }

    #[tokio::test]
    async fn repeated_open_entry_during_transition_opens_one_write_window() {
        let host = FakeHost {
            create_delay: Duration::from_millis(50),
            ..FakeHost::default()
        };
        let controller = ModeController::new(
            Arc::new(host),
            Arc::new(Searcher::new()),
            Arc::new(KeyboardModifiers::new()),
        )
        .with_show_delay(Duration::from_millis(100));

        let (first, second) = tokio::join!(
            handle_shortcut(&controller, ShortcutAction::OpenEntry),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                handle_shortcut(&controller, ShortcutAction::OpenEntry).await
            }
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(controller.windows_of_role(WindowRole::Write).await.len(), 1);
        let history = controller.focus_history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(
            controller.window(history[1]).await.unwrap().role,
            WindowRole::Write
        );
    }
}
