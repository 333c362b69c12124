//! Tray icon behaviour. The desktop shell owns the icon itself and asks
//! this module what a click or menu pick should do.

use anyhow::Result;

use crate::{
    mode::{AppMode, ModeController, OpenOptions},
    windows::WindowHost,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayClick {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    NewNote,
    SearchNotes,
    OpenSettings,
    Restart,
    Quit,
}

impl TrayMenuAction {
    pub const ALL: [TrayMenuAction; 5] = [
        TrayMenuAction::NewNote,
        TrayMenuAction::SearchNotes,
        TrayMenuAction::OpenSettings,
        TrayMenuAction::Restart,
        TrayMenuAction::Quit,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            TrayMenuAction::NewNote => "tray-new-note",
            TrayMenuAction::SearchNotes => "tray-search-notes",
            TrayMenuAction::OpenSettings => "tray-open-settings",
            TrayMenuAction::Restart => "tray-restart",
            TrayMenuAction::Quit => "tray-quit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrayMenuAction::NewNote => "New note",
            TrayMenuAction::SearchNotes => "Search notes",
            TrayMenuAction::OpenSettings => "Open settings",
            TrayMenuAction::Restart => "Restart",
            TrayMenuAction::Quit => "Quit app completely",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|action| action.id() == id)
    }

    /// A separator goes before this entry in the tray menu.
    pub fn starts_group(&self) -> bool {
        matches!(self, TrayMenuAction::OpenSettings | TrayMenuAction::Restart)
    }
}

/// Process-level work the shell has to carry out after a tray menu pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayExit {
    Stay,
    Restart,
    Quit,
}

/// Returns whether the tray menu should pop up.
pub async fn handle_click<H: WindowHost>(
    controller: &ModeController<H>,
    click: TrayClick,
) -> Result<bool> {
    let closed = controller.mode().await == AppMode::Closed;
    match click {
        TrayClick::Left if closed => {
            controller
                .switch_to(AppMode::Open, OpenOptions::default())
                .await?;
            Ok(false)
        }
        TrayClick::Left | TrayClick::Right => {
            if !closed {
                controller
                    .switch_to(AppMode::Closed, OpenOptions::default())
                    .await?;
            }
            Ok(true)
        }
    }
}

pub async fn handle_menu_action<H: WindowHost>(
    controller: &ModeController<H>,
    action: TrayMenuAction,
) -> Result<TrayExit> {
    let (target, options) = match action {
        TrayMenuAction::NewNote => (AppMode::Open, OpenOptions::new_write_window()),
        TrayMenuAction::SearchNotes => (AppMode::Open, OpenOptions::search_afterwards()),
        TrayMenuAction::OpenSettings => (AppMode::Settings, OpenOptions::default()),
        TrayMenuAction::Restart => return Ok(TrayExit::Restart),
        TrayMenuAction::Quit => return Ok(TrayExit::Quit),
    };
    controller.switch_to(target, options).await?;
    Ok(TrayExit::Stay)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        keyboard::KeyboardModifiers, models::WindowRole, services::Searcher,
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

    #[tokio::test]
    async fn left_click_toggles_between_closed_and_open() {
        let controller = controller();

        assert!(!handle_click(&controller, TrayClick::Left).await.unwrap());
        assert_eq!(controller.mode().await, AppMode::Open);

        assert!(handle_click(&controller, TrayClick::Left).await.unwrap());
        assert_eq!(controller.mode().await, AppMode::Closed);
    }

    #[tokio::test]
    async fn right_click_always_pops_menu() {
        let controller = controller();
        assert!(handle_click(&controller, TrayClick::Right).await.unwrap());
        assert_eq!(controller.mode().await, AppMode::Closed);

        controller
            .switch_to(AppMode::Open, OpenOptions::default())
            .await
            .unwrap();
        assert!(handle_click(&controller, TrayClick::Right).await.unwrap());
        assert_eq!(controller.mode().await, AppMode::Closed);
    }

    #[tokio::test]
    async fn menu_actions_map_to_modes() {
        let controller = controller();
        assert_eq!(
            handle_menu_action(&controller, TrayMenuAction::OpenSettings)
                .await
                .unwrap(),
            TrayExit::Stay
        );
        assert_eq!(controller.mode().await, AppMode::Settings);

        handle_menu_action(&controller, TrayMenuAction::SearchNotes)
            .await
            .unwrap();
        assert_eq!(controller.mode().await, AppMode::Open);
        let search = controller.unique_window(WindowRole::Search).await;
        assert_eq!(controller.focus_history().await.last().copied(), search);

        assert_eq!(
            handle_menu_action(&controller, TrayMenuAction::Quit)
                .await
                .unwrap(),
            TrayExit::Quit
        );
        assert_eq!(controller.mode().await, AppMode::Open);
    }

    #[test]
    fn ids_round_trip() {
        for action in TrayMenuAction::ALL {
            assert_eq!(TrayMenuAction::from_id(action.id()), Some(action));
        }
    }
}
