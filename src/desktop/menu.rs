use tauri::{
    menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle, Manager, Wry,
};

use crate::{
    log_debug, log_error,
    menu::{entries, handle_menu_action, MenuAction, MenuEntry, MenuName},
};

use super::AppState;

const ENABLE_LOGS: bool = true;

/// Builds the native application menu for a variant: the app submenu plus
/// the stock edit commands the text fields rely on.
pub fn build_app_menu(app: &AppHandle, name: MenuName) -> tauri::Result<Menu<Wry>> {
    let app_menu = Submenu::new(app, "Jotter", true)?;
    for entry in entries(name) {
        match entry {
            MenuEntry::Item {
                action,
                label,
                accelerator,
            } => {
                let item = MenuItem::with_id(app, action.id(), label, true, Some(accelerator))?;
                app_menu.append(&item)?;
            }
            MenuEntry::Separator => app_menu.append(&PredefinedMenuItem::separator(app)?)?,
        }
    }

    let edit_menu = Submenu::with_items(
        app,
        "Edit",
        true,
        &[
            &PredefinedMenuItem::undo(app, None)?,
            &PredefinedMenuItem::redo(app, None)?,
            &PredefinedMenuItem::separator(app)?,
            &PredefinedMenuItem::cut(app, None)?,
            &PredefinedMenuItem::copy(app, None)?,
            &PredefinedMenuItem::paste(app, None)?,
            &PredefinedMenuItem::select_all(app, None)?,
        ],
    )?;

    Menu::with_items(app, &[&app_menu, &edit_menu])
}

pub fn on_menu_event(app: &AppHandle, event: MenuEvent) {
    // Tray entries carry their own ids and are handled by the tray.
    let Some(action) = MenuAction::from_id(event.id().as_ref()) else {
        return;
    };
    log_debug!("Menu action {:?}", action);

    let controller = app.state::<AppState>().controller().clone();
    tauri::async_runtime::spawn(async move {
        if let Err(err) = handle_menu_action(&controller, action).await {
            log_error!("Menu action {:?} failed: {:#}", action, err);
        }
    });
}
