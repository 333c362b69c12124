use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    log_debug, log_error, log_info,
    tray::{handle_click, handle_menu_action, TrayClick, TrayExit, TrayMenuAction},
};

use super::AppState;

const ENABLE_LOGS: bool = true;

pub fn setup_tray(app: &AppHandle) -> anyhow::Result<()> {
    let menu = Menu::new(app)?;
    for action in TrayMenuAction::ALL {
        if action.starts_group() {
            menu.append(&PredefinedMenuItem::separator(app)?)?;
        }
        menu.append(&MenuItem::with_id(
            app,
            action.id(),
            action.label(),
            true,
            None::<&str>,
        )?)?;
    }

    let icon = Image::from_bytes(include_bytes!("../../icons/32x32.png"))?;

    TrayIconBuilder::with_id("jotter-tray")
        .icon(icon)
        .icon_as_template(true)
        .tooltip("Jotter")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            let Some(action) = TrayMenuAction::from_id(event.id().as_ref()) else {
                return;
            };
            on_tray_menu_action(app, action);
        })
        .on_tray_icon_event(|tray, event| {
            let TrayIconEvent::Click {
                button,
                button_state: MouseButtonState::Up,
                position,
                ..
            } = event
            else {
                return;
            };
            let click = match button {
                MouseButton::Left => TrayClick::Left,
                MouseButton::Right => TrayClick::Right,
                _ => return,
            };

            let app = tray.app_handle();
            let controller = app.state::<AppState>().controller().clone();
            controller.host().record_tray_click(position);

            tauri::async_runtime::spawn(async move {
                match handle_click(&controller, click).await {
                    // Right clicks get the native menu from the OS; a left
                    // click that closed the app has no window to anchor one.
                    Ok(wants_menu) => log_debug!("Tray {:?} click, menu: {}", click, wants_menu),
                    Err(err) => log_error!("Tray click failed: {:#}", err),
                }
            });
        })
        .build(app)?;

    log_info!("Tray icon ready");
    Ok(())
}

fn on_tray_menu_action(app: &AppHandle, action: TrayMenuAction) {
    let app = app.clone();
    let controller = app.state::<AppState>().controller().clone();
    tauri::async_runtime::spawn(async move {
        match handle_menu_action(&controller, action).await {
            Ok(TrayExit::Stay) => {}
            Ok(TrayExit::Restart) => {
                log_info!("Restarting from tray");
                app.restart();
            }
            Ok(TrayExit::Quit) => {
                log_info!("Quitting from tray");
                app.exit(0);
            }
            Err(err) => log_error!("Tray action {:?} failed: {:#}", action, err),
        }
    });
}
