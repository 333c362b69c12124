//! Tauri shell: owns the real windows, tray icon, menus and global
//! shortcuts, and feeds their events into the mode controller.

mod host;
mod menu;
mod tray;

use std::sync::Arc;

use anyhow::Context;
use tauri::{Manager, RunEvent, Window, WindowEvent};

use crate::{
    keyboard::KeyboardModifiers,
    log_error, log_info, log_warn,
    mode::{commands as mode_commands, ModeController},
    notes::{commands as note_commands, NoteRequests},
    services::{Filer, Searcher},
    settings::{SettingsStore, SETTINGS_FILE_NAME},
};

pub use host::{parse_window_label, TauriHost};

const ENABLE_LOGS: bool = true;

pub(crate) struct AppState {
    pub(crate) requests: NoteRequests<TauriHost>,
}

impl AppState {
    pub(crate) fn controller(&self) -> &ModeController<TauriHost> {
        self.requests.controller()
    }
}

fn on_window_event(window: &Window, event: &WindowEvent) {
    let Some((_, id)) = parse_window_label(window.label()) else {
        return;
    };
    let controller = window.state::<AppState>().controller().clone();

    match event {
        WindowEvent::Focused(true) => {
            tauri::async_runtime::spawn(async move { controller.on_window_focused(id).await });
        }
        WindowEvent::Focused(false) => {
            tauri::async_runtime::spawn(async move { controller.on_window_blurred(id).await });
        }
        WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
            let Some(bounds) = host::window_bounds(window) else {
                return;
            };
            tauri::async_runtime::spawn(async move { controller.on_window_moved(id, bounds).await });
        }
        WindowEvent::Destroyed => {
            tauri::async_runtime::spawn(async move {
                if let Err(err) = controller.on_window_closed(id).await {
                    log_error!("Cleanup after window {} closed failed: {:#}", id, err);
                }
            });
        }
        _ => {}
    }
}

#[cfg(desktop)]
fn register_shortcuts(app: &tauri::AppHandle, settings: &SettingsStore) -> anyhow::Result<()> {
    use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

    use crate::shortcuts::{handle_shortcut, ShortcutAction, ShortcutBindings};

    let bindings = ShortcutBindings::load(settings)?;
    let mut registered: Vec<(Shortcut, ShortcutAction)> = Vec::new();
    for (action, accelerator) in bindings.pairs() {
        match accelerator.parse::<Shortcut>() {
            Ok(shortcut) => registered.push((shortcut, action)),
            Err(err) => log_warn!("Ignoring shortcut {}: {}", accelerator, err),
        }
    }

    let lookup = registered.clone();
    app.plugin(
        tauri_plugin_global_shortcut::Builder::new()
            .with_handler(move |app, shortcut, event| {
                if event.state() != ShortcutState::Pressed {
                    return;
                }
                let Some((_, action)) = lookup.iter().find(|(bound, _)| bound == shortcut) else {
                    return;
                };
                let action = *action;
                let controller = app.state::<AppState>().controller().clone();
                tauri::async_runtime::spawn(async move {
                    if let Err(err) = handle_shortcut(&controller, action).await {
                        log_error!("Shortcut {:?} failed: {:#}", action, err);
                    }
                });
            })
            .build(),
    )?;

    // Another app may already own a combination; the rest still work.
    for (shortcut, action) in registered {
        if let Err(err) = app.global_shortcut().register(shortcut) {
            log_warn!("Could not register {:?} shortcut: {}", action, err);
        }
    }
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let config_dir = app
                    .path()
                    .app_config_dir()
                    .context("failed to resolve app config dir")?;
                std::fs::create_dir_all(&config_dir)
                    .with_context(|| format!("failed to create {}", config_dir.display()))?;
                let settings = Arc::new(SettingsStore::new(config_dir.join(SETTINGS_FILE_NAME))?);

                let notes_folder = settings.notes_folder_path().unwrap_or_default();
                let controller = ModeController::new(
                    Arc::new(TauriHost::new(app.handle().clone())),
                    Arc::new(Searcher::new()),
                    Arc::new(KeyboardModifiers::new()),
                );
                let requests = NoteRequests::new(
                    controller,
                    Arc::new(Filer::new(notes_folder)),
                    settings.clone(),
                );
                app.manage(AppState {
                    requests: requests.clone(),
                });

                tray::setup_tray(app.handle())?;
                #[cfg(desktop)]
                register_shortcuts(app.handle(), &settings)?;

                // Keep running from the tray instead of showing a dock icon.
                #[cfg(target_os = "macos")]
                app.set_activation_policy(tauri::ActivationPolicy::Accessory);

                tauri::async_runtime::spawn(async move {
                    match requests.start().await {
                        Ok(mode) => log_info!("Jotter started in {:?} mode", mode),
                        Err(err) => log_error!("Startup failed: {:#}", err),
                    }
                });
                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .on_window_event(on_window_event)
        .on_menu_event(menu::on_menu_event)
        .invoke_handler(tauri::generate_handler![
            mode_commands::get_app_mode,
            mode_commands::switch_mode,
            mode_commands::forward_key_input,
            note_commands::create_note,
            note_commands::edit_note,
            note_commands::delete_note,
            note_commands::query_notes,
            note_commands::get_recent_notes,
            note_commands::send_note_for_edit,
            note_commands::open_write_window_for_note,
            note_commands::confirm_and_delete_note,
            note_commands::get_keyboard_modifiers_state,
            note_commands::get_notes_folder_path,
            note_commands::initial_set_notes_folder_path,
            note_commands::set_notes_folder_path,
            note_commands::pick_notes_folder,
            note_commands::open_notes_folder,
            note_commands::close_intro,
            note_commands::close_current_window,
            note_commands::focus_search_window,
            note_commands::retrigger_search,
            note_commands::open_settings,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|_, event| {
        // Closing the last window parks the app in the tray; only an
        // explicit exit (tray Quit) carries a code.
        if let RunEvent::ExitRequested { code: None, api, .. } = event {
            api.prevent_exit();
        }
    });
}
