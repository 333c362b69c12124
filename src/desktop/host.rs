//! [`WindowHost`] backed by Tauri webview windows. Windows are labelled
//! `"{role}-{id}"`, which is how OS events find their way back to ids.

use std::{
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use anyhow::{anyhow, Result};
use tauri::{
    webview::PageLoadEvent, AppHandle, Emitter, Manager, PhysicalPosition, Webview, WebviewUrl,
    WebviewWindow, WebviewWindowBuilder,
};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_opener::OpenerExt;
use tokio::sync::oneshot;

use crate::{
    log_debug, log_warn,
    menu::MenuName,
    models::{Bounds, Position, RendererMessage, WindowId, WindowRole},
    windows::{WindowHost, WindowSpec},
};

use super::menu::build_app_menu;

const ENABLE_LOGS: bool = true;

const APP_TITLE: &str = "Jotter";
const FALLBACK_SCREEN: Bounds = Bounds {
    position: Position { x: 0, y: 0 },
    size: crate::models::Size {
        width: 1440,
        height: 900,
    },
};

pub fn window_label(role: WindowRole, id: WindowId) -> String {
    format!("{}-{}", role.as_str(), id)
}

pub fn parse_window_label(label: &str) -> Option<(WindowRole, WindowId)> {
    let (role, id) = label.rsplit_once('-')?;
    Some((WindowRole::from_name(role)?, WindowId(id.parse().ok()?)))
}

pub struct TauriHost {
    app: AppHandle,
    tray_position: Mutex<Option<Position>>,
}

impl TauriHost {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            tray_position: Mutex::new(None),
        }
    }

    /// Remembers where the tray icon was last clicked; settings hang from it.
    pub fn record_tray_click(&self, position: PhysicalPosition<f64>) {
        let scale = self
            .app
            .monitor_from_point(position.x, position.y)
            .ok()
            .flatten()
            .map(|monitor| monitor.scale_factor())
            .unwrap_or(1.0);
        let logical = position.to_logical::<f64>(scale);
        *self
            .tray_position
            .lock()
            .unwrap_or_else(PoisonError::into_inner) =
            Some(Position::new(logical.x as i32, logical.y as i32));
    }

    fn window(&self, id: WindowId) -> Option<WebviewWindow> {
        self.app
            .webview_windows()
            .into_iter()
            .find(|(label, _)| parse_window_label(label).map(|(_, found)| found) == Some(id))
            .map(|(_, window)| window)
    }

    fn with_window(&self, id: WindowId, action: &str, apply: impl FnOnce(&WebviewWindow) -> tauri::Result<()>) {
        match self.window(id) {
            Some(window) => {
                if let Err(err) = apply(&window) {
                    log_warn!("Failed to {} window {}: {}", action, id, err);
                }
            }
            None => log_debug!("Cannot {} window {}: already gone", action, id),
        }
    }
}

/// Logical bounds of a live window.
pub fn window_bounds(window: &tauri::Window) -> Option<Bounds> {
    let scale = window.scale_factor().ok()?;
    let position = window.outer_position().ok()?.to_logical::<i32>(scale);
    let size = window.inner_size().ok()?.to_logical::<u32>(scale);
    Some(Bounds::new(position.x, position.y, size.width, size.height))
}

fn webview_bounds(window: &WebviewWindow) -> Option<Bounds> {
    let webview: &Webview = window.as_ref();
    window_bounds(&webview.window())
}

impl WindowHost for TauriHost {
    async fn create_window(&self, spec: WindowSpec) -> Result<Bounds> {
        let (loaded_tx, loaded_rx) = oneshot::channel();
        let loaded_tx = Mutex::new(Some(loaded_tx));

        let url = WebviewUrl::App(format!("{}.html", spec.role.as_str()).into());
        let Bounds { position, size } = spec.bounds;
        let window = WebviewWindowBuilder::new(&self.app, window_label(spec.role, spec.id), url)
            .title(APP_TITLE)
            .position(f64::from(position.x), f64::from(position.y))
            .inner_size(f64::from(size.width), f64::from(size.height))
            .resizable(matches!(spec.role, WindowRole::Search | WindowRole::Write))
            .decorations(spec.role != WindowRole::Settings)
            .always_on_top(true)
            .skip_taskbar(true)
            .visible(false)
            .on_page_load(move |_, payload| {
                if payload.event() == PageLoadEvent::Finished {
                    let sender = loaded_tx
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .take();
                    if let Some(sender) = sender {
                        let _ = sender.send(());
                    }
                }
            })
            .build()
            .map_err(|err| anyhow!("failed to build {} window: {err}", spec.role.as_str()))?;

        // A window closed before loading drops the sender; it still exists
        // as far as the caller is concerned until its close event arrives.
        let _ = loaded_rx.await;

        Ok(webview_bounds(&window).unwrap_or(spec.bounds))
    }

    fn show_window(&self, id: WindowId) {
        self.with_window(id, "show", |window| window.show());
    }

    fn focus_window(&self, id: WindowId) {
        self.with_window(id, "focus", |window| window.set_focus());
    }

    fn close_window(&self, id: WindowId) {
        self.with_window(id, "close", |window| window.close());
    }

    fn send(&self, id: WindowId, message: RendererMessage) {
        let Some(window) = self.window(id) else {
            log_debug!("Dropping {} for closed window {}", message.event_name(), id);
            return;
        };
        if let Err(err) = self
            .app
            .emit_to(window.label(), message.event_name(), &message)
        {
            log_warn!("Failed to send {} to window {}: {}", message.event_name(), id, err);
        }
    }

    fn use_menu(&self, menu: MenuName) {
        let built = build_app_menu(&self.app, menu).and_then(|menu| self.app.set_menu(menu));
        if let Err(err) = built {
            log_warn!("Failed to switch to {:?} menu: {}", menu, err);
        }
    }

    fn active_screen_bounds(&self) -> Bounds {
        let monitor = self
            .app
            .cursor_position()
            .ok()
            .and_then(|cursor| self.app.monitor_from_point(cursor.x, cursor.y).ok().flatten())
            .or_else(|| self.app.primary_monitor().ok().flatten());

        let Some(monitor) = monitor else {
            return FALLBACK_SCREEN;
        };
        let scale = monitor.scale_factor();
        let position = monitor.position().to_logical::<i32>(scale);
        let size = monitor.size().to_logical::<u32>(scale);
        Bounds::new(position.x, position.y, size.width, size.height)
    }

    fn tray_position(&self) -> Option<Position> {
        *self
            .tray_position
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn confirm(&self, parent: Option<WindowId>, message: String) -> bool {
        let app = self.app.clone();
        let parent = parent.and_then(|id| self.window(id));
        tauri::async_runtime::spawn_blocking(move || {
            let mut dialog = app
                .dialog()
                .message(message)
                .title(APP_TITLE)
                .kind(MessageDialogKind::Warning)
                .buttons(MessageDialogButtons::YesNo);
            if let Some(parent) = parent.as_ref() {
                dialog = dialog.parent(parent);
            }
            dialog.blocking_show()
        })
        .await
        .unwrap_or(false)
    }

    async fn pick_folder(&self, parent: Option<WindowId>) -> Option<PathBuf> {
        let app = self.app.clone();
        let parent = parent.and_then(|id| self.window(id));
        tauri::async_runtime::spawn_blocking(move || {
            let mut builder = app.dialog().file().set_can_create_directories(true);
            if let Some(parent) = parent.as_ref() {
                builder = builder.set_parent(parent);
            }
            builder.blocking_pick_folder()
        })
        .await
        .ok()
        .flatten()
        .and_then(|path| path.into_path().ok())
    }

    fn open_path(&self, path: &Path) -> Result<()> {
        self.app
            .opener()
            .open_path(path.to_string_lossy(), None::<&str>)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        let label = window_label(WindowRole::Write, WindowId(12));
        assert_eq!(label, "write-12");
        assert_eq!(
            parse_window_label(&label),
            Some((WindowRole::Write, WindowId(12)))
        );
        assert_eq!(parse_window_label("main"), None);
        assert_eq!(parse_window_label("write-x"), None);
    }
}
