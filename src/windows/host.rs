//! The OS capability the orchestrator drives: building, showing and closing
//! windows, pushing renderer messages, menus, dialogs.
//!
//! Fire-and-forget calls on an id that no longer exists are no-ops; a window
//! may close between an event firing and its handler running.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::menu::MenuName;
use crate::models::{Bounds, Position, RendererMessage, WindowId, WindowRole};

/// What to build. Windows are always built hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub id: WindowId,
    pub role: WindowRole,
    pub bounds: Bounds,
}

pub trait WindowHost: Send + Sync + 'static {
    /// Resolves once the window exists and its renderer can receive
    /// messages. Returns the bounds the OS actually applied.
    fn create_window(&self, spec: WindowSpec) -> impl Future<Output = Result<Bounds>> + Send;

    fn show_window(&self, id: WindowId);

    fn focus_window(&self, id: WindowId);

    fn close_window(&self, id: WindowId);

    fn send(&self, id: WindowId, message: RendererMessage);

    /// Swap the application menu to the given variant.
    fn use_menu(&self, menu: MenuName);

    /// Bounds of the screen under the cursor.
    fn active_screen_bounds(&self) -> Bounds;

    /// Screen position of the tray icon, when the platform reports one.
    fn tray_position(&self) -> Option<Position>;

    /// Yes/no warning dialog. `true` only on an explicit yes.
    fn confirm(
        &self,
        parent: Option<WindowId>,
        message: String,
    ) -> impl Future<Output = bool> + Send;

    /// Directory picker. `None` when cancelled.
    fn pick_folder(&self, parent: Option<WindowId>) -> impl Future<Output = Option<PathBuf>> + Send;

    /// Reveal a path with the platform's default handler.
    fn open_path(&self, path: &Path) -> Result<()>;
}

#[cfg(test)]
pub mod fake {
    //! Recording host used by the controller and request tests.

    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::{bail, Result};

    use super::*;

    #[derive(Debug, Default)]
    pub struct HostLog {
        pub created: Vec<WindowSpec>,
        pub shown: Vec<WindowId>,
        pub focused: Vec<WindowId>,
        pub closed: Vec<WindowId>,
        pub sent: Vec<(WindowId, RendererMessage)>,
        pub menus: Vec<MenuName>,
        pub confirms: Vec<String>,
        pub opened_paths: Vec<PathBuf>,
    }

    pub struct FakeHost {
        pub log: Mutex<HostLog>,
        pub screen: Bounds,
        pub tray: Option<Position>,
        pub create_delay: Duration,
        pub failing_roles: HashSet<WindowRole>,
        pub confirm_answer: bool,
        pub picked_folder: Option<PathBuf>,
    }

    impl Default for FakeHost {
        fn default() -> Self {
            Self {
                log: Mutex::new(HostLog::default()),
                screen: Bounds::new(0, 0, 1440, 900),
                tray: None,
                create_delay: Duration::ZERO,
                failing_roles: HashSet::new(),
                confirm_answer: true,
                picked_folder: None,
            }
        }
    }

    impl FakeHost {
        pub fn with_log<T>(&self, read: impl FnOnce(&HostLog) -> T) -> T {
            read(&self.log.lock().unwrap())
        }

        pub fn created_roles(&self) -> Vec<WindowRole> {
            self.with_log(|log| log.created.iter().map(|spec| spec.role).collect())
        }

        pub fn messages_for(&self, id: WindowId) -> Vec<RendererMessage> {
            self.with_log(|log| {
                log.sent
                    .iter()
                    .filter(|(target, _)| *target == id)
                    .map(|(_, message)| message.clone())
                    .collect()
            })
        }
    }

    impl WindowHost for FakeHost {
        async fn create_window(&self, spec: WindowSpec) -> Result<Bounds> {
            if !self.create_delay.is_zero() {
                tokio::time::sleep(self.create_delay).await;
            }
            if self.failing_roles.contains(&spec.role) {
                bail!("refusing to build {:?} window", spec.role);
            }
            self.log.lock().unwrap().created.push(spec);
            Ok(spec.bounds)
        }

        fn show_window(&self, id: WindowId) {
            self.log.lock().unwrap().shown.push(id);
        }

        fn focus_window(&self, id: WindowId) {
            self.log.lock().unwrap().focused.push(id);
        }

        fn close_window(&self, id: WindowId) {
            self.log.lock().unwrap().closed.push(id);
        }

        fn send(&self, id: WindowId, message: RendererMessage) {
            self.log.lock().unwrap().sent.push((id, message));
        }

        fn use_menu(&self, menu: MenuName) {
            self.log.lock().unwrap().menus.push(menu);
        }

        fn active_screen_bounds(&self) -> Bounds {
            self.screen
        }

        fn tray_position(&self) -> Option<Position> {
            self.tray
        }

        async fn confirm(&self, _parent: Option<WindowId>, message: String) -> bool {
            self.log.lock().unwrap().confirms.push(message);
            self.confirm_answer
        }

        async fn pick_folder(&self, _parent: Option<WindowId>) -> Option<PathBuf> {
            self.picked_folder.clone()
        }

        fn open_path(&self, path: &Path) -> Result<()> {
            if !path.exists() {
                bail!("{} does not exist", path.display());
            }
            self.log.lock().unwrap().opened_paths.push(path.to_path_buf());
            Ok(())
        }
    }
}
