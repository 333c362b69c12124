use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::memory::MemoryStore;
use crate::models::{WindowId, WindowRole};
use crate::windows::{FocusHistory, WindowRegistry};

const MODE_HISTORY_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AppMode {
    #[default]
    Closed,
    Open,
    Settings,
    Intro,
}

impl AppMode {
    /// The role whose window is the whole of this mode.
    pub fn sole_role(&self) -> Option<WindowRole> {
        match self {
            AppMode::Settings => Some(WindowRole::Settings),
            AppMode::Intro => Some(WindowRole::Intro),
            AppMode::Closed | AppMode::Open => None,
        }
    }
}

/// Follow-up work for an Open transition. Each flag moves (or creates) the
/// matching window to the end of the show order so it ends up focused.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenOptions {
    pub write_afterwards: bool,
    pub search_afterwards: bool,
    pub new_write_window: bool,
}

impl OpenOptions {
    pub fn write_afterwards() -> Self {
        Self {
            write_afterwards: true,
            ..Self::default()
        }
    }

    pub fn search_afterwards() -> Self {
        Self {
            search_afterwards: true,
            ..Self::default()
        }
    }

    pub fn new_write_window() -> Self {
        Self {
            new_write_window: true,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct ControllerState {
    pub mode: AppMode,
    mode_history: VecDeque<AppMode>,
    pub registry: WindowRegistry,
    pub focus: FocusHistory,
    pub memory: MemoryStore,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            mode: AppMode::Closed,
            mode_history: VecDeque::from([AppMode::Closed]),
            registry: WindowRegistry::new(),
            focus: FocusHistory::new(),
            memory: MemoryStore::new(),
        }
    }
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, mode: AppMode) {
        self.mode = mode;
        self.mode_history.push_back(mode);
        while self.mode_history.len() > MODE_HISTORY_LIMIT {
            self.mode_history.pop_front();
        }
    }

    /// Whether the mode active before the current one was `mode`.
    pub fn entered_from(&self, mode: AppMode) -> bool {
        let len = self.mode_history.len();
        len >= 2 && self.mode_history[len - 2] == mode
    }

    /// Most recently focused window that is still registered.
    pub fn last_live(&self) -> Option<WindowId> {
        self.focus.last_matching(|id| self.registry.contains(id))
    }

    pub fn last_live_of_role(&self, role: WindowRole) -> Option<WindowId> {
        self.focus
            .last_matching(|id| self.registry.role_of(id) == Some(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bounds;

    #[test]
    fn history_is_bounded_and_tracks_previous_mode() {
        let mut state = ControllerState::new();
        state.enter(AppMode::Open);
        state.enter(AppMode::Settings);
        assert!(state.entered_from(AppMode::Open));

        for _ in 0..20 {
            state.enter(AppMode::Closed);
        }
        assert_eq!(state.mode_history.len(), MODE_HISTORY_LIMIT);
        assert!(!state.entered_from(AppMode::Open));
    }

    #[test]
    fn last_live_skips_deregistered_windows() {
        let mut state = ControllerState::new();
        let search = state.registry.allocate_id();
        state
            .registry
            .register(search, WindowRole::Search, Bounds::new(0, 0, 10, 10));
        let write = state.registry.allocate_id();
        state
            .registry
            .register(write, WindowRole::Write, Bounds::new(0, 0, 10, 10));

        state.focus.record(write);
        state.focus.record(search);
        assert_eq!(state.last_live(), Some(search));
        assert_eq!(state.last_live_of_role(WindowRole::Write), Some(write));

        state.registry.deregister(search);
        assert_eq!(state.last_live(), Some(write));
    }

    #[test]
    fn open_options_deserialize_with_missing_flags() {
        let options: OpenOptions = serde_json::from_str(r#"{"searchAfterwards":true}"#).unwrap();
        assert_eq!(options, OpenOptions::search_afterwards());
    }
}
