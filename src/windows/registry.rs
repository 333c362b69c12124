//! Window registry: single source of truth for which windows exist.
//!
//! All per-window state lives in one [`WindowEntry`] so removing a window
//! is a single map removal.

use std::collections::HashMap;

use crate::models::{Bounds, WindowId, WindowRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    pub role: WindowRole,
    pub bounds: Bounds,
    /// Searcher index of the note a write window is editing.
    pub bound_note: Option<usize>,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowId, WindowEntry>,
    next_id: u64,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id for a window that is about to be built.
    pub fn allocate_id(&mut self) -> WindowId {
        self.next_id += 1;
        WindowId(self.next_id)
    }

    pub fn register(&mut self, id: WindowId, role: WindowRole, bounds: Bounds) {
        self.windows.insert(
            id,
            WindowEntry {
                role,
                bounds,
                bound_note: None,
                visible: false,
            },
        );
    }

    /// Returns the removed entry, or `None` if the window was already gone.
    pub fn deregister(&mut self, id: WindowId) -> Option<WindowEntry> {
        self.windows.remove(&id)
    }

    pub fn update_bounds(&mut self, id: WindowId, bounds: Bounds) {
        if let Some(entry) = self.windows.get_mut(&id) {
            entry.bounds = bounds;
        }
    }

    /// Binding only applies to write windows; other roles are ignored.
    pub fn bind_note(&mut self, id: WindowId, searcher_index: usize) {
        if let Some(entry) = self.windows.get_mut(&id) {
            if entry.role == WindowRole::Write {
                entry.bound_note = Some(searcher_index);
            }
        }
    }

    /// The window becomes a blank, new-note window.
    pub fn unbind_note(&mut self, id: WindowId) {
        if let Some(entry) = self.windows.get_mut(&id) {
            entry.bound_note = None;
        }
    }

    pub fn mark_visible(&mut self, id: WindowId, visible: bool) {
        if let Some(entry) = self.windows.get_mut(&id) {
            entry.visible = visible;
        }
    }

    pub fn get(&self, id: WindowId) -> Option<&WindowEntry> {
        self.windows.get(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn role_of(&self, id: WindowId) -> Option<WindowRole> {
        self.windows.get(&id).map(|entry| entry.role)
    }

    /// All live ids, ascending (creation order).
    pub fn ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self.windows.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn ids_by_role(&self, role: WindowRole) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|(_, entry)| entry.role == role)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// The live instance of a Search/Settings/Intro window. Uniqueness is
    /// kept by callers, so this picks the oldest if there were ever two.
    pub fn unique(&self, role: WindowRole) -> Option<WindowId> {
        self.ids_by_role(role).into_iter().next()
    }

    pub fn windows_bound_to(&self, searcher_index: usize) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|(_, entry)| entry.bound_note == Some(searcher_index))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(roles: &[WindowRole]) -> (WindowRegistry, Vec<WindowId>) {
        let mut registry = WindowRegistry::new();
        let ids = roles
            .iter()
            .map(|role| {
                let id = registry.allocate_id();
                registry.register(id, *role, Bounds::new(0, 0, 100, 100));
                id
            })
            .collect();
        (registry, ids)
    }

    #[test]
    fn deregister_removes_everything_once() {
        let (mut registry, ids) = registry_with(&[WindowRole::Write]);
        registry.bind_note(ids[0], 4);

        let removed = registry.deregister(ids[0]).expect("entry");
        assert_eq!(removed.bound_note, Some(4));
        assert!(registry.windows_bound_to(4).is_empty());
        assert!(registry.deregister(ids[0]).is_none());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut registry = WindowRegistry::new();
        let ghost = WindowId(99);
        registry.update_bounds(ghost, Bounds::new(1, 1, 1, 1));
        registry.bind_note(ghost, 1);
        registry.unbind_note(ghost);
        assert!(registry.get(ghost).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn only_write_windows_take_note_bindings() {
        let (mut registry, ids) = registry_with(&[WindowRole::Search, WindowRole::Write]);
        registry.bind_note(ids[0], 1);
        registry.bind_note(ids[1], 1);

        assert_eq!(registry.get(ids[0]).unwrap().bound_note, None);
        assert_eq!(registry.windows_bound_to(1), vec![ids[1]]);

        registry.unbind_note(ids[1]);
        assert_eq!(registry.get(ids[1]).unwrap().bound_note, None);
    }

    #[test]
    fn role_queries() {
        let (registry, ids) = registry_with(&[
            WindowRole::Write,
            WindowRole::Search,
            WindowRole::Write,
        ]);
        assert_eq!(registry.ids_by_role(WindowRole::Write), vec![ids[0], ids[2]]);
        assert_eq!(registry.unique(WindowRole::Search), Some(ids[1]));
        assert_eq!(registry.unique(WindowRole::Settings), None);
        assert_eq!(registry.ids(), ids);
    }

    #[test]
    fn allocated_ids_are_never_reused() {
        let (mut registry, ids) = registry_with(&[WindowRole::Write]);
        registry.deregister(ids[0]);
        assert_ne!(registry.allocate_id(), ids[0]);
    }
}
