//! Remembers the Open-mode layout when its windows are torn down, so the
//! next Open can rebuild it.

use serde::{Deserialize, Serialize};

use crate::models::{Bounds, NoteEditInfo, WindowId, WindowRole};
use crate::services::Searcher;
use crate::windows::{FocusHistory, WindowRegistry};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowMemory {
    /// Id of the window in the session the snapshot was taken from.
    pub id: WindowId,
    pub role: WindowRole,
    pub bounds: Bounds,
    /// Resolved when the snapshot is taken; `None` for blank write windows
    /// and for notes that no longer exist.
    pub note: Option<NoteEditInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModeSnapshot {
    /// Live windows, least recently focused first.
    pub windows: Vec<WindowMemory>,
    /// Focus order using the old ids; remapped on rebuild.
    pub focus_order: Vec<WindowId>,
    pub search_query: String,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<ModeSnapshot>,
    search_query: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the live windows in focus order. Stores and returns `None`
    /// when no focused window is still registered.
    pub fn save(
        &mut self,
        registry: &WindowRegistry,
        focus: &FocusHistory,
        searcher: &Searcher,
    ) -> Option<&ModeSnapshot> {
        let focus_order: Vec<WindowId> = focus
            .deduped_most_recent_first()
            .into_iter()
            .filter(|id| registry.contains(*id))
            .collect();

        if focus_order.is_empty() {
            self.snapshot = None;
            return None;
        }

        let windows = focus_order
            .iter()
            .filter_map(|id| {
                let entry = registry.get(*id)?;
                let note = match entry.role {
                    WindowRole::Write => entry
                        .bound_note
                        .and_then(|index| searcher.get_note_edit_info(index)),
                    _ => None,
                };
                Some(WindowMemory {
                    id: *id,
                    role: entry.role,
                    bounds: entry.bounds,
                    note,
                })
            })
            .collect();

        self.snapshot = Some(ModeSnapshot {
            windows,
            focus_order,
            search_query: self.search_query.clone(),
        });
        self.snapshot.as_ref()
    }

    /// Hands out the stored snapshot once.
    pub fn load(&mut self) -> Option<ModeSnapshot> {
        self.snapshot.take()
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The query typed into the search window, submitted or not.
    pub fn save_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearcherDoc;
    use pretty_assertions::assert_eq;

    struct Fixture {
        registry: WindowRegistry,
        focus: FocusHistory,
        searcher: Searcher,
        search: WindowId,
        write: WindowId,
    }

    fn fixture() -> Fixture {
        let searcher = Searcher::new();
        searcher.set_docs(vec![SearcherDoc {
            content: "standup notes".into(),
            filepath: "/notes/standup notes.md".into(),
            modified_at: 1,
            searcher_index: 0,
        }]);

        let mut registry = WindowRegistry::new();
        let search = registry.allocate_id();
        registry.register(search, WindowRole::Search, Bounds::new(20, 100, 350, 600));
        let write = registry.allocate_id();
        registry.register(write, WindowRole::Write, Bounds::new(500, 100, 420, 280));
        registry.bind_note(write, 0);

        let mut focus = FocusHistory::new();
        focus.record(write);
        focus.record(search);
        focus.record(write);

        Fixture {
            registry,
            focus,
            searcher,
            search,
            write,
        }
    }

    #[test]
    fn save_captures_layout_in_focus_order() {
        let mut f = fixture();
        let mut memory = MemoryStore::new();
        memory.save_search_query("standup");

        let snapshot = memory.save(&f.registry, &f.focus, &f.searcher).cloned().unwrap();
        assert_eq!(snapshot.focus_order, vec![f.search, f.write]);
        assert_eq!(snapshot.search_query, "standup");
        assert_eq!(snapshot.windows[0].role, WindowRole::Search);
        assert_eq!(snapshot.windows[0].note, None);
        assert_eq!(snapshot.windows[1].bounds, Bounds::new(500, 100, 420, 280));
        assert_eq!(snapshot.windows[1].note.as_ref().unwrap().content, "standup notes");

        f.registry.deregister(f.search);
        let snapshot = memory.save(&f.registry, &f.focus, &f.searcher).unwrap();
        assert_eq!(snapshot.focus_order, vec![f.write]);
    }

    #[test]
    fn load_is_single_use() {
        let f = fixture();
        let mut memory = MemoryStore::new();
        memory.save(&f.registry, &f.focus, &f.searcher);

        assert!(memory.load().is_some());
        assert!(memory.load().is_none());
        assert!(!memory.has_snapshot());
    }

    #[test]
    fn nothing_to_remember_clears_previous_snapshot() {
        let f = fixture();
        let mut memory = MemoryStore::new();
        memory.save(&f.registry, &f.focus, &f.searcher);

        assert!(memory
            .save(&f.registry, &FocusHistory::new(), &f.searcher)
            .is_none());
        assert!(memory.load().is_none());
    }

    #[test]
    fn deleted_note_is_remembered_unbound() {
        let f = fixture();
        f.searcher.delete_note(0);
        let mut memory = MemoryStore::new();

        let snapshot = memory.save(&f.registry, &f.focus, &f.searcher).unwrap();
        let write = snapshot.windows.iter().find(|w| w.id == f.write).unwrap();
        assert_eq!(write.note, None);
    }
}
