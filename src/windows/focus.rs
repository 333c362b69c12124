use std::collections::HashSet;

use crate::models::WindowId;

/// Ordered log of window focus events, oldest first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FocusHistory {
    entries: Vec<WindowId>,
}

impl FocusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repeated focus events on the same window collapse into one entry.
    pub fn record(&mut self, id: WindowId) {
        if self.entries.last() != Some(&id) {
            self.entries.push(id);
        }
    }

    /// Strips every occurrence of `id`. Neighbours that become adjacent
    /// duplicates are collapsed, so `[A, B, A, C]` minus `A` is `[B, C]`.
    pub fn remove_all(&mut self, id: WindowId) {
        let mut kept = Vec::with_capacity(self.entries.len());
        let mut previous: Option<WindowId> = None;

        for current in self.entries.iter().copied() {
            if current == id {
                continue;
            }
            if previous != Some(current) {
                kept.push(current);
            }
            previous = Some(current);
        }

        self.entries = kept;
    }

    /// Each id once, at the position of its most recent focus.
    pub fn deduped_most_recent_first(&self) -> Vec<WindowId> {
        let mut seen = HashSet::new();
        let mut deduped: Vec<WindowId> = self
            .entries
            .iter()
            .rev()
            .filter(|id| seen.insert(**id))
            .copied()
            .collect();
        deduped.reverse();
        deduped
    }

    pub fn replace(&mut self, entries: Vec<WindowId>) {
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn last(&self) -> Option<WindowId> {
        self.entries.last().copied()
    }

    /// Most recent entry accepted by `is_live`; dangling ids are skipped.
    pub fn last_matching(&self, mut is_live: impl FnMut(WindowId) -> bool) -> Option<WindowId> {
        self.entries.iter().rev().copied().find(|id| is_live(*id))
    }

    pub fn entries(&self) -> &[WindowId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const A: WindowId = WindowId(1);
    const B: WindowId = WindowId(2);
    const C: WindowId = WindowId(3);

    fn history(ids: &[WindowId]) -> FocusHistory {
        let mut history = FocusHistory::new();
        history.replace(ids.to_vec());
        history
    }

    #[test]
    fn repeated_focus_appends_once() {
        let mut history = FocusHistory::new();
        history.record(A);
        history.record(A);
        history.record(B);
        history.record(B);
        history.record(A);
        assert_eq!(history.entries(), &[A, B, A]);
    }

    #[test]
    fn removing_from_the_middle_collapses_duplicates() {
        let mut h = history(&[A, B, A, C]);
        h.remove_all(A);
        assert_eq!(h.entries(), &[B, C]);

        let mut h = history(&[B, A, B, C, A]);
        h.remove_all(A);
        assert_eq!(h.entries(), &[B, C]);
    }

    #[test]
    fn removing_the_only_window_empties_history() {
        let mut h = history(&[A]);
        h.remove_all(A);
        assert!(h.is_empty());

        let mut empty = FocusHistory::new();
        empty.remove_all(A);
        assert!(empty.is_empty());
    }

    #[test]
    fn dedupe_keeps_most_recent_position() {
        let h = history(&[A, B, A, C, B]);
        assert_eq!(h.deduped_most_recent_first(), vec![A, C, B]);
        assert_eq!(h.len(), 5);
    }

    #[test]
    fn last_matching_skips_dangling_ids() {
        let h = history(&[A, B, C]);
        assert_eq!(h.last_matching(|id| id != C), Some(B));
        assert_eq!(h.last_matching(|_| false), None);
        assert_eq!(h.last(), Some(C));
    }
}
