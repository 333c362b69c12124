//! In-memory note index: word queries, a recency list, and stable indices.
//!
//! A note's searcher index is its slot in the document table. Deleting a
//! note leaves an empty slot so indices held by windows or snapshots never
//! point at a different note.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::models::{MatchIndex, NoteEditInfo, QueryResultItem, SearcherDoc};

#[derive(Debug, Default)]
struct SearcherData {
    docs: Vec<Option<SearcherDoc>>,
    /// Searcher indices, most recently modified first.
    recent: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct Searcher {
    data: RwLock<SearcherData>,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SearcherData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SearcherData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole index, e.g. after scanning a notes folder.
    pub fn set_docs(&self, mut docs: Vec<SearcherDoc>) {
        for (index, doc) in docs.iter_mut().enumerate() {
            doc.searcher_index = index;
        }

        let mut recent: Vec<(i64, usize)> = docs
            .iter()
            .map(|doc| (doc.modified_at, doc.searcher_index))
            .collect();
        recent.sort_by(|a, b| b.0.cmp(&a.0));

        let mut data = self.write();
        data.recent = recent.into_iter().map(|(_, index)| index).collect();
        data.docs = docs.into_iter().map(Some).collect();
    }

    pub fn create_note(&self, content: &str, filepath: &str) -> usize {
        let mut data = self.write();
        let index = data.docs.len();
        data.docs.push(Some(SearcherDoc {
            content: content.to_string(),
            filepath: filepath.to_string(),
            modified_at: Utc::now().timestamp(),
            searcher_index: index,
        }));
        data.recent.insert(0, index);
        index
    }

    /// Returns `false` if the index no longer resolves.
    pub fn edit_note(&self, searcher_index: usize, filepath: &str, content: &str) -> bool {
        let mut data = self.write();
        let Some(Some(doc)) = data.docs.get_mut(searcher_index) else {
            return false;
        };
        doc.content = content.to_string();
        doc.filepath = filepath.to_string();
        doc.modified_at = Utc::now().timestamp();

        data.recent.retain(|index| *index != searcher_index);
        data.recent.insert(0, searcher_index);
        true
    }

    pub fn delete_note(&self, searcher_index: usize) {
        let mut data = self.write();
        if let Some(slot) = data.docs.get_mut(searcher_index) {
            *slot = None;
        }
        data.recent.retain(|index| *index != searcher_index);
    }

    pub fn get_note(&self, searcher_index: usize) -> Option<SearcherDoc> {
        self.read().docs.get(searcher_index).cloned().flatten()
    }

    pub fn get_note_edit_info(&self, searcher_index: usize) -> Option<NoteEditInfo> {
        self.get_note(searcher_index).as_ref().map(NoteEditInfo::from)
    }

    pub fn get_most_recent_note(&self) -> Option<NoteEditInfo> {
        let data = self.read();
        data.recent
            .iter()
            .find_map(|index| data.docs.get(*index).and_then(Option::as_ref))
            .map(NoteEditInfo::from)
    }

    pub fn get_recent_notes(&self) -> Vec<QueryResultItem> {
        let data = self.read();
        data.recent
            .iter()
            .filter_map(|index| data.docs.get(*index).and_then(Option::as_ref))
            .map(|doc| QueryResultItem {
                searcher_doc: doc.clone(),
                match_indices: Vec::new(),
                not_match_query: true,
            })
            .collect()
    }

    /// Notes containing any whitespace-separated word of `query`
    /// (case-insensitive). Ranked by distinct words matched, then total
    /// matches, then recency.
    pub fn search(&self, query: &str) -> Vec<QueryResultItem> {
        let components: Vec<&str> = query.split(' ').filter(|word| !word.is_empty()).collect();
        if components.is_empty() {
            return Vec::new();
        }

        let data = self.read();
        let mut ranked: Vec<(usize, QueryResultItem)> = data
            .docs
            .iter()
            .flatten()
            .filter_map(|doc| {
                let matches = find_all_matches(&doc.content, &components);
                if matches.unique_matches == 0 {
                    return None;
                }
                Some((
                    matches.unique_matches,
                    QueryResultItem {
                        searcher_doc: doc.clone(),
                        match_indices: matches.indices,
                        not_match_query: false,
                    },
                ))
            })
            .collect();

        ranked.sort_by(|(a_unique, a), (b_unique, b)| {
            b_unique
                .cmp(a_unique)
                .then(b.match_indices.len().cmp(&a.match_indices.len()))
                .then(b.searcher_doc.modified_at.cmp(&a.searcher_doc.modified_at))
        });

        ranked.into_iter().map(|(_, item)| item).collect()
    }

    pub fn len(&self) -> usize {
        self.read().docs.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, PartialEq)]
struct Matches {
    unique_matches: usize,
    indices: Vec<MatchIndex>,
}

/// Lowercased copy of note content that remembers, for every byte, the
/// span of the original character it came from. Lowercasing can change
/// byte lengths (`İ` becomes two chars), so offsets found in the folded
/// text are mapped back before they reach the renderer.
struct Folded {
    text: String,
    origin: Vec<(usize, usize)>,
}

impl Folded {
    fn new(content: &str) -> Self {
        let mut text = String::with_capacity(content.len());
        let mut origin = Vec::with_capacity(content.len());
        for (start, ch) in content.char_indices() {
            let span = (start, start + ch.len_utf8());
            for lower in ch.to_lowercase() {
                text.push(lower);
                origin.extend(std::iter::repeat(span).take(lower.len_utf8()));
            }
        }
        Self { text, origin }
    }

    /// Original byte range of the non-empty folded range `[start, end)`.
    fn original_range(&self, start: usize, end: usize) -> MatchIndex {
        (self.origin[start].0, self.origin[end - 1].1)
    }
}

fn fold(word: &str) -> String {
    word.chars().flat_map(char::to_lowercase).collect()
}

/// Every occurrence of every component, overlapping ranges merged. The
/// result is ordered last-to-first so the renderer can pop the match
/// closest to the start.
fn find_all_matches(content: &str, components: &[&str]) -> Matches {
    let haystack = Folded::new(content);
    let mut unique_matches = 0;
    let mut indices: Vec<MatchIndex> = Vec::new();

    for component in components {
        let needle = fold(component);
        if needle.is_empty() {
            continue;
        }
        let mut found_any = false;
        let mut from = 0;
        while let Some(offset) = haystack.text.get(from..).and_then(|rest| rest.find(&needle)) {
            let start = from + offset;
            let end = start + needle.len();
            indices.push(haystack.original_range(start, end));
            found_any = true;
            from = end;
        }
        if found_any {
            unique_matches += 1;
        }
    }

    indices.sort_by_key(|(start, _)| *start);
    let mut merged: Vec<MatchIndex> = Vec::with_capacity(indices.len());
    for (start, end) in indices {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged.reverse();

    Matches {
        unique_matches,
        indices: merged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(content: &str, modified_at: i64) -> SearcherDoc {
        SearcherDoc {
            content: content.to_string(),
            filepath: format!("/notes/{}.md", content.split(' ').next().unwrap_or("note")),
            modified_at,
            searcher_index: 0,
        }
    }

    fn seeded() -> Searcher {
        let searcher = Searcher::new();
        searcher.set_docs(vec![
            doc("groceries milk eggs", 10),
            doc("milk tea recipe with milk", 30),
            doc("meeting notes", 20),
        ]);
        searcher
    }

    #[test]
    fn set_docs_orders_recent_by_modification() {
        let searcher = seeded();
        let recent: Vec<usize> = searcher
            .get_recent_notes()
            .iter()
            .map(|item| item.searcher_doc.searcher_index)
            .collect();
        assert_eq!(recent, vec![1, 2, 0]);
        assert!(searcher.get_recent_notes().iter().all(|item| item.not_match_query));
        assert_eq!(searcher.get_most_recent_note().unwrap().searcher_index, 1);
    }

    #[test]
    fn search_ranks_by_distinct_then_total_matches() {
        let searcher = seeded();
        let results = searcher.search("milk eggs");
        let order: Vec<usize> = results
            .iter()
            .map(|item| item.searcher_doc.searcher_index)
            .collect();
        // doc 0 matches both words, doc 1 only "milk" (twice).
        assert_eq!(order, vec![0, 1]);
        assert!(searcher.search("   ").is_empty());
        assert!(searcher.search("zebra").is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let searcher = seeded();
        assert_eq!(searcher.search("MEETING").len(), 1);
    }

    #[test]
    fn created_note_is_most_recent() {
        let searcher = seeded();
        let index = searcher.create_note("fresh idea", "/notes/fresh idea.md");
        assert_eq!(index, 3);
        assert_eq!(searcher.get_most_recent_note().unwrap().content, "fresh idea");
    }

    #[test]
    fn edit_moves_note_to_front() {
        let searcher = seeded();
        assert!(searcher.edit_note(0, "/notes/groceries.md", "groceries bread"));
        assert_eq!(searcher.get_most_recent_note().unwrap().searcher_index, 0);
        assert_eq!(searcher.get_note(0).unwrap().content, "groceries bread");
        assert!(!searcher.edit_note(42, "/x.md", "x"));
    }

    #[test]
    fn deleted_index_stays_reserved() {
        let searcher = seeded();
        searcher.delete_note(1);
        assert!(searcher.get_note(1).is_none());
        assert!(searcher.get_note_edit_info(1).is_none());
        assert_eq!(searcher.len(), 2);
        assert_eq!(searcher.create_note("next", "/notes/next.md"), 3);
        assert!(searcher.search("tea").is_empty());
    }

    #[test]
    fn overlapping_matches_merge_and_reverse() {
        let matches = find_all_matches("abcabc", &["abc", "bca"]);
        assert_eq!(matches.unique_matches, 2);
        assert_eq!(matches.indices, vec![(0, 6)]);

        let matches = find_all_matches("a b a", &["a"]);
        assert_eq!(matches.indices, vec![(4, 5), (0, 1)]);
    }

    #[test]
    fn match_ranges_index_the_original_text() {
        let content = "İstanbul İzmir";

        let matches = find_all_matches(content, &["zmir"]);
        assert_eq!(matches.indices, vec![(12, 16)]);
        assert_eq!(&content[12..16], "zmir");

        let matches = find_all_matches(content, &["İZMIR"]);
        assert_eq!(matches.indices, vec![(10, 16)]);
        assert_eq!(&content[10..16], "İzmir");
    }
}
