use serde::{Deserialize, Serialize};

/// Everything a write window needs to edit an existing note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoteEditInfo {
    pub content: String,
    pub filepath: String,
    pub searcher_index: usize,
}

/// A note as held by the search index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearcherDoc {
    pub content: String,
    pub filepath: String,
    /// Unix seconds of the last modification.
    pub modified_at: i64,
    pub searcher_index: usize,
}

impl From<&SearcherDoc> for NoteEditInfo {
    fn from(doc: &SearcherDoc) -> Self {
        Self {
            content: doc.content.clone(),
            filepath: doc.filepath.clone(),
            searcher_index: doc.searcher_index,
        }
    }
}

/// `[start, end)` byte range of a query match inside note content.
pub type MatchIndex = (usize, usize);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResultItem {
    pub searcher_doc: SearcherDoc,
    /// Sorted so that the last item is the match closest to the start.
    pub match_indices: Vec<MatchIndex>,
    /// Set for listings that were not produced by a word query, so the
    /// renderer ignores match highlighting.
    pub not_match_query: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardModifiersState {
    pub meta_key: bool,
}
