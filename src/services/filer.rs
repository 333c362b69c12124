//! Note files on disk. A note's file name is derived from its first line;
//! clashes get a `(n)` suffix.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};

pub const NOTE_FILE_EXTENSION: &str = ".md";
const MAX_NOTE_TITLE_LENGTH: usize = 200;
const MAX_NAME_RETRIES: usize = 100;
const UNTITLED: &str = "Untitled";

/// File title for a note: first line, non-alphanumerics blanked, trimmed.
pub fn note_title_from_content(content: &str) -> String {
    let first_line = content.split('\n').next().unwrap_or_default();
    let cleaned: String = first_line
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == ' ' { c } else { ' ' })
        .collect();
    let title: String = cleaned.trim().chars().take(MAX_NOTE_TITLE_LENGTH).collect();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// `""` if `{title}.md` is free in `folder`, else the first free `(n)`.
fn duplicate_suffix(folder: &Path, title: &str) -> String {
    let mut suffix = String::new();
    for attempt in 1..=MAX_NAME_RETRIES {
        let candidate = folder.join(format!("{title}{suffix}{NOTE_FILE_EXTENSION}"));
        if !candidate.exists() {
            break;
        }
        suffix = format!("({attempt})");
    }
    suffix
}

fn strip_duplicate_suffix(file_stem: &str) -> &str {
    let Some(without_paren) = file_stem.strip_suffix(')') else {
        return file_stem;
    };
    match without_paren.rfind('(') {
        Some(open)
            if open + 1 < without_paren.len()
                && without_paren[open + 1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            &file_stem[..open]
        }
        _ => file_stem,
    }
}

#[derive(Debug)]
pub struct Filer {
    notes_folder: RwLock<PathBuf>,
}

impl Default for Filer {
    fn default() -> Self {
        Self::new(PathBuf::from("./"))
    }
}

impl Filer {
    pub fn new(notes_folder: PathBuf) -> Self {
        Self {
            notes_folder: RwLock::new(notes_folder),
        }
    }

    pub fn set_notes_folder_path(&self, path: PathBuf) {
        *self.notes_folder.write().unwrap_or_else(PoisonError::into_inner) = path;
    }

    pub fn notes_folder_path(&self) -> PathBuf {
        self.notes_folder
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Writes a new note file and returns its path.
    pub fn create_note(&self, content: &str) -> Result<String> {
        self.write_note(content, &note_title_from_content(content), None)
    }

    fn write_note(&self, content: &str, title: &str, old_filepath: Option<&Path>) -> Result<String> {
        let folder = self.notes_folder_path();
        let filename = format!("{title}{}{NOTE_FILE_EXTENSION}", duplicate_suffix(&folder, title));
        let filepath = folder.join(filename);

        if let Some(old) = old_filepath {
            fs::rename(old, &filepath).with_context(|| {
                format!("Failed to rename {} to {}", old.display(), filepath.display())
            })?;
        }
        fs::write(&filepath, content)
            .with_context(|| format!("Failed to write note {}", filepath.display()))?;

        Ok(filepath.to_string_lossy().into_owned())
    }

    /// Rewrites a note. A changed first line renames the file; a missing
    /// file is recreated. Returns the (possibly new) path.
    pub fn edit_note(&self, old_filepath: &str, content: &str) -> Result<String> {
        let old_path = Path::new(old_filepath);
        if !old_path.exists() {
            return self.create_note(content);
        }

        let new_title = note_title_from_content(content);
        let old_stem = old_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        if strip_duplicate_suffix(&old_stem) == new_title {
            fs::write(old_path, content)
                .with_context(|| format!("Failed to write note {}", old_path.display()))?;
            return Ok(old_filepath.to_string());
        }

        self.write_note(content, &new_title, Some(old_path))
    }

    pub fn delete_note(&self, filepath: &str) -> Result<()> {
        let path = Path::new(filepath);
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to delete note {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filer() -> (tempfile::TempDir, Filer) {
        let dir = tempfile::tempdir().unwrap();
        let filer = Filer::new(dir.path().to_path_buf());
        (dir, filer)
    }

    #[test]
    fn title_uses_first_line_only() {
        assert_eq!(note_title_from_content("Shopping: milk!\nsecond"), "Shopping  milk");
        assert_eq!(note_title_from_content("###\nbody"), "Untitled");
        assert_eq!(note_title_from_content(&"a".repeat(300)).len(), 200);
    }

    #[test]
    fn duplicate_titles_get_numbered() {
        let (dir, filer) = filer();
        let first = filer.create_note("idea\none").unwrap();
        let second = filer.create_note("idea\ntwo").unwrap();
        let third = filer.create_note("idea\nthree").unwrap();

        assert_eq!(Path::new(&first), dir.path().join("idea.md"));
        assert_eq!(Path::new(&second), dir.path().join("idea(1).md"));
        assert_eq!(Path::new(&third), dir.path().join("idea(2).md"));
    }

    #[test]
    fn suffix_is_stripped_only_when_numeric() {
        assert_eq!(strip_duplicate_suffix("idea(3)"), "idea");
        assert_eq!(strip_duplicate_suffix("idea(x)"), "idea(x)");
        assert_eq!(strip_duplicate_suffix("idea()"), "idea()");
        assert_eq!(strip_duplicate_suffix("idea"), "idea");
    }

    #[test]
    fn edit_with_same_title_keeps_path() {
        let (_dir, filer) = filer();
        filer.create_note("idea\none").unwrap();
        let second = filer.create_note("idea\ntwo").unwrap();

        let edited = filer.edit_note(&second, "idea\nchanged").unwrap();
        assert_eq!(edited, second);
        assert_eq!(fs::read_to_string(&edited).unwrap(), "idea\nchanged");
    }

    #[test]
    fn edit_with_new_title_renames() {
        let (dir, filer) = filer();
        let original = filer.create_note("draft\nbody").unwrap();

        let renamed = filer.edit_note(&original, "final\nbody").unwrap();
        assert_eq!(Path::new(&renamed), dir.path().join("final.md"));
        assert!(!Path::new(&original).exists());
        assert_eq!(fs::read_to_string(&renamed).unwrap(), "final\nbody");
    }

    #[test]
    fn edit_of_missing_file_recreates_it() {
        let (dir, filer) = filer();
        let missing = dir.path().join("gone.md");
        let path = filer
            .edit_note(&missing.to_string_lossy(), "back again")
            .unwrap();
        assert_eq!(Path::new(&path), dir.path().join("back again.md"));
    }

    #[test]
    fn delete_is_quiet_for_missing_files() {
        let (_dir, filer) = filer();
        let path = filer.create_note("temp").unwrap();
        filer.delete_note(&path).unwrap();
        assert!(!Path::new(&path).exists());
        filer.delete_note(&path).unwrap();
    }
}
